//! Book model, projections and populated views

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorView, Entity, GenreView, Projection};
use crate::store::Collection;

/// Stored book. `author` and `genre` are references, never embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    #[serde(default)]
    pub genre: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: Uuid,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<Uuid>,
}

impl Entity for Book {
    type Draft = BookDraft;

    const COLLECTION: Collection = Collection::Books;
    const ROUTE: &'static str = "/catalog/book";
    const LIST_ROUTE: &'static str = "/catalog/books";
    const NOT_FOUND: &'static str = "no such book";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// `title summary` projection, listed on author and genre pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
}

impl Projection for BookSummary {
    type Of = Book;

    const FIELDS: &'static [&'static str] = &["title", "summary"];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// `title` projection, used for pick-lists and populated copies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookOption {
    pub id: Uuid,
    pub title: String,
}

impl Projection for BookOption {
    type Of = Book;

    const FIELDS: &'static [&'static str] = &["title"];

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Book with author and genres populated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookView {
    pub id: Uuid,
    pub title: String,
    pub author: AuthorView,
    pub summary: String,
    pub isbn: String,
    pub genre: Vec<GenreView>,
    pub url: String,
}

impl BookView {
    pub fn new(book: Book, author: AuthorView, genre: Vec<GenreView>) -> Self {
        Self {
            url: book.url(),
            id: book.id,
            title: book.title,
            author,
            summary: book.summary,
            isbn: book.isbn,
            genre,
        }
    }
}

/// Row of the book list; `author` is null when the reference dangles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookListEntry {
    pub id: Uuid,
    pub title: String,
    pub author: Option<AuthorView>,
    pub url: String,
}

impl BookListEntry {
    pub fn new(book: Book, author: Option<AuthorView>) -> Self {
        Self {
            url: book.url(),
            id: book.id,
            title: book.title,
            author,
        }
    }
}
