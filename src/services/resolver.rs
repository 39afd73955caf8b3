//! Reference population.
//!
//! Detail views resolve strictly: a dangling reference fails the view with
//! the referenced entity's not-found error. Listings resolve leniently in one
//! batched lookup and leave unresolved references empty.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        Author, AuthorView, Book, BookInstance, BookInstanceView, BookListEntry, BookOption,
        BookSummary, BookView, Entity, Genre, GenreView, Linked, PopulatedBookInstance,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct Resolver {
    repository: Repository,
}

fn distinct(ids: impl IntoIterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

impl Resolver {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Populate author and genres of one book
    pub async fn book(&self, book: Book) -> AppResult<BookView> {
        let genre_ids = distinct(book.genre.iter().copied());
        let (author, genres) = tokio::try_join!(
            self.repository.require::<Author>(book.author),
            self.repository.genres_by_ids(genre_ids.clone()),
        )?;
        if genres.len() != genre_ids.len() {
            tracing::warn!("Book {} references a missing genre", book.id);
            return Err(AppError::NotFound(Genre::NOT_FOUND.to_string()));
        }
        let genres = genres.into_iter().map(GenreView::from).collect();
        Ok(BookView::new(book, author.into(), genres))
    }

    /// Populate the author of every listed book
    pub async fn book_list(&self, books: Vec<Book>) -> AppResult<Vec<BookListEntry>> {
        let ids = distinct(books.iter().map(|book| book.author));
        let authors: HashMap<Uuid, Author> = self
            .repository
            .authors_by_ids(ids)
            .await?
            .into_iter()
            .map(|author| (author.id, author))
            .collect();

        Ok(books
            .into_iter()
            .map(|book| {
                let author = authors.get(&book.author).cloned().map(AuthorView::from);
                if author.is_none() {
                    tracing::warn!("Book {} references missing author {}", book.id, book.author);
                }
                BookListEntry::new(book, author)
            })
            .collect())
    }

    /// Populate the book of one copy
    pub async fn book_instance(&self, instance: BookInstance) -> AppResult<PopulatedBookInstance> {
        let book = self
            .repository
            .books_options_by_ids(vec![instance.book])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                tracing::warn!("Book instance {} references missing book {}", instance.id, instance.book);
                AppError::NotFound(Book::NOT_FOUND.to_string())
            })?;
        Ok(PopulatedBookInstance::new(instance, Some(book)))
    }

    /// Populate the book of every listed copy
    pub async fn book_instance_list(
        &self,
        instances: Vec<BookInstance>,
    ) -> AppResult<Vec<PopulatedBookInstance>> {
        let ids = distinct(instances.iter().map(|instance| instance.book));
        let books: HashMap<Uuid, BookOption> = self
            .repository
            .books_options_by_ids(ids)
            .await?
            .into_iter()
            .map(|book| (book.id, book))
            .collect();

        Ok(instances
            .into_iter()
            .map(|instance| {
                let book = books.get(&instance.book).cloned();
                if book.is_none() {
                    tracing::warn!(
                        "Book instance {} references missing book {}",
                        instance.id,
                        instance.book
                    );
                }
                PopulatedBookInstance::new(instance, book)
            })
            .collect())
    }

    /// Books that reference an author
    pub async fn author_books(&self, author_id: Uuid) -> AppResult<Vec<Linked<BookSummary>>> {
        Ok(self
            .repository
            .books_by_author(author_id)
            .await?
            .into_iter()
            .map(Linked::from)
            .collect())
    }

    /// Books that reference a genre
    pub async fn genre_books(&self, genre_id: Uuid) -> AppResult<Vec<Linked<BookSummary>>> {
        Ok(self
            .repository
            .books_in_genre(genre_id)
            .await?
            .into_iter()
            .map(Linked::from)
            .collect())
    }

    /// Copies that reference a book
    pub async fn book_copies(&self, book_id: Uuid) -> AppResult<Vec<BookInstanceView>> {
        Ok(self
            .repository
            .book_instances_of_book(book_id)
            .await?
            .into_iter()
            .map(BookInstanceView::from)
            .collect())
    }
}
