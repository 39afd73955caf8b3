//! Book queries, including the reverse lookups that guard author and genre deletes

use uuid::Uuid;

use super::{reference, Repository};
use crate::{
    error::AppResult,
    models::{Book, BookOption, BookSummary},
    store::{Filter, FindOptions, Sort},
};

impl Repository {
    fn title_order(&self) -> FindOptions {
        FindOptions::sorted(Sort::ascending("title").with_collation(self.title_collation.clone()))
    }

    /// All books in human title order
    pub async fn books_list(&self) -> AppResult<Vec<Book>> {
        self.find(&Filter::All, &self.title_order()).await
    }

    /// Title pick-list for the copy form
    pub async fn books_options(&self) -> AppResult<Vec<BookOption>> {
        self.find_projected(&Filter::All, self.title_order()).await
    }

    pub async fn books_options_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<BookOption>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_projected(&Filter::IdIn(ids), FindOptions::default())
            .await
    }

    /// Books written by an author
    pub async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<BookSummary>> {
        self.find_projected(&Filter::Eq("author", reference(author_id)), FindOptions::default())
            .await
    }

    /// Books tagged with a genre
    pub async fn books_in_genre(&self, genre_id: Uuid) -> AppResult<Vec<BookSummary>> {
        self.find_projected(&Filter::Contains("genre", reference(genre_id)), FindOptions::default())
            .await
    }
}
