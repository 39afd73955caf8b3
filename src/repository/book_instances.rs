//! Book instance queries

use uuid::Uuid;

use super::{reference, Repository};
use crate::{
    error::AppResult,
    models::{BookInstance, BookStatus},
    store::{Filter, FindOptions},
};

impl Repository {
    pub async fn book_instances_list(&self) -> AppResult<Vec<BookInstance>> {
        self.find(&Filter::All, &FindOptions::default()).await
    }

    /// Copies of a book; a non-empty result blocks deleting the book
    pub async fn book_instances_of_book(&self, book_id: Uuid) -> AppResult<Vec<BookInstance>> {
        self.find(&Filter::Eq("book", reference(book_id)), &FindOptions::default())
            .await
    }

    pub async fn book_instances_count_with_status(&self, status: BookStatus) -> AppResult<u64> {
        self.count::<BookInstance>(&Filter::Eq("status", serde_json::to_value(status)?))
            .await
    }
}
