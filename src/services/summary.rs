//! Catalog home page counts

use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Author, Book, BookInstance, BookStatus, Genre},
    repository::Repository,
    store::Filter,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogSummary {
    pub book_count: u64,
    pub book_instance_count: u64,
    /// Copies with status `available`
    pub book_instance_available_count: u64,
    pub author_count: u64,
    pub genre_count: u64,
}

#[derive(Clone)]
pub struct SummaryService {
    repository: Repository,
}

impl SummaryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn counts(&self) -> AppResult<CatalogSummary> {
        let (book_count, book_instance_count, book_instance_available_count, author_count, genre_count) =
            tokio::try_join!(
                self.repository.count::<Book>(&Filter::All),
                self.repository.count::<BookInstance>(&Filter::All),
                self.repository.book_instances_count_with_status(BookStatus::Available),
                self.repository.count::<Author>(&Filter::All),
                self.repository.count::<Genre>(&Filter::All),
            )?;
        Ok(CatalogSummary {
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        })
    }
}
