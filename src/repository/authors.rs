//! Author queries

use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::Author,
    store::{Filter, FindOptions, Sort},
};

impl Repository {
    /// All authors ordered by family name
    pub async fn authors_list(&self) -> AppResult<Vec<Author>> {
        self.find(&Filter::All, &FindOptions::sorted(Sort::ascending("family_name")))
            .await
    }

    /// Authors among `ids`, in store order
    pub async fn authors_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Author>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find(&Filter::IdIn(ids), &FindOptions::default()).await
    }
}
