//! Genre queries

use serde_json::Value;
use uuid::Uuid;

use super::Repository;
use crate::{
    error::AppResult,
    models::Genre,
    store::{Filter, FindOptions, Sort},
};

impl Repository {
    /// All genres ordered by name
    pub async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        self.find(&Filter::All, &FindOptions::sorted(Sort::ascending("name")))
            .await
    }

    /// First genre with exactly this name
    pub async fn genres_find_by_name(&self, name: &str) -> AppResult<Option<Genre>> {
        let found: Vec<Genre> = self
            .find(
                &Filter::Eq("name", Value::String(name.to_string())),
                &FindOptions::default(),
            )
            .await?;
        Ok(found.into_iter().next())
    }

    /// Genres among `ids`, ordered by name
    pub async fn genres_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find(&Filter::IdIn(ids), &FindOptions::sorted(Sort::ascending("name")))
            .await
    }
}
