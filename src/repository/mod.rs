//! Typed access to the entity store

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Entity, Projection},
    store::{Collation, Document, EntityStore, Filter, FindOptions},
};

/// Main repository struct holding the store handle
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn EntityStore>,
    title_collation: Collation,
}

fn decode<T: DeserializeOwned>(doc: Document) -> AppResult<T> {
    Ok(serde_json::from_value(doc.into_value())?)
}

impl Repository {
    /// Create a repository over an opened store. Book titles are ordered
    /// with the given locale collation.
    pub fn new(store: Arc<dyn EntityStore>, title_locale: &str) -> Self {
        Self {
            store,
            title_collation: Collation::locale(title_locale),
        }
    }

    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    pub async fn get<E: Entity>(&self, id: Uuid) -> AppResult<Option<E>> {
        tracing::debug!("Fetching {} {}", E::COLLECTION, id);
        self.store
            .get_by_id(E::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    /// Fetch by id, failing with the entity's not-found message
    pub async fn require<E: Entity>(&self, id: Uuid) -> AppResult<E> {
        self.get(id)
            .await?
            .ok_or_else(|| AppError::NotFound(E::NOT_FOUND.to_string()))
    }

    pub async fn find<E: Entity>(&self, filter: &Filter, options: &FindOptions) -> AppResult<Vec<E>> {
        tracing::debug!("Finding {} where {:?}", E::COLLECTION, filter);
        self.store
            .find(E::COLLECTION, filter, options)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Find with the projection declared by `P`
    pub async fn find_projected<P: Projection>(
        &self,
        filter: &Filter,
        options: FindOptions,
    ) -> AppResult<Vec<P>> {
        let options = options.project(P::FIELDS);
        self.store
            .find(<P::Of as Entity>::COLLECTION, filter, &options)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn insert<E: Entity>(&self, draft: &E::Draft) -> AppResult<E> {
        let body = serde_json::to_value(draft)?;
        let id = self.store.insert(E::COLLECTION, body.clone()).await?;
        decode(Document { id, body })
    }

    pub async fn update<E: Entity>(&self, id: Uuid, draft: &E::Draft) -> AppResult<E> {
        let body = serde_json::to_value(draft)?;
        self.store
            .update_by_id(E::COLLECTION, id, body)
            .await?
            .map(decode)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(E::NOT_FOUND.to_string()))
    }

    /// `false` when the entity was already gone
    pub async fn delete<E: Entity>(&self, id: Uuid) -> AppResult<bool> {
        self.store.delete_by_id(E::COLLECTION, id).await
    }

    pub async fn count<E: Entity>(&self, filter: &Filter) -> AppResult<u64> {
        self.store.count(E::COLLECTION, filter).await
    }
}

/// Reference value as stored inside a document body
pub(crate) fn reference(id: Uuid) -> serde_json::Value {
    serde_json::Value::String(id.to_string())
}
