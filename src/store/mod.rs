//! Entity store: durable collections of JSON documents keyed by UUID.
//!
//! The store knows nothing about authors or books. It stores documents per
//! [`Collection`], assigns identities, and answers single-document reads and
//! writes plus filtered, projected and sorted finds. Typed access lives in
//! [`crate::repository`].

pub mod collation;
pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    config::{StoreBackend, StoreConfig},
    error::AppResult,
};

pub use collation::Collation;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// The four catalog collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Authors,
    Genres,
    Books,
    BookInstances,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Authors => "authors",
            Collection::Genres => "genres",
            Collection::Books => "books",
            Collection::BookInstances => "bookinstances",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored document. `body` never contains the `id` key.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: Uuid,
    pub body: Value,
}

impl Document {
    /// Body with the identity folded back in, ready for deserialization.
    pub fn into_value(self) -> Value {
        let mut body = self.body;
        if let Value::Object(map) = &mut body {
            map.insert("id".to_string(), Value::String(self.id.to_string()));
        }
        body
    }
}

/// Document selection
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Top-level field equals value
    Eq(&'static str, Value),
    /// Top-level array field contains value
    Contains(&'static str, Value),
    /// Identity is one of the given ids
    IdIn(Vec<Uuid>),
}

impl Filter {
    pub fn matches(&self, id: &Uuid, body: &Value) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => body.get(*field) == Some(value),
            Filter::Contains(field, value) => body
                .get(*field)
                .and_then(Value::as_array)
                .map_or(false, |items| items.contains(value)),
            Filter::IdIn(ids) => ids.contains(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sort {
    pub field: &'static str,
    pub direction: Direction,
    pub collation: Collation,
}

impl Sort {
    pub fn ascending(field: &'static str) -> Self {
        Self {
            field,
            direction: Direction::Ascending,
            collation: Collation::Binary,
        }
    }

    pub fn with_collation(mut self, collation: Collation) -> Self {
        self.collation = collation;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FindOptions {
    /// Fields kept in each returned body; `None` keeps everything
    pub projection: Option<Vec<&'static str>>,
    pub sort: Option<Sort>,
}

impl FindOptions {
    pub fn sorted(sort: Sort) -> Self {
        Self {
            projection: None,
            sort: Some(sort),
        }
    }

    pub fn project(mut self, fields: &[&'static str]) -> Self {
        self.projection = Some(fields.to_vec());
        self
    }
}

/// Keep only the projected top-level fields of a body.
pub fn project(body: Value, fields: &[&'static str]) -> Value {
    match body {
        Value::Object(map) => {
            let kept: Map<String, Value> = map
                .into_iter()
                .filter(|(key, _)| fields.contains(&key.as_str()))
                .collect();
            Value::Object(kept)
        }
        other => other,
    }
}

/// Single-document operations over the catalog collections.
///
/// No operation spans more than one document; concurrent writes to the same
/// id are serialized by the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Store a new document and return its generated id
    async fn insert(&self, collection: Collection, body: Value) -> AppResult<Uuid>;

    async fn get_by_id(&self, collection: Collection, id: Uuid) -> AppResult<Option<Document>>;

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> AppResult<Vec<Document>>;

    /// Replace the body of an existing document; `None` when absent
    async fn update_by_id(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
    ) -> AppResult<Option<Document>>;

    /// Remove a document; `false` when it was already absent
    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> AppResult<bool>;

    async fn count(&self, collection: Collection, filter: &Filter) -> AppResult<u64>;

    /// Liveness probe for readiness checks
    async fn ping(&self) -> AppResult<()>;

    /// Release backend resources
    async fn close(&self);
}

/// Open the configured store backend.
pub async fn open(config: &StoreConfig) -> AppResult<Arc<dyn EntityStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("Using in-memory entity store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let store = PgStore::connect(config).await?;
            tracing::info!("Connected to PostgreSQL entity store");
            Ok(Arc::new(store))
        }
    }
}
