//! In-process entity store

use std::{cmp::Ordering, collections::HashMap};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{project, Collection, Direction, Document, EntityStore, Filter, FindOptions, Sort};
use crate::error::AppResult;

/// Insertion-ordered collections held in memory.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, IndexMap<Uuid, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_field(sort: &Sort, a: &Document, b: &Document) -> Ordering {
    let left = a.body.get(sort.field);
    let right = b.body.get(sort.field);
    let ordering = match (left, right) {
        (Some(Value::String(l)), Some(Value::String(r))) => sort.collation.compare(l, r),
        (Some(Value::Number(l)), Some(Value::Number(r))) => l
            .as_f64()
            .partial_cmp(&r.as_f64())
            .unwrap_or(Ordering::Equal),
        // Missing and null values sort first, as in a document database
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), _) => Ordering::Less,
        (_, None | Some(Value::Null)) => Ordering::Greater,
        (Some(l), Some(r)) => l.to_string().cmp(&r.to_string()),
    };
    match sort.direction {
        Direction::Ascending => ordering,
        Direction::Descending => ordering.reverse(),
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn insert(&self, collection: Collection, body: Value) -> AppResult<Uuid> {
        let id = Uuid::new_v4();
        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().insert(id, body);
        Ok(id)
    }

    async fn get_by_id(&self, collection: Collection, id: Uuid) -> AppResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(&id))
            .map(|body| Document {
                id,
                body: body.clone(),
            }))
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> AppResult<Vec<Document>> {
        let mut found: Vec<Document> = {
            let collections = self.collections.read().await;
            collections
                .get(&collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|(id, body)| filter.matches(id, body))
                        .map(|(id, body)| Document {
                            id: *id,
                            body: body.clone(),
                        })
                        .collect()
                })
                .unwrap_or_default()
        };

        if let Some(sort) = &options.sort {
            // Stable sort keeps insertion order among equal keys
            found.sort_by(|a, b| compare_field(sort, a, b));
        }

        if let Some(fields) = &options.projection {
            found = found
                .into_iter()
                .map(|doc| Document {
                    id: doc.id,
                    body: project(doc.body, fields),
                })
                .collect();
        }

        Ok(found)
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
    ) -> AppResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(slot) = collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(&id))
        else {
            return Ok(None);
        };
        *slot = body.clone();
        Ok(Some(Document { id, body }))
    }

    async fn delete_by_id(&self, collection: Collection, id: Uuid) -> AppResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(&collection)
            .and_then(|docs| docs.shift_remove(&id))
            .is_some())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> AppResult<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(id, body)| filter.matches(id, body))
                    .count()
            })
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn close(&self) {
        self.collections.write().await.clear();
    }
}
