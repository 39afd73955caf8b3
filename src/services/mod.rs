//! Catalog operations: list, detail, forms, create, update and guarded delete
//! for each entity type.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod resolver;
pub mod summary;

use std::future::Future;

use serde::Serialize;
use uuid::Uuid;

use crate::{error::AppResult, models::Entity, repository::Repository};

pub use resolver::Resolver;

/// Result of a create or update submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum FormOutcome<V> {
    /// Saved; go to this url
    Redirect(String),
    /// Show the form again with its errors
    Invalid(V),
}

/// Terminal states of a guarded delete
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeleteOutcome<V> {
    /// Dependents exist; nothing was deleted
    Blocked { view: V },
    /// Deleted; go to the list page
    Executed { redirect: String },
    /// Already absent; go to the list page
    Skipped { redirect: String },
}

impl<V> DeleteOutcome<V> {
    pub fn redirect(&self) -> Option<&str> {
        match self {
            DeleteOutcome::Blocked { .. } => None,
            DeleteOutcome::Executed { redirect } | DeleteOutcome::Skipped { redirect } => {
                Some(redirect)
            }
        }
    }
}

/// Run the delete guard once the entity and its dependents have been read.
/// `blocked` builds the view shown when dependents remain.
///
/// The check and the delete are two round-trips; a dependent created in
/// between is not detected.
pub(crate) async fn delete_guarded<E, D, V, F>(
    repository: &Repository,
    id: Uuid,
    entity: Option<E>,
    dependents: Vec<D>,
    blocked: impl FnOnce(E, Vec<D>) -> F,
) -> AppResult<DeleteOutcome<V>>
where
    E: Entity,
    F: Future<Output = AppResult<V>>,
{
    let redirect = E::LIST_ROUTE.to_string();
    let Some(entity) = entity else {
        tracing::info!("Delete skipped, {} {} already absent", E::COLLECTION, id);
        return Ok(DeleteOutcome::Skipped { redirect });
    };

    if !dependents.is_empty() {
        tracing::info!(
            "Delete of {} {} blocked by {} dependent(s)",
            E::COLLECTION,
            id,
            dependents.len()
        );
        return Ok(DeleteOutcome::Blocked {
            view: blocked(entity, dependents).await?,
        });
    }

    if repository.delete::<E>(id).await? {
        tracing::info!("Deleted {} {}", E::COLLECTION, id);
        Ok(DeleteOutcome::Executed { redirect })
    } else {
        tracing::info!("Delete skipped, {} {} removed concurrently", E::COLLECTION, id);
        Ok(DeleteOutcome::Skipped { redirect })
    }
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub summary: summary::SummaryService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        let resolver = Resolver::new(repository.clone());
        Self {
            authors: authors::AuthorsService::new(repository.clone(), resolver.clone()),
            genres: genres::GenresService::new(repository.clone(), resolver.clone()),
            books: books::BooksService::new(repository.clone(), resolver.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone(), resolver),
            summary: summary::SummaryService::new(repository.clone()),
            repository,
        }
    }

    /// Store liveness, for readiness checks
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.store().ping().await
    }

    /// Close the underlying store
    pub async fn shutdown(&self) {
        self.repository.store().close().await;
    }
}
