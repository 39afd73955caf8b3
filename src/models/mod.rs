//! Catalog data models and view-models

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use crate::store::Collection;

// Re-export commonly used types
pub use author::{Author, AuthorDraft, AuthorView};
pub use book::{Book, BookDraft, BookListEntry, BookOption, BookSummary, BookView};
pub use book_instance::{BookInstance, BookInstanceDraft, BookInstanceView, BookStatus, PopulatedBookInstance};
pub use genre::{Genre, GenreChoice, GenreDraft, GenreView};

/// Date rendering used by every display field (`2024, 03, 09`)
pub const DISPLAY_DATE_FORMAT: &str = "%Y, %m, %d";

/// ISO date rendering used to pre-fill date inputs
pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// A persisted catalog record.
///
/// Stored bodies are the serialized `Draft`; decoding folds the document id
/// back in as the `id` field.
pub trait Entity: DeserializeOwned + Send + Sync + 'static {
    type Draft: Serialize + Send + Sync;

    const COLLECTION: Collection;
    /// Detail route prefix, e.g. `/catalog/author`
    const ROUTE: &'static str;
    /// List page route, e.g. `/catalog/authors`
    const LIST_ROUTE: &'static str;
    const NOT_FOUND: &'static str;

    fn id(&self) -> Uuid;

    fn url(&self) -> String {
        url_for::<Self>(self.id())
    }
}

/// A partial view of an entity, read with a field projection.
pub trait Projection: DeserializeOwned + Send + 'static {
    type Of: Entity;

    const FIELDS: &'static [&'static str];

    fn id(&self) -> Uuid;
}

pub fn url_for<E: Entity>(id: Uuid) -> String {
    format!("{}/{}", E::ROUTE, id)
}

/// A projected record together with its detail url.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Linked<T> {
    #[serde(flatten)]
    pub item: T,
    pub url: String,
}

impl<T: Projection> From<T> for Linked<T> {
    fn from(item: T) -> Self {
        let url = url_for::<T::Of>(item.id());
        Self { item, url }
    }
}
