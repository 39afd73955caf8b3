//! Genre model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Entity;
use crate::store::Collection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreDraft {
    pub name: String,
}

impl Entity for Genre {
    type Draft = GenreDraft;

    const COLLECTION: Collection = Collection::Genres;
    const ROUTE: &'static str = "/catalog/genre";
    const LIST_ROUTE: &'static str = "/catalog/genres";
    const NOT_FOUND: &'static str = "no such genre";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreView {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
}

impl From<Genre> for GenreView {
    fn from(genre: Genre) -> Self {
        Self {
            url: genre.url(),
            genre,
        }
    }
}

/// Genre checkbox on the book form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreChoice {
    #[serde(flatten)]
    pub genre: GenreView,
    pub checked: bool,
}
