//! Shared fixtures

use std::sync::Arc;

use library_catalog::{
    repository::Repository,
    services::{FormOutcome, Services},
    store::{EntityStore, MemoryStore},
    validation::{AuthorForm, BookForm, BookInstanceForm, GenreForm},
};
use uuid::Uuid;

pub struct Catalog {
    pub store: Arc<dyn EntityStore>,
    pub services: Services,
}

pub fn catalog() -> Catalog {
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let services = Services::new(Repository::new(store.clone(), "ja"));
    Catalog { store, services }
}

/// Id at the end of a redirect url
pub fn redirected_id<V: std::fmt::Debug>(outcome: FormOutcome<V>) -> Uuid {
    match outcome {
        FormOutcome::Redirect(url) => url
            .rsplit('/')
            .next()
            .and_then(|id| Uuid::parse_str(id).ok())
            .unwrap_or_else(|| panic!("no id in redirect {}", url)),
        FormOutcome::Invalid(view) => panic!("form rejected: {:?}", view),
    }
}

impl Catalog {
    pub async fn author(&self, first_name: &str, family_name: &str) -> Uuid {
        let form = AuthorForm {
            first_name: first_name.to_string(),
            family_name: family_name.to_string(),
            ..AuthorForm::default()
        };
        redirected_id(self.services.authors.create(form).await.unwrap())
    }

    pub async fn genre(&self, name: &str) -> Uuid {
        let form = GenreForm {
            name: name.to_string(),
        };
        redirected_id(self.services.genres.create(form).await.unwrap())
    }

    pub async fn book(&self, title: &str, author: Uuid, genre: &[Uuid]) -> Uuid {
        let form = BookForm {
            title: title.to_string(),
            author: author.to_string(),
            summary: format!("{} の概要", title),
            isbn: "978-4-00-000000-0".to_string(),
            genre: genre.iter().map(ToString::to_string).collect(),
        };
        redirected_id(self.services.books.create(form).await.unwrap())
    }

    pub async fn copy(&self, book: Uuid, status: &str) -> Uuid {
        let form = BookInstanceForm {
            book: book.to_string(),
            imprint: "新潮文庫".to_string(),
            status: status.to_string(),
            due_back: String::new(),
        };
        redirected_id(self.services.book_instances.create(form).await.unwrap())
    }
}
