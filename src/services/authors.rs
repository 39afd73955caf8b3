//! Author catalog operations

use serde::Serialize;
use uuid::Uuid;

use super::{delete_guarded, DeleteOutcome, FormOutcome, Resolver};
use crate::{
    error::AppResult,
    models::{Author, AuthorView, BookSummary, Entity, Linked},
    repository::Repository,
    validation::{self, AuthorForm, FieldError},
};

/// Author with the books that reference it (detail and delete pages)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorDetail {
    pub author: AuthorView,
    pub author_books: Vec<Linked<BookSummary>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorFormView {
    pub author: AuthorForm,
    pub errors: Vec<FieldError>,
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    resolver: Resolver,
}

impl AuthorsService {
    pub fn new(repository: Repository, resolver: Resolver) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// All authors by family name
    pub async fn list(&self) -> AppResult<Vec<AuthorView>> {
        let authors = self.repository.authors_list().await?;
        Ok(authors.into_iter().map(AuthorView::from).collect())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<AuthorDetail> {
        let (author, author_books) = tokio::try_join!(
            self.repository.require::<Author>(id),
            self.resolver.author_books(id),
        )?;
        Ok(AuthorDetail {
            author: author.into(),
            author_books,
        })
    }

    pub fn create_form(&self) -> AuthorFormView {
        AuthorFormView {
            author: AuthorForm::default(),
            errors: Vec::new(),
        }
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<AuthorFormView> {
        let author = self.repository.require::<Author>(id).await?;
        Ok(AuthorFormView {
            author: AuthorForm::from(&author),
            errors: Vec::new(),
        })
    }

    pub async fn create(&self, form: AuthorForm) -> AppResult<FormOutcome<AuthorFormView>> {
        let validated = match validation::run(form) {
            Ok(validated) => validated,
            Err(rejected) => {
                return Ok(FormOutcome::Invalid(AuthorFormView {
                    author: rejected.form,
                    errors: rejected.errors,
                }))
            }
        };
        let author: Author = self.repository.insert(&validated.draft).await?;
        tracing::info!("Created author {} ({})", author.id, author.name());
        Ok(FormOutcome::Redirect(author.url()))
    }

    pub async fn update(&self, id: Uuid, form: AuthorForm) -> AppResult<FormOutcome<AuthorFormView>> {
        let validated = match validation::run(form) {
            Ok(validated) => validated,
            Err(rejected) => {
                return Ok(FormOutcome::Invalid(AuthorFormView {
                    author: rejected.form,
                    errors: rejected.errors,
                }))
            }
        };
        let author: Author = self.repository.update(id, &validated.draft).await?;
        tracing::info!("Updated author {}", author.id);
        Ok(FormOutcome::Redirect(author.url()))
    }

    /// Confirmation page; `None` when the author no longer exists
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<AuthorDetail>> {
        let (author, author_books) = tokio::try_join!(
            self.repository.get::<Author>(id),
            self.resolver.author_books(id),
        )?;
        Ok(author.map(|author| AuthorDetail {
            author: author.into(),
            author_books,
        }))
    }

    /// Delete unless books still reference the author
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<AuthorDetail>> {
        let (author, author_books) = tokio::try_join!(
            self.repository.get::<Author>(id),
            self.resolver.author_books(id),
        )?;
        delete_guarded(
            &self.repository,
            id,
            author,
            author_books,
            |author, author_books| async move {
                Ok(AuthorDetail {
                    author: author.into(),
                    author_books,
                })
            },
        )
        .await
    }
}
