//! Genre catalog operations

use serde::Serialize;
use uuid::Uuid;

use super::{delete_guarded, DeleteOutcome, FormOutcome, Resolver};
use crate::{
    error::AppResult,
    models::{BookSummary, Entity, Genre, GenreView, Linked},
    repository::Repository,
    validation::{self, FieldError, GenreForm},
};

/// Genre with the books tagged with it (detail and delete pages)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreDetail {
    pub genre: GenreView,
    pub genre_books: Vec<Linked<BookSummary>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreFormView {
    pub genre: GenreForm,
    pub errors: Vec<FieldError>,
}

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
    resolver: Resolver,
}

impl GenresService {
    pub fn new(repository: Repository, resolver: Resolver) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    pub async fn list(&self) -> AppResult<Vec<GenreView>> {
        let genres = self.repository.genres_list().await?;
        Ok(genres.into_iter().map(GenreView::from).collect())
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<GenreDetail> {
        let (genre, genre_books) = tokio::try_join!(
            self.repository.require::<Genre>(id),
            self.resolver.genre_books(id),
        )?;
        Ok(GenreDetail {
            genre: genre.into(),
            genre_books,
        })
    }

    pub fn create_form(&self) -> GenreFormView {
        GenreFormView {
            genre: GenreForm::default(),
            errors: Vec::new(),
        }
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<GenreFormView> {
        let genre = self.repository.require::<Genre>(id).await?;
        Ok(GenreFormView {
            genre: GenreForm::from(&genre),
            errors: Vec::new(),
        })
    }

    /// Create a genre, or redirect to the one that already has this name
    pub async fn create(&self, form: GenreForm) -> AppResult<FormOutcome<GenreFormView>> {
        let validated = match validation::run(form) {
            Ok(validated) => validated,
            Err(rejected) => {
                return Ok(FormOutcome::Invalid(GenreFormView {
                    genre: rejected.form,
                    errors: rejected.errors,
                }))
            }
        };

        if let Some(existing) = self
            .repository
            .genres_find_by_name(&validated.draft.name)
            .await?
        {
            tracing::debug!("Genre '{}' already exists as {}", existing.name, existing.id);
            return Ok(FormOutcome::Redirect(existing.url()));
        }

        let genre: Genre = self.repository.insert(&validated.draft).await?;
        tracing::info!("Created genre {} ({})", genre.id, genre.name);
        Ok(FormOutcome::Redirect(genre.url()))
    }

    pub async fn update(&self, id: Uuid, form: GenreForm) -> AppResult<FormOutcome<GenreFormView>> {
        let validated = match validation::run(form) {
            Ok(validated) => validated,
            Err(rejected) => {
                return Ok(FormOutcome::Invalid(GenreFormView {
                    genre: rejected.form,
                    errors: rejected.errors,
                }))
            }
        };
        let genre: Genre = self.repository.update(id, &validated.draft).await?;
        tracing::info!("Updated genre {}", genre.id);
        Ok(FormOutcome::Redirect(genre.url()))
    }

    /// Confirmation page; `None` when the genre no longer exists
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<GenreDetail>> {
        let (genre, genre_books) = tokio::try_join!(
            self.repository.get::<Genre>(id),
            self.resolver.genre_books(id),
        )?;
        Ok(genre.map(|genre| GenreDetail {
            genre: genre.into(),
            genre_books,
        }))
    }

    /// Delete unless books are still tagged with the genre
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<GenreDetail>> {
        let (genre, genre_books) = tokio::try_join!(
            self.repository.get::<Genre>(id),
            self.resolver.genre_books(id),
        )?;
        delete_guarded(
            &self.repository,
            id,
            genre,
            genre_books,
            |genre, genre_books| async move {
                Ok(GenreDetail {
                    genre: genre.into(),
                    genre_books,
                })
            },
        )
        .await
    }
}
