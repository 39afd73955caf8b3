//! Book catalog operations

use serde::Serialize;
use uuid::Uuid;

use super::{delete_guarded, DeleteOutcome, FormOutcome, Resolver};
use crate::{
    error::AppResult,
    models::{
        Author, AuthorView, Book, BookDraft, BookInstanceView, BookListEntry, BookView, Entity,
        Genre, GenreChoice, GenreView,
    },
    repository::Repository,
    validation::{self, parse_reference, BookForm, FieldError},
};

/// Book with its copies (detail and delete pages)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookDetail {
    pub book: BookView,
    pub book_instances: Vec<BookInstanceView>,
}

/// Book form with the author pick-list and genre checkboxes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookFormView {
    pub book: BookForm,
    pub authors: Vec<AuthorView>,
    pub genres: Vec<GenreChoice>,
    pub errors: Vec<FieldError>,
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    resolver: Resolver,
}

impl BooksService {
    pub fn new(repository: Repository, resolver: Resolver) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// All books by title, each with its author
    pub async fn list(&self) -> AppResult<Vec<BookListEntry>> {
        let books = self.repository.books_list().await?;
        self.resolver.book_list(books).await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookDetail> {
        let (book, book_instances) = tokio::try_join!(
            self.repository.require::<Book>(id),
            self.resolver.book_copies(id),
        )?;
        Ok(BookDetail {
            book: self.resolver.book(book).await?,
            book_instances,
        })
    }

    pub async fn create_form(&self) -> AppResult<BookFormView> {
        self.form_view(BookForm::default(), Vec::new()).await
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<BookFormView> {
        let (book, authors, genres) = tokio::try_join!(
            self.repository.require::<Book>(id),
            self.repository.authors_list(),
            self.repository.genres_list(),
        )?;
        Ok(build_form_view(BookForm::from(&book), authors, genres, Vec::new()))
    }

    pub async fn create(&self, form: BookForm) -> AppResult<FormOutcome<BookFormView>> {
        let (form, draft) = match self.checked(form).await? {
            Ok(checked) => checked,
            Err((form, errors)) => return Ok(FormOutcome::Invalid(self.form_view(form, errors).await?)),
        };
        let book: Book = self.repository.insert(&draft).await?;
        tracing::info!("Created book {} ({})", book.id, form.title);
        Ok(FormOutcome::Redirect(book.url()))
    }

    pub async fn update(&self, id: Uuid, form: BookForm) -> AppResult<FormOutcome<BookFormView>> {
        let draft = match self.checked(form).await? {
            Ok((_, draft)) => draft,
            Err((form, errors)) => return Ok(FormOutcome::Invalid(self.form_view(form, errors).await?)),
        };
        let book: Book = self.repository.update(id, &draft).await?;
        tracing::info!("Updated book {}", book.id);
        Ok(FormOutcome::Redirect(book.url()))
    }

    /// Confirmation page; `None` when the book no longer exists
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<BookDetail>> {
        let (book, book_instances) = tokio::try_join!(
            self.repository.get::<Book>(id),
            self.resolver.book_copies(id),
        )?;
        match book {
            Some(book) => Ok(Some(BookDetail {
                book: self.resolver.book(book).await?,
                book_instances,
            })),
            None => Ok(None),
        }
    }

    /// Delete unless copies of the book remain
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<BookDetail>> {
        let (book, book_instances) = tokio::try_join!(
            self.repository.get::<Book>(id),
            self.resolver.book_copies(id),
        )?;
        let resolver = &self.resolver;
        delete_guarded(
            &self.repository,
            id,
            book,
            book_instances,
            |book, book_instances| async move {
                Ok(BookDetail {
                    book: resolver.book(book).await?,
                    book_instances,
                })
            },
        )
        .await
    }

    /// Run the form pipeline, then check that the referenced author and
    /// genres exist.
    async fn checked(
        &self,
        form: BookForm,
    ) -> AppResult<Result<(BookForm, BookDraft), (BookForm, Vec<FieldError>)>> {
        let validated = match validation::run(form) {
            Ok(validated) => validated,
            Err(rejected) => return Ok(Err((rejected.form, rejected.errors))),
        };

        let mut genre_ids = validated.draft.genre.clone();
        genre_ids.sort();
        genre_ids.dedup();
        let (author, genres) = tokio::try_join!(
            self.repository.get::<Author>(validated.draft.author),
            self.repository.genres_by_ids(genre_ids.clone()),
        )?;

        let mut errors = Vec::new();
        if author.is_none() {
            errors.push(FieldError::new("author", "Author must be chosen from the author list."));
        }
        if genres.len() != genre_ids.len() {
            errors.push(FieldError::new("genre", "Genres must be chosen from the genre list."));
        }
        if errors.is_empty() {
            Ok(Ok((validated.form, validated.draft)))
        } else {
            tracing::debug!("Book form references missing entities: {:?}", errors);
            Ok(Err((validated.form, errors)))
        }
    }

    async fn form_view(&self, book: BookForm, errors: Vec<FieldError>) -> AppResult<BookFormView> {
        let (authors, genres) = tokio::try_join!(
            self.repository.authors_list(),
            self.repository.genres_list(),
        )?;
        Ok(build_form_view(book, authors, genres, errors))
    }
}

fn build_form_view(
    book: BookForm,
    authors: Vec<Author>,
    genres: Vec<Genre>,
    errors: Vec<FieldError>,
) -> BookFormView {
    let genres = genres
        .into_iter()
        .map(|genre| {
            let checked = book
                .genre
                .iter()
                .any(|value| parse_reference(value) == Some(genre.id));
            GenreChoice {
                genre: GenreView::from(genre),
                checked,
            }
        })
        .collect();
    BookFormView {
        authors: authors.into_iter().map(AuthorView::from).collect(),
        genres,
        book,
        errors,
    }
}
