//! Book instance (copy) catalog operations

use serde::Serialize;
use uuid::Uuid;

use super::{DeleteOutcome, FormOutcome, Resolver};
use crate::{
    error::AppResult,
    models::{Book, BookInstance, BookInstanceDraft, BookOption, BookStatus, Entity, PopulatedBookInstance},
    repository::Repository,
    validation::{self, BookInstanceForm, FieldError},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceDetail {
    pub bookinstance: PopulatedBookInstance,
}

/// Status choice on the copy form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusChoice {
    pub value: &'static str,
    pub label: &'static str,
}

/// Copy form with the book pick-list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceFormView {
    pub bookinstance: BookInstanceForm,
    pub book_list: Vec<BookOption>,
    /// Book preselected in the pick-list
    pub selected_book: Option<String>,
    pub statuses: Vec<StatusChoice>,
    pub errors: Vec<FieldError>,
}

impl BookInstanceFormView {
    fn new(bookinstance: BookInstanceForm, book_list: Vec<BookOption>, errors: Vec<FieldError>) -> Self {
        let selected_book = Some(bookinstance.book.clone()).filter(|book| !book.is_empty());
        Self {
            bookinstance,
            book_list,
            selected_book,
            statuses: BookStatus::ALL
                .iter()
                .map(|status| StatusChoice {
                    value: status.as_code(),
                    label: status.label(),
                })
                .collect(),
            errors,
        }
    }
}

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
    resolver: Resolver,
}

impl BookInstancesService {
    pub fn new(repository: Repository, resolver: Resolver) -> Self {
        Self {
            repository,
            resolver,
        }
    }

    /// All copies, each with its book title
    pub async fn list(&self) -> AppResult<Vec<PopulatedBookInstance>> {
        let instances = self.repository.book_instances_list().await?;
        self.resolver.book_instance_list(instances).await
    }

    pub async fn detail(&self, id: Uuid) -> AppResult<BookInstanceDetail> {
        let instance = self.repository.require::<BookInstance>(id).await?;
        Ok(BookInstanceDetail {
            bookinstance: self.resolver.book_instance(instance).await?,
        })
    }

    pub async fn create_form(&self) -> AppResult<BookInstanceFormView> {
        let book_list = self.repository.books_options().await?;
        Ok(BookInstanceFormView::new(
            BookInstanceForm::default(),
            book_list,
            Vec::new(),
        ))
    }

    pub async fn update_form(&self, id: Uuid) -> AppResult<BookInstanceFormView> {
        let (instance, book_list) = tokio::try_join!(
            self.repository.require::<BookInstance>(id),
            self.repository.books_options(),
        )?;
        Ok(BookInstanceFormView::new(
            BookInstanceForm::from(&instance),
            book_list,
            Vec::new(),
        ))
    }

    pub async fn create(&self, form: BookInstanceForm) -> AppResult<FormOutcome<BookInstanceFormView>> {
        let draft = match self.checked(form).await? {
            Ok(draft) => draft,
            Err(invalid) => return Ok(FormOutcome::Invalid(invalid)),
        };
        let instance: BookInstance = self.repository.insert(&draft).await?;
        tracing::info!("Created book instance {} of book {}", instance.id, instance.book);
        Ok(FormOutcome::Redirect(instance.url()))
    }

    pub async fn update(
        &self,
        id: Uuid,
        form: BookInstanceForm,
    ) -> AppResult<FormOutcome<BookInstanceFormView>> {
        let draft = match self.checked(form).await? {
            Ok(draft) => draft,
            Err(invalid) => return Ok(FormOutcome::Invalid(invalid)),
        };
        let instance: BookInstance = self.repository.update(id, &draft).await?;
        tracing::info!("Updated book instance {}", instance.id);
        Ok(FormOutcome::Redirect(instance.url()))
    }

    /// Confirmation page; `None` when the copy no longer exists.
    /// A dangling book reference is shown empty rather than failing the page.
    pub async fn delete_form(&self, id: Uuid) -> AppResult<Option<BookInstanceDetail>> {
        let Some(instance) = self.repository.get::<BookInstance>(id).await? else {
            return Ok(None);
        };
        let bookinstance = self
            .resolver
            .book_instance_list(vec![instance])
            .await?
            .into_iter()
            .next();
        Ok(bookinstance.map(|bookinstance| BookInstanceDetail { bookinstance }))
    }

    /// Copies have no dependents, so delete always proceeds
    pub async fn delete(&self, id: Uuid) -> AppResult<DeleteOutcome<BookInstanceDetail>> {
        let redirect = BookInstance::LIST_ROUTE.to_string();
        if self.repository.delete::<BookInstance>(id).await? {
            tracing::info!("Deleted {} {}", BookInstance::COLLECTION, id);
            Ok(DeleteOutcome::Executed { redirect })
        } else {
            tracing::info!("Delete skipped, {} {} already absent", BookInstance::COLLECTION, id);
            Ok(DeleteOutcome::Skipped { redirect })
        }
    }

    /// Run the form pipeline, then check that the referenced book exists.
    /// On failure the form view comes back with the book pick-list.
    async fn checked(
        &self,
        form: BookInstanceForm,
    ) -> AppResult<Result<BookInstanceDraft, BookInstanceFormView>> {
        let (form, errors) = match validation::run(form) {
            Ok(validated) => {
                if self.repository.get::<Book>(validated.draft.book).await?.is_some() {
                    return Ok(Ok(validated.draft));
                }
                (
                    validated.form,
                    vec![FieldError::new("book", "Book must be chosen from the book list.")],
                )
            }
            Err(rejected) => (rejected.form, rejected.errors),
        };
        let book_list = self.repository.books_options().await?;
        Ok(Err(BookInstanceFormView::new(form, book_list, errors)))
    }
}
