//! Book instance form rules

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{error, escape, optional_date, parse_reference, printable, trim, FieldError, FormInput};
use crate::models::{BookInstance, BookInstanceDraft, BookStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct BookInstanceForm {
    /// Book id, picked from the book list
    #[validate(
        length(min = 1, message = "Book must be specified."),
        custom(function = "book_reference")
    )]
    pub book: String,
    #[validate(
        length(min = 1, message = "Imprint must be specified."),
        custom(function = "printable")
    )]
    pub imprint: String,
    /// Status code or label; empty selects the default
    #[validate(custom(function = "status_value"))]
    pub status: String,
    /// ISO 8601 date; empty means today
    #[validate(custom(function = "due_back_date"))]
    pub due_back: String,
}

fn book_reference(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || parse_reference(value).is_some() {
        Ok(())
    } else {
        Err(error("reference", "Book must be chosen from the book list."))
    }
}

fn status_value(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || BookStatus::parse(value).is_some() {
        Ok(())
    } else {
        Err(error("status", "Invalid status."))
    }
}

fn due_back_date(value: &str) -> Result<(), ValidationError> {
    optional_date(value)
        .map(|_| ())
        .map_err(|_| error("date", "Invalid date."))
}

impl FormInput for BookInstanceForm {
    type Draft = BookInstanceDraft;

    const FIELDS: &'static [&'static str] = &["book", "imprint", "status", "due_back"];

    fn trimmed(self) -> Self {
        Self {
            book: trim(self.book),
            imprint: trim(self.imprint),
            status: trim(self.status),
            due_back: trim(self.due_back),
        }
    }

    fn escaped(self) -> Self {
        Self {
            book: escape(&self.book),
            imprint: escape(&self.imprint),
            status: escape(&self.status),
            ..self
        }
    }

    fn to_draft(&self) -> Result<BookInstanceDraft, Vec<FieldError>> {
        let mut errors = Vec::new();
        let book = parse_reference(&self.book);
        if book.is_none() {
            errors.push(FieldError::new("book", "Book must be chosen from the book list."));
        }
        let status = if self.status.is_empty() {
            Some(BookStatus::default())
        } else {
            BookStatus::parse(&self.status)
        };
        if status.is_none() {
            errors.push(FieldError::new("status", "Invalid status."));
        }
        let due_back = match optional_date(&self.due_back) {
            Ok(date) => Some(date.unwrap_or_else(|| Utc::now().date_naive())),
            Err(()) => {
                errors.push(FieldError::new("due_back", "Invalid date."));
                None
            }
        };

        match (book, status, due_back) {
            (Some(book), Some(status), Some(due_back)) => Ok(BookInstanceDraft {
                book,
                imprint: self.imprint.clone(),
                status,
                due_back,
            }),
            _ => Err(errors),
        }
    }
}

impl From<&BookInstance> for BookInstanceForm {
    fn from(instance: &BookInstance) -> Self {
        Self {
            book: instance.book.to_string(),
            imprint: instance.imprint.clone(),
            status: instance.status.as_code().to_string(),
            due_back: instance.due_back_yyyy_mm_dd(),
        }
    }
}
