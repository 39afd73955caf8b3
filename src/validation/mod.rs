//! Form validation pipeline.
//!
//! Every form goes through the same steps: trim every text field, check the
//! declarative `validator` rules, HTML-escape, and build a typed draft. A
//! failure never loses the user's input: the escaped form comes back with
//! the field errors so it can be shown again.

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

pub use author::AuthorForm;
pub use book::BookForm;
pub use book_instance::BookInstanceForm;
pub use genre::GenreForm;

/// A message scoped to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Submitted form fields, as strings, plus the rules that turn them into a draft.
pub trait FormInput: Validate + Clone {
    type Draft;

    /// Field order used when reporting errors
    const FIELDS: &'static [&'static str];

    fn trimmed(self) -> Self;

    fn escaped(self) -> Self;

    /// Build the typed draft from a trimmed, escaped, rule-checked form
    fn to_draft(&self) -> Result<Self::Draft, Vec<FieldError>>;
}

/// Pipeline output on success
#[derive(Debug)]
pub struct Validated<F: FormInput> {
    /// Normalized form, kept so later checks can re-render it
    pub form: F,
    pub draft: F::Draft,
}

/// Pipeline output on failure: the normalized input and what is wrong with it
#[derive(Debug, Clone, PartialEq)]
pub struct Rejected<F> {
    pub form: F,
    pub errors: Vec<FieldError>,
}

/// Run a submitted form through trim → rules → escape → draft.
pub fn run<F: FormInput>(input: F) -> Result<Validated<F>, Rejected<F>> {
    let trimmed = input.trimmed();
    let rule_errors = match trimmed.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => ordered_errors(&errors, F::FIELDS),
    };
    let form = trimmed.escaped();

    if !rule_errors.is_empty() {
        return Err(Rejected {
            form,
            errors: rule_errors,
        });
    }

    match form.to_draft() {
        Ok(draft) => Ok(Validated { form, draft }),
        Err(errors) => Err(Rejected { form, errors }),
    }
}

/// Flatten `validator` errors into field order, then rule order.
fn ordered_errors(errors: &ValidationErrors, fields: &[&str]) -> Vec<FieldError> {
    let by_field = errors.field_errors();
    fields
        .iter()
        .filter_map(|field| by_field.get(*field).map(|errs| (*field, errs)))
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid value.".to_string());
                FieldError::new(field, message)
            })
        })
        .collect()
}

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Replace the characters that are significant in HTML.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            '\\' => out.push_str("&#x5C;"),
            '`' => out.push_str("&#96;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn trim(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

/// Accepts `YYYY-MM-DD`, a local date-time, or an RFC 3339 timestamp.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .or_else(|| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M").ok())
                .map(|dt| dt.date())
        })
}

/// Empty means "not provided" (checkFalsy), anything else must be a date.
pub(crate) fn optional_date(value: &str) -> Result<Option<NaiveDate>, ()> {
    if value.is_empty() {
        return Ok(None);
    }
    parse_iso_date(value).map(Some).ok_or(())
}

/// Text rule shared by every free-text field: no control characters
/// other than line breaks and tabs.
pub(crate) fn printable(value: &str) -> Result<(), ValidationError> {
    if value
        .chars()
        .any(|c| c.is_control() && !matches!(c, '\n' | '\r' | '\t'))
    {
        return Err(error("printable", "Must not contain control characters."));
    }
    Ok(())
}

/// Reference fields must carry an identifier taken from a pick-list.
pub(crate) fn parse_reference(value: &str) -> Option<Uuid> {
    Uuid::parse_str(value).ok()
}
