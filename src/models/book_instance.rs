//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{BookOption, Entity, Linked, DISPLAY_DATE_FORMAT, FORM_DATE_FORMAT};
use crate::store::Collection;

/// Circulation status of a copy. Japanese labels are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    #[serde(alias = "貸出可")]
    Available,
    #[default]
    #[serde(alias = "準備中")]
    Processing,
    #[serde(alias = "貸出中")]
    OnLoan,
    #[serde(alias = "予約中")]
    Reserved,
}

impl BookStatus {
    pub const ALL: [BookStatus; 4] = [
        BookStatus::Available,
        BookStatus::Processing,
        BookStatus::OnLoan,
        BookStatus::Reserved,
    ];

    pub fn as_code(&self) -> &'static str {
        match self {
            BookStatus::Available => "available",
            BookStatus::Processing => "processing",
            BookStatus::OnLoan => "on_loan",
            BookStatus::Reserved => "reserved",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            BookStatus::Available => "貸出可",
            BookStatus::Processing => "準備中",
            BookStatus::OnLoan => "貸出中",
            BookStatus::Reserved => "予約中",
        }
    }

    /// Parse a submitted value: either the code or the display label
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_code() == value || status.label() == value)
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstance {
    pub id: Uuid,
    pub book: Uuid,
    pub imprint: String,
    #[serde(default)]
    pub status: BookStatus,
    pub due_back: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookInstanceDraft {
    pub book: Uuid,
    pub imprint: String,
    pub status: BookStatus,
    pub due_back: NaiveDate,
}

impl Entity for BookInstance {
    type Draft = BookInstanceDraft;

    const COLLECTION: Collection = Collection::BookInstances;
    const ROUTE: &'static str = "/catalog/bookinstance";
    const LIST_ROUTE: &'static str = "/catalog/bookinstances";
    const NOT_FOUND: &'static str = "no such book instance";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl BookInstance {
    pub fn due_back_formatted(&self) -> String {
        self.due_back.format(DISPLAY_DATE_FORMAT).to_string()
    }

    pub fn due_back_yyyy_mm_dd(&self) -> String {
        self.due_back.format(FORM_DATE_FORMAT).to_string()
    }
}

/// Copy with derived display fields; `book` stays a reference
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookInstanceView {
    #[serde(flatten)]
    pub instance: BookInstance,
    pub status_label: &'static str,
    pub due_back_formatted: String,
    pub due_back_yyyy_mm_dd: String,
    pub url: String,
}

impl From<BookInstance> for BookInstanceView {
    fn from(instance: BookInstance) -> Self {
        Self {
            status_label: instance.status.label(),
            due_back_formatted: instance.due_back_formatted(),
            due_back_yyyy_mm_dd: instance.due_back_yyyy_mm_dd(),
            url: instance.url(),
            instance,
        }
    }
}

/// Copy with its book populated; `book` is null when the reference dangles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulatedBookInstance {
    pub id: Uuid,
    pub book: Option<Linked<BookOption>>,
    pub imprint: String,
    pub status: BookStatus,
    pub status_label: &'static str,
    pub due_back: NaiveDate,
    pub due_back_formatted: String,
    pub due_back_yyyy_mm_dd: String,
    pub url: String,
}

impl PopulatedBookInstance {
    pub fn new(instance: BookInstance, book: Option<BookOption>) -> Self {
        Self {
            status_label: instance.status.label(),
            due_back_formatted: instance.due_back_formatted(),
            due_back_yyyy_mm_dd: instance.due_back_yyyy_mm_dd(),
            url: instance.url(),
            id: instance.id,
            book: book.map(Linked::from),
            imprint: instance.imprint,
            status: instance.status,
            due_back: instance.due_back,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_and_labels() {
        assert_eq!(BookStatus::default(), BookStatus::Processing);
        assert_eq!(BookStatus::parse("on_loan"), Some(BookStatus::OnLoan));
        assert_eq!(BookStatus::parse("予約中"), Some(BookStatus::Reserved));
        assert_eq!(BookStatus::parse("lost"), None);

        let parsed: BookStatus = serde_json::from_str("\"貸出可\"").unwrap();
        assert_eq!(parsed, BookStatus::Available);
        assert_eq!(serde_json::to_string(&BookStatus::OnLoan).unwrap(), "\"on_loan\"");
    }

    #[test]
    fn test_due_back_formats() {
        let instance = BookInstance {
            id: Uuid::new_v4(),
            book: Uuid::new_v4(),
            imprint: "新潮社 2003".to_string(),
            status: BookStatus::OnLoan,
            due_back: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        };
        let view = PopulatedBookInstance::new(instance, None);
        assert_eq!(view.due_back_formatted, "2024, 03, 09");
        assert_eq!(view.due_back_yyyy_mm_dd, "2024-03-09");
        assert_eq!(view.status_label, "貸出中");
        assert!(view.book.is_none());
    }
}
