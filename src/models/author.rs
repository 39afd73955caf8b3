//! Author model and derived display fields

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Entity, DISPLAY_DATE_FORMAT, FORM_DATE_FORMAT};
use crate::store::Collection;

/// Stored author
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub date_of_death: Option<NaiveDate>,
}

/// Validated author fields ready for storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorDraft {
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Entity for Author {
    type Draft = AuthorDraft;

    const COLLECTION: Collection = Collection::Authors;
    const ROUTE: &'static str = "/catalog/author";
    const LIST_ROUTE: &'static str = "/catalog/authors";
    const NOT_FOUND: &'static str = "no such author";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Author {
    /// "family_name, first_name"
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// "birth - death"; a missing date drops its segment, no dates gives "".
    pub fn lifespan(&self) -> String {
        let birth = self.date_of_birth.map(|d| d.format(DISPLAY_DATE_FORMAT).to_string());
        let death = self.date_of_death.map(|d| d.format(DISPLAY_DATE_FORMAT).to_string());
        match (birth, death) {
            (Some(birth), Some(death)) => format!("{} - {}", birth, death),
            (Some(birth), None) => format!("{} -", birth),
            (None, Some(death)) => format!("- {}", death),
            (None, None) => String::new(),
        }
    }

    pub fn date_of_birth_yyyy_mm_dd(&self) -> Option<String> {
        self.date_of_birth.map(|d| d.format(FORM_DATE_FORMAT).to_string())
    }

    pub fn date_of_death_yyyy_mm_dd(&self) -> Option<String> {
        self.date_of_death.map(|d| d.format(FORM_DATE_FORMAT).to_string())
    }
}

/// Author with every derived display field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub lifespan: String,
    pub url: String,
    pub date_of_birth_yyyy_mm_dd: Option<String>,
    pub date_of_death_yyyy_mm_dd: Option<String>,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            name: author.name(),
            lifespan: author.lifespan(),
            url: author.url(),
            date_of_birth_yyyy_mm_dd: author.date_of_birth_yyyy_mm_dd(),
            date_of_death_yyyy_mm_dd: author.date_of_death_yyyy_mm_dd(),
            author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(birth: Option<(i32, u32, u32)>, death: Option<(i32, u32, u32)>) -> Author {
        let date = |(y, m, d): (i32, u32, u32)| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        Author {
            id: Uuid::new_v4(),
            first_name: "龍之介".to_string(),
            family_name: "芥川".to_string(),
            date_of_birth: birth.map(date),
            date_of_death: death.map(date),
        }
    }

    #[test]
    fn test_name() {
        assert_eq!(author(None, None).name(), "芥川, 龍之介");
    }

    #[test]
    fn test_lifespan_segments() {
        assert_eq!(
            author(Some((1892, 3, 1)), Some((1927, 7, 24))).lifespan(),
            "1892, 03, 01 - 1927, 07, 24"
        );
        assert_eq!(author(Some((1892, 3, 1)), None).lifespan(), "1892, 03, 01 -");
        assert_eq!(author(None, Some((1927, 7, 24))).lifespan(), "- 1927, 07, 24");
        assert_eq!(author(None, None).lifespan(), "");
    }

    #[test]
    fn test_view_derives_fields() {
        let a = author(Some((1892, 3, 1)), None);
        let id = a.id;
        let view = AuthorView::from(a);
        assert_eq!(view.url, format!("/catalog/author/{}", id));
        assert_eq!(view.date_of_birth_yyyy_mm_dd.as_deref(), Some("1892-03-01"));
        assert_eq!(view.date_of_death_yyyy_mm_dd, None);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["name"], "芥川, 龍之介");
        assert_eq!(json["family_name"], "芥川");
    }
}
