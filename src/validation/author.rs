//! Author form rules

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{error, escape, optional_date, printable, trim, FieldError, FormInput};
use crate::models::{Author, AuthorDraft};

const NAME_MAX_CHARS: usize = 100;

/// Author form as submitted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct AuthorForm {
    #[validate(
        length(min = 1, message = "First name must be specified."),
        custom(function = "name_text")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, message = "Family name must be specified."),
        custom(function = "name_text")
    )]
    pub family_name: String,
    /// ISO 8601 date, empty when unknown
    #[validate(custom(function = "birth_date"))]
    pub date_of_birth: String,
    /// ISO 8601 date, empty when unknown
    #[validate(custom(function = "death_date"))]
    pub date_of_death: String,
}

fn name_text(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() > NAME_MAX_CHARS {
        return Err(error("length", "Names are limited to 100 characters."));
    }
    printable(value)
}

fn birth_date(value: &str) -> Result<(), ValidationError> {
    optional_date(value)
        .map(|_| ())
        .map_err(|_| error("date", "Invalid date of birth."))
}

fn death_date(value: &str) -> Result<(), ValidationError> {
    optional_date(value)
        .map(|_| ())
        .map_err(|_| error("date", "Invalid date of death."))
}

impl FormInput for AuthorForm {
    type Draft = AuthorDraft;

    const FIELDS: &'static [&'static str] =
        &["first_name", "family_name", "date_of_birth", "date_of_death"];

    fn trimmed(self) -> Self {
        Self {
            first_name: trim(self.first_name),
            family_name: trim(self.family_name),
            date_of_birth: trim(self.date_of_birth),
            date_of_death: trim(self.date_of_death),
        }
    }

    fn escaped(self) -> Self {
        Self {
            first_name: escape(&self.first_name),
            family_name: escape(&self.family_name),
            ..self
        }
    }

    fn to_draft(&self) -> Result<AuthorDraft, Vec<FieldError>> {
        let date_of_birth = optional_date(&self.date_of_birth)
            .map_err(|_| vec![FieldError::new("date_of_birth", "Invalid date of birth.")])?;
        let date_of_death = optional_date(&self.date_of_death)
            .map_err(|_| vec![FieldError::new("date_of_death", "Invalid date of death.")])?;
        Ok(AuthorDraft {
            first_name: self.first_name.clone(),
            family_name: self.family_name.clone(),
            date_of_birth,
            date_of_death,
        })
    }
}

impl From<&Author> for AuthorForm {
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth_yyyy_mm_dd().unwrap_or_default(),
            date_of_death: author.date_of_death_yyyy_mm_dd().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::run;
    use chrono::NaiveDate;

    fn form(first: &str, family: &str, birth: &str, death: &str) -> AuthorForm {
        AuthorForm {
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_of_birth: birth.to_string(),
            date_of_death: death.to_string(),
        }
    }

    #[test]
    fn test_valid_author_is_trimmed_and_escaped() {
        let validated = run(form("  漱石 ", "夏目<b>", "1867-02-09", "")).unwrap();
        assert_eq!(validated.draft.first_name, "漱石");
        assert_eq!(validated.draft.family_name, "夏目&lt;b&gt;");
        assert_eq!(validated.draft.date_of_birth, NaiveDate::from_ymd_opt(1867, 2, 9));
        assert_eq!(validated.draft.date_of_death, None);
    }

    #[test]
    fn test_errors_follow_field_order() {
        let rejected = run(form("", "   ", "yesterday", "")).unwrap_err();
        let fields: Vec<&str> = rejected.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "family_name", "date_of_birth"]);
        assert_eq!(rejected.errors[0].message, "First name must be specified.");
        assert_eq!(rejected.errors[2].message, "Invalid date of birth.");
        // Input is carried back for the form
        assert_eq!(rejected.form.date_of_birth, "yesterday");
    }

    #[test]
    fn test_name_length_limit() {
        let long = "あ".repeat(101);
        let rejected = run(form(&long, "夏目", "", "")).unwrap_err();
        assert_eq!(rejected.errors, vec![FieldError::new("first_name", "Names are limited to 100 characters.")]);
        assert!(run(form(&"あ".repeat(100), "夏目", "", "")).is_ok());
    }
}
