//! Genre form rules

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{escape, printable, trim, FieldError, FormInput};
use crate::models::{Genre, GenreDraft};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct GenreForm {
    #[validate(
        length(min = 1, message = "Genre name must contain at least 1 character."),
        custom(function = "printable")
    )]
    pub name: String,
}

impl FormInput for GenreForm {
    type Draft = GenreDraft;

    const FIELDS: &'static [&'static str] = &["name"];

    fn trimmed(self) -> Self {
        Self {
            name: trim(self.name),
        }
    }

    fn escaped(self) -> Self {
        Self {
            name: escape(&self.name),
        }
    }

    fn to_draft(&self) -> Result<GenreDraft, Vec<FieldError>> {
        Ok(GenreDraft {
            name: self.name.clone(),
        })
    }
}

impl From<&Genre> for GenreForm {
    fn from(genre: &Genre) -> Self {
        Self {
            name: genre.name.clone(),
        }
    }
}
