//! Book form rules

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use super::{error, escape, parse_reference, printable, trim, FieldError, FormInput};
use crate::models::{Book, BookDraft};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct BookForm {
    #[validate(
        length(min = 1, message = "Title must be specified."),
        custom(function = "printable")
    )]
    pub title: String,
    /// Author id, picked from the author list
    #[validate(
        length(min = 1, message = "Author must be specified."),
        custom(function = "author_reference")
    )]
    pub author: String,
    #[validate(
        length(min = 1, message = "Summary must be specified."),
        custom(function = "printable")
    )]
    pub summary: String,
    #[validate(
        length(min = 1, message = "ISBN must be specified."),
        custom(function = "printable")
    )]
    pub isbn: String,
    /// Genre ids; a single checked box may arrive as a plain string
    #[serde(deserialize_with = "one_or_many")]
    #[validate(custom(function = "genre_references"))]
    pub genre: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(value)) => vec![value],
        Some(OneOrMany::Many(values)) => values,
    })
}

fn author_reference(value: &str) -> Result<(), ValidationError> {
    // Emptiness is reported by the length rule
    if value.is_empty() || parse_reference(value).is_some() {
        Ok(())
    } else {
        Err(error("reference", "Author must be chosen from the author list."))
    }
}

fn genre_references(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().all(|v| parse_reference(v).is_some()) {
        Ok(())
    } else {
        Err(error("reference", "Genres must be chosen from the genre list."))
    }
}

impl FormInput for BookForm {
    type Draft = BookDraft;

    const FIELDS: &'static [&'static str] = &["title", "author", "summary", "isbn", "genre"];

    fn trimmed(self) -> Self {
        Self {
            title: trim(self.title),
            author: trim(self.author),
            summary: trim(self.summary),
            isbn: trim(self.isbn),
            genre: self
                .genre
                .into_iter()
                .map(trim)
                .filter(|g| !g.is_empty())
                .collect(),
        }
    }

    fn escaped(self) -> Self {
        Self {
            title: escape(&self.title),
            author: escape(&self.author),
            summary: escape(&self.summary),
            isbn: escape(&self.isbn),
            genre: self.genre.iter().map(|g| escape(g)).collect(),
        }
    }

    fn to_draft(&self) -> Result<BookDraft, Vec<FieldError>> {
        let author = parse_reference(&self.author).ok_or_else(|| {
            vec![FieldError::new("author", "Author must be chosen from the author list.")]
        })?;
        let genre = self
            .genre
            .iter()
            .map(|g| parse_reference(g))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                vec![FieldError::new("genre", "Genres must be chosen from the genre list.")]
            })?;
        Ok(BookDraft {
            title: self.title.clone(),
            author,
            summary: self.summary.clone(),
            isbn: self.isbn.clone(),
            genre,
        })
    }
}

impl From<&Book> for BookForm {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.to_string(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            genre: book.genre.iter().map(ToString::to_string).collect(),
        }
    }
}
