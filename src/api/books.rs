//! Book endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};

use super::{delete_form_response, delete_response, entity_id, form_body, form_response};
use crate::{
    error::AppResult,
    models::{Book, BookListEntry, Entity},
    services::books::{BookDetail, BookFormView},
    validation::BookForm,
    AppState,
};

/// List books by title, each with its author
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses(
        (status = 200, description = "Books in title order")
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookListEntry>>> {
    Ok(Json(state.services.books.list().await?))
}

/// Book with its author, genres and copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details"),
        (status = 404, description = "No such book", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookDetail>> {
    let id = entity_id::<Book>(&id)?;
    Ok(Json(state.services.books.detail(id).await?))
}

/// Empty book form with the author and genre pick-lists
#[utoipa::path(
    get,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 200, description = "Empty book form")
    )
)]
pub async fn create_book_form(State(state): State<AppState>) -> AppResult<Json<BookFormView>> {
    Ok(Json(state.services.books.create_form().await?))
}

/// Create a book
#[utoipa::path(
    post,
    path = "/catalog/book/create",
    tag = "books",
    request_body = BookForm,
    responses(
        (status = 303, description = "Created, redirect to the book page"),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 422, description = "Form errors, with the submitted values and pick-lists")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookForm>, JsonRejection>,
) -> AppResult<Response> {
    let form = form_body(payload)?;
    Ok(form_response(state.services.books.create(form).await?))
}

/// Book form filled with the stored values
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Filled book form"),
        (status = 404, description = "No such book", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookFormView>> {
    let id = entity_id::<Book>(&id)?;
    Ok(Json(state.services.books.update_form(id).await?))
}

/// Update a book
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = BookForm,
    responses(
        (status = 303, description = "Updated, redirect to the book page"),
        (status = 404, description = "No such book", body = crate::error::ErrorResponse),
        (status = 422, description = "Form errors, with the submitted values and pick-lists")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookForm>, JsonRejection>,
) -> AppResult<Response> {
    let id = entity_id::<Book>(&id)?;
    let form = form_body(payload)?;
    Ok(form_response(state.services.books.update(id, form).await?))
}

/// Delete confirmation, listing the book's copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book and the copies blocking its deletion"),
        (status = 303, description = "Book already gone, redirect to the list")
    )
)]
pub async fn delete_book_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = entity_id::<Book>(&id)?;
    let view = state.services.books.delete_form(id).await?;
    Ok(delete_form_response(view, Book::LIST_ROUTE))
}

/// Delete a book that has no copies
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Blocked, copies of the book remain"),
        (status = 303, description = "Deleted or already gone, redirect to the list")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = entity_id::<Book>(&id)?;
    Ok(delete_response(state.services.books.delete(id).await?))
}
