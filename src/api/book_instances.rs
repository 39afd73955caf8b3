//! Book instance endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};

use super::{delete_form_response, delete_response, entity_id, form_body, form_response};
use crate::{
    error::AppResult,
    models::{BookInstance, Entity, PopulatedBookInstance},
    services::book_instances::{BookInstanceDetail, BookInstanceFormView},
    validation::BookInstanceForm,
    AppState,
};

/// List copies, each with its book title
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "book_instances",
    responses(
        (status = 200, description = "Copies in insertion order")
    )
)]
pub async fn list_book_instances(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<PopulatedBookInstance>>> {
    Ok(Json(state.services.book_instances.list().await?))
}

/// Copy with its book
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "book_instances",
    params(
        ("id" = String, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Copy details"),
        (status = 404, description = "No such book instance, or its book is missing", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookInstanceDetail>> {
    let id = entity_id::<BookInstance>(&id)?;
    Ok(Json(state.services.book_instances.detail(id).await?))
}

/// Empty copy form with the book pick-list
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "book_instances",
    responses(
        (status = 200, description = "Empty copy form")
    )
)]
pub async fn create_book_instance_form(
    State(state): State<AppState>,
) -> AppResult<Json<BookInstanceFormView>> {
    Ok(Json(state.services.book_instances.create_form().await?))
}

/// Create a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "book_instances",
    request_body = BookInstanceForm,
    responses(
        (status = 303, description = "Created, redirect to the copy page"),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 422, description = "Form errors, with the submitted values and book pick-list")
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    payload: Result<Json<BookInstanceForm>, JsonRejection>,
) -> AppResult<Response> {
    let form = form_body(payload)?;
    Ok(form_response(state.services.book_instances.create(form).await?))
}

/// Copy form filled with the stored values
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "book_instances",
    params(
        ("id" = String, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Filled copy form"),
        (status = 404, description = "No such book instance", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<BookInstanceFormView>> {
    let id = entity_id::<BookInstance>(&id)?;
    Ok(Json(state.services.book_instances.update_form(id).await?))
}

/// Update a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "book_instances",
    params(
        ("id" = String, Path, description = "Book instance ID")
    ),
    request_body = BookInstanceForm,
    responses(
        (status = 303, description = "Updated, redirect to the copy page"),
        (status = 404, description = "No such book instance", body = crate::error::ErrorResponse),
        (status = 422, description = "Form errors, with the submitted values and book pick-list")
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookInstanceForm>, JsonRejection>,
) -> AppResult<Response> {
    let id = entity_id::<BookInstance>(&id)?;
    let form = form_body(payload)?;
    Ok(form_response(state.services.book_instances.update(id, form).await?))
}

/// Delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "book_instances",
    params(
        ("id" = String, Path, description = "Book instance ID")
    ),
    responses(
        (status = 200, description = "Copy to delete"),
        (status = 303, description = "Copy already gone, redirect to the list")
    )
)]
pub async fn delete_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = entity_id::<BookInstance>(&id)?;
    let view = state.services.book_instances.delete_form(id).await?;
    Ok(delete_form_response(view, BookInstance::LIST_ROUTE))
}

/// Delete a copy
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "book_instances",
    params(
        ("id" = String, Path, description = "Book instance ID")
    ),
    responses(
        (status = 303, description = "Deleted or already gone, redirect to the list")
    )
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = entity_id::<BookInstance>(&id)?;
    Ok(delete_response(state.services.book_instances.delete(id).await?))
}
