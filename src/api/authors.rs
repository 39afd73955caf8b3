//! Author endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};

use super::{delete_form_response, delete_response, entity_id, form_body, form_response};
use crate::{
    error::AppResult,
    models::{Author, AuthorView, Entity},
    services::authors::{AuthorDetail, AuthorFormView},
    validation::AuthorForm,
    AppState,
};

/// List authors by family name
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses(
        (status = 200, description = "Authors ordered by family name")
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorView>>> {
    Ok(Json(state.services.authors.list().await?))
}

/// Author with the books written by them
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details"),
        (status = 404, description = "No such author", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorDetail>> {
    let id = entity_id::<Author>(&id)?;
    Ok(Json(state.services.authors.detail(id).await?))
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 200, description = "Empty author form")
    )
)]
pub async fn create_author_form(State(state): State<AppState>) -> Json<AuthorFormView> {
    Json(state.services.authors.create_form())
}

/// Create an author
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    request_body = AuthorForm,
    responses(
        (status = 303, description = "Created, redirect to the author page"),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 422, description = "Form errors, with the submitted values")
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    payload: Result<Json<AuthorForm>, JsonRejection>,
) -> AppResult<Response> {
    let form = form_body(payload)?;
    Ok(form_response(state.services.authors.create(form).await?))
}

/// Author form filled with the stored values
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Filled author form"),
        (status = 404, description = "No such author", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AuthorFormView>> {
    let id = entity_id::<Author>(&id)?;
    Ok(Json(state.services.authors.update_form(id).await?))
}

/// Update an author
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    request_body = AuthorForm,
    responses(
        (status = 303, description = "Updated, redirect to the author page"),
        (status = 404, description = "No such author", body = crate::error::ErrorResponse),
        (status = 422, description = "Form errors, with the submitted values")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AuthorForm>, JsonRejection>,
) -> AppResult<Response> {
    let id = entity_id::<Author>(&id)?;
    let form = form_body(payload)?;
    Ok(form_response(state.services.authors.update(id, form).await?))
}

/// Delete confirmation, listing the author's books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author and the books blocking its deletion"),
        (status = 303, description = "Author already gone, redirect to the list")
    )
)]
pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = entity_id::<Author>(&id)?;
    let view = state.services.authors.delete_form(id).await?;
    Ok(delete_form_response(view, Author::LIST_ROUTE))
}

/// Delete an author that no book references
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Blocked, the author still has books"),
        (status = 303, description = "Deleted or already gone, redirect to the list")
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = entity_id::<Author>(&id)?;
    Ok(delete_response(state.services.authors.delete(id).await?))
}
