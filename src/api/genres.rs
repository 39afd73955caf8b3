//! Genre endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Response,
    Json,
};

use super::{delete_form_response, delete_response, entity_id, form_body, form_response};
use crate::{
    error::AppResult,
    models::{Entity, Genre, GenreView},
    services::genres::{GenreDetail, GenreFormView},
    validation::GenreForm,
    AppState,
};

/// List genres by name
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "Genres ordered by name")
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<GenreView>>> {
    Ok(Json(state.services.genres.list().await?))
}

/// Genre with the books tagged with it
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre details"),
        (status = 404, description = "No such genre", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<GenreDetail>> {
    let id = entity_id::<Genre>(&id)?;
    Ok(Json(state.services.genres.detail(id).await?))
}

/// Empty genre form
#[utoipa::path(
    get,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 200, description = "Empty genre form")
    )
)]
pub async fn create_genre_form(State(state): State<AppState>) -> Json<GenreFormView> {
    Json(state.services.genres.create_form())
}

/// Create a genre, or redirect to the genre that already has this name
#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    request_body = GenreForm,
    responses(
        (status = 303, description = "Created or already present, redirect to the genre page"),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 422, description = "Form errors, with the submitted values")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    payload: Result<Json<GenreForm>, JsonRejection>,
) -> AppResult<Response> {
    let form = form_body(payload)?;
    Ok(form_response(state.services.genres.create(form).await?))
}

/// Genre form filled with the stored values
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Filled genre form"),
        (status = 404, description = "No such genre", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<GenreFormView>> {
    let id = entity_id::<Genre>(&id)?;
    Ok(Json(state.services.genres.update_form(id).await?))
}

/// Update a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    request_body = GenreForm,
    responses(
        (status = 303, description = "Updated, redirect to the genre page"),
        (status = 404, description = "No such genre", body = crate::error::ErrorResponse),
        (status = 422, description = "Form errors, with the submitted values")
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<GenreForm>, JsonRejection>,
) -> AppResult<Response> {
    let id = entity_id::<Genre>(&id)?;
    let form = form_body(payload)?;
    Ok(form_response(state.services.genres.update(id, form).await?))
}

/// Delete confirmation, listing the genre's books
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre and the books blocking its deletion"),
        (status = 303, description = "Genre already gone, redirect to the list")
    )
)]
pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = entity_id::<Genre>(&id)?;
    let view = state.services.genres.delete_form(id).await?;
    Ok(delete_form_response(view, Genre::LIST_ROUTE))
}

/// Delete a genre that no book references
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(
        ("id" = String, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Blocked, books are still tagged with the genre"),
        (status = 303, description = "Deleted or already gone, redirect to the list")
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = entity_id::<Genre>(&id)?;
    Ok(delete_response(state.services.genres.delete(id).await?))
}
