//! API handlers for the catalog REST endpoints

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;
pub mod openapi;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Entity,
    services::{DeleteOutcome, FormOutcome},
    AppState,
};

/// Build the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let catalog = Router::new()
        .route("/", get(catalog::index))
        // Authors
        .route("/authors", get(authors::list_authors))
        .route(
            "/author/create",
            get(authors::create_author_form).post(authors::create_author),
        )
        .route("/author/:id", get(authors::get_author))
        .route(
            "/author/:id/update",
            get(authors::update_author_form).post(authors::update_author),
        )
        .route(
            "/author/:id/delete",
            get(authors::delete_author_form).post(authors::delete_author),
        )
        // Genres
        .route("/genres", get(genres::list_genres))
        .route(
            "/genre/create",
            get(genres::create_genre_form).post(genres::create_genre),
        )
        .route("/genre/:id", get(genres::get_genre))
        .route(
            "/genre/:id/update",
            get(genres::update_genre_form).post(genres::update_genre),
        )
        .route(
            "/genre/:id/delete",
            get(genres::delete_genre_form).post(genres::delete_genre),
        )
        // Books
        .route("/books", get(books::list_books))
        .route(
            "/book/create",
            get(books::create_book_form).post(books::create_book),
        )
        .route("/book/:id", get(books::get_book))
        .route(
            "/book/:id/update",
            get(books::update_book_form).post(books::update_book),
        )
        .route(
            "/book/:id/delete",
            get(books::delete_book_form).post(books::delete_book),
        )
        // Book instances
        .route("/bookinstances", get(book_instances::list_book_instances))
        .route(
            "/bookinstance/create",
            get(book_instances::create_book_instance_form)
                .post(book_instances::create_book_instance),
        )
        .route("/bookinstance/:id", get(book_instances::get_book_instance))
        .route(
            "/bookinstance/:id/update",
            get(book_instances::update_book_instance_form)
                .post(book_instances::update_book_instance),
        )
        .route(
            "/bookinstance/:id/delete",
            get(book_instances::delete_book_instance_form)
                .post(book_instances::delete_book_instance),
        );

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/catalog", catalog)
        .with_state(state);

    app.merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}

/// Parse a path id; ids that cannot exist are reported like absent entities
pub(crate) fn entity_id<E: Entity>(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(E::NOT_FOUND.to_string()))
}

/// Unwrap a JSON form body, turning malformed payloads into `400`
pub(crate) fn form_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(form)| form)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Saved forms redirect with `303 See Other`; invalid ones come back as `422`
pub(crate) fn form_response<V: Serialize>(outcome: FormOutcome<V>) -> Response {
    match outcome {
        FormOutcome::Redirect(url) => Redirect::to(&url).into_response(),
        FormOutcome::Invalid(view) => (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response(),
    }
}

/// Blocked deletes render the confirmation view; otherwise go to the list page
pub(crate) fn delete_response<V: Serialize>(outcome: DeleteOutcome<V>) -> Response {
    match outcome {
        DeleteOutcome::Blocked { view } => Json(view).into_response(),
        DeleteOutcome::Executed { redirect } | DeleteOutcome::Skipped { redirect } => {
            Redirect::to(&redirect).into_response()
        }
    }
}

/// Confirmation page, or the list page when the entity is already gone
pub(crate) fn delete_form_response<V: Serialize>(view: Option<V>, list_route: &str) -> Response {
    match view {
        Some(view) => Json(view).into_response(),
        None => Redirect::to(list_route).into_response(),
    }
}
