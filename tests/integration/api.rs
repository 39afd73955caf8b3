//! HTTP surface driven through the router

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use library_catalog::{api, config::AppConfig, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{catalog, Catalog};

fn app(catalog: &Catalog) -> Router {
    api::router(AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(catalog.services.clone()),
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_health_and_ready() {
    let catalog = catalog();
    let app = app(&catalog);

    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert!(body.get("store").is_none());

    let response = send(&app, Method::GET, "/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_create_genre_redirects_to_detail() {
    let catalog = catalog();
    let app = app(&catalog);

    let response = send(
        &app,
        Method::POST,
        "/catalog/genre/create",
        Some(json!({ "name": "  Fantasy " })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let url = location(&response);
    assert!(url.starts_with("/catalog/genre/"));

    let response = send(&app, Method::GET, &url, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["genre"]["name"], "Fantasy");
    assert_eq!(body["genre"]["url"], url.as_str());
    assert_eq!(body["genre_books"], json!([]));
}

#[tokio::test]
async fn test_invalid_form_is_unprocessable() {
    let catalog = catalog();
    let app = app(&catalog);

    let response = send(
        &app,
        Method::POST,
        "/catalog/author/create",
        Some(json!({ "family_name": "Borges" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["author"]["family_name"], "Borges");
    assert_eq!(body["errors"][0]["field"], "first_name");
    assert_eq!(body["errors"][0]["message"], "First name must be specified.");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let catalog = catalog();
    let app = app(&catalog);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/catalog/genre/create")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\":"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "BadValue");
}

#[tokio::test]
async fn test_missing_entities_are_not_found() {
    let catalog = catalog();
    let app = app(&catalog);

    let uri = format!("/catalog/bookinstance/{}", Uuid::new_v4());
    let response = send(&app, Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["message"], "no such book instance");
    assert_eq!(body["code"], 20);

    let response = send(&app, Method::GET, "/catalog/book/not-an-id", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "no such book");
}

#[tokio::test]
async fn test_guarded_delete_over_http() {
    let catalog = catalog();
    let app = app(&catalog);
    let author = catalog.author("Jorge Luis", "Borges").await;
    catalog.book("Ficciones", author, &[]).await;
    catalog.book("El Aleph", author, &[]).await;

    let uri = format!("/catalog/author/{}/delete", author);
    let response = send(&app, Method::GET, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["author_books"].as_array().unwrap().len(), 2);

    let response = send(&app, Method::POST, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["author"]["name"], "Borges, Jorge Luis");

    let response = send(&app, Method::GET, &format!("/catalog/author/{}", author), None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let gone = format!("/catalog/author/{}/delete", Uuid::new_v4());
    let response = send(&app, Method::POST, &gone, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/catalog/authors");

    let response = send(&app, Method::GET, &gone, None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_book_list_and_summary() {
    let catalog = catalog();
    let app = app(&catalog);
    let author = catalog.author("Banana", "Yoshimoto").await;
    let book = catalog.book("キッチン", author, &[]).await;
    catalog.copy(book, "available").await;

    let response = send(&app, Method::GET, "/catalog/books", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body[0]["title"], "キッチン");
    assert_eq!(body[0]["author"]["name"], "Yoshimoto, Banana");

    let response = send(&app, Method::GET, "/catalog", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["book_count"], 1);
    assert_eq!(body["book_instance_available_count"], 1);

    let response = send(&app, Method::GET, "/catalog/bookinstances", None).await;
    let body = json_body(response).await;
    assert_eq!(body[0]["status"], "available");
    assert_eq!(body[0]["status_label"], "貸出可");
    assert_eq!(body[0]["book"]["title"], "キッチン");
}

#[tokio::test]
async fn test_book_form_accepts_single_genre_value() {
    let catalog = catalog();
    let app = app(&catalog);
    let author = catalog.author("Italo", "Calvino").await;
    let genre = catalog.genre("Fable").await;

    let response = send(
        &app,
        Method::POST,
        "/catalog/book/create",
        Some(json!({
            "title": "Il barone rampante",
            "author": author.to_string(),
            "summary": "A boy climbs into the trees",
            "isbn": "978-88-04-66788-8",
            "genre": genre.to_string(),
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = send(&app, Method::GET, &location(&response), None).await;
    let body = json_body(response).await;
    assert_eq!(body["book"]["genre"][0]["name"], "Fable");
    assert_eq!(body["book_instances"], json!([]));
}
