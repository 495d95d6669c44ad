#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use skillswap_api::router;
use skillswap_api::state::AppStateInner;
use skillswap_db::Database;

/// Full application over a fresh in-memory database, with the same layers
/// `main` installs.
pub fn build_test_app() -> Router {
    let db = Database::open_in_memory().expect("in-memory database");
    router::app(AppStateInner::new(db))
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn put_empty(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Sends `body` verbatim, optionally labelled as JSON.
pub async fn send_raw(app: &Router, method: Method, uri: &str, json: bool, body: &str) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if json {
        builder = builder.header("content-type", "application/json");
    }
    let request = builder.body(Body::from(body.to_owned())).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Asserts the status and returns the decoded body.
pub async fn expect(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

pub async fn create_user(app: &Router, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/users",
        json!({
            "name": name,
            "email": format!("{}@example.com", name.to_lowercase()),
            "password": "correct horse battery staple",
        }),
    )
    .await;
    expect(response, StatusCode::OK).await["id"].as_i64().unwrap()
}

pub async fn create_swap(app: &Router, from: i64, to: i64) -> i64 {
    let response = post_json(
        app,
        "/api/swap-requests",
        json!({
            "from_user_id": from,
            "to_user_id": to,
            "offered_skill": "JS",
            "wanted_skill": "Design",
        }),
    )
    .await;
    expect(response, StatusCode::OK).await["id"].as_i64().unwrap()
}

pub async fn set_status(app: &Router, swap_id: i64, status: &str) -> Response<Body> {
    put_json(
        app,
        &format!("/api/swap-requests/{swap_id}"),
        json!({ "status": status }),
    )
    .await
}
