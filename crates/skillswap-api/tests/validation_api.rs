//! Bodies and paths that fail to decode, and store failures, all answer with
//! a JSON `{"error": message}` body.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use serde_json::json;

// ---------------------------------------------------------------------------
// Undecodable bodies map to 400
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_string_status_is_400_with_error_body() {
    let app = build_test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;
    let swap = create_swap(&app, alice, bob).await;

    let response = put_json(&app, &format!("/api/swap-requests/{swap}"), json!({ "status": 5 })).await;
    let json = expect(response, StatusCode::BAD_REQUEST).await;
    assert!(json["error"].as_str().unwrap().contains("status"), "{json}");

    let sent = expect(get(&app, &format!("/api/swap-requests/sent/{alice}")).await, StatusCode::OK).await;
    assert_eq!(sent[0]["status"], "pending");
}

#[tokio::test]
async fn transition_without_body_is_400_with_error_body() {
    let app = build_test_app();
    let response = put_empty(&app, "/api/swap-requests/1").await;
    let json = expect(response, StatusCode::BAD_REQUEST).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn syntactically_broken_json_is_400() {
    let app = build_test_app();
    let response = send_raw(&app, Method::POST, "/api/swap-requests", true, "{\"from_user_id\": ").await;
    let json = expect(response, StatusCode::BAD_REQUEST).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn non_numeric_id_string_is_400() {
    let app = build_test_app();
    let response = post_json(
        &app,
        "/api/swap-requests",
        json!({
            "from_user_id": "one",
            "to_user_id": 2,
            "offered_skill": "JS",
            "wanted_skill": "Design",
        }),
    )
    .await;
    let json = expect(response, StatusCode::BAD_REQUEST).await;
    assert!(json["error"].as_str().unwrap().contains("invalid id 'one'"), "{json}");
}

#[tokio::test]
async fn non_integer_path_id_is_400_with_error_body() {
    let app = build_test_app();
    let json = expect(get(&app, "/api/notifications/abc/unread-count").await, StatusCode::BAD_REQUEST).await;
    assert!(json["error"].is_string());
}

// ---------------------------------------------------------------------------
// Numeric strings are accepted as ids
// ---------------------------------------------------------------------------

#[tokio::test]
async fn string_ids_are_accepted_for_swaps_and_chat() {
    let app = build_test_app();
    let alice = create_user(&app, "Alice").await;
    let bob = create_user(&app, "Bob").await;

    let response = post_json(
        &app,
        "/api/swap-requests",
        json!({
            "from_user_id": alice.to_string(),
            "to_user_id": bob.to_string(),
            "offered_skill": "JS",
            "wanted_skill": "Design",
        }),
    )
    .await;
    let swap = expect(response, StatusCode::OK).await["id"].as_i64().unwrap();
    expect(set_status(&app, swap, "accepted").await, StatusCode::OK).await;

    let response = post_json(
        &app,
        &format!("/api/chat/{swap}"),
        json!({ "sender_id": bob.to_string(), "receiver_id": alice.to_string(), "message": "hi" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let messages = expect(get(&app, &format!("/api/chat/{swap}")).await, StatusCode::OK).await;
    assert_eq!(messages[0]["sender_id"], bob);
    assert_eq!(messages[0]["receiver_id"], alice);
}

#[tokio::test]
async fn blank_string_id_counts_as_missing() {
    let app = build_test_app();
    let alice = create_user(&app, "Alice").await;

    let response = post_json(
        &app,
        "/api/swap-requests",
        json!({
            "from_user_id": alice,
            "to_user_id": "",
            "offered_skill": "JS",
            "wanted_skill": "Design",
        }),
    )
    .await;
    let json = expect(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(json["error"], "Missing required fields");
}

// ---------------------------------------------------------------------------
// Store failures map to 500 with the store's message
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_failure_is_500_with_store_message() {
    let app = build_test_app();
    let alice = create_user(&app, "Alice").await;

    let response = post_json(
        &app,
        "/api/swap-requests",
        json!({
            "from_user_id": alice,
            "to_user_id": 9999,
            "offered_skill": "JS",
            "wanted_skill": "Design",
        }),
    )
    .await;
    let json = expect(response, StatusCode::INTERNAL_SERVER_ERROR).await;
    assert!(
        json["error"].as_str().unwrap().contains("FOREIGN KEY constraint failed"),
        "{json}"
    );

    let sent = expect(get(&app, &format!("/api/swap-requests/sent/{alice}")).await, StatusCode::OK).await;
    assert!(sent.as_array().unwrap().is_empty());
}
