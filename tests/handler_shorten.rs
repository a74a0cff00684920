mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use snip::routes::router;

#[tokio::test]
async fn test_shorten_json_success() {
    let (state, store) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com/some/path?q=1" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    let id = json["id"].as_str().unwrap();
    assert!(!id.is_empty());
    assert_eq!(json["short_url"], format!("{}/{}", common::BASE_URL, id));
    assert_eq!(json["long_url"], "https://example.com/some/path?q=1");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_shorten_form_success() {
    let (state, _store) = common::create_sequenced_state(&["formcode"], 100);
    let server = TestServer::new(router(state)).unwrap();

    let response = server
        .post("/shorten")
        .form(&[("url", "https://example.com")])
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["id"], "formcode");
    assert_eq!(json["short_url"], "http://localhost:8000/formcode");
    assert_eq!(json["long_url"], "https://example.com");
}

#[tokio::test]
async fn test_shorten_missing_url() {
    let (state, store) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    let response = server.post("/shorten").json(&json!({})).await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_shorten_empty_form() {
    let (state, store) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    let response = server
        .post("/shorten")
        .form(&Vec::<(String, String)>::new())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let (state, store) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    for url in ["not-a-url", "ftp://example.com/file", "javascript:alert(1)"] {
        let response = server.post("/shorten").json(&json!({ "url": url })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error");
    }

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_shorten_malformed_json() {
    let (state, _store) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    let response = server
        .post("/shorten")
        .content_type("application/json")
        .text("{\"url\":")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn test_shorten_same_url_twice_gives_distinct_codes() {
    let (state, store) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    let body = json!({ "url": "https://example.com" });
    let first = server.post("/shorten").json(&body).await;
    let second = server.post("/shorten").json(&body).await;

    first.assert_status_ok();
    second.assert_status_ok();

    let first_id = first.json::<serde_json::Value>()["id"].clone();
    let second_id = second.json::<serde_json::Value>()["id"].clone();
    assert_ne!(first_id, second_id);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_shorten_regenerates_on_collision() {
    let (state, store) = common::create_sequenced_state(&["taken", "fresh"], 100);
    common::create_test_mapping(&store, "taken", "https://original.example").await;

    let server = TestServer::new(router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["id"], "fresh");

    // The existing mapping is untouched.
    let redirect = server.get("/taken").await;
    assert_eq!(redirect.header("location"), "https://original.example");
}

#[tokio::test]
async fn test_shorten_exhausted_retries() {
    let (state, store) = common::create_sequenced_state(&["taken"], 5);
    common::create_test_mapping(&store, "taken", "https://original.example").await;

    let server = TestServer::new(router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "exhausted_retries");
    assert_eq!(json["error"]["details"]["attempts"], 5);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_shorten_never_hands_out_route_names() {
    let (state, _store) = common::create_sequenced_state(&["health", "shorten", "okcode"], 100);
    let server = TestServer::new(router(state)).unwrap();

    let response = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["id"], "okcode");
}

#[tokio::test]
async fn test_shorten_then_redirect_round_trip() {
    let (state, _store) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    let target = "https://example.com/a%20b?x=1&y=2#frag";
    let created = server.post("/shorten").json(&json!({ "url": target })).await;
    created.assert_status_ok();

    let id = created.json::<serde_json::Value>()["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server.get(&format!("/{id}")).await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), target);
}

#[tokio::test]
async fn test_shorten_rejects_url_unusable_as_location() {
    let (state, store) = common::create_test_state();
    let server = TestServer::new(router(state)).unwrap();

    for url in [
        "https://example.com/a\nb",
        "https://example.com/a\tb",
        " https://example.com",
        "https://example.com/caf\u{e9}",
    ] {
        let response = server.post("/shorten").json(&json!({ "url": url })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["error"]["code"], "validation_error");
    }

    assert!(store.is_empty());
}
