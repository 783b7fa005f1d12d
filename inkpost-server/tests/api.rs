//! End-to-end tests for the HTTP surface over the in-memory store
//!
//! Each test builds a fresh router and drives it with `oneshot`, so no
//! socket or database is needed.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use inkpost_server::{build_router, AppState, ServerConfig, ServiceConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    build_router(
        AppState::in_memory(ServiceConfig::default()),
        &ServerConfig::default(),
    )
}

struct Reply {
    status: StatusCode,
    cursor: Option<String>,
    body: Value,
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Reply {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cursor = response
        .headers()
        .get("x-cursor")
        .map(|v| v.to_str().unwrap().to_owned());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    Reply {
        status,
        cursor,
        body,
    }
}

async fn create_tag(app: &Router, name: &str) -> i64 {
    let created = send(app, Method::POST, "/api/tags", Some(json!({ "name": name }))).await;
    assert_eq!(created.status, StatusCode::CREATED);

    let page = send(app, Method::GET, "/api/tags?num=100", None).await;
    page.body
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == name)
        .and_then(|t| t["id"].as_i64())
        .unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let reply = send(&app, Method::GET, "/health", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
    assert_eq!(reply.body["store"], "memory");
}

#[tokio::test]
async fn tag_lifecycle() {
    let app = app();

    let created = send(&app, Method::POST, "/api/tags", Some(json!({ "name": "rust" }))).await;
    assert_eq!(created.body, json!({ "name": "rust" }));

    let id = create_tag(&app, "go").await;

    let fetched = send(&app, Method::GET, &format!("/api/tags/{id}"), None).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["name"], "go");

    let renamed = send(
        &app,
        Method::PATCH,
        &format!("/api/tags/{id}"),
        Some(json!({ "name": "golang" })),
    )
    .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body, json!({ "name": "golang" }));

    let deleted = send(&app, Method::DELETE, &format!("/api/tags/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = send(&app, Method::GET, &format!("/api/tags/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert!(gone.body["message"].is_string());
}

#[tokio::test]
async fn duplicate_tag_name_conflicts() {
    let app = app();
    create_tag(&app, "rust").await;

    let again = send(&app, Method::POST, "/api/tags", Some(json!({ "name": "rust" }))).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert!(again.body["message"].is_string());
}

#[tokio::test]
async fn empty_tag_name_is_rejected() {
    let app = app();

    let blank = send(&app, Method::POST, "/api/tags", Some(json!({ "name": "   " }))).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let missing = send(&app, Method::POST, "/api/tags", Some(json!({}))).await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_400() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tags")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_numeric_id_is_404() {
    let app = app();
    let reply = send(&app, Method::GET, "/api/tags/abc", None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cursor_walks_every_tag_once() {
    let app = app();
    for name in ["a", "b", "c", "d", "e"] {
        send(&app, Method::POST, "/api/tags", Some(json!({ "name": name }))).await;
    }

    let mut seen = Vec::new();
    let mut cursor = String::new();
    let mut pages = 0;
    loop {
        let reply = send(
            &app,
            Method::GET,
            &format!("/api/tags?num=2&cursor={cursor}"),
            None,
        )
        .await;
        assert_eq!(reply.status, StatusCode::OK);
        pages += 1;

        for tag in reply.body.as_array().unwrap() {
            seen.push(tag["name"].as_str().unwrap().to_owned());
        }

        cursor = reply.cursor.unwrap_or_default();
        if cursor.is_empty() {
            break;
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(seen, vec!["a", "b", "c", "d", "e"]);
}

#[tokio::test]
async fn unusable_num_falls_back_to_default() {
    let app = app();
    for i in 0..12 {
        send(
            &app,
            Method::POST,
            "/api/tags",
            Some(json!({ "name": format!("tag-{i}") })),
        )
        .await;
    }

    for num in ["abc", "-3", "0"] {
        let reply = send(&app, Method::GET, &format!("/api/tags?num={num}"), None).await;
        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.body.as_array().unwrap().len(), 10);
        assert!(!reply.cursor.unwrap().is_empty());
    }
}

#[tokio::test]
async fn garbage_cursor_is_400() {
    let app = app();
    let reply = send(&app, Method::GET, "/api/tags?cursor=%21%21%21", None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert!(reply.body["message"].is_string());

    let reply = send(&app, Method::GET, "/api/articles?cursor=bm90LWEtZGF0ZQ", None).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn article_list_embeds_tags() {
    let app = app();
    let rust = create_tag(&app, "rust").await;
    let go = create_tag(&app, "go").await;

    for (title, tag_id) in [("one", rust), ("two", go), ("three", rust)] {
        let created = send(
            &app,
            Method::POST,
            "/api/articles",
            Some(json!({ "title": title, "content": "body", "tag_id": tag_id })),
        )
        .await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.body, json!({ "title": title, "content": "body" }));
    }

    let reply = send(&app, Method::GET, "/api/articles", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.cursor.as_deref(), Some(""));

    let articles = reply.body.as_array().unwrap();
    let summary: Vec<(&str, &str)> = articles
        .iter()
        .map(|a| {
            (
                a["title"].as_str().unwrap(),
                a["tag"]["name"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![("one", "rust"), ("two", "go"), ("three", "rust")]
    );
}

#[tokio::test]
async fn article_with_unknown_tag_is_404() {
    let app = app();
    let reply = send(
        &app,
        Method::POST,
        "/api/articles",
        Some(json!({ "title": "orphan", "content": "body", "tag_id": 999 })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn article_patch_keeps_omitted_fields() {
    let app = app();
    let tag = create_tag(&app, "rust").await;
    send(
        &app,
        Method::POST,
        "/api/articles",
        Some(json!({ "title": "draft", "content": "first body", "tag_id": tag })),
    )
    .await;

    let list = send(&app, Method::GET, "/api/articles", None).await;
    let id = list.body[0]["id"].as_i64().unwrap();

    let patched = send(
        &app,
        Method::PATCH,
        &format!("/api/articles/{id}"),
        Some(json!({ "title": "final" })),
    )
    .await;
    assert_eq!(patched.status, StatusCode::OK);
    assert_eq!(
        patched.body,
        json!({ "title": "final", "content": "first body" })
    );

    let fetched = send(&app, Method::GET, &format!("/api/articles/{id}"), None).await;
    assert_eq!(fetched.body["title"], "final");
    assert_eq!(fetched.body["tag"]["name"], "rust");

    let deleted = send(&app, Method::DELETE, &format!("/api/articles/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let again = send(&app, Method::DELETE, &format!("/api/articles/{id}"), None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn referenced_tag_cannot_be_deleted() {
    let app = app();
    let tag = create_tag(&app, "rust").await;
    send(
        &app,
        Method::POST,
        "/api/articles",
        Some(json!({ "title": "pinned", "content": "body", "tag_id": tag })),
    )
    .await;

    let reply = send(&app, Method::DELETE, &format!("/api/tags/{tag}"), None).await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
}
