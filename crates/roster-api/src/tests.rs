//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Method, Request, StatusCode},
};
use roster_core::event::EventBus;
use roster_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiState, api_router};

async fn app() -> Router {
  let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
  api_router(ApiState::new(store, Arc::new(EventBus::new())))
}

async fn send(
  app: &Router,
  method: Method,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let request = match body {
    Some(body) => builder
      .header("content-type", "application/json")
      .body(Body::from(body.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };

  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

// ─── Alts ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_then_list_alts() {
  let app = app().await;

  let (status, body) = send(
    &app,
    Method::POST,
    "/characters/100/alts",
    Some(json!({ "alt_id": 200 })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "result": "success", "success": true }));

  let (status, body) = send(&app, Method::GET, "/characters/200/alts", None).await;
  assert_eq!(status, StatusCode::OK);
  let members = body.as_array().unwrap();
  assert_eq!(members.len(), 2);
  assert_eq!(members[0]["character"]["char_id"], 100);
  assert_eq!(members[0]["status"], "main");
  assert_eq!(members[1]["status"], "confirmed");
}

#[tokio::test]
async fn rule_violations_answer_ok_with_failure_code() {
  let app = app().await;
  send(
    &app,
    Method::POST,
    "/characters/100/alts",
    Some(json!({ "alt_id": 200 })),
  )
  .await;

  let (status, body) =
    send(&app, Method::DELETE, "/characters/200/alts/100", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "result": "remove_main", "success": false }));

  let (_, body) =
    send(&app, Method::POST, "/characters/200/alts/100/confirm", None).await;
  assert_eq!(body["result"], "already_confirmed");
}

#[tokio::test]
async fn unconfirmed_alt_is_confirmed_over_http() {
  let app = app().await;
  send(
    &app,
    Method::POST,
    "/characters/100/alts",
    Some(json!({ "alt_id": 200, "status": "unconfirmed" })),
  )
  .await;

  let (_, body) = send(
    &app,
    Method::GET,
    "/characters/100/alts?min_status=unconfirmed",
    None,
  )
  .await;
  assert_eq!(body[1]["status"], "unconfirmed");

  let (_, body) =
    send(&app, Method::POST, "/characters/100/alts/200/confirm", None).await;
  assert_eq!(body["success"], true);
}

#[tokio::test]
async fn main_lookup() {
  let app = app().await;
  let (status, _) = send(&app, Method::GET, "/characters/1/main", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  send(
    &app,
    Method::POST,
    "/characters/1/alts",
    Some(json!({ "alt_id": 2 })),
  )
  .await;
  let (status, body) = send(&app, Method::GET, "/characters/2/main", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["character"]["char_id"], 1);
}

// ─── Characters ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_character_and_last_seen() {
  let app = app().await;

  let (status, _) = send(
    &app,
    Method::PUT,
    "/characters/7",
    Some(json!({ "name": "Seven", "level": 150 })),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, body) = send(&app, Method::GET, "/characters/7", None).await;
  assert_eq!(body["name"], "Seven");
  assert_eq!(body["level"], 150);

  let (status, _) = send(
    &app,
    Method::PUT,
    "/characters/7/last-seen",
    Some(json!({ "at": "2024-01-02T03:04:05Z" })),
  )
  .await;
  assert_eq!(status, StatusCode::NO_CONTENT);

  let (_, body) = send(&app, Method::GET, "/characters/7/last-seen", None).await;
  assert_eq!(body[0]["character"]["name"], "Seven");
  assert_eq!(body[0]["last_seen"], "2024-01-02T03:04:05Z");
}

#[tokio::test]
async fn blank_name_is_rejected() {
  let app = app().await;
  let (status, body) = send(
    &app,
    Method::PUT,
    "/characters/7",
    Some(json!({ "name": "  " })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("name"));
}

// ─── Whereis ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn blank_whereis_query_is_rejected() {
  let app = app().await;
  let (status, _) = send(&app, Method::GET, "/whereis?q=%20", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, body) = send(&app, Method::GET, "/whereis?q=garden", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));
}

// ─── Channels ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn packets_update_channels_and_org() {
  let app = app().await;
  let org_channel: u64 = (3 << 32) | 777;

  for packet in [
    json!({ "type": "public_channel_joined", "channel_id": 42, "name": "OOC" }),
    json!({ "type": "public_channel_joined", "channel_id": org_channel, "name": "Night Watch" }),
    json!({ "type": "public_channel_message", "channel_id": org_channel, "sender_id": 1, "message": "hi" }),
  ] {
    let (status, _) = send(&app, Method::POST, "/packets", Some(packet)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
  }

  let (_, body) = send(&app, Method::GET, "/channels", None).await;
  assert_eq!(body.as_array().unwrap().len(), 2);
  assert_eq!(body[0]["name"], "OOC");

  let (_, body) = send(&app, Method::GET, "/org", None).await;
  assert_eq!(body["org_id"], 777);
  assert_eq!(body["org_name"], "Night Watch");

  let (status, _) = send(
    &app,
    Method::POST,
    "/packets",
    Some(json!({ "type": "public_channel_left", "channel_id": 9 })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
