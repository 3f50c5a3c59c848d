//! Router-level tests against the in-memory store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use locus_core::{
  credential::PasskeyScheme,
  device::{Device, DeviceId},
  memory::MemoryStore,
  reading::LocationReading,
  service::Tracker,
  store::TrackerStore,
};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{api_router, extract::BODY_ENCODING_HEADER};

fn tracker() -> Tracker<MemoryStore> {
  Tracker::new(Arc::new(MemoryStore::new()), PasskeyScheme::Plaintext)
}

async fn post<S: TrackerStore + 'static>(
  tracker: &Tracker<S>,
  uri: &str,
  body: Value,
) -> Response {
  let req = Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap();
  api_router(tracker.clone()).oneshot(req).await.unwrap()
}

async fn post_raw(tracker: &Tracker<MemoryStore>, uri: &str, body: &str) -> Response {
  let req = Request::builder()
    .method("POST")
    .uri(uri)
    .body(Body::from(body.to_owned()))
    .unwrap();
  api_router(tracker.clone()).oneshot(req).await.unwrap()
}

async fn body_bytes(resp: Response) -> Vec<u8> {
  axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap()
    .to_vec()
}

async fn body_json(resp: Response) -> Value {
  serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

async fn register(tracker: &Tracker<MemoryStore>, passkey: &str) -> String {
  let resp = post(tracker, "/devices", json!({ "passkey": passkey })).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  body_json(resp).await["deviceID"]
    .as_str()
    .expect("deviceID string")
    .to_owned()
}

// ── Register ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn register_returns_device_id() {
  let t = tracker();
  let d1 = register(&t, "abc123").await;
  let d2 = register(&t, "abc123").await;
  assert!(!d1.is_empty());
  assert_ne!(d1, d2);
}

#[tokio::test]
async fn register_with_missing_passkey_is_400() {
  let t = tracker();
  let resp = post(&t, "/devices", json!({ "key": "abc123" })).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  assert!(body["error"].as_str().unwrap().contains("passkey"), "{body}");
}

#[tokio::test]
async fn register_with_unparseable_body_is_400() {
  let t = tracker();
  let resp = post_raw(&t, "/devices", "{not json").await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Submit + list ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_then_list() {
  let t = tracker();
  let d1 = register(&t, "abc123").await;

  let resp = post(
    &t,
    "/locations",
    json!({
      "deviceID": d1, "passkey": "abc123",
      "longitude": -122.4, "latitude": 37.8, "timestamp": 1_700_000_000i64
    }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_bytes(resp).await, b"success");

  let resp = post(&t, "/locations/query", json!({ "deviceID": d1, "passkey": "abc123" })).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    body_json(resp).await,
    json!({
      "locations": [
        { "longitude": -122.4, "latitude": 37.8, "timestamp": 1_700_000_000i64 }
      ]
    })
  );
}

#[tokio::test]
async fn list_fresh_device_returns_empty_array() {
  let t = tracker();
  let d = register(&t, "k").await;
  let resp = post(&t, "/locations/query", json!({ "deviceID": d, "passkey": "k" })).await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(body_json(resp).await, json!({ "locations": [] }));
}

#[tokio::test]
async fn wrong_passkey_and_unknown_device_look_identical() {
  let t = tracker();
  let d1 = register(&t, "abc123").await;

  let wrong = post(&t, "/locations/query", json!({ "deviceID": d1, "passkey": "wrong" })).await;
  let unknown = post(
    &t,
    "/locations/query",
    json!({ "deviceID": "nonexistent-id", "passkey": "anything" }),
  )
  .await;

  assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(body_bytes(wrong).await, body_bytes(unknown).await);
}

#[tokio::test]
async fn list_with_empty_strings_is_401() {
  let t = tracker();
  let d = register(&t, "k").await;

  for body in [
    json!({ "deviceID": "", "passkey": "k" }),
    json!({ "deviceID": d, "passkey": "" }),
  ] {
    let resp = post(&t, "/locations/query", body.clone()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "body: {body}");
  }

  let resp = post(&t, "/locations/query", json!({ "deviceID": d })).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejected_submit_is_401_and_writes_nothing() {
  let t = tracker();
  let d1 = register(&t, "abc123").await;

  let resp = post(
    &t,
    "/locations",
    json!({
      "deviceID": d1, "passkey": "wrong",
      "longitude": 0, "latitude": 0, "timestamp": 0
    }),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  assert_eq!(body_json(resp).await, json!({ "error": "unauthorized" }));
  assert_eq!(t.store().reading_count(), 0);
}

#[tokio::test]
async fn malformed_submissions_are_400() {
  let t = tracker();
  let d = register(&t, "k").await;

  let cases = [
    json!({ "deviceID": d, "passkey": "k", "longitude": "west", "latitude": 0, "timestamp": 0 }),
    json!({ "deviceID": d, "passkey": "k", "latitude": 0, "timestamp": 0 }),
    json!({ "deviceID": d, "passkey": "k", "longitude": 0, "latitude": 0, "timestamp": 1.5 }),
    json!({ "deviceID": d, "passkey": "k", "longitude": 0, "latitude": 0, "timestamp": -1 }),
    json!({ "deviceID": "", "passkey": "k", "longitude": 0, "latitude": 0, "timestamp": 0 }),
    json!({ "deviceID": d, "passkey": "", "longitude": 0, "latitude": 0, "timestamp": 0 }),
  ];
  for case in cases {
    let resp = post(&t, "/locations", case.clone()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "case: {case}");
  }
  assert_eq!(t.store().reading_count(), 0);
}

// ── Transport encoding ────────────────────────────────────────────────────────

#[tokio::test]
async fn base64_encoded_body_is_decoded() {
  let t = tracker();
  let payload = B64.encode(json!({ "passkey": "abc123" }).to_string());
  let req = Request::builder()
    .method("POST")
    .uri("/devices")
    .header(BODY_ENCODING_HEADER, "base64")
    .body(Body::from(payload))
    .unwrap();

  let resp = api_router(t.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn invalid_base64_body_is_400() {
  let t = tracker();
  let req = Request::builder()
    .method("POST")
    .uri("/devices")
    .header(BODY_ENCODING_HEADER, "base64")
    .body(Body::from("!!!not-base64!!!"))
    .unwrap();

  let resp = api_router(t).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Storage failure ───────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("connection to db-host-7 refused")]
struct Outage;

/// A store whose every call fails.
struct DownStore;

impl TrackerStore for DownStore {
  type Error = Outage;
  async fn put_device(&self, _: Device) -> Result<(), Outage> { Err(Outage) }
  async fn get_device(&self, _: &DeviceId) -> Result<Option<Device>, Outage> { Err(Outage) }
  async fn append_reading(&self, _: LocationReading) -> Result<(), Outage> { Err(Outage) }
  async fn scan_readings(&self, _: &DeviceId) -> Result<Vec<LocationReading>, Outage> {
    Err(Outage)
  }
}

#[tokio::test]
async fn storage_failure_is_500_without_detail() {
  let t = Tracker::new(Arc::new(DownStore), PasskeyScheme::Plaintext);
  let resp = post(&t, "/devices", json!({ "passkey": "abc123" })).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

  let body = String::from_utf8(body_bytes(resp).await).unwrap();
  assert!(!body.contains("db-host-7"), "leaked: {body}");
}
