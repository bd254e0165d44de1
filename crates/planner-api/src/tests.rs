//! Router tests against an in-memory store, a pinned clock, and mailer
//! doubles.

use std::{
  io,
  sync::{Arc, Mutex},
};

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use planner_core::{
  clock::FixedClock,
  mail::{EmailMessage, Mailbox, Mailer},
  store::TripStore,
  trip::{NewTrip, Trip},
};
use planner_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;
use uuid::Uuid;

use crate::{
  AppState, ConfirmationRenderer, ConfirmationSettings, api_router, dates::DateLocale,
};

// ─── Doubles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct RecordingMailer {
  sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl RecordingMailer {
  fn sent(&self) -> Vec<EmailMessage> { self.sent.lock().unwrap().clone() }
}

impl Mailer for RecordingMailer {
  type Error = io::Error;

  async fn send(&self, message: EmailMessage) -> Result<(), io::Error> {
    self.sent.lock().unwrap().push(message);
    Ok(())
  }
}

struct FailingMailer;

impl Mailer for FailingMailer {
  type Error = io::Error;

  async fn send(&self, _message: EmailMessage) -> Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::ConnectionRefused, "relay down"))
  }
}

/// A store whose backend is always unavailable.
struct FailingStore;

impl TripStore for FailingStore {
  type Error = io::Error;

  async fn create_trip_with_participants(&self, _input: NewTrip) -> Result<Trip, io::Error> {
    Err(io::Error::other("disk full"))
  }

  async fn get_trip(&self, _id: Uuid) -> Result<Option<Trip>, io::Error> {
    Err(io::Error::other("disk full"))
  }

  async fn list_trips(&self) -> Result<Vec<Trip>, io::Error> { Err(io::Error::other("disk full")) }
}

// ─── Harness ─────────────────────────────────────────────────────────────────

fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap() }

fn rfc3339(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

async fn make_state<M: Mailer>(mailer: M) -> AppState<SqliteStore, M> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  state_with(store, mailer)
}

fn state_with<S: TripStore, M: Mailer>(store: S, mailer: M) -> AppState<S, M> {
  let confirmation = ConfirmationRenderer::new(ConfirmationSettings {
    public_url: "http://localhost:3333".into(),
    sender:     Mailbox::new(Some("Trip Planner".into()), "oi@plann.er"),
    locale:     DateLocale::pt_br(),
  })
  .unwrap();

  AppState {
    store:        Arc::new(store),
    mailer:       Arc::new(mailer),
    clock:        Arc::new(FixedClock::new(now())),
    confirmation: Arc::new(confirmation),
  }
}

async fn call<S: TripStore + 'static, M: Mailer + 'static>(
  state: AppState<S, M>,
  method: &str,
  uri: &str,
  body: &str,
) -> (StatusCode, Value) {
  let req = Request::builder()
    .method(method)
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap();
  let resp = api_router(state).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, json)
}

async fn post_trip<S: TripStore + 'static, M: Mailer + 'static>(
  state: AppState<S, M>,
  body: Value,
) -> (StatusCode, Value) {
  call(state, "POST", "/trips", &body.to_string()).await
}

fn florianopolis() -> Value {
  let start = now() + Duration::days(1);
  json!({
    "destination": "Florianópolis",
    "starts_at": rfc3339(start),
    "ends_at": rfc3339(start + Duration::days(5)),
    "owner_name": "Ana",
    "owner_email": "ana@example.com",
    "emails_to_invite": ["bob@example.com"]
  })
}

fn trip_id(body: &Value) -> Uuid {
  body["tripId"]
    .as_str()
    .and_then(|s| Uuid::parse_str(s).ok())
    .unwrap_or_else(|| panic!("no tripId in {body}"))
}

// ─── POST /trips: success ────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_trip_id_and_persists_participants() {
  let mailer = RecordingMailer::default();
  let state = make_state(mailer.clone()).await;

  let (status, body) = post_trip(state.clone(), florianopolis()).await;
  assert_eq!(status, StatusCode::CREATED, "{body}");

  let id = trip_id(&body);
  let trip = state.store.get_trip(id).await.unwrap().expect("stored");
  assert_eq!(trip.destination, "Florianópolis");
  assert_eq!(trip.participants.len(), 2);

  let owner = &trip.participants[0];
  assert!(owner.is_owner && owner.is_confirmed);
  assert_eq!(owner.name.as_deref(), Some("Ana"));
  let invitee = &trip.participants[1];
  assert_eq!(invitee.email, "bob@example.com");
  assert!(!invitee.is_owner && !invitee.is_confirmed);
}

#[tokio::test]
async fn create_sends_confirmation_to_owner() {
  let mailer = RecordingMailer::default();
  let state = make_state(mailer.clone()).await;

  let (status, body) = post_trip(state, florianopolis()).await;
  assert_eq!(status, StatusCode::CREATED);
  let id = trip_id(&body);

  let sent = mailer.sent();
  assert_eq!(sent.len(), 1);
  let message = &sent[0];
  assert_eq!(message.to.address, "ana@example.com");
  assert_eq!(message.to.name.as_deref(), Some("Ana"));
  assert!(message.subject.contains("Florianópolis"));
  assert!(message.html_body.contains("20 de outubro de 2026"));
  assert!(message.html_body.contains("25 de outubro de 2026"));
  assert!(
    message
      .html_body
      .contains(&format!("http://localhost:3333/trips/{id}/confirm"))
  );
}

#[tokio::test]
async fn empty_invite_list_creates_owner_only_trip() {
  let state = make_state(RecordingMailer::default()).await;
  let mut body = florianopolis();
  body["emails_to_invite"] = json!([]);

  let (status, resp) = post_trip(state.clone(), body).await;
  assert_eq!(status, StatusCode::CREATED);

  let trip = state.store.get_trip(trip_id(&resp)).await.unwrap().unwrap();
  assert_eq!(trip.participants.len(), 1);
  assert!(trip.participants[0].is_owner);
}

#[tokio::test]
async fn participant_count_is_owner_plus_invitees() {
  let state = make_state(RecordingMailer::default()).await;
  let mut body = florianopolis();
  body["emails_to_invite"] = json!(["b@example.com", "c@example.com", "b@example.com"]);

  let (_, resp) = post_trip(state.clone(), body).await;
  let trip = state.store.get_trip(trip_id(&resp)).await.unwrap().unwrap();
  assert_eq!(trip.participants.len(), 4);
  assert_eq!(trip.participants.iter().filter(|p| p.is_owner).count(), 1);
}

#[tokio::test]
async fn end_equal_to_start_is_accepted() {
  let state = make_state(RecordingMailer::default()).await;
  let start = rfc3339(now() + Duration::hours(2));
  let mut body = florianopolis();
  body["starts_at"] = json!(start);
  body["ends_at"] = json!(start);

  let (status, _) = post_trip(state, body).await;
  assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn date_only_and_millis_inputs_are_coerced() {
  let state = make_state(RecordingMailer::default()).await;
  let mut body = florianopolis();
  body["starts_at"] = json!("2026-11-01");
  body["ends_at"] = json!((now() + Duration::days(20)).timestamp_millis());

  let (status, resp) = post_trip(state.clone(), body).await;
  assert_eq!(status, StatusCode::CREATED, "{resp}");

  let trip = state.store.get_trip(trip_id(&resp)).await.unwrap().unwrap();
  assert_eq!(trip.starts_at, Utc.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap());
  assert_eq!(trip.ends_at, now() + Duration::days(20));
}

#[tokio::test]
async fn mail_failure_still_creates_trip() {
  let state = make_state(FailingMailer).await;

  let (status, body) = post_trip(state.clone(), florianopolis()).await;
  assert_eq!(status, StatusCode::CREATED);

  let trip = state.store.get_trip(trip_id(&body)).await.unwrap();
  assert!(trip.is_some());
}

// ─── Store failures ──────────────────────────────────────────────────────────

#[tokio::test]
async fn store_failure_is_500_and_sends_no_mail() {
  let mailer = RecordingMailer::default();
  let state = state_with(FailingStore, mailer.clone());

  let (status, resp) = post_trip(state, florianopolis()).await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(resp["error"].is_string(), "{resp}");
  assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn store_failure_on_read_is_500() {
  let state = state_with(FailingStore, RecordingMailer::default());
  let (status, resp) = call(state, "GET", "/trips", "").await;
  assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
  assert!(resp["error"].is_string());
}

// ─── POST /trips: rule violations ────────────────────────────────────────────

#[tokio::test]
async fn start_in_past_is_rejected_and_nothing_stored() {
  let mailer = RecordingMailer::default();
  let state = make_state(mailer.clone()).await;
  let yesterday = now() - Duration::days(1);
  let mut body = florianopolis();
  body["starts_at"] = json!(rfc3339(yesterday));
  body["ends_at"] = json!(rfc3339(yesterday + Duration::days(3)));

  let (status, resp) = post_trip(state.clone(), body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["rule"], "starts_at_in_future");
  assert_eq!(resp["error"], "start date must be in the future");

  assert!(state.store.list_trips().await.unwrap().is_empty());
  assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn start_at_request_time_is_rejected() {
  let state = make_state(RecordingMailer::default()).await;
  let mut body = florianopolis();
  body["starts_at"] = json!(rfc3339(now()));

  let (status, resp) = post_trip(state, body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["rule"], "starts_at_in_future");
}

#[tokio::test]
async fn past_start_wins_over_inverted_range() {
  let state = make_state(RecordingMailer::default()).await;
  let mut body = florianopolis();
  body["starts_at"] = json!(rfc3339(now() - Duration::days(1)));
  body["ends_at"] = json!(rfc3339(now() - Duration::days(4)));

  let (_, resp) = post_trip(state, body).await;
  assert_eq!(resp["rule"], "starts_at_in_future");
}

#[tokio::test]
async fn end_before_start_is_rejected_and_nothing_stored() {
  let state = make_state(RecordingMailer::default()).await;
  let mut body = florianopolis();
  body["starts_at"] = json!(rfc3339(now() + Duration::days(1)));
  body["ends_at"] = json!(rfc3339(now()));

  let (status, resp) = post_trip(state.clone(), body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["rule"], "ends_at_after_starts_at");
  assert_eq!(resp["error"], "end date must be after start date");
  assert!(state.store.list_trips().await.unwrap().is_empty());
}

// ─── POST /trips: malformed input ────────────────────────────────────────────

#[tokio::test]
async fn invalid_fields_are_reported_together() {
  let state = make_state(RecordingMailer::default()).await;
  let mut body = florianopolis();
  body["destination"] = json!("Rio");
  body["owner_email"] = json!("ana");
  body["emails_to_invite"] = json!(["bob@example.com", "bob"]);

  let (status, resp) = post_trip(state.clone(), body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["error"], "validation failed");
  assert!(resp.get("rule").is_none());

  let fields: Vec<&str> = resp["fields"]
    .as_array()
    .unwrap()
    .iter()
    .filter_map(|f| f["field"].as_str())
    .collect();
  assert_eq!(fields, ["destination", "owner_email", "emails_to_invite[1]"]);
  assert!(state.store.list_trips().await.unwrap().is_empty());
}

#[tokio::test]
async fn schema_errors_are_checked_before_rules() {
  let state = make_state(RecordingMailer::default()).await;
  let mut body = florianopolis();
  body["starts_at"] = json!(rfc3339(now() - Duration::days(1)));
  body["owner_name"] = json!("");

  let (status, resp) = post_trip(state, body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["fields"][0]["field"], "owner_name");
}

#[tokio::test]
async fn missing_field_is_bad_request() {
  let state = make_state(RecordingMailer::default()).await;
  let mut body = florianopolis();
  body.as_object_mut().unwrap().remove("owner_email");

  let (status, resp) = post_trip(state, body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let message = resp["error"].as_str().unwrap();
  assert!(message.contains("owner_email"), "{message}");
}

#[tokio::test]
async fn unparseable_json_is_bad_request() {
  let state = make_state(RecordingMailer::default()).await;
  let (status, resp) = call(state, "POST", "/trips", "{not json").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(resp["error"].is_string());
}

#[tokio::test]
async fn year_beyond_9999_is_rejected_and_store_stays_readable() {
  let state = make_state(RecordingMailer::default()).await;
  let (status, _) = post_trip(state.clone(), florianopolis()).await;
  assert_eq!(status, StatusCode::CREATED);

  let mut body = florianopolis();
  body["ends_at"] = json!(253_402_300_800_000_i64);
  let (status, resp) = post_trip(state.clone(), body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["fields"][0]["field"], "ends_at");

  let (status, trips) = call(state, "GET", "/trips", "").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(trips.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unparseable_date_is_a_field_error() {
  let state = make_state(RecordingMailer::default()).await;
  let mut body = florianopolis();
  body["ends_at"] = json!("soon");

  let (status, resp) = post_trip(state, body).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(resp["fields"][0]["field"], "ends_at");
}

// ─── GET /trips ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_trip_by_id() {
  let state = make_state(RecordingMailer::default()).await;
  let (_, created) = post_trip(state.clone(), florianopolis()).await;
  let id = trip_id(&created);

  let (status, trip) = call(state, "GET", &format!("/trips/{id}"), "").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(trip["trip_id"], id.to_string());
  assert_eq!(trip["participants"].as_array().unwrap().len(), 2);
  assert_eq!(trip["participants"][0]["is_owner"], true);
}

#[tokio::test]
async fn get_unknown_trip_is_404() {
  let state = make_state(RecordingMailer::default()).await;
  let (status, _) = call(state, "GET", &format!("/trips/{}", Uuid::new_v4()), "").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_with_malformed_id_is_400() {
  let state = make_state(RecordingMailer::default()).await;
  let (status, _) = call(state, "GET", "/trips/not-a-uuid", "").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_returns_all_trips() {
  let state = make_state(RecordingMailer::default()).await;
  post_trip(state.clone(), florianopolis()).await;
  let mut second = florianopolis();
  second["destination"] = json!("Gramado");
  second["starts_at"] = json!(rfc3339(now() + Duration::hours(1)));
  post_trip(state.clone(), second).await;

  let (status, trips) = call(state, "GET", "/trips", "").await;
  assert_eq!(status, StatusCode::OK);
  let destinations: Vec<&str> = trips
    .as_array()
    .unwrap()
    .iter()
    .filter_map(|t| t["destination"].as_str())
    .collect();
  assert_eq!(destinations, ["Gramado", "Florianópolis"]);
}
