//! Retry, throttle and failure-classification tests for [`JolpicaClient`],
//! run against a flaky stub server bound to a local port.

use std::{
  net::SocketAddr,
  sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
  },
  time::{Duration, Instant},
};

use axum::{
  Router,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
  routing::get,
};
use gridcache_client::{ClientConfig, Error, JolpicaClient};
use gridcache_core::api::ResultsApi;

const SEASONS_BODY: &str =
  r#"{"MRData":{"SeasonTable":{"Seasons":[{"season":"2023"},{"season":"2024"}]}}}"#;

/// Counts requests; fails with 500 until `fail_first` requests have been
/// served, then returns `body`.
#[derive(Clone)]
struct Flaky {
  hits:       Arc<AtomicU32>,
  fail_first: u32,
  body:       &'static str,
}

async fn flaky_handler(State(state): State<Flaky>) -> impl IntoResponse {
  let hit = state.hits.fetch_add(1, Ordering::SeqCst) + 1;
  if hit <= state.fail_first {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
  } else {
    state.body.into_response()
  }
}

async fn serve(app: Router) -> SocketAddr {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
    .await
    .expect("bind stub server");
  let addr = listener.local_addr().expect("stub addr");
  tokio::spawn(async move {
    axum::serve(listener, app).await.expect("stub server");
  });
  addr
}

/// A client tuned so tests run in milliseconds.
fn fast_client(addr: SocketAddr) -> JolpicaClient {
  JolpicaClient::new(ClientConfig {
    base_url:      format!("http://{addr}"),
    timeout:       Duration::from_secs(2),
    max_attempts:  3,
    throttle:      Duration::ZERO,
    retry_backoff: Duration::from_millis(1),
  })
  .expect("client")
}

async fn stub(fail_first: u32, body: &'static str) -> (SocketAddr, Arc<AtomicU32>) {
  let hits = Arc::new(AtomicU32::new(0));
  let state = Flaky { hits: hits.clone(), fail_first, body };
  let app = Router::new()
    .route("/seasons.json", get(flaky_handler))
    .with_state(state);
  (serve(app).await, hits)
}

// ─── Retry bound ─────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn two_transient_failures_then_success_succeeds() {
  let (addr, hits) = stub(2, SEASONS_BODY).await;
  let client = fast_client(addr);

  let seasons = client.fetch_seasons().await.expect("third attempt succeeds");
  assert_eq!(seasons, vec![2023, 2024]);
  assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn three_transient_failures_exhaust_retries() {
  let (addr, hits) = stub(100, SEASONS_BODY).await;
  let client = fast_client(addr);

  let err = client.fetch_seasons().await.unwrap_err();
  assert!(err.is_transient(), "expected transport error, got: {err}");
  assert!(matches!(err, Error::Transport { attempts: 3, .. }));
  assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn client_errors_are_not_retried() {
  let hits = Arc::new(AtomicU32::new(0));
  let counter = hits.clone();
  let app = Router::new().route(
    "/seasons.json",
    get(move || {
      counter.fetch_add(1, Ordering::SeqCst);
      async { (StatusCode::NOT_FOUND, "nope") }
    }),
  );
  let addr = serve(app).await;
  let client = fast_client(addr);

  let err = client.fetch_seasons().await.unwrap_err();
  assert!(matches!(
    err,
    Error::Http { status: StatusCode::NOT_FOUND, .. }
  ));
  assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn non_json_body_is_malformed_and_not_retried() {
  let (addr, hits) = stub(0, "<html>definitely not json</html>").await;
  let client = fast_client(addr);

  let err = client.fetch_seasons().await.unwrap_err();
  assert!(matches!(err, Error::Malformed { .. }));
  assert!(!err.is_transient());
  assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_envelope_is_malformed() {
  let (addr, _) = stub(0, r#"{"unexpected":true}"#).await;
  let client = fast_client(addr);

  let err = client.fetch_seasons().await.unwrap_err();
  assert!(matches!(err, Error::Malformed { .. }));
}

// ─── Endpoint semantics ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn empty_season_schedule_is_ok_not_an_error() {
  let app = Router::new().route(
    "/2026.json",
    get(|| async { r#"{"MRData":{"RaceTable":{"Races":[]}}}"# }),
  );
  let addr = serve(app).await;
  let client = fast_client(addr);

  let races = client.fetch_races_for_season(2026).await.expect("valid empty");
  assert!(races.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn absent_results_mean_no_winner_yet() {
  let app = Router::new().route(
    "/2024/1/results/1.json",
    get(|| async { r#"{"MRData":{"RaceTable":{"Races":[]}}}"# }),
  );
  let addr = serve(app).await;
  let client = fast_client(addr);

  let winner = client.fetch_race_winner(2024, 1).await.expect("ok");
  assert!(winner.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn winner_endpoint_parses_full_record() {
  let body = r#"{"MRData":{"RaceTable":{"Races":[
    {"round":"1","Results":[{
      "Driver":{"driverId":"hamilton","givenName":"Lewis","familyName":"Hamilton"},
      "Constructor":{"constructorId":"mercedes","name":"Mercedes"}
    }]}
  ]}}}"#;
  let app = Router::new().route("/2020/1/results/1.json", get(move || async move { body }));
  let addr = serve(app).await;
  let client = fast_client(addr);

  let winner = client
    .fetch_race_winner(2020, 1)
    .await
    .expect("ok")
    .expect("winner present");
  assert_eq!(winner.driver_id, "hamilton");
  assert_eq!(winner.constructor_name, "Mercedes");
}

// ─── Throttle ────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn successive_successful_requests_are_throttled() {
  let (addr, _) = stub(0, SEASONS_BODY).await;
  let client = JolpicaClient::new(ClientConfig {
    base_url:      format!("http://{addr}"),
    timeout:       Duration::from_secs(2),
    max_attempts:  3,
    throttle:      Duration::from_millis(150),
    retry_backoff: Duration::from_millis(1),
  })
  .expect("client");

  client.fetch_seasons().await.expect("first request");
  let start = Instant::now();
  client.fetch_seasons().await.expect("second request");
  assert!(
    start.elapsed() >= Duration::from_millis(150),
    "second request was not delayed: {:?}",
    start.elapsed()
  );
}
