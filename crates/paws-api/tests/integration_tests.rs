//! # Integration Tests for paws-api
//!
//! Drives the Axum app end to end: method resolution, the location filter,
//! batch any-of semantics, health probes, the audit console, and a full
//! register/init/spectrum flow over the static driver.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use paws_api::bootstrap::bootstrap_with;
use paws_api::config::{RegionConfig, ServiceConfig, StaticDriverConfig};
use paws_api::driver::StaticSpectrumDriver;
use paws_api::filter::LocationFilter;
use paws_api::manager::{BusinessManager, ManagerError};
use paws_api::router::{RequestRouter, RouterConfig};
use paws_api::state::AppState;
use paws_audit::{AuditTrail, Auditor};
use paws_core::{
    InMemoryEntityStore, Parameters, PawsMethod, PawsResult, RegionCode, RegionPolygonRecord,
    RegulatoryAuthority, ResponseEnvelope, RulesetRecord, Timestamp,
};
use paws_geo::{CacheConfig, RegionPolygonCache};

// -- Helpers ------------------------------------------------------------------

/// Counts dispatches and answers with an empty result of the right type.
#[derive(Default)]
struct MockBusinessManager {
    calls: AtomicUsize,
}

impl MockBusinessManager {
    fn respond(&self, method: PawsMethod) -> Result<ResponseEnvelope, ManagerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ResponseEnvelope::success(
            "2.0",
            PawsResult::new(method.response_type(), "1.0"),
        ))
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BusinessManager for MockBusinessManager {
    fn initialize(&self, _: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        self.respond(PawsMethod::Init)
    }
    fn register(&self, _: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        self.respond(PawsMethod::Register)
    }
    fn available_spectrum(&self, _: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        self.respond(PawsMethod::AvailableSpectrum)
    }
    fn available_spectrum_batch(&self, _: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        self.respond(PawsMethod::AvailableSpectrumBatch)
    }
    fn notify_spectrum_usage(&self, _: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        self.respond(PawsMethod::Notify)
    }
    fn validate_device(&self, _: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        self.respond(PawsMethod::ValidateDevice)
    }
    fn interference_query(&self, _: &Parameters) -> Result<ResponseEnvelope, ManagerError> {
        self.respond(PawsMethod::InterferenceQuery)
    }
}

/// A US store with one 10x10 degree square subregion centered on (35, -95).
fn us_store() -> InMemoryEntityStore {
    let store = InMemoryEntityStore::new();
    store.insert_polygon(RegionPolygonRecord {
        region: RegionCode::us(),
        name: "test-square".into(),
        min_latitude: 30.0,
        max_latitude: 40.0,
        min_longitude: -100.0,
        max_longitude: -90.0,
        polygons: "30 -100 40 -100 40 -90 30 -90".into(),
        location_rectangles: None,
        timestamp: Timestamp::now(),
    });
    store.insert_ruleset(RulesetRecord {
        partition_key: "US".into(),
        row_key: "1".into(),
        region: RegionCode::us(),
        authority: "US".into(),
        ruleset_id: "FccTvBandWhiteSpace-2010".into(),
        max_location_change: Some(100.0),
        max_polling_secs: Some(86_400),
        max_eirp_dbm: Some(36.0),
        max_total_bw_mhz: Some(24.0),
        max_nominal_channel_bw_mhz: Some(6.0),
        timestamp: Timestamp::now(),
    });
    store
}

fn validating_config() -> ServiceConfig {
    ServiceConfig {
        regions: vec![RegionConfig {
            code: RegionCode::us(),
            authority: RegulatoryAuthority::Fcc,
            location_validation: true,
        }],
        ..ServiceConfig::default()
    }
}

/// App over a mock manager with location validation on for `US`.
fn mock_app() -> (axum::Router, Arc<MockBusinessManager>, AppState) {
    let config = validating_config();
    let manager = Arc::new(MockBusinessManager::default());
    let trail = Arc::new(AuditTrail::default());
    let cache = Arc::new(RegionPolygonCache::new(
        Arc::new(us_store()),
        config.validated_regions(),
        CacheConfig::default(),
    ));
    let router = RequestRouter::new(
        manager.clone(),
        trail.clone() as Arc<dyn Auditor>,
        RouterConfig::default(),
    )
    .with_location_filter(LocationFilter::new(cache.clone(), RegionCode::us()));
    let state = AppState {
        config: Arc::new(config),
        router: Arc::new(router),
        cache,
        audit_trail: trail,
    };
    (paws_api::app(state.clone()), manager, state)
}

/// App over the real manager and static driver.
fn full_app() -> (axum::Router, AppState) {
    let state = bootstrap_with(
        validating_config(),
        Arc::new(us_store()),
        Arc::new(StaticSpectrumDriver::new(StaticDriverConfig::default())),
    )
    .unwrap();
    (paws_api::app(state.clone()), state)
}

async fn post_paws(app: &axum::Router, body: Value) -> Value {
    post_raw(app, body.to_string()).await
}

async fn post_raw(app: &axum::Router, body: String) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/paws")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn point(lat: f64, lon: f64) -> Value {
    json!({"point": {"center": {"latitude": lat, "longitude": lon}}})
}

fn device() -> Value {
    json!({"serialNumber": "SN-1", "fccId": "TEST-FCC-ABC"})
}

// -- Method resolution --------------------------------------------------------

#[tokio::test]
async fn test_unknown_method_is_method_not_found() {
    let (app, manager, _) = mock_app();
    let resp = post_paws(&app, json!({"method": "spectrum.getotherspectrum", "id": 1})).await;
    assert_eq!(resp["error"]["code"], "-32601");
    assert_eq!(resp["error"]["message"], "method not found");
    assert_eq!(resp["id"], 1);
    assert!(resp.get("result").is_none());
    assert_eq!(manager.calls(), 0);
}

#[tokio::test]
async fn test_null_and_empty_method_are_distinct() {
    let (app, manager, _) = mock_app();
    let null = post_paws(&app, json!({"method": null, "id": 2})).await;
    let empty = post_paws(&app, json!({"method": "", "id": 3})).await;
    assert_eq!(null["error"]["code"], "-32600");
    assert_eq!(empty["error"]["code"], "-32601");
    assert_eq!(empty["error"]["message"], "method name missing");
    assert_eq!(manager.calls(), 0);
}

#[tokio::test]
async fn test_invalid_json_is_invalid_request() {
    let (app, manager, _) = mock_app();
    let resp = post_raw(&app, "{\"method\": ".to_string()).await;
    assert_eq!(resp["error"]["code"], "-201");
    assert_eq!(resp["error"]["message"], "invalid request");
    assert!(resp["id"].is_null());
    assert_eq!(manager.calls(), 0);
}

#[tokio::test]
async fn test_root_path_also_routes() {
    let (app, _, _) = mock_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .body(Body::from(r#"{"method":"","id":5}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// -- Location filter ----------------------------------------------------------

#[tokio::test]
async fn test_outside_coverage_is_not_dispatched() {
    let (app, manager, state) = mock_app();
    let resp = post_paws(
        &app,
        json!({
            "jsonrpc": "2.0",
            "method": "spectrum.paws.getSpectrum",
            "id": "req-7",
            "params": {"version": "1.0", "deviceDesc": device(), "location": point(0.0, 0.0)}
        }),
    )
    .await;
    assert_eq!(resp["error"]["code"], "-104");
    assert_eq!(resp["error"]["method"], "spectrum.paws.getSpectrum");
    assert_eq!(resp["id"], "req-7");
    assert_eq!(manager.calls(), 0);

    let failures = state.audit_trail.failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].audit_id.as_str(), "PAWSAvailableSpectrumReq");
}

#[tokio::test]
async fn test_inside_location_is_dispatched() {
    let (app, manager, _) = mock_app();
    let resp = post_paws(
        &app,
        json!({
            "method": "spectrum.paws.getSpectrum",
            "id": 8,
            "params": {"location": point(35.0, -95.0)}
        }),
    )
    .await;
    assert_eq!(resp["result"]["type"], "AVAIL_SPECTRUM_RESP");
    assert_eq!(manager.calls(), 1);
}

#[tokio::test]
async fn test_batch_with_one_inside_location_is_dispatched() {
    let (app, manager, _) = mock_app();
    let resp = post_paws(
        &app,
        json!({
            "method": "spectrum.paws.getSpectrumBatch",
            "id": 9,
            "params": {"locations": [point(0.0, 0.0), point(35.0, -95.0)]}
        }),
    )
    .await;
    assert!(resp.get("error").is_none());
    assert_eq!(manager.calls(), 1);
}

// -- Health and audit ---------------------------------------------------------

#[tokio::test]
async fn test_liveness_probe() {
    let (app, _, _) = mock_app();
    let (status, body) = get(&app, "/health/liveness").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_readiness_waits_for_cache() {
    let (app, _, state) = mock_app();
    let (status, _) = get(&app, "/health/readiness").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    state.cache.initialize();
    let (status, body) = get(&app, "/health/readiness").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ready");
}

#[tokio::test]
async fn test_audit_console_lists_records() {
    let (app, _, _) = mock_app();
    post_paws(&app, json!({"method": "nope", "id": 1})).await;
    post_paws(&app, json!({"method": "spectrum.paws.init", "id": 2, "params": {}})).await;

    let (status, body) = get(&app, "/v1/audit/recent?limit=10").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["count"], 2);
    assert_eq!(json["records"][0]["auditId"], "PAWSInvalidMethod");
    assert_eq!(json["records"][0]["status"], "Failure");
    assert_eq!(json["records"][1]["auditId"], "PAWSInitReq");

    let (_, body) = get(&app, "/v1/audit/recent?audit_id=PAWSInitReq").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["count"], 1);

    let (status, _) = get(&app, "/v1/audit/recent?limit=0").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = get(&app, "/v1/audit/recent?audit_id=Bogus").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// -- End to end over the static driver ----------------------------------------

#[tokio::test]
async fn test_register_then_init_then_spectrum() {
    let (app, _) = full_app();
    let base = json!({
        "version": "1.0",
        "deviceDesc": device(),
        "location": point(35.0, -95.0),
        "deviceOwner": {"owner": ["vcard", []]}
    });

    let init = post_paws(&app, json!({"method": "spectrum.paws.init", "id": 1, "params": base})).await;
    assert_eq!(init["error"]["code"], "-302");
    assert_eq!(init["error"]["type"], "INIT_RESP");

    let reg = post_paws(&app, json!({"method": "spectrum.paws.register", "id": 2, "params": base})).await;
    assert_eq!(reg["result"]["type"], "REGISTRATION_RESP");
    assert_eq!(reg["result"]["rulesetInfos"][0]["rulesetId"], "FccTvBandWhiteSpace-2010");

    let init = post_paws(&app, json!({"method": "spectrum.paws.init", "id": 3, "params": base})).await;
    assert_eq!(init["result"]["type"], "INIT_RESP");
    assert_eq!(init["result"]["version"], "1.0");

    let spectrum =
        post_paws(&app, json!({"method": "spectrum.paws.getSpectrum", "id": 4, "params": base})).await;
    let spec = &spectrum["result"]["spectrumSpecs"][0];
    assert_eq!(spec["needsSpectrumReport"], true);
    assert_eq!(spec["maxTotalBwHz"], 24.0);
    assert_eq!(spectrum["result"]["deviceDesc"]["fccId"], "TEST-FCC-ABC");
}

#[tokio::test]
async fn test_version_mismatch_is_rejected() {
    let (app, _) = full_app();
    let resp = post_paws(
        &app,
        json!({
            "method": "spectrum.paws.getSpectrum",
            "id": 1,
            "params": {"version": "0.5", "deviceDesc": device(), "location": point(35.0, -95.0)}
        }),
    )
    .await;
    assert_eq!(resp["error"]["code"], "-101");
    assert_eq!(resp["error"]["message"], "VERSION");
}

#[tokio::test]
async fn test_missing_field_is_classified() {
    let (app, _) = full_app();
    let resp = post_paws(
        &app,
        json!({
            "method": "spectrum.paws.getSpectrum",
            "id": 1,
            "params": {"version": "1.0", "location": point(35.0, -95.0)}
        }),
    )
    .await;
    assert_eq!(resp["error"]["code"], "-201");
    assert_eq!(resp["error"]["data"], "deviceDesc");
}
