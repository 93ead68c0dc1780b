#![allow(clippy::unwrap_used)]
// Integration tests for `MeshClient` using wiremock.

use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use connect_mesh_api::{CommandOptions, Error, MeshClient, RetryPolicy, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

fn quick_retries() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        base_delay: Duration::from_millis(100),
        max_delay: Duration::from_millis(100),
        jitter: Duration::ZERO,
    }
}

async fn setup() -> (MockServer, MeshClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/core", server.uri())).unwrap();
    let client =
        MeshClient::with_client(reqwest::Client::new(), base_url).with_retry_policy(quick_retries());
    (server, client)
}

fn device_json(unique_id: &str, device_type: &str) -> serde_json::Value {
    json!({
        "networkId": "net-1",
        "unicastAddress": 2,
        "id": format!("obj-{unique_id}"),
        "name": format!("Device {unique_id}"),
        "description": null,
        "bleAddress": "aabbccddeeff",
        "macBytes": "qrvM3e7/",
        "bootloaderVersion": "2.1.0",
        "type": device_type,
        "uniqueId": unique_id,
        "deviceKey": "0011",
        "elements": []
    })
}

// ── Auth & transport ────────────────────────────────────────────────

#[tokio::test]
async fn test_bearer_token_and_content_type_headers() {
    let server = MockServer::start().await;
    let token: secrecy::SecretString = "secret-token".to_string().into();
    let http = TransportConfig::default().build_client(&token).unwrap();
    let client = MeshClient::with_client(http, Url::parse(&server.uri()).unwrap());

    Mock::given(method("GET"))
        .and(path("/devices"))
        .and(header("authorization", "Bearer secret-token"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    assert!(devices.is_empty());
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/networks"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .mount(&server)
        .await;

    let result = client.list_networks().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

// ── Retry behaviour ─────────────────────────────────────────────────

#[tokio::test]
async fn test_three_server_errors_then_success() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/devices"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(3)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/core/devices"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([device_json("dev-1", "com.haefele.led.rgb")])),
        )
        .with_priority(2)
        .mount(&server)
        .await;

    let devices = client.list_devices().await.unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_persistent_503_exhausts_attempts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/gateways"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = client.list_gateways().await;
    assert!(
        matches!(result, Err(Error::TransientHttp { status: 503, .. })),
        "got: {result:?}"
    );
    assert_eq!(server.received_requests().await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_terminal_status_is_not_retried() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/devices/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let err = client.get_device("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let (server, client) = setup().await;
    let client = client
        .with_retry_policy(RetryPolicy::no_retry())
        .with_timeout(Duration::from_millis(200));

    Mock::given(method("GET"))
        .and(path("/api/core/groups"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = client.list_groups().await;
    assert!(matches!(result, Err(Error::Timeout { .. })), "got: {result:?}");
}

// ── Status ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_device_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/devices/dev-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": { "power": true, "lightness": 32768 },
            "online": true
        })))
        .mount(&server)
        .await;

    let status = client.get_device_status("dev-1").await.unwrap();
    assert_eq!(status.state.get("power"), Some(&json!(true)));
    assert_eq!(status.state.get("lightness"), Some(&json!(32768)));
    assert_eq!(status.extra.get("online"), Some(&json!(true)));
}

#[tokio::test]
async fn test_status_without_state_is_validation_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/devices/dev-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "power": "on" })))
        .mount(&server)
        .await;

    let result = client.get_device_status("dev-1").await;
    assert!(matches!(result, Err(Error::Validation(_))), "got: {result:?}");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_status_array_is_validation_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/devices/dev-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
        .mount(&server)
        .await;

    let result = client.get_device_status("dev-1").await;
    assert!(matches!(result, Err(Error::Validation(_))), "got: {result:?}");
}

#[tokio::test]
async fn test_status_reads_are_throttled_per_device() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "state": { "power": false } })))
        .mount(&server)
        .await;

    let start = Instant::now();
    client.get_device_status("dev-1").await.unwrap();
    client.get_device_status("dev-2").await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(900));

    client.get_device_status("dev-1").await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(1));
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_power_payload() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/core/devices/power"))
        .and(body_json(json!({
            "uniqueId": "dev-1",
            "acknowledged": true,
            "retries": 0,
            "timeout_ms": 10000,
            "power": "off"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_power("dev-1", false, CommandOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_set_hsl_payload() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/core/devices/hsl"))
        .and(body_json(json!({
            "uniqueId": "dev-1",
            "acknowledged": true,
            "retries": 1,
            "timeout_ms": 5000,
            "hue": 120.0,
            "saturation": 0.5,
            "lightness": 0.25
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let opts = CommandOptions {
        acknowledged: true,
        retries: 1,
        timeout_ms: 5000,
    };
    client.set_hsl("dev-1", 120.0, 0.5, 0.25, opts).await.unwrap();
}

#[tokio::test]
async fn test_command_failure_reports_error_code() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/core/devices/lightness"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "TIMEOUT" })),
        )
        .mount(&server)
        .await;

    let result = client
        .set_lightness("dev-1", 0.5, CommandOptions::default())
        .await;
    match result {
        Err(Error::CommandFailed { code }) => assert_eq!(code, "TIMEOUT"),
        other => panic!("expected CommandFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_command_without_success_flag_fails() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/core/devices/temperature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let result = client
        .set_temperature("dev-1", 30000, CommandOptions::default())
        .await;
    match result {
        Err(Error::CommandFailed { code }) => assert_eq!(code, "UNKNOWN_ERROR"),
        other => panic!("expected CommandFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_group_lightness_payload() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/core/groups/lightness"))
        .and(body_json(json!({
            "groupId": "grp-1",
            "networkId": "net-1",
            "acknowledged": true,
            "retries": 0,
            "timeout_ms": 10000,
            "lightness": 0.75
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .set_group_lightness("grp-1", "net-1", 0.75, CommandOptions::default())
        .await
        .unwrap();
}

// ── Listing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_networks_accepts_single_object() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/networks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "net-1",
            "networkKey": "abcd",
            "name": "Home",
            "creationDate": "2024-10-17T13:59:36.446Z",
            "updateDate": "2024-10-18T08:00:00Z"
        })))
        .mount(&server)
        .await;

    let networks = client.list_networks().await.unwrap();
    assert_eq!(networks.len(), 1);
    assert_eq!(networks[0].name, "Home");
    assert!(networks[0].network.is_none());
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/scenes"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.list_scenes().await;
    match result {
        Err(Error::Deserialization { body, .. }) => assert!(body.contains("maintenance")),
        other => panic!("expected Deserialization, got: {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_recall_scene_with_empty_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/core/scenes/recall/scene-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.recall_scene("scene-9").await.unwrap();
}
