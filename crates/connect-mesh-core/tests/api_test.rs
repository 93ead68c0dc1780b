#![allow(clippy::unwrap_used)]
// Integration tests for `MeshApi` against a wiremock server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use connect_mesh_core::{CommandOptions, CoreError, MeshApi, MeshClient, RetryPolicy};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MeshApi) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api/core", server.uri())).unwrap();
    let client = MeshClient::with_client(reqwest::Client::new(), base_url).with_retry_policy(
        RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(50),
            jitter: Duration::ZERO,
        },
    );
    (server, MeshApi::new(client))
}

fn device_json(unique_id: &str, network_id: &str, device_type: &str) -> serde_json::Value {
    json!({
        "networkId": network_id,
        "unicastAddress": 2,
        "id": format!("obj-{unique_id}"),
        "name": format!("Device {unique_id}"),
        "bleAddress": "aabbccddeeff",
        "macBytes": "qrvM3e7/",
        "bootloaderVersion": "2.1.0",
        "type": device_type,
        "uniqueId": unique_id,
        "deviceKey": "0011",
        "elements": []
    })
}

async fn mount_device(server: &MockServer, unique_id: &str, device_type: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/core/devices/{unique_id}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(device_json(unique_id, "net-1", device_type)),
        )
        .mount(server)
        .await;
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_skips_unknown_types() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            device_json("a", "net-1", "com.haefele.led.rgb"),
            device_json("b", "net-1", "com.example.kettle"),
            device_json("c", "net-2", "de.jung.socket"),
        ])))
        .mount(&server)
        .await;

    let all = api.list_devices().await.unwrap();
    let ids: Vec<&str> = all.iter().map(|d| d.id()).collect();
    assert_eq!(ids, ["a", "c"]);

    let net1 = api.list_devices_for_network("net-1").await.unwrap();
    assert_eq!(net1.len(), 1);
    assert!(net1[0].supports_hsl());
}

#[tokio::test]
async fn test_get_device_not_found() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/devices/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let result = api.get_device("missing").await;
    assert!(
        matches!(result, Err(CoreError::DeviceNotFound { ref identifier }) if identifier == "missing"),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_get_device_with_unknown_type_fails() {
    let (server, api) = setup().await;
    mount_device(&server, "odd", "com.example.kettle").await;

    let result = api.get_device("odd").await;
    assert!(
        matches!(result, Err(CoreError::UnknownDeviceType { .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_status_half_lightness_is_brightness_128() {
    let (server, api) = setup().await;
    mount_device(&server, "dev-1", "com.haefele.led.white").await;

    Mock::given(method("GET"))
        .and(path("/api/core/devices/dev-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "state": { "power": true, "lightness": 32768 }
        })))
        .mount(&server)
        .await;

    let device = api.get_device("dev-1").await.unwrap();
    let status = api.get_device_status(&device).await.unwrap();
    assert!(status.power);
    assert_eq!(status.brightness(), Some(128));
}

// ── Commands ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_temperature_without_capability_sends_nothing() {
    let (server, api) = setup().await;
    mount_device(&server, "dev-1", "com.haefele.led.white").await;

    Mock::given(method("PUT"))
        .and(path("/api/core/devices/temperature"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let device = api.get_device("dev-1").await.unwrap();
    let result = api
        .set_temperature(&device, 1000, CommandOptions::default())
        .await;
    assert!(
        matches!(
            result,
            Err(CoreError::UnsupportedCapability { capability: "color temperature", .. })
        ),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_out_of_range_values_are_rejected_before_dispatch() {
    let (server, api) = setup().await;
    mount_device(&server, "rgb", "com.haefele.led.rgb").await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let device = api.get_device("rgb").await.unwrap();
    let opts = CommandOptions::default();

    let result = api.set_lightness(&device, 1.5, opts).await;
    assert!(matches!(result, Err(CoreError::Range(_))), "got: {result:?}");

    let result = api.set_hsl(&device, 361.0, 0.5, 0.5, opts).await;
    assert!(matches!(result, Err(CoreError::Range(_))), "got: {result:?}");

    let result = api.set_hsl(&device, 120.0, f64::NAN, 0.5, opts).await;
    assert!(matches!(result, Err(CoreError::Range(_))), "got: {result:?}");
}

#[tokio::test]
async fn test_successful_command_touches_device() {
    let (server, api) = setup().await;
    mount_device(&server, "dev-1", "com.haefele.led.multiwhite.2700K").await;

    Mock::given(method("PUT"))
        .and(path("/api/core/devices/temperature"))
        .and(body_json(json!({
            "uniqueId": "dev-1",
            "acknowledged": true,
            "retries": 0,
            "timeout_ms": 10000,
            "temperature": 40000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let device = api.get_device("dev-1").await.unwrap();
    let before = device.last_updated();
    tokio::time::sleep(Duration::from_millis(5)).await;

    api.set_temperature(&device, 40_000, CommandOptions::default())
        .await
        .unwrap();
    assert!(device.last_updated() > before);
}

#[tokio::test]
async fn test_command_rejected_by_mesh() {
    let (server, api) = setup().await;
    mount_device(&server, "dev-1", "de.ledvance.socket").await;

    Mock::given(method("PUT"))
        .and(path("/api/core/devices/power"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "TIMEOUT" })),
        )
        .mount(&server)
        .await;

    let device = api.get_device("dev-1").await.unwrap();
    let result = api.power_on(&device).await;
    assert!(
        matches!(result, Err(CoreError::CommandRejected { ref code }) if code == "TIMEOUT"),
        "got: {result:?}"
    );
}

// ── Networks and groups ─────────────────────────────────────────────

#[tokio::test]
async fn test_network_with_invalid_mesh_string() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/networks/net-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "net-1",
            "networkKey": "00112233",
            "name": "Home",
            "creationDate": "2024-10-17T13:59:36.446Z",
            "updateDate": "2024-10-17T13:59:36Z",
            "network": "{this is not json"
        })))
        .mount(&server)
        .await;

    let network = api.get_network("net-1").await.unwrap();
    assert_eq!(network.name(), "Home");
    assert!(network.mesh().is_none());
}

#[tokio::test]
async fn test_group_power_uses_group_envelope() {
    let (server, api) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/core/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "GRP-1",
            "networkId": "NET-1",
            "name": "Kitchen",
            "deviceEntries": [{ "deviceId": "a" }]
        }])))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/core/groups/power"))
        .and(body_json(json!({
            "groupId": "grp-1",
            "networkId": "net-1",
            "acknowledged": true,
            "retries": 0,
            "timeout_ms": 10000,
            "power": "off"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let groups = api.list_groups_for_network("net-1").await.unwrap();
    assert_eq!(groups.len(), 1);
    api.set_group_power(&groups[0], false, CommandOptions::default())
        .await
        .unwrap();
}
