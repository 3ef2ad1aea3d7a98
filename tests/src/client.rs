#![cfg(test)]
//! The HTTP adapter against a local backend speaking the inventory's REST surface.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lanwatch_common::config::ApiConfig;
use lanwatch_common::error::{ErrorKind, ServiceError, UNREACHABLE_MESSAGE};
use lanwatch_common::inventory::{DeviceStatus, DeviceUpdate};
use lanwatch_core::client::HttpDeviceService;
use lanwatch_core::service::DeviceService;
use lanwatch_core::views::inventory::InventoryView;
use serde_json::{json, Value};

use crate::support::{closed_port, spawn_backend};

const DEVICES: &str = r#"[
    {"id": 7, "ip_address": "192.168.1.20", "mac_address": "aa:bb:cc:dd:ee:07",
     "hostname": "printer", "vendor": "Brother", "os_info": null, "status": "online",
     "first_detected": "2024-05-01T08:00:00", "last_seen": "2024-05-01T09:30:00"},
    {"id": 2, "ip_address": "192.168.1.3", "mac_address": null, "hostname": null,
     "vendor": null, "status": "maintenance",
     "first_detected": "2024-05-01T08:00:00", "last_seen": "2024-05-01T08:00:00"}
]"#;

const DETAIL: &str = r#"{
    "id": 7, "ip_address": "192.168.1.20", "mac_address": "aa:bb:cc:dd:ee:07",
    "hostname": "printer", "vendor": "Brother", "os_info": null, "status": "online",
    "first_detected": "2024-05-01T08:00:00", "last_seen": "2024-05-01T09:30:00",
    "port_scans": [],
    "http_responses": [
        {"id": 1, "device_ip": "192.168.1.20", "url": "http://192.168.1.20:80",
         "status_code": 200,
         "headers": {"server": "nginx", "content-type": "text/html", "date": "Wed, 01 May 2024"},
         "body_preview": "<html>", "scan_time": "2024-05-01T09:31:00"},
        {"id": 2, "device_ip": "192.168.1.20", "url": "https://192.168.1.20:443",
         "status_code": null, "headers": null, "body_preview": null,
         "scan_time": "2024-05-01T09:31:05"}
    ]
}"#;

type Seen = Arc<Mutex<Vec<(String, Value)>>>;

fn raw_json(body: &'static str) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn device_detail(Path(ip): Path<String>) -> Response {
    if ip == "192.168.1.20" {
        raw_json(DETAIL)
    } else {
        (StatusCode::NOT_FOUND, Json(json!({"detail": "Device not found"}))).into_response()
    }
}

async fn scan_network(State(seen): State<Seen>, Json(body): Json<Value>) -> Response {
    seen.lock().unwrap().push(("scan_network".into(), body.clone()));
    if body.get("network_range") == Some(&json!("bogus")) {
        return (StatusCode::BAD_REQUEST, Json(json!({"detail": "invalid range"}))).into_response();
    }
    Json(json!({"message": "Network scan completed"})).into_response()
}

async fn scan_ports(State(seen): State<Seen>, Json(body): Json<Value>) -> Response {
    seen.lock().unwrap().push(("scan_ports".into(), body));
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": [
            {"loc": ["body", "ip_address"], "msg": "field required", "type": "missing"},
            {"loc": ["body"], "msg": "extra fields not permitted", "type": "extra"}
        ]})),
    )
        .into_response()
}

async fn update_device(
    State(seen): State<Seen>,
    Path(ip): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    seen.lock().unwrap().push((format!("update {ip}"), body));
    Json(json!({"message": "Device updated"})).into_response()
}

async fn reset(State(seen): State<Seen>) -> Response {
    seen.lock().unwrap().push(("reset".into(), Value::Null));
    Json(json!({"message": "All devices deleted", "deleted": 2})).into_response()
}

async fn backend() -> (HttpDeviceService, Seen) {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route("/api/devices", get(|| async { raw_json(DEVICES) }))
        .route("/api/devices/reset", post(reset))
        .route("/api/devices/{ip}", get(device_detail).put(update_device))
        .route("/api/scan/network", post(scan_network))
        .route("/api/scan/ports", post(scan_ports))
        .with_state(seen.clone());
    let base = spawn_backend(router).await;
    let service = HttpDeviceService::new(&ApiConfig::new(format!("{base}/"))).unwrap();
    (service, seen)
}

#[tokio::test]
async fn devices_keep_backend_order_across_reads() {
    let (service, _) = backend().await;

    let first = service.get_devices().await.unwrap();
    let second = service.get_devices().await.unwrap();

    assert_eq!(first, second);
    let ips: Vec<&str> = first.iter().map(|d| d.ip_address.as_str()).collect();
    assert_eq!(ips, ["192.168.1.20", "192.168.1.3"]);
    assert_eq!(first[0].status, DeviceStatus::Online);
    assert_eq!(first[1].status, DeviceStatus::Other("maintenance".into()));
    assert_eq!(first[1].os_info, None);
    assert!(first.iter().all(|d| d.has_consistent_timeline()));
}

#[tokio::test]
async fn detail_keeps_header_order_and_missing_status() {
    let (service, _) = backend().await;

    let detail = service.get_device_detail("192.168.1.20").await.unwrap();

    assert_eq!(detail.device.hostname.as_deref(), Some("printer"));
    assert!(detail.port_scans.is_empty());
    let headers: Vec<&str> = detail.http_responses[0]
        .headers
        .iter()
        .flatten()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(headers, ["server", "content-type", "date"]);
    assert_eq!(detail.http_responses[1].status_code, None);
    assert_eq!(detail.http_responses[1].headers, None);
}

#[tokio::test]
async fn missing_device_is_not_found() {
    let (service, _) = backend().await;

    let err = service.get_device_detail("10.1.1.1").await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.describe("Failed to load device details"), "Error: Device not found");
}

#[tokio::test]
async fn scan_posts_the_normalized_range_then_reloads() {
    let (service, seen) = backend().await;
    let view = InventoryView::new(Arc::new(service));

    view.scan_network("192.168.1.100").await.unwrap();

    assert_eq!(
        seen.lock().unwrap().clone(),
        vec![(
            "scan_network".to_string(),
            json!({"network_range": "192.168.1.100/32"})
        )]
    );
    assert_eq!(view.counts().total, 2);
}

#[tokio::test]
async fn quick_scan_sends_an_empty_body() {
    let (service, seen) = backend().await;

    let ack = service.scan_network(None).await.unwrap();

    assert_eq!(ack.message.as_deref(), Some("Network scan completed"));
    assert_eq!(seen.lock().unwrap()[0].1, json!({}));
}

#[tokio::test]
async fn rejected_scan_surfaces_the_backend_message() {
    let (service, _) = backend().await;
    let view = InventoryView::new(Arc::new(service));
    view.refresh().await.unwrap();

    view.scan_network("bogus").await.unwrap_err();

    assert_eq!(view.error().as_deref(), Some("Error: invalid range"));
    assert_eq!(view.counts().total, 2);
}

#[tokio::test]
async fn validation_details_are_joined() {
    let (service, seen) = backend().await;

    let err = service.scan_ports("192.168.1.20").await.unwrap_err();

    assert_eq!(
        err,
        ServiceError::Application {
            status: 422,
            message: Some("field required; extra fields not permitted".into()),
        }
    );
    assert_eq!(seen.lock().unwrap()[0].1, json!({"ip_address": "192.168.1.20"}));
}

#[tokio::test]
async fn update_sends_only_the_given_fields() {
    let (service, seen) = backend().await;
    let update = DeviceUpdate {
        hostname: Some("nas".into()),
        status: Some(DeviceStatus::Offline),
        ..DeviceUpdate::default()
    };

    let ack = service.update_device("192.168.1.20", &update).await.unwrap();

    assert_eq!(ack.message.as_deref(), Some("Device updated"));
    assert_eq!(
        seen.lock().unwrap()[0],
        (
            "update 192.168.1.20".to_string(),
            json!({"hostname": "nas", "status": "offline"})
        )
    );
}

#[tokio::test]
async fn reset_is_acknowledged() {
    let (service, seen) = backend().await;

    let ack = service.reset_devices().await.unwrap();

    assert_eq!(ack.message.as_deref(), Some("All devices deleted"));
    assert_eq!(ack.fields.get("deleted"), Some(&json!(2)));
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let service = HttpDeviceService::new(&ApiConfig::new(closed_port().await)).unwrap();

    let err = service.get_devices().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.describe("Failed to load devices"), UNREACHABLE_MESSAGE);
}

#[tokio::test]
async fn clients_with_different_config_coexist() {
    let (service, _) = backend().await;
    let offline = HttpDeviceService::new(&ApiConfig::new(closed_port().await)).unwrap();

    assert!(service.get_devices().await.is_ok());
    assert!(offline.get_devices().await.is_err());
    assert_ne!(service.base_url(), offline.base_url());
}
