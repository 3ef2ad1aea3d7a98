#![cfg(test)]
use lanwatch_common::error::ServiceError;
use lanwatch_core::views::device_detail::{DetailPhase, DeviceDetailView, Panel};
use lanwatch_core::views::{Activity, ViewError};

use crate::support::{app_error, detail, device, port, probe, Call, MockService, Op};

const IP: &str = "192.168.1.50";

#[tokio::test]
async fn showing_a_device_loads_its_detail() {
    let mock = MockService::new();
    mock.push_detail(IP, Ok(detail(device(5, IP, "online"), vec![port(IP, 22, true)])));
    let view = DeviceDetailView::new(mock.clone());

    view.show(IP).await.unwrap();

    let snapshot = view.snapshot();
    assert_eq!(snapshot.phase, DetailPhase::Ready);
    assert_eq!(snapshot.panel, Panel::PortScans);
    assert_eq!(snapshot.detail.unwrap().port_scans.len(), 1);
    assert_eq!(mock.calls(), vec![Call::GetDeviceDetail(IP.into())]);
}

#[tokio::test]
async fn device_without_port_records_has_an_empty_history() {
    let mock = MockService::new();
    mock.push_detail(IP, Ok(detail(device(5, IP, "online"), Vec::new())));
    let view = DeviceDetailView::new(mock.clone());

    view.show(IP).await.unwrap();

    let shown = view.detail().unwrap();
    assert!(shown.port_scans.is_empty());
    assert!(shown.http_responses.is_empty());
    assert_eq!(view.phase(), DetailPhase::Ready);
}

#[tokio::test]
async fn unknown_device_is_a_not_found_failure() {
    let mock = MockService::new();
    let view = DeviceDetailView::new(mock.clone());

    let err = view.show("10.9.9.9").await.unwrap_err();

    match err {
        ViewError::Service(service) => assert!(service.is_not_found()),
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(view.phase(), DetailPhase::Failed);
    assert_eq!(view.error().as_deref(), Some("Error: Device not found"));
}

#[tokio::test]
async fn switching_panels_fetches_nothing() {
    let mock = MockService::new();
    let mut loaded = detail(device(5, IP, "online"), vec![port(IP, 80, true)]);
    loaded.http_responses.push(probe(IP, "http://192.168.1.50:80"));
    mock.push_detail(IP, Ok(loaded));
    let view = DeviceDetailView::new(mock.clone());
    view.show(IP).await.unwrap();

    view.select_panel(Panel::HttpResponses);
    view.select_panel(Panel::PortScans);
    view.select_panel(Panel::HttpResponses);

    assert_eq!(view.panel(), Panel::HttpResponses);
    assert_eq!(mock.count(&Call::GetDeviceDetail(IP.into())), 1);
    assert_eq!(view.detail().unwrap().http_responses.len(), 1);
}

#[tokio::test]
async fn port_scan_keeps_the_detail_visible_and_then_replaces_it() {
    let mock = MockService::new();
    mock.push_detail(IP, Ok(detail(device(5, IP, "online"), Vec::new())));
    mock.push_detail(
        IP,
        Ok(detail(
            device(5, IP, "online"),
            vec![port(IP, 22, true), port(IP, 443, true)],
        )),
    );
    let gate = mock.hold(Op::ScanPorts);
    let view = DeviceDetailView::new(mock.clone());
    view.show(IP).await.unwrap();

    let (scanned, during) = tokio::join!(view.run_port_scan(), async {
        let during = view.snapshot();
        gate.notify_one();
        during
    });

    assert!(scanned.is_ok());
    assert!(during.scanning);
    assert_eq!(during.phase, DetailPhase::Ready);
    assert!(during.detail.is_some());

    let after = view.snapshot();
    assert!(!after.scanning);
    assert_eq!(after.detail.unwrap().port_scans.len(), 2);
    assert_eq!(
        mock.calls(),
        vec![
            Call::GetDeviceDetail(IP.into()),
            Call::ScanPorts(IP.into()),
            Call::GetDeviceDetail(IP.into()),
        ]
    );
}

#[tokio::test]
async fn second_port_scan_is_refused_while_one_runs() {
    let mock = MockService::new();
    mock.push_detail(IP, Ok(detail(device(5, IP, "online"), Vec::new())));
    let gate = mock.hold(Op::ScanPorts);
    let view = DeviceDetailView::new(mock.clone());
    view.show(IP).await.unwrap();

    let (_, second) = tokio::join!(view.run_port_scan(), async {
        let second = view.run_port_scan().await;
        gate.notify_one();
        second
    });

    assert_eq!(second, Err(ViewError::Busy(Activity::Scanning)));
    assert_eq!(mock.count(&Call::ScanPorts(IP.into())), 1);
}

#[tokio::test]
async fn failed_port_scan_keeps_the_old_history() {
    let mock = MockService::new();
    let before = detail(device(5, IP, "online"), vec![port(IP, 22, true)]);
    mock.push_detail(IP, Ok(before.clone()));
    mock.push_scan_ports(Err(ServiceError::Transport("reset by peer".into())));
    let view = DeviceDetailView::new(mock.clone());
    view.show(IP).await.unwrap();

    view.run_port_scan().await.unwrap_err();

    assert_eq!(view.detail(), Some(before));
    assert_eq!(view.phase(), DetailPhase::Ready);
    assert_eq!(view.error().as_deref(), Some("Unable to connect to the server"));
    assert!(!view.is_scanning());
}

#[tokio::test]
async fn late_detail_of_a_replaced_device_is_discarded() {
    const OTHER: &str = "192.168.1.51";
    let mock = MockService::new();
    mock.push_detail(IP, Ok(detail(device(5, IP, "online"), Vec::new())));
    mock.push_detail(OTHER, Ok(detail(device(6, OTHER, "offline"), Vec::new())));
    let gate = mock.hold(Op::GetDeviceDetail);
    let view = DeviceDetailView::new(mock.clone());

    let (first, second) = tokio::join!(view.show(IP), async {
        let second = view.show(OTHER).await;
        gate.notify_one();
        second
    });

    assert!(first.is_ok());
    assert!(second.is_ok());
    let snapshot = view.snapshot();
    assert_eq!(snapshot.ip.as_deref(), Some(OTHER));
    assert_eq!(snapshot.detail.unwrap().device.ip_address, OTHER);
}

#[tokio::test]
async fn two_views_are_independent() {
    const OTHER: &str = "192.168.1.51";
    let mock = MockService::new();
    mock.push_detail(IP, Ok(detail(device(5, IP, "online"), Vec::new())));
    mock.push_detail(OTHER, Ok(detail(device(6, OTHER, "offline"), Vec::new())));
    let left = DeviceDetailView::new(mock.clone());
    let right = DeviceDetailView::new(mock.clone());

    left.show(IP).await.unwrap();
    right.show(OTHER).await.unwrap();
    right.select_panel(Panel::HttpResponses);

    assert_eq!(left.ip().as_deref(), Some(IP));
    assert_eq!(left.panel(), Panel::PortScans);
    assert_eq!(right.detail().unwrap().device.ip_address, OTHER);
}

#[tokio::test]
async fn hidden_view_ignores_a_late_response() {
    let mock = MockService::new();
    mock.push_detail(IP, Ok(detail(device(5, IP, "online"), Vec::new())));
    let gate = mock.hold(Op::GetDeviceDetail);
    let view = DeviceDetailView::new(mock.clone());

    let (loaded, ()) = tokio::join!(view.show(IP), async {
        view.hide();
        gate.notify_one();
    });

    assert!(loaded.is_ok());
    assert_eq!(view.phase(), DetailPhase::Hidden);
    assert_eq!(view.detail(), None);
}

#[tokio::test]
async fn failed_reload_keeps_the_shown_detail_next_to_the_error() {
    let mock = MockService::new();
    let before = detail(device(5, IP, "online"), vec![port(IP, 22, true)]);
    mock.push_detail(IP, Ok(before.clone()));
    mock.push_detail(IP, Err(ServiceError::Transport("connection refused".into())));
    let view = DeviceDetailView::new(mock.clone());
    view.show(IP).await.unwrap();

    view.reload().await.unwrap_err();

    assert_eq!(view.detail(), Some(before));
    assert_eq!(view.phase(), DetailPhase::Ready);
    assert_eq!(view.error().as_deref(), Some("Unable to connect to the server"));
}

#[tokio::test]
async fn reload_keeps_the_detail_visible_while_in_flight() {
    let mock = MockService::new();
    mock.push_detail(IP, Ok(detail(device(5, IP, "online"), Vec::new())));
    mock.push_detail(IP, Ok(detail(device(5, IP, "offline"), vec![port(IP, 80, true)])));
    let view = DeviceDetailView::new(mock.clone());
    view.show(IP).await.unwrap();
    let gate = mock.hold(Op::GetDeviceDetail);

    let (reloaded, during) = tokio::join!(view.reload(), async {
        let during = view.snapshot();
        gate.notify_one();
        during
    });

    assert!(reloaded.is_ok());
    assert_eq!(during.phase, DetailPhase::Ready);
    assert!(during.detail.is_some());
    assert_eq!(view.detail().unwrap().port_scans.len(), 1);
}

#[tokio::test]
async fn failed_first_load_has_nothing_to_keep() {
    let mock = MockService::new();
    mock.push_detail(IP, Err(app_error(503, "scanner offline")));
    let view = DeviceDetailView::new(mock.clone());

    view.show(IP).await.unwrap_err();

    assert_eq!(view.phase(), DetailPhase::Failed);
    assert_eq!(view.detail(), None);
    assert_eq!(view.error().as_deref(), Some("Error: scanner offline"));
}
