#![cfg(test)]
use std::cell::Cell;

use lanwatch_common::error::ServiceError;
use lanwatch_core::views::inventory::InventoryView;
use lanwatch_core::views::scan_request::{InlineRange, RangePicker, ScanRequestView, BLANK_RANGE_MESSAGE};
use lanwatch_core::views::ViewError;

use crate::support::{app_error, device, Call, MockService};

#[tokio::test]
async fn completion_runs_before_the_dialog_closes() {
    let mock = MockService::new();
    let mut request = ScanRequestView::new(InlineRange::new("192.168.1.0/24"));
    let open_during_completion = Cell::new(None);

    let result = request
        .submit(mock.as_ref(), || async { open_during_completion.set(Some(true)) })
        .await;

    assert!(result.is_ok());
    assert_eq!(open_during_completion.get(), Some(true));
    assert!(!request.is_open());
    assert!(!request.is_scanning());
    assert_eq!(mock.calls(), vec![Call::ScanNetwork(Some("192.168.1.0/24".into()))]);
}

#[tokio::test]
async fn failure_keeps_the_dialog_open_with_the_message() {
    let mock = MockService::new();
    mock.push_scan_network(Err(app_error(422, "network_range must be CIDR")));
    let mut request = ScanRequestView::new(InlineRange::new("lan"));
    let completed = Cell::new(false);

    let result = request
        .submit(mock.as_ref(), || async { completed.set(true) })
        .await;

    assert!(result.is_err());
    assert!(!completed.get());
    assert!(request.is_open());
    assert_eq!(request.error(), Some("Error: network_range must be CIDR"));
    assert_eq!(mock.calls(), vec![Call::ScanNetwork(Some("lan".into()))]);
}

#[tokio::test]
async fn three_failure_causes_read_differently() {
    let causes = [
        (app_error(400, "invalid range"), "Error: invalid range"),
        (
            ServiceError::Application { status: 500, message: None },
            "Error: Network scan failed",
        ),
        (
            ServiceError::Transport("timed out".into()),
            "Unable to connect to the server",
        ),
        (ServiceError::Unknown("builder error".into()), "Network scan failed"),
    ];

    for (cause, shown) in causes {
        let mock = MockService::new();
        mock.push_scan_network(Err(cause));
        let mut request = ScanRequestView::new(InlineRange::new("10.0.0.0/24"));

        request.submit(mock.as_ref(), || async {}).await.unwrap_err();

        assert_eq!(request.error(), Some(shown));
    }
}

#[tokio::test]
async fn picker_custom_entry_goes_through_the_same_path() {
    let mock = MockService::new();
    mock.push_devices(Ok(vec![device(9, "172.16.1.100", "online")]));
    let view = InventoryView::new(mock.clone());

    let mut picker = RangePicker::default();
    picker.select_custom();
    picker.set_custom("172.16.1.100");
    let mut request = ScanRequestView::new(picker);

    view.scan_with(&mut request).await.unwrap();

    assert_eq!(
        mock.calls(),
        vec![
            Call::ScanNetwork(Some("172.16.1.100/32".into())),
            Call::GetDevices,
        ]
    );
    assert!(!request.is_open());
    assert_eq!(view.counts().online, 1);
}

#[tokio::test]
async fn picker_preset_is_sent_verbatim() {
    let mock = MockService::new();
    let view = InventoryView::new(mock.clone());

    let mut picker = RangePicker::default();
    picker.select_preset(4).unwrap();
    let mut request = ScanRequestView::new(picker);
    view.scan_with(&mut request).await.unwrap();

    assert_eq!(mock.calls()[0], Call::ScanNetwork(Some("192.168.1.1-20".into())));
}

#[tokio::test]
async fn empty_custom_entry_is_refused_locally() {
    let mock = MockService::new();
    let view = InventoryView::new(mock.clone());

    let mut picker = RangePicker::default();
    picker.select_custom();
    let mut request = ScanRequestView::new(picker);
    let err = view.scan_with(&mut request).await.unwrap_err();

    assert_eq!(
        err,
        ViewError::Service(ServiceError::Validation(BLANK_RANGE_MESSAGE.into()))
    );
    assert_eq!(request.error(), Some(BLANK_RANGE_MESSAGE));
    assert!(request.is_open());
    assert!(mock.calls().is_empty());
}
