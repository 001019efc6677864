use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use call_console_cell::{CallConsole, CallForm, CallPhase, ConsoleError, StatusTone};
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

fn console_for(mock_server: &MockServer) -> CallConsole {
    let config = TestConfig::with_backend(&mock_server.uri()).to_app_config();
    CallConsole::new(&config).unwrap()
}

fn form(phone_number: &str, patient_name: &str) -> CallForm {
    CallForm {
        phone_number: phone_number.to_string(),
        patient_name: patient_name.to_string(),
    }
}

async fn appointment_requests(mock_server: &MockServer) -> usize {
    mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == "GET" && r.url.path() == "/api/appointments")
        .count()
}

async fn wait_until_idle(console: &CallConsole) {
    for _ in 0..200 {
        let snapshot = console.snapshot().await;
        if !snapshot.loading && !snapshot.appointments_loading {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("console still busy after 2s");
}

async fn mount_empty_appointments(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_empty_phone_number_never_reaches_backend() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);

    let result = console.initiate_call(form("   ", "Jane")).await;
    assert_matches!(result, Err(ConsoleError::Validation(ref msg)) if msg == "Please enter a phone number");

    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert!(!snapshot.loading);
    assert!(snapshot.status.is_none());
    assert_eq!(snapshot.draft.patient_name, "Jane");
}

#[tokio::test]
async fn test_successful_call_stores_sid_and_clears_form() {
    let mock_server = MockServer::start().await;
    mount_empty_appointments(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .and(body_json(json!({
            "phone_number": "+15551234567",
            "patient_name": "Jane Doe"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::make_call_response("CA123", "+15551234567"),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);

    let result = console
        .initiate_call(form("  +15551234567  ", " Jane Doe "))
        .await
        .unwrap();
    assert_eq!(result.call_sid, "CA123");

    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.call_sid.as_deref(), Some("CA123"));
    assert_eq!(snapshot.phase, CallPhase::CallInitiated);
    assert_eq!(snapshot.draft, CallForm::default());
    assert!(!snapshot.loading);

    let status = snapshot.status.unwrap();
    assert_eq!(status.tone, StatusTone::Success);
    assert!(status.text.contains("CA123"));
}

#[tokio::test]
async fn test_successful_call_schedules_appointment_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments_response(1)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::make_call_response("CA123", "+15551234567"),
        ))
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    console.initiate_call(form("+15551234567", "")).await.unwrap();

    // Refetch delay is 50ms in the test config
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert!(appointment_requests(&mock_server).await >= 1);
    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.appointments.len(), 1);
    assert!(snapshot.appointments_refreshed_at.is_some());
}

#[tokio::test]
async fn test_failed_call_surfaces_backend_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(MockBackendResponses::error_response("busy line")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);

    let result = console.initiate_call(form("+15551234567", "Jane")).await;
    assert_matches!(result, Err(ConsoleError::Backend(_)));

    let snapshot = console.snapshot().await;
    let status = snapshot.status.unwrap();
    assert_eq!(status.tone, StatusTone::Error);
    assert!(status.text.contains("busy line"));
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert!(snapshot.call_sid.is_none());
    assert!(!snapshot.loading);
    // Input is kept so the operator can retry
    assert_eq!(snapshot.draft.phone_number, "+15551234567");
}

#[tokio::test]
async fn test_failed_call_without_detail_uses_generic_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    let _ = console.initiate_call(form("+15551234567", "")).await;

    let status = console.snapshot().await.status.unwrap();
    assert_eq!(status.text, "Error: Failed to initiate call");
}

#[tokio::test]
async fn test_concurrent_submission_is_rejected() {
    let mock_server = MockServer::start().await;
    mount_empty_appointments(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::make_call_response("CA1", "+15551234567"))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);

    let first = {
        let console = console.clone();
        tokio::spawn(async move { console.initiate_call(form("+15551234567", "")).await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    let snapshot = console.snapshot().await;
    assert!(snapshot.loading);
    assert_eq!(snapshot.phase, CallPhase::Calling);
    assert_eq!(snapshot.status.unwrap().text, "Initiating call...");

    let second = console.initiate_call(form("+15557654321", "")).await;
    assert_matches!(second, Err(ConsoleError::CallInProgress));

    let first = first.await.unwrap().unwrap();
    assert_eq!(first.call_sid, "CA1");
}

#[tokio::test]
async fn test_new_call_overwrites_previous_sid() {
    let mock_server = MockServer::start().await;
    mount_empty_appointments(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .and(body_json(json!({ "phone_number": "111" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::make_call_response("CA-FIRST", "111"),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .and(body_json(json!({ "phone_number": "222" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::make_call_response("CA-SECOND", "222"),
        ))
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    console.initiate_call(form("111", "")).await.unwrap();
    console.initiate_call(form("222", "")).await.unwrap();

    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.call_sid.as_deref(), Some("CA-SECOND"));
}

#[tokio::test]
async fn test_check_status_without_call_is_noop() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/call-status/CA123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    let result = console.check_call_status().await.unwrap();

    assert!(result.is_none());
    let snapshot = console.snapshot().await;
    assert!(snapshot.status.is_none());
    assert_eq!(snapshot.phase, CallPhase::Idle);
}

#[tokio::test]
async fn test_check_status_overwrites_status_message() {
    let mock_server = MockServer::start().await;
    mount_empty_appointments(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::make_call_response("CA123", "+15551234567"),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/call-status/CA123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::call_status_response("CA123", "in-progress"),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    console.initiate_call(form("+15551234567", "")).await.unwrap();

    let status = console.check_call_status().await.unwrap().unwrap();
    assert_eq!(status.status, "in-progress");

    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.phase, CallPhase::StatusChecked);
    assert_eq!(snapshot.status.unwrap().text, "Call status: in-progress");
    assert_eq!(snapshot.call_sid.as_deref(), Some("CA123"));
}

#[tokio::test]
async fn test_check_status_failure_keeps_last_status() {
    let mock_server = MockServer::start().await;
    mount_empty_appointments(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::make_call_response("CA123", "+15551234567"),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/call-status/CA123"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(MockBackendResponses::error_response("Failed to fetch call status")),
        )
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    console.initiate_call(form("+15551234567", "")).await.unwrap();
    let before = console.snapshot().await.status;

    let result = console.check_call_status().await;
    assert_matches!(result, Err(ConsoleError::Backend(_)));

    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.status, before);
    assert_eq!(snapshot.phase, CallPhase::CallInitiated);
}

#[tokio::test]
async fn test_load_appointments_replaces_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments_response(3)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    let count = console.load_appointments().await.unwrap();

    assert_eq!(count, 3);
    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.appointments.len(), 3);
    assert!(!snapshot.appointments_loading);
}

#[tokio::test]
async fn test_failed_load_keeps_previous_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments_response(2)),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(MockBackendResponses::error_response("Failed to fetch appointments")),
        )
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    console.load_appointments().await.unwrap();

    let result = console.load_appointments().await;
    assert_matches!(result, Err(ConsoleError::Backend(_)));

    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.appointments.len(), 2);
    assert!(!snapshot.appointments_loading);
    assert!(snapshot.status.is_none());
}

#[tokio::test]
async fn test_first_display_loads_only_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let console = Arc::new(console_for(&mock_server));
    console.load_on_first_display().await;
    assert!(console.snapshot().await.appointments_loading);

    console.load_on_first_display().await;
    wait_until_idle(&console).await;
}

#[tokio::test]
async fn test_failed_first_display_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments_response(2)),
        )
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);

    console.load_on_first_display().await;
    wait_until_idle(&console).await;
    assert!(console.snapshot().await.appointments.is_empty());

    console.load_on_first_display().await;
    wait_until_idle(&console).await;
    assert_eq!(console.snapshot().await.appointments.len(), 2);
    assert_eq!(appointment_requests(&mock_server).await, 2);
}

#[tokio::test]
async fn test_older_load_never_replaces_newer_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::appointments_response(1))
                .set_delay(Duration::from_millis(400)),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments_response(3)),
        )
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);

    let slow = {
        let console = console.clone();
        tokio::spawn(async move { console.load_appointments().await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(console.load_appointments().await.unwrap(), 3);
    assert_eq!(console.snapshot().await.appointments.len(), 3);

    assert_eq!(slow.await.unwrap().unwrap(), 1);
    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.appointments.len(), 3);
    assert!(!snapshot.appointments_loading);
}

#[tokio::test]
async fn test_start_call_returns_while_request_is_pending() {
    let mock_server = MockServer::start().await;
    mount_empty_appointments(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(MockBackendResponses::make_call_response("CA123", "+15551234567"))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    console.start_call(form("+15551234567", "")).await.unwrap();

    let snapshot = console.snapshot().await;
    assert!(snapshot.loading);
    assert_eq!(snapshot.phase, CallPhase::Calling);
    assert_eq!(snapshot.status.unwrap().text, "Initiating call...");

    wait_until_idle(&console).await;
    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.call_sid.as_deref(), Some("CA123"));
    assert_eq!(snapshot.phase, CallPhase::CallInitiated);
}

#[tokio::test]
async fn test_rejected_submission_returns_phase_to_idle() {
    let mock_server = MockServer::start().await;
    mount_empty_appointments(&mock_server).await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::make_call_response("CA123", "+15551234567"),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    console.initiate_call(form("+15551234567", "")).await.unwrap();
    assert_eq!(console.snapshot().await.phase, CallPhase::CallInitiated);

    let result = console.initiate_call(form("", "")).await;
    assert_matches!(result, Err(ConsoleError::Validation(_)));

    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert_eq!(snapshot.call_sid.as_deref(), Some("CA123"));
}

#[tokio::test]
async fn test_manual_refresh_returns_phase_to_idle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/appointments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(MockBackendResponses::appointments_response(2)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/make-call"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::make_call_response("CA123", "+15551234567"),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/call-status/CA123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            MockBackendResponses::call_status_response("CA123", "completed"),
        ))
        .mount(&mock_server)
        .await;

    let console = console_for(&mock_server);
    console.initiate_call(form("+15551234567", "")).await.unwrap();
    console.check_call_status().await.unwrap();
    assert_eq!(console.snapshot().await.phase, CallPhase::StatusChecked);

    console.refresh_appointments().await;
    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.phase, CallPhase::Idle);
    assert!(snapshot.appointments_loading);

    wait_until_idle(&console).await;
    let snapshot = console.snapshot().await;
    assert_eq!(snapshot.appointments.len(), 2);
    assert_eq!(snapshot.status.unwrap().text, "Call status: completed");
}
