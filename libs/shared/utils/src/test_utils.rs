use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;

pub struct TestConfig {
    pub backend_url: String,
    pub backend_timeout_secs: u64,
    pub appointment_refetch_delay_ms: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8001".to_string(),
            backend_timeout_secs: 5,
            appointment_refetch_delay_ms: 50,
        }
    }
}

impl TestConfig {
    /// Config pointing at a mock backend, typically `MockServer::uri()`.
    pub fn with_backend(backend_url: &str) -> Self {
        Self {
            backend_url: backend_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            backend_url: self.backend_url.clone(),
            backend_timeout_secs: self.backend_timeout_secs,
            appointment_refetch_delay_ms: self.appointment_refetch_delay_ms,
            console_port: 0,
        }
    }
}

pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn appointment_response(name: Option<&str>, doctor: Option<&str>) -> serde_json::Value {
        json!({
            "id": Uuid::new_v4(),
            "phone_number": "+15551234567",
            "name": name,
            "preferred_doctor": doctor,
            "appointment_date": doctor.map(|_| "tomorrow"),
            "appointment_time": doctor.map(|_| "3 pm"),
            "booking_timestamp": "2024-05-01T09:15:00.000000",
            "conversation_complete": true
        })
    }

    pub fn appointments_response(count: usize) -> serde_json::Value {
        let appointments: Vec<serde_json::Value> = (0..count)
            .map(|i| Self::appointment_response(Some(&format!("Patient {}", i)), Some("Smith")))
            .collect();
        json!(appointments)
    }

    pub fn make_call_response(call_sid: &str, phone_number: &str) -> serde_json::Value {
        json!({
            "status": "success",
            "call_sid": call_sid,
            "patient_id": Uuid::new_v4(),
            "message": format!("Call initiated to {}", phone_number)
        })
    }

    pub fn call_status_response(call_sid: &str, status: &str) -> serde_json::Value {
        json!({
            "call_sid": call_sid,
            "status": status,
            "duration": null,
            "start_time": null,
            "end_time": null
        })
    }

    pub fn health_response() -> serde_json::Value {
        json!({
            "status": "healthy",
            "timestamp": "2024-05-01T09:15:00.000000"
        })
    }

    pub fn error_response(detail: &str) -> serde_json::Value {
        json!({
            "detail": detail
        })
    }
}
