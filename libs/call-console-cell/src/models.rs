use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_models::appointment::Appointment;

/// Client-observed lifecycle of the most recent call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CallPhase {
    #[default]
    Idle,
    Calling,
    CallInitiated,
    StatusChecked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub tone: StatusTone,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { tone: StatusTone::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { tone: StatusTone::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { tone: StatusTone::Error, text: text.into() }
    }
}

/// Raw call form input, exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CallForm {
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub patient_name: String,
}

/// A per-response message shown above the form. Never stored in console state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
}

impl Notice {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Process-local view state. Reset on restart.
#[derive(Debug, Default)]
pub struct ConsoleState {
    pub phase: CallPhase,
    pub loading: bool,
    pub status: Option<StatusMessage>,
    pub call_sid: Option<String>,
    pub draft: CallForm,
    pub appointments: Vec<Appointment>,
    pub appointment_loads_in_flight: u32,
    /// Bumped when a load starts.
    pub appointment_load_generation: u64,
    /// Generation of the load whose answer is currently shown.
    pub applied_appointment_generation: u64,
    pub initial_load_started: bool,
    pub appointments_refreshed_at: Option<DateTime<Utc>>,
}

impl ConsoleState {
    /// Marks an appointment load as in flight and returns its generation.
    pub fn begin_appointment_load(&mut self) -> u64 {
        self.appointment_loads_in_flight += 1;
        self.appointment_load_generation += 1;
        self.appointment_load_generation
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            phase: self.phase,
            loading: self.loading,
            status: self.status.clone(),
            call_sid: self.call_sid.clone(),
            draft: self.draft.clone(),
            appointments: self.appointments.clone(),
            appointments_loading: self.appointment_loads_in_flight > 0,
            appointments_refreshed_at: self.appointments_refreshed_at,
        }
    }
}

/// Read-only copy of the console state used for rendering and `GET /state`.
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleSnapshot {
    pub phase: CallPhase,
    pub loading: bool,
    pub status: Option<StatusMessage>,
    pub call_sid: Option<String>,
    pub draft: CallForm,
    pub appointments: Vec<Appointment>,
    pub appointments_loading: bool,
    pub appointments_refreshed_at: Option<DateTime<Utc>>,
}

impl ConsoleSnapshot {
    pub fn can_check_status(&self) -> bool {
        self.call_sid.is_some()
    }
}
