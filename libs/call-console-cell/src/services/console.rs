use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use shared_backend::{BackendClient, BackendError};
use shared_config::AppConfig;
use shared_models::call::{CallRequest, CallResult, CallStatus};

use crate::error::ConsoleError;
use crate::models::{CallForm, CallPhase, ConsoleSnapshot, ConsoleState, StatusMessage};

pub const MISSING_PHONE_NOTICE: &str = "Please enter a phone number";
pub const GENERIC_CALL_FAILURE: &str = "Failed to initiate call";
pub const INITIATING_CALL_STATUS: &str = "Initiating call...";

/// Controller behind the console page.
///
/// All state sits behind one lock that is never held across a backend
/// request, so the page can render while a request is pending.
#[derive(Clone)]
pub struct CallConsole {
    backend: Arc<BackendClient>,
    state: Arc<RwLock<ConsoleState>>,
    refetch_delay: Duration,
}

impl CallConsole {
    pub fn new(config: &AppConfig) -> Result<Self, ConsoleError> {
        let backend = BackendClient::new(config)?;
        Ok(Self::with_backend(Arc::new(backend), config.refetch_delay()))
    }

    pub fn with_backend(backend: Arc<BackendClient>, refetch_delay: Duration) -> Self {
        Self {
            backend,
            state: Arc::new(RwLock::new(ConsoleState::default())),
            refetch_delay,
        }
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    pub async fn snapshot(&self) -> ConsoleSnapshot {
        self.state.read().await.snapshot()
    }

    /// Starts loading the appointment list the first time the page is displayed.
    ///
    /// Returns once the load is marked in flight, so the page rendered right
    /// after shows the busy indicator. A failed first load clears the flag
    /// and the next display tries again.
    pub async fn load_on_first_display(&self) {
        let generation = {
            let mut state = self.state.write().await;
            if std::mem::replace(&mut state.initial_load_started, true) {
                return;
            }
            state.begin_appointment_load()
        };

        let console = self.clone();
        tokio::spawn(async move {
            let _ = console.finish_appointment_load(generation, true).await;
        });
    }

    /// Manual refresh: returns the call phase to idle and reloads the list in
    /// the background.
    pub async fn refresh_appointments(&self) {
        let generation = {
            let mut state = self.state.write().await;
            if !state.loading {
                state.phase = CallPhase::Idle;
            }
            state.begin_appointment_load()
        };

        let console = self.clone();
        tokio::spawn(async move {
            let _ = console.finish_appointment_load(generation, false).await;
        });
    }

    /// Replaces the cached appointment list with the backend's current set.
    ///
    /// On failure the previous list stays in place and the error is only logged.
    pub async fn load_appointments(&self) -> Result<usize, ConsoleError> {
        let generation = self.state.write().await.begin_appointment_load();
        self.finish_appointment_load(generation, false).await
    }

    /// An answer older than the list already shown is dropped, so overlapping
    /// loads never roll the list back.
    #[instrument(skip(self))]
    async fn finish_appointment_load(
        &self,
        generation: u64,
        first_display: bool,
    ) -> Result<usize, ConsoleError> {
        let outcome = self.backend.list_appointments().await;

        let mut state = self.state.write().await;
        state.appointment_loads_in_flight = state.appointment_loads_in_flight.saturating_sub(1);

        match outcome {
            Ok(appointments) => {
                let count = appointments.len();
                if generation <= state.applied_appointment_generation {
                    debug!(
                        "Discarding appointment list from load {}: load {} already applied",
                        generation, state.applied_appointment_generation
                    );
                    return Ok(count);
                }

                state.applied_appointment_generation = generation;
                state.appointments = appointments;
                state.appointments_refreshed_at = Some(Utc::now());
                debug!("Appointment list replaced with {} records", count);
                Ok(count)
            }
            Err(e) => {
                error!("Error fetching appointments: {}", e);
                if first_display {
                    state.initial_load_started = false;
                }
                Err(e.into())
            }
        }
    }

    /// Validates the form, asks the backend to place the call and records the outcome.
    ///
    /// A blank phone number is rejected before any request goes out. While one
    /// initiation is pending further submissions are rejected with
    /// `ConsoleError::CallInProgress`.
    pub async fn initiate_call(&self, form: CallForm) -> Result<CallResult, ConsoleError> {
        let request = self.begin_call(form).await?;
        self.complete_call(request).await
    }

    /// Same checks as [`initiate_call`](Self::initiate_call), but the backend
    /// request runs in the background. On `Ok` the console is already in the
    /// `Calling` phase.
    pub async fn start_call(&self, form: CallForm) -> Result<(), ConsoleError> {
        let request = self.begin_call(form).await?;

        let console = self.clone();
        tokio::spawn(async move {
            let _ = console.complete_call(request).await;
        });
        Ok(())
    }

    async fn begin_call(&self, form: CallForm) -> Result<CallRequest, ConsoleError> {
        let Some(request) = CallRequest::from_input(&form.phone_number, &form.patient_name) else {
            warn!("Call submission rejected: missing phone number");
            let mut state = self.state.write().await;
            state.draft = form;
            if !state.loading {
                state.phase = CallPhase::Idle;
            }
            return Err(ConsoleError::Validation(MISSING_PHONE_NOTICE.to_string()));
        };

        let mut state = self.state.write().await;
        if state.loading {
            warn!("Call submission rejected: another call is being initiated");
            return Err(ConsoleError::CallInProgress);
        }
        state.loading = true;
        state.phase = CallPhase::Calling;
        state.status = Some(StatusMessage::info(INITIATING_CALL_STATUS));
        state.draft = form;

        Ok(request)
    }

    #[instrument(skip(self, request))]
    async fn complete_call(&self, request: CallRequest) -> Result<CallResult, ConsoleError> {
        let outcome = self.backend.make_call(&request).await;

        let mut state = self.state.write().await;
        state.loading = false;

        match outcome {
            Ok(result) => {
                info!("Call initiated: {}", result.call_sid);
                state.call_sid = Some(result.call_sid.clone());
                state.status = Some(StatusMessage::success(success_message(&result)));
                state.phase = CallPhase::CallInitiated;
                state.draft = CallForm::default();
                drop(state);

                self.schedule_refetch();
                Ok(result)
            }
            Err(e) => {
                error!("Error making call: {}", e);
                state.status = Some(StatusMessage::error(failure_message(&e)));
                state.phase = CallPhase::Idle;
                Err(e.into())
            }
        }
    }

    /// Fetches the status of the stored call. Without a stored call this is a
    /// no-op returning `Ok(None)`.
    ///
    /// Failures are logged and leave the displayed status untouched.
    #[instrument(skip(self))]
    pub async fn check_call_status(&self) -> Result<Option<CallStatus>, ConsoleError> {
        let Some(call_sid) = self.state.read().await.call_sid.clone() else {
            debug!("Status check skipped: no call initiated");
            return Ok(None);
        };

        let status = match self.backend.call_status(&call_sid).await {
            Ok(status) => status,
            Err(e) => {
                error!("Error checking call status for {}: {}", call_sid, e);
                return Err(e.into());
            }
        };

        let mut state = self.state.write().await;
        if state.call_sid.as_deref() != Some(call_sid.as_str()) {
            debug!("Discarding status for {}: a newer call replaced it", call_sid);
            return Ok(Some(status));
        }

        state.status = Some(StatusMessage::info(format!("Call status: {}", status.describe())));
        state.phase = CallPhase::StatusChecked;

        Ok(Some(status))
    }

    /// One-shot reload of the appointment list after the configured delay.
    /// The task is detached and never cancelled.
    fn schedule_refetch(&self) {
        let console = self.clone();
        let delay = self.refetch_delay;
        debug!("Scheduling appointment refetch in {:?}", delay);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = console.load_appointments().await;
        });
    }
}

fn success_message(result: &CallResult) -> String {
    match result.message.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        Some(message) => format!(
            "Call initiated successfully! {} (Call SID: {})",
            message, result.call_sid
        ),
        None => format!("Call initiated successfully! Call SID: {}", result.call_sid),
    }
}

fn failure_message(err: &BackendError) -> String {
    format!("Error: {}", err.detail().unwrap_or(GENERIC_CALL_FAILURE))
}
