use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::*;
use crate::services::CallConsole;

/// Routes for the console page and its form actions.
pub fn call_console_routes(console: Arc<CallConsole>) -> Router {
    Router::new()
        .route("/", get(show_console))
        .route("/calls", post(submit_call))
        .route("/calls/status", post(check_call_status))
        .route("/appointments/refresh", post(refresh_appointments))
        .route("/state", get(get_console_state))
        .route("/health", get(console_health_check))
        .with_state(console)
}
