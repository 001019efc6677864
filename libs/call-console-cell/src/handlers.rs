use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::warn;

use shared_models::error::AppError;

use crate::error::ConsoleError;
use crate::models::{CallForm, ConsoleSnapshot, Notice};
use crate::services::{render_page, CallConsole};

/// GET / — the console page. The first display starts loading the
/// appointment list and renders without waiting for it.
pub async fn show_console(State(console): State<Arc<CallConsole>>) -> Html<String> {
    console.load_on_first_display().await;

    let snapshot = console.snapshot().await;
    Html(render_page(&snapshot, None))
}

/// POST /calls
///
/// The backend request runs in the background and the browser is sent back
/// to the page, which shows the call in progress. Rejected submissions
/// answer with the page and an inline notice.
pub async fn submit_call(
    State(console): State<Arc<CallConsole>>,
    Form(form): Form<CallForm>,
) -> Response {
    let (status, notice) = match console.start_call(form).await {
        Ok(()) => return Redirect::to("/").into_response(),
        Err(ConsoleError::Validation(message)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Notice::new(message))
        }
        Err(e @ ConsoleError::CallInProgress) => (StatusCode::CONFLICT, Notice::new(e.to_string())),
        Err(e) => return AppError::from(e).into_response(),
    };

    let snapshot = console.snapshot().await;
    (status, Html(render_page(&snapshot, Some(&notice)))).into_response()
}

/// POST /calls/status
pub async fn check_call_status(State(console): State<Arc<CallConsole>>) -> Redirect {
    if let Err(e) = console.check_call_status().await {
        warn!("Call status check failed: {}", e);
    }
    Redirect::to("/")
}

/// POST /appointments/refresh
pub async fn refresh_appointments(State(console): State<Arc<CallConsole>>) -> Redirect {
    console.refresh_appointments().await;
    Redirect::to("/")
}

/// GET /state
pub async fn get_console_state(State(console): State<Arc<CallConsole>>) -> Json<ConsoleSnapshot> {
    Json(console.snapshot().await)
}

/// GET /health
pub async fn console_health_check(State(console): State<Arc<CallConsole>>) -> Json<Value> {
    let backend_url = console.backend().base_url().to_string();

    let (status, backend_reachable) = match console.backend().health_check().await {
        Ok(true) => ("healthy", true),
        Ok(false) => ("unhealthy", true),
        Err(e) => {
            warn!("Backend health check error: {}", e);
            ("unhealthy", false)
        }
    };

    Json(json!({
        "status": status,
        "backend_url": backend_url,
        "backend_reachable": backend_reachable,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
