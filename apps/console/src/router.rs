use std::sync::Arc;

use axum::Router;

use call_console_cell::{call_console_routes, CallConsole};

pub fn create_router(console: Arc<CallConsole>) -> Router {
    Router::new().merge(call_console_routes(console))
}
