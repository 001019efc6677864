//! # Call Console Cell
//!
//! Operator page for the appointment booking agent: start an outbound
//! booking call, follow its status, and browse the appointments the backend
//! has recorded.
//!
//! ## Architecture
//!
//! ```text
//! +-----------------------------------------------------+
//! |                 Call Console Cell                   |
//! +-----------------------------------------------------+
//! |  handlers.rs    |  Page and form action handlers    |
//! |  router.rs      |  Route definitions                |
//! |  models.rs      |  View state & form types          |
//! |  error.rs       |  Console error taxonomy           |
//! |  services/      |                                   |
//! |    console.rs   |  Controller over the backend API  |
//! |    view.rs      |  Server-side HTML rendering       |
//! +-----------------------------------------------------+
//! ```
//!
//! ## Routes
//!
//! - `GET /` - Console page (first display loads appointments)
//! - `POST /calls` - Start a call from the form
//! - `POST /calls/status` - Refresh the status of the last call
//! - `POST /appointments/refresh` - Reload the appointment list
//! - `GET /state` - JSON snapshot of the console state
//! - `GET /health` - Console and backend health
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use call_console_cell::{call_console_routes, CallConsole};
//! use shared_config::AppConfig;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env();
//! let console = Arc::new(CallConsole::new(&config)?);
//! let routes = call_console_routes(console);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use error::ConsoleError;
pub use models::{CallForm, CallPhase, ConsoleSnapshot, Notice, StatusMessage, StatusTone};
pub use router::call_console_routes;
pub use services::{render_page, CallConsole};
