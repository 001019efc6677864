use thiserror::Error;

use shared_backend::BackendError;
use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("{0}")]
    Validation(String),

    #[error("A call is already being initiated")]
    CallInProgress,

    #[error("Backend request failed: {0}")]
    Backend(#[from] BackendError),
}

impl From<ConsoleError> for AppError {
    fn from(err: ConsoleError) -> Self {
        match err {
            ConsoleError::Validation(message) => AppError::ValidationError(message),
            ConsoleError::CallInProgress => {
                AppError::Conflict("A call is already being initiated".to_string())
            }
            ConsoleError::Backend(BackendError::NotConfigured) => {
                AppError::Internal("Backend URL not configured".to_string())
            }
            ConsoleError::Backend(e) => AppError::ExternalService(e.to_string()),
        }
    }
}
