use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend URL not configured")]
    NotConfigured,

    #[error("Request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {message}")]
    Api {
        status: u16,
        detail: Option<String>,
        message: String,
    },

    #[error("Failed to parse backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    /// Builds an `Api` error from a non-2xx response body, pulling out the
    /// `detail` field the backend attaches to its error payloads.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        let message = match &detail {
            Some(detail) => detail.clone(),
            None if body.trim().is_empty() => "empty response body".to_string(),
            None => body.trim().to_string(),
        };

        BackendError::Api {
            status,
            detail,
            message,
        }
    }

    /// The backend's own explanation of the failure, if it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        // Request validation failures come back as a list of {loc, msg, type}
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        other => Some(other.to_string()),
    }
}
