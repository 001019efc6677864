use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Body of `POST /api/make-call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRequest {
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

impl CallRequest {
    /// Builds a request from raw form input, trimming both fields and
    /// dropping a blank patient name. Returns `None` when the phone number is blank.
    pub fn from_input(phone_number: &str, patient_name: &str) -> Option<Self> {
        let phone_number = phone_number.trim();
        if phone_number.is_empty() {
            return None;
        }

        let patient_name = patient_name.trim();

        Some(Self {
            phone_number: phone_number.to_string(),
            patient_name: (!patient_name.is_empty()).then(|| patient_name.to_string()),
        })
    }
}

/// Successful answer to `POST /api/make-call`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    pub call_sid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Answer to `GET /api/call-status/{call_sid}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStatus {
    #[serde(default)]
    pub call_sid: Option<String>,
    pub status: String,
    #[serde(default, deserialize_with = "deserialize_loose_text")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_text")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_loose_text")]
    pub end_time: Option<String>,
}

impl CallStatus {
    /// Human readable one-liner, e.g. `in-progress (duration 35s)`.
    pub fn describe(&self) -> String {
        let mut details = Vec::new();
        if let Some(duration) = &self.duration {
            details.push(format!("duration {}s", duration));
        }
        if let Some(start) = &self.start_time {
            details.push(format!("started {}", start));
        }
        if let Some(end) = &self.end_time {
            details.push(format!("ended {}", end));
        }

        if details.is_empty() {
            self.status.clone()
        } else {
            format!("{} ({})", self.status, details.join(", "))
        }
    }
}

/// Accepts a string, a number, or null; anything else is rendered as JSON text.
fn deserialize_loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
