use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A booked patient visit as reported by the backend.
///
/// Records are created server-side once a call completes the booking
/// conversation; the console only ever reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub phone_number: String,
    #[serde(default)]
    pub preferred_doctor: Option<String>,
    #[serde(default)]
    pub appointment_date: Option<String>,
    #[serde(default)]
    pub appointment_time: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub booking_timestamp: DateTime<Utc>,
}

impl Appointment {
    pub fn display_name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    pub fn display_doctor(&self) -> Option<&str> {
        non_blank(self.preferred_doctor.as_deref())
    }

    pub fn display_date(&self) -> Option<&str> {
        non_blank(self.appointment_date.as_deref())
    }

    pub fn display_time(&self) -> Option<&str> {
        non_blank(self.appointment_time.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts RFC 3339 as well as offset-less ISO-8601 timestamps, which the
/// backend emits for values stored as naive UTC.
pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid booking timestamp '{}': {}", raw, e))
}
