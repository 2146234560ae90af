use super::enums::Status;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Current time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A single to-do record as stored under the `todos` key.
///
/// Reading is lenient per field: a `null` or mistyped value falls back to
/// the field's default, so older or hand-edited records still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Display text, trimmed and non-empty when created or edited
    #[serde(default, deserialize_with = "lenient")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Status,
    /// Creation time in epoch milliseconds
    #[serde(default, deserialize_with = "lenient_millis")]
    pub start_time: i64,
    /// Inline markup (b/i/u/a); opaque to the store
    #[serde(default, deserialize_with = "lenient")]
    pub details: String,
    #[serde(default, deserialize_with = "lenient")]
    pub is_editing: bool,
    /// Absent on records from the earliest schema until the first details toggle
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub is_details_open: Option<bool>,
}

impl Todo {
    pub fn new(text: String, start_time: i64) -> Self {
        Self {
            text,
            status: Status::YetToStart,
            start_time,
            details: String::new(),
            is_editing: false,
            is_details_open: Some(false),
        }
    }

    /// Whether the details editor is open (a missing flag reads as closed)
    pub fn details_open(&self) -> bool {
        self.is_details_open.unwrap_or(false)
    }

    /// Milliseconds since the to-do was started, never negative
    pub fn elapsed_millis(&self, now: i64) -> i64 {
        now.saturating_sub(self.start_time).max(0)
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Epoch milliseconds from a number or a numeric string; anything else is 0
fn lenient_millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(millis_from_value(&Value::deserialize(deserializer)?).unwrap_or_default())
}

fn millis_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(float_millis)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_millis))
        }
        _ => None,
    }
}

fn float_millis(f: f64) -> Option<i64> {
    // `as` saturates at the i64 bounds
    f.is_finite().then(|| f.trunc() as i64)
}
