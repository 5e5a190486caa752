//! AreaCheck Response Envelopes
//!
//! Every reply is wrapped in the same envelope: a JSON object whose first key
//! is `ok`. Successful replies carry their payload next to `ok: true`, failed
//! ones carry a single `error` message next to `ok: false`.
//!
//! # Shapes
//!
//! - check: `{"ok":true,"item":{...},"history":[...]}`
//! - clear: `{"ok":true,"cleared":true,"history":[]}`
//! - failure: `{"ok":false,"error":"..."}`
//!
//! The builders here produce [`JsonValue`] trees for the server side.
//! [`Reply`] is the typed view used by clients to read any of the three shapes.

use serde::{Deserialize, Serialize};

use super::json::{JsonMap, JsonValue};
use super::record::EvaluationRecord;

/// Envelope for a successful check: the new record plus the full history.
pub fn check_envelope(item: &EvaluationRecord, history: &[EvaluationRecord]) -> JsonValue {
    JsonMap::new()
        .with("ok", true)
        .with("item", item)
        .with("history", history_json(history))
        .into()
}

/// Envelope for a successful clear.
pub fn cleared_envelope() -> JsonValue {
    JsonMap::new()
        .with("ok", true)
        .with("cleared", true)
        .with("history", JsonValue::Sequence(Vec::new()))
        .into()
}

/// Envelope for any failure.
pub fn error_envelope(message: impl Into<String>) -> JsonValue {
    JsonMap::new()
        .with("ok", false)
        .with("error", message.into())
        .into()
}

fn history_json(history: &[EvaluationRecord]) -> JsonValue {
    JsonValue::Sequence(history.iter().map(JsonValue::from).collect())
}

/// Typed client-side view of any reply envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<EvaluationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleared: Option<bool>,
    #[serde(default)]
    pub history: Vec<EvaluationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Reply {
    /// Converts a failed reply into its error message.
    pub fn into_result(self) -> Result<Self, String> {
        if self.ok {
            Ok(self)
        } else {
            Err(self.error.unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}
