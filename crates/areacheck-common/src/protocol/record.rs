//! Evaluation records
//!
//! An [`EvaluationRecord`] is one answered hit-test query. Records are created
//! by the server, stored in the history ledger and sent back to clients both as
//! the `item` of a check reply and as elements of its `history`.

use serde::{Deserialize, Serialize};

use super::json::{JsonMap, JsonValue};

/// One logged hit-test query.
///
/// Field names on the wire are camelCase, and the timestamp travels as `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRecord {
    /// Wall-clock time of the evaluation, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "time")]
    pub timestamp: String,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    /// True iff at least one region contains the point
    pub hit: bool,
    /// Milliseconds spent evaluating the regions
    pub duration_ms: u64,
    pub debug_rect: bool,
    pub debug_tri: bool,
    pub debug_circ: bool,
}

impl EvaluationRecord {
    /// Renders the record in wire order.
    pub fn to_json(&self) -> JsonValue {
        JsonMap::new()
            .with("time", self.timestamp.as_str())
            .with("x", self.x)
            .with("y", self.y)
            .with("r", self.r)
            .with("hit", self.hit)
            .with("durationMs", self.duration_ms)
            .with("debugRect", self.debug_rect)
            .with("debugTri", self.debug_tri)
            .with("debugCirc", self.debug_circ)
            .into()
    }
}

impl From<&EvaluationRecord> for JsonValue {
    fn from(record: &EvaluationRecord) -> Self {
        record.to_json()
    }
}
