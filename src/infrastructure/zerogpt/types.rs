//! Wire types for the ZeroGPT `detectText` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `/api/v1/detectText`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectTextRequest {
    /// Text to score
    pub input_text: String,
}

/// Scores extracted from a detection response
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionScores {
    /// Human-likeness as reported by the service
    pub human_percentage: f64,
    /// Machine-likeness as reported by the service
    pub fake_percentage: f64,
}

impl DetectionScores {
    /// Read scores from a response body.
    ///
    /// The RapidAPI shape is `{"success": true, "data": {"is_human_written",
    /// "is_gpt_generated"}}`; one of the two may be missing and then counts
    /// as 0. Otherwise a top-level `fakePercentage` is used with the human
    /// score derived from it. Returns `None` when the body carries neither,
    /// e.g. `{"success": false, "message": "Quota exceeded"}`.
    pub fn from_body(body: &Value) -> Option<Self> {
        let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);

        if let Some(data) = body.get("data").filter(|_| success) {
            let human = number_field(data, "is_human_written");
            let fake = number_field(data, "is_gpt_generated");
            if human.is_some() || fake.is_some() {
                return Some(Self {
                    human_percentage: human.unwrap_or(0.0),
                    fake_percentage: fake.unwrap_or(0.0),
                });
            }
        }

        number_field(body, "fakePercentage").map(|fake| Self {
            human_percentage: 100.0 - fake,
            fake_percentage: fake,
        })
    }
}

/// Service message of an unusable response, if it sent one
pub fn response_message(body: &Value) -> Option<&str> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
}

/// Numeric field that may also arrive as a numeric string
fn number_field(object: &Value, key: &str) -> Option<f64> {
    match object.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
