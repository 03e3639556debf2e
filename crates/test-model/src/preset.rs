use pitwall_model::ToolCallRequest;
use serde::{Deserialize, Serialize};

/// The preset response for one scripted model call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresetResponse {
    /// The final answer text, if this step produces one.
    pub text: Option<String>,
    /// Tool calls requested by this step, in order.
    pub tool_calls: Vec<ToolCallRequest>,
    /// If set, this step fails instead of responding.
    pub fail: bool,
}

impl PresetResponse {
    /// Creates a step that answers with final text.
    #[inline]
    pub fn with_text<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Creates a step that requests the given tool calls.
    #[inline]
    pub fn with_tool_calls(
        tool_calls: impl Into<Vec<ToolCallRequest>>,
    ) -> Self {
        Self {
            tool_calls: tool_calls.into(),
            ..Default::default()
        }
    }

    /// Creates a step that fails with a provider error.
    #[inline]
    pub fn failure() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_serialize_deserialize() {
        let response = PresetResponse::with_tool_calls([ToolCallRequest {
            id: "1".to_string(),
            name: "get_race_results".to_string(),
            arguments: json!({ "year": 2025, "event": "Monza" }),
        }]);

        let serialized = serde_json::to_string(&response).unwrap();
        let deserialized: PresetResponse =
            serde_json::from_str(&serialized).unwrap();

        assert_eq!(response, deserialized);
    }
}
