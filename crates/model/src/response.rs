use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Describes a tool call request from the model.
///
/// Requests are only ever produced by the model capability's response,
/// never supplied by a client.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// The unique identifier for the tool call request.
    pub id: String,
    /// The name of the tool to call.
    pub name: String,
    /// The arguments to pass to the tool.
    pub arguments: Value,
}

/// A complete response from the model provider.
///
/// By this design's assumption exactly one of `text` or a non-empty
/// `tool_calls` list is populated per call. A response carrying neither
/// is treated as if `text` were empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModelResponse {
    /// The final answer text, if the model produced one.
    pub text: Option<String>,
    /// Tool calls requested by the model, in request order.
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ModelResponse {
    /// Returns `true` if this response requests at least one tool call.
    #[inline]
    pub fn wants_tools(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
