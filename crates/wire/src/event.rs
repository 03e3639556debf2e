use serde::{Deserialize, Serialize};

/// Marker that opens a tool-started event.
pub const TOOL_START_OPEN: &str = "[TOOL_START]";
/// Marker that closes a tool-started event.
pub const TOOL_START_CLOSE: &str = "[/TOOL_START]";
/// Marker that opens a tool-finished event.
pub const TOOL_END_OPEN: &str = "[TOOL_END]";
/// Marker that closes a tool-finished event.
pub const TOOL_END_CLOSE: &str = "[/TOOL_END]";

/// A semantic event carried by the stream.
///
/// Events are produced in strict temporal order: a `ToolFinished` for a
/// given invocation never precedes its matching `ToolStarted`, and the
/// final answer's `TextChunk`s are never interleaved with a tool pair
/// of the same turn.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A fragment of assistant-visible text.
    TextChunk(String),
    /// A tool invocation has started.
    ToolStarted(String),
    /// A tool invocation has finished (successfully or not).
    ToolFinished(String),
}
