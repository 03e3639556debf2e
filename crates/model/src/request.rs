use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::response::ToolCallRequest;

/// A request to be sent to the model provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelRequest {
    /// The input messages.
    pub messages: Vec<ModelMessage>,
    /// Tools that are available to the model.
    pub tools: Vec<ModelTool>,
}

/// A complete message in the conversation history.
///
/// The history is an ordered, append-only sequence of messages; once a
/// message has been appended it is never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ModelMessage {
    /// The system instructions.
    System {
        /// The instruction text.
        content: String,
    },
    /// A user input text.
    User {
        /// The user's text.
        content: String,
    },
    /// An assistant text, optionally carrying tool call requests.
    Assistant {
        /// The assistant's text.
        content: String,
        /// Tool calls the assistant requested with this message.
        /// Providers require the `tool` messages that follow to answer
        /// a preceding assistant message carrying these requests, so
        /// the loop replays them into history verbatim.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCallRequest>,
    },
    /// A tool call result, answering a specific tool call request.
    Tool {
        /// The identifier of the tool call request this answers.
        tool_call_id: String,
        /// The result text fed back to the model.
        content: String,
    },
}

impl ModelMessage {
    /// Creates a system message.
    #[inline]
    pub fn system<S: Into<String>>(content: S) -> Self {
        ModelMessage::System {
            content: content.into(),
        }
    }

    /// Creates a user message.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        ModelMessage::User {
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        ModelMessage::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Creates an assistant message that carries tool call requests.
    #[inline]
    pub fn assistant_tool_calls<S: Into<String>>(
        content: S,
        tool_calls: Vec<ToolCallRequest>,
    ) -> Self {
        ModelMessage::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    /// Creates a tool result message for the given tool call request.
    #[inline]
    pub fn tool<I: Into<String>, S: Into<String>>(
        tool_call_id: I,
        content: S,
    ) -> Self {
        ModelMessage::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }
}

/// Describes a tool that can be used by the model.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelTool {
    /// Name of the tool.
    pub name: String,
    /// Description of the tool.
    pub description: String,
    /// Parameters definition of the tool.
    ///
    /// For most model providers, the parameters should typically be
    /// defined by a [JSON schema](https://json-schema.org/).
    pub parameters: Value,
}
