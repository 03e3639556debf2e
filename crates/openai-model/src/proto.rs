use pitwall_model::{
    ModelMessage, ModelRequest, ModelResponse, ToolCallRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::OpenAIConfig;

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<RequestToolCall>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RequestFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RequestToolCall {
    id: String,
    r#type: &'static str,
    function: RequestFunctionCall,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
struct FunctionTool {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
struct Tool {
    r#type: &'static str,
    function: FunctionTool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

pub fn create_request(
    req: &ModelRequest,
    config: &OpenAIConfig,
) -> ChatRequest {
    let messages = req
        .messages
        .iter()
        .map(|msg| match msg {
            ModelMessage::System { content } => Message::System {
                content: content.clone(),
            },
            ModelMessage::User { content } => Message::User {
                content: content.clone(),
            },
            ModelMessage::Assistant {
                content,
                tool_calls,
            } => Message::Assistant {
                content: content.clone(),
                tool_calls: tool_calls
                    .iter()
                    .map(|call| RequestToolCall {
                        id: call.id.clone(),
                        r#type: "function",
                        function: RequestFunctionCall {
                            name: call.name.clone(),
                            // The API transports arguments as a
                            // JSON-encoded string.
                            arguments: call.arguments.to_string(),
                        },
                    })
                    .collect(),
            },
            ModelMessage::Tool {
                tool_call_id,
                content,
            } => Message::Tool {
                tool_call_id: tool_call_id.clone(),
                content: content.clone(),
            },
        })
        .collect();
    let tools = req
        .tools
        .iter()
        .map(|tool| Tool {
            r#type: "function",
            function: FunctionTool {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        })
        .collect();
    ChatRequest {
        model: config.model.clone(),
        messages,
        tools,
    }
}

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub function: FunctionCall,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
}

pub fn into_model_response(completion: ChatCompletion) -> ModelResponse {
    let Some(choice) = completion.choices.into_iter().next() else {
        return ModelResponse::default();
    };

    let tool_calls: Vec<ToolCallRequest> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| {
            // The API transports arguments as a JSON-encoded string.
            let arguments = serde_json::from_str(&call.function.arguments)
                .unwrap_or_else(|err| {
                    warn!(
                        "unparsable tool arguments for {}: {err}",
                        call.function.name
                    );
                    Value::Null
                });
            ToolCallRequest {
                id: call.id,
                name: call.function.name,
                arguments,
            }
        })
        .collect();

    let text = if tool_calls.is_empty() {
        choice.message.content
    } else {
        None
    };
    ModelResponse { text, tool_calls }
}

#[cfg(test)]
mod tests {
    use pitwall_model::ModelTool;
    use serde_json::json;

    use super::*;
    use crate::OpenAIConfigBuilder;

    #[test]
    fn test_create_request() {
        let config = OpenAIConfigBuilder::with_api_key("sk-test")
            .with_model("test-model")
            .build();
        let req = ModelRequest {
            messages: vec![
                ModelMessage::system("be helpful"),
                ModelMessage::user("who won?"),
                ModelMessage::tool("call:1", "Driver X won"),
            ],
            tools: vec![ModelTool {
                name: "lookup".to_owned(),
                description: "Looks things up".to_owned(),
                parameters: json!({ "type": "object" }),
            }],
        };

        let encoded =
            serde_json::to_value(create_request(&req, &config)).unwrap();
        assert_eq!(encoded["model"], "test-model");
        assert_eq!(encoded["messages"][0]["role"], "system");
        assert_eq!(encoded["messages"][2]["tool_call_id"], "call:1");
        assert_eq!(encoded["tools"][0]["type"], "function");
        assert_eq!(encoded["tools"][0]["function"]["name"], "lookup");
    }

    #[test]
    fn test_create_request_replays_tool_call_intent() {
        let config = OpenAIConfigBuilder::with_api_key("sk-test").build();
        let req = ModelRequest {
            messages: vec![
                ModelMessage::user("who won?"),
                ModelMessage::assistant_tool_calls(
                    "",
                    vec![ToolCallRequest {
                        id: "call:1".to_owned(),
                        name: "lookup".to_owned(),
                        arguments: json!({ "year": 2025 }),
                    }],
                ),
                ModelMessage::tool("call:1", "Driver X won"),
                ModelMessage::assistant("Driver X won the race."),
            ],
            tools: vec![],
        };

        let encoded =
            serde_json::to_value(create_request(&req, &config)).unwrap();
        let intent = &encoded["messages"][1];
        assert_eq!(intent["role"], "assistant");
        assert_eq!(intent["tool_calls"][0]["id"], "call:1");
        assert_eq!(intent["tool_calls"][0]["type"], "function");
        assert_eq!(intent["tool_calls"][0]["function"]["name"], "lookup");
        assert_eq!(
            intent["tool_calls"][0]["function"]["arguments"],
            "{\"year\":2025}"
        );
        assert_eq!(encoded["messages"][2]["tool_call_id"], "call:1");
        // A plain assistant answer must not grow an empty array.
        assert!(encoded["messages"][3].get("tool_calls").is_none());
    }

    #[test]
    fn test_parse_text_completion() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{
                "message": { "content": "Driver X won the race." }
            }]
        }))
        .unwrap();
        let resp = into_model_response(completion);
        assert_eq!(resp.text.as_deref(), Some("Driver X won the race."));
        assert!(!resp.wants_tools());
    }

    #[test]
    fn test_parse_tool_call_completion() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [{
                        "id": "call:1",
                        "type": "function",
                        "function": {
                            "name": "lookup",
                            "arguments": "{\"year\": 2025}"
                        }
                    }]
                }
            }]
        }))
        .unwrap();
        let resp = into_model_response(completion);
        assert!(resp.text.is_none());
        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].name, "lookup");
        assert_eq!(resp.tool_calls[0].arguments, json!({ "year": 2025 }));
    }

    #[test]
    fn test_unparsable_arguments_degrade_to_null() {
        let completion: ChatCompletion = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "tool_calls": [{
                        "id": "call:1",
                        "function": {
                            "name": "lookup",
                            "arguments": "{not json"
                        }
                    }]
                }
            }]
        }))
        .unwrap();
        let resp = into_model_response(completion);
        assert_eq!(resp.tool_calls[0].arguments, Value::Null);
    }
}
