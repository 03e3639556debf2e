use pitwall_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;

/// An upper bound on how much page text is fed back to the model.
const MAX_BODY_CHARS: usize = 4000;

#[derive(Deserialize, JsonSchema)]
pub struct FetchUrlParameters {
    #[schemars(description = "The http(s) URL to fetch.")]
    url: String,
}

/// A tool for fetching a web page as plain text.
pub struct FetchUrlTool {
    client: reqwest::Client,
    parameter_schema: Value,
}

impl FetchUrlTool {
    /// Creates a new fetch tool.
    #[inline]
    pub fn new() -> Self {
        FetchUrlTool {
            client: reqwest::Client::new(),
            parameter_schema: schema_for!(FetchUrlParameters).to_value(),
        }
    }
}

impl Default for FetchUrlTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for FetchUrlTool {
    type Input = FetchUrlParameters;

    fn name(&self) -> &str {
        "fetch_url"
    }

    fn description(&self) -> &str {
        "Fetches the given URL and returns its body as text. \
         Long bodies are truncated."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &self,
        input: FetchUrlParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let client = self.client.clone();
        async move {
            if !input.url.starts_with("http://")
                && !input.url.starts_with("https://")
            {
                return Err(ToolError::execution_error()
                    .with_reason("only http(s) URLs are supported"));
            }

            let resp =
                client.get(&input.url).send().await.map_err(|err| {
                    ToolError::execution_error()
                        .with_reason(format!("request failed: {err}"))
                })?;
            let status = resp.status();
            if !status.is_success() {
                return Err(ToolError::execution_error()
                    .with_reason(format!("unexpected status: {status}")));
            }

            let mut body = resp.text().await.map_err(|err| {
                ToolError::execution_error()
                    .with_reason(format!("failed to read body: {err}"))
            })?;
            if let Some((cut, _)) = body.char_indices().nth(MAX_BODY_CHARS) {
                body.truncate(cut);
                body.push_str("\n[truncated]");
            }
            Ok(body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_non_http_urls() {
        let tool = FetchUrlTool::new();
        let result = tool
            .execute(FetchUrlParameters {
                url: "file:///etc/passwd".to_owned(),
            })
            .await;
        assert!(result.is_err());
    }
}
