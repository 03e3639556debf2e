use std::future::ready;

use pitwall_core::tool::{Error as ToolError, Tool, ToolResult};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::macros::format_description;

#[derive(Deserialize, JsonSchema)]
pub struct CurrentDateParameters {}

/// A tool that reports the current UTC date and time.
///
/// The model's own sense of "today" is frozen at training time, so any
/// question involving "this weekend" or "the next race" needs this.
pub struct CurrentDateTool {
    parameter_schema: Value,
}

impl CurrentDateTool {
    /// Creates a new current-date tool.
    #[inline]
    pub fn new() -> Self {
        CurrentDateTool {
            parameter_schema: schema_for!(CurrentDateParameters).to_value(),
        }
    }
}

impl Default for CurrentDateTool {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for CurrentDateTool {
    type Input = CurrentDateParameters;

    fn name(&self) -> &str {
        "current_date"
    }

    fn description(&self) -> &str {
        "Returns the current date and time in UTC. \
         Use this before reasoning about upcoming or recent events."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        _input: CurrentDateParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let format =
            format_description!("[year]-[month]-[day] [hour]:[minute] UTC");
        let result = OffsetDateTime::now_utc()
            .format(format)
            .map(|now| format!("Current date and time: {now}"))
            .map_err(|err| {
                ToolError::execution_error().with_reason(err.to_string())
            });
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_a_date() {
        let tool = CurrentDateTool::new();
        let result = tool.execute(CurrentDateParameters {}).await.unwrap();
        assert!(result.starts_with("Current date and time: 2"));
        assert!(result.ends_with("UTC"));
    }
}
