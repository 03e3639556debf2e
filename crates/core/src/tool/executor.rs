use std::sync::Arc;
use std::time::Duration;

use pitwall_model::{ModelTool, ToolCallRequest};
use tracing::Instrument;

use crate::tool::{ErrorKind, Registry};

/// The outcome of one tool invocation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ToolOutcome {
    /// The tool completed and produced the contained text.
    Success(String),
    /// The tool could not run or failed; the contained text is safe to
    /// surface to the model and the user.
    Failed(String),
    /// The tool exceeded its execution deadline.
    TimedOut,
}

/// An executor that handles tool call requests from the model, with a
/// bounded per-call timeout and a uniform error shape.
///
/// Failures never escape as errors: whatever the tool does internally,
/// the caller gets a [`ToolOutcome`] it can feed back into the
/// conversation.
pub struct Executor {
    registry: Arc<Registry>,
    timeout: Duration,
}

impl Executor {
    /// Creates an executor over the given registry.
    #[inline]
    pub fn new(registry: Arc<Registry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Returns the definitions of every registered tool.
    #[inline]
    pub fn definitions(&self) -> Vec<ModelTool> {
        self.registry.definitions()
    }

    /// Invokes one tool by name.
    ///
    /// An unknown name or invalid arguments fail without invoking
    /// anything. On timeout the underlying future is dropped, so a late
    /// result can never leak into the conversation after the turn has
    /// moved on.
    pub async fn execute(&self, req: &ToolCallRequest) -> ToolOutcome {
        let span = debug_span!("tool execute", tool = %req.name, id = %req.id);
        async {
            let Some(tool) = self.registry.get(&req.name) else {
                warn!("tool not found: {}", req.name);
                return ToolOutcome::Failed(ErrorKind::NotFound.to_string());
            };

            trace!("invoking with args: {:?}", req.arguments);
            let fut = tool.execute(req.arguments.clone());
            match tokio::time::timeout(self.timeout, fut).await {
                Ok(Ok(text)) => ToolOutcome::Success(text),
                Ok(Err(err)) => {
                    warn!("tool failed: {}", err.reason());
                    ToolOutcome::Failed(err.user_message())
                }
                Err(_) => {
                    warn!("tool timed out after {:?}", self.timeout);
                    ToolOutcome::TimedOut
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Renders an outcome as the tool-result text fed back to the
    /// model.
    pub fn model_feedback(
        &self,
        tool_name: &str,
        outcome: &ToolOutcome,
    ) -> String {
        match outcome {
            ToolOutcome::Success(text) => text.clone(),
            ToolOutcome::Failed(reason) => {
                format!("Error executing tool '{tool_name}': {reason}")
            }
            ToolOutcome::TimedOut => format!(
                "Tool '{tool_name}' timed out after {} seconds. \
                 The data source may be slow, try again.",
                self.timeout.as_secs()
            ),
        }
    }
}
