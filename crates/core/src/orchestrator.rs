
use std::sync::Arc;

use pitwall_model::{
    ModelMessage, ModelProvider, ModelProviderError, ModelRequest,
};
use pitwall_wire::StreamEvent;
use tokio::select;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::LoopConfig;
use crate::model_client::ModelClient;
use crate::tool::{Executor as ToolExecutor, Registry, ToolOutcome};

/// The notice streamed when the loop hits its turn bound without the
/// model producing a final answer.
pub const TURN_LIMIT_NOTICE: &str = "**System Notice:** Reached the maximum \
     number of reasoning steps. Please try a more specific question.";

/// How a loop run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopOutcome {
    /// The model produced a final text answer.
    Done,
    /// The turn bound was reached; the fallback notice was streamed.
    /// From the transport's point of view this is still a successful
    /// stream completion.
    Aborted,
    /// The client went away; the loop stopped issuing calls.
    Cancelled,
}

/// Internal loop stage, for tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    AwaitingModel,
    ExecutingTools,
}

/// The agentic loop: drives at most [`LoopConfig::max_turns`] rounds of
/// model interaction, executing any tools the model requests in between
/// and pushing every produced [`StreamEvent`] to the caller's channel.
///
/// One orchestrator value can serve many requests; each [`run`] call is
/// an independent loop instance sharing only the read-only registry.
///
/// [`run`]: Orchestrator::run
pub struct Orchestrator {
    model_client: ModelClient,
    tool_executor: ToolExecutor,
    config: LoopConfig,
}

impl Orchestrator {
    /// Creates an orchestrator from a model provider and a shared tool
    /// registry.
    pub fn new<P: ModelProvider + 'static>(
        provider: P,
        registry: Arc<Registry>,
        config: LoopConfig,
    ) -> Self {
        let tool_executor = ToolExecutor::new(registry, config.tool_timeout);
        Self {
            model_client: ModelClient::new(provider),
            tool_executor,
            config,
        }
    }

    /// Runs one request to completion.
    ///
    /// `history` is the prior conversation plus the new user message.
    /// Events are pushed to `events` in strict temporal order; nothing
    /// more is sent after the returned future resolves.
    ///
    /// Tool-level failures (unknown tool, invalid arguments, execution
    /// errors, timeouts) never abort the loop; they are fed back to the
    /// model as ordinary tool-result text. Only a failure of the model
    /// capability itself errors the whole request, and it is surfaced
    /// before any further events are emitted for that turn.
    ///
    /// Cancellation is cooperative: `cancel` is checked at every
    /// suspension point, and a closed `events` channel is treated the
    /// same as a cancelled token.
    pub async fn run(
        &self,
        mut history: Vec<ModelMessage>,
        events: mpsc::UnboundedSender<StreamEvent>,
        cancel: CancellationToken,
    ) -> Result<LoopOutcome, Box<dyn ModelProviderError>> {
        let tools = self.tool_executor.definitions();
        let mut turn_count = 0u32;
        let mut stage = Stage::AwaitingModel;

        loop {
            trace!(?stage, turn_count, "asking the model");
            let request = ModelRequest {
                messages: history.clone(),
                tools: tools.clone(),
            };
            let response = select! {
                _ = cancel.cancelled() => {
                    debug!("cancelled while awaiting the model");
                    return Ok(LoopOutcome::Cancelled);
                }
                resp = self.model_client.invoke(request) => resp?,
            };

            if !response.wants_tools() {
                // The model settled on a final answer (or nothing at
                // all, which we treat as an empty answer).
                let text = response.text.unwrap_or_default();
                if !text.is_empty()
                    && events.send(StreamEvent::TextChunk(text)).is_err()
                {
                    return Ok(LoopOutcome::Cancelled);
                }
                debug!(turn_count, "loop done");
                return Ok(LoopOutcome::Done);
            }

            stage = Stage::ExecutingTools;
            debug!(
                ?stage,
                requested = response.tool_calls.len(),
                turn_count,
                "model requested tools"
            );

            // The assistant's tool-call intent goes into history ahead
            // of the results; providers reject a `tool` message that
            // does not answer a preceding assistant message carrying
            // the matching requests.
            history.push(ModelMessage::assistant_tool_calls(
                response.text.clone().unwrap_or_default(),
                response.tool_calls.clone(),
            ));

            // Tools run sequentially in request order, which keeps the
            // history the next model call sees deterministic.
            for (index, req) in response.tool_calls.iter().enumerate() {
                if events
                    .send(StreamEvent::ToolStarted(req.name.clone()))
                    .is_err()
                {
                    return Ok(LoopOutcome::Cancelled);
                }

                let outcome = if index >= self.config.max_tools_per_turn {
                    warn!(
                        index,
                        cap = self.config.max_tools_per_turn,
                        "per-turn tool cap exceeded"
                    );
                    ToolOutcome::Failed("too many tool calls".to_owned())
                } else {
                    select! {
                        _ = cancel.cancelled() => {
                            debug!("cancelled while executing a tool");
                            return Ok(LoopOutcome::Cancelled);
                        }
                        outcome = self.tool_executor.execute(req) => outcome,
                    }
                };

                if events
                    .send(StreamEvent::ToolFinished(req.name.clone()))
                    .is_err()
                {
                    return Ok(LoopOutcome::Cancelled);
                }

                let feedback =
                    self.tool_executor.model_feedback(&req.name, &outcome);
                history.push(ModelMessage::tool(req.id.clone(), feedback));
            }

            turn_count += 1;
            if turn_count >= self.config.max_turns {
                warn!(turn_count, "turn bound reached without a final answer");
                if events
                    .send(StreamEvent::TextChunk(TURN_LIMIT_NOTICE.to_owned()))
                    .is_err()
                {
                    return Ok(LoopOutcome::Cancelled);
                }
                return Ok(LoopOutcome::Aborted);
            }
            stage = Stage::AwaitingModel;
        }
    }
}
