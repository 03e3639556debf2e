//! A local fake model for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pitwall_model::{
    ErrorKind, ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tokio::time::sleep;

pub use preset::*;

/// The error type returned by [`TestModelProvider`].
#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Error {
    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the conversation script,
/// which is how the model should respond to each call. Steps are
/// consumed in order, one per model call. If the script runs out of
/// steps, an error is returned, unless [`set_repeat_last`] is enabled,
/// in which case the final step repeats forever (useful for exercising
/// the turn bound).
///
/// The provider records every request it receives so tests can inspect
/// the exact history the loop sent back to the model.
///
/// [`set_repeat_last`]: TestModelProvider::set_repeat_last
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Vec<PresetResponse>,
    repeat_last: bool,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
}

impl TestModelProvider {
    /// Appends a scripted response step.
    #[inline]
    pub fn add_response_step(&mut self, preset: PresetResponse) {
        self.script.push(preset);
    }

    /// Repeats the last scripted step forever once the script runs out.
    #[inline]
    pub fn set_repeat_last(&mut self, repeat: bool) {
        self.repeat_last = repeat;
    }

    /// Adds an artificial latency before each response.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns the number of model calls made so far.
    #[inline]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns a copy of every request received so far, in call order.
    pub fn recorded_requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = Error;

    fn invoke(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<ModelResponse, Self::Error>> + Send + 'static
    {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(req.clone());

        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        let step = if idx < self.script.len() {
            Some(self.script[idx].clone())
        } else if self.repeat_last {
            self.script.last().cloned()
        } else {
            None
        };
        let delay = self.delay.unwrap_or(Duration::from_millis(1));

        async move {
            sleep(delay).await;

            let Some(step) = step else {
                return Err(Error {
                    message: "no enough steps",
                    kind: ErrorKind::RateLimitExceeded,
                });
            };
            if step.fail {
                return Err(Error {
                    message: "scripted failure",
                    kind: ErrorKind::Other,
                });
            }
            Ok(ModelResponse {
                text: step.text,
                tool_calls: step.tool_calls,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pitwall_model::ModelMessage;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_scripted_steps_in_order() {
        let mut provider = TestModelProvider::default();
        provider.add_response_step(PresetResponse::with_tool_calls([
            pitwall_model::ToolCallRequest {
                id: "tool:1".to_owned(),
                name: "lookup".to_owned(),
                arguments: json!({}),
            },
        ]));
        provider.add_response_step(PresetResponse::with_text("All done."));

        let req = ModelRequest {
            messages: vec![ModelMessage::user("who won?")],
            tools: vec![],
        };

        let resp = provider.invoke(&req).await.unwrap();
        assert!(resp.wants_tools());
        assert_eq!(resp.tool_calls[0].name, "lookup");

        let resp = provider.invoke(&req).await.unwrap();
        assert_eq!(resp.text.as_deref(), Some("All done."));

        // Script exhausted.
        let err = provider.invoke(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);

        assert_eq!(provider.call_count(), 3);
        assert_eq!(provider.recorded_requests().len(), 3);
    }

    #[tokio::test]
    async fn test_repeat_last_step() {
        let mut provider = TestModelProvider::default();
        provider.add_response_step(PresetResponse::with_text("again"));
        provider.set_repeat_last(true);

        let req = ModelRequest {
            messages: vec![ModelMessage::user("hi")],
            tools: vec![],
        };
        for _ in 0..10 {
            let resp = provider.invoke(&req).await.unwrap();
            assert_eq!(resp.text.as_deref(), Some("again"));
        }
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let mut provider = TestModelProvider::default();
        provider.add_response_step(PresetResponse::failure());

        let req = ModelRequest {
            messages: vec![ModelMessage::user("hi")],
            tools: vec![],
        };
        let err = provider.invoke(&req).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
    }
}
