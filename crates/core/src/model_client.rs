use std::pin::Pin;
use std::sync::Arc;

use pitwall_model::{
    ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tracing::Instrument;

type InvokeResult = Result<ModelResponse, Box<dyn ModelProviderError>>;
type BoxedInvokeFuture = Pin<Box<dyn Future<Output = InvokeResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ModelRequest) -> BoxedInvokeFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased
/// interface for the other modules.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    /// Wraps the given provider.
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.invoke(&req);
            Box::pin(
                async move {
                    trace!("got a request: {req:?}");
                    match fut.await {
                        Ok(resp) => {
                            trace!("got a response: {resp:?}");
                            Ok(resp)
                        }
                        Err(err) => {
                            error!("got an error: {err:?}");
                            Err(Box::new(err) as Box<dyn ModelProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the complete response.
    ///
    /// # Cancel safety
    ///
    /// This method is cancel safe, provided the wrapped provider's
    /// future is.
    #[inline]
    pub async fn invoke(&self, req: ModelRequest) -> InvokeResult {
        (self.handler_fn)(req).await
    }
}
