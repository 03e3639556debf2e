//! The HTTP surface: a single `POST /chat` endpoint that streams the
//! marker-based wire protocol as a plain text body.

use std::convert::Infallible;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use bytes::Bytes;
use pitwall_core::Orchestrator;
use pitwall_model::ModelMessage;
use pitwall_wire::encode_event;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;

/// Shared per-process state behind every request.
pub struct AppState {
    /// The agentic loop driver, shared by all requests.
    pub orchestrator: Orchestrator,
    /// The system prompt template, already rendered.
    pub system_prompt: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    role: String,
    content: String,
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// Converts the client's message list into a model history, prepending
/// the system prompt. Messages with roles other than `user` and
/// `assistant` are dropped; clients have no business injecting system
/// or tool messages.
fn build_history(
    system_prompt: &str,
    messages: &[ChatMessage],
) -> Vec<ModelMessage> {
    let mut history = vec![ModelMessage::system(system_prompt)];
    for msg in messages {
        match msg.role.as_str() {
            "user" => history.push(ModelMessage::user(msg.content.clone())),
            "assistant" => {
                history.push(ModelMessage::assistant(msg.content.clone()));
            }
            other => {
                warn!(role = other, "dropping message with unsupported role");
            }
        }
    }
    history
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Response {
    let history = build_history(&state.system_prompt, &payload.messages);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    // The guard travels with the response body; dropping the body (the
    // client went away) cancels the loop at its next suspension point.
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let run = tokio::spawn({
        let state = state.clone();
        async move { state.orchestrator.run(history, events_tx, cancel).await }
    });

    // Hold the response until the first event arrives. A model failure
    // on the opening call thus maps to a clean error status instead of
    // an empty 200 stream the client cannot tell apart from success.
    let Some(first) = events_rx.recv().await else {
        return match run.await {
            Ok(Ok(outcome)) => {
                debug!(?outcome, "loop finished without streaming");
                ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "")
                    .into_response()
            }
            Ok(Err(err)) => {
                error!("model call failed: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    "the model backend failed, please retry",
                )
                    .into_response()
            }
            Err(err) => {
                error!("chat loop task panicked: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
                    .into_response()
            }
        };
    };

    // The loop keeps running while we stream; surface its verdict in
    // the logs since the transport can no longer change status.
    tokio::spawn(async move {
        match run.await {
            Ok(Ok(outcome)) => debug!(?outcome, "chat loop finished"),
            Ok(Err(err)) => error!("model call failed mid-stream: {err}"),
            Err(err) => error!("chat loop task panicked: {err}"),
        }
    });

    let events = tokio_stream::once(first)
        .chain(UnboundedReceiverStream::new(events_rx));
    let body = Body::from_stream(events.map(move |event| {
        let _keep_alive = &guard;
        let mut chunk = String::new();
        encode_event(&event, &mut chunk);
        Ok::<_, Infallible>(Bytes::from(chunk))
    }));

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
        .into_response()
}
