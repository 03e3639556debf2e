//! The pit-wall assistant gateway: wires the OpenAI-compatible model
//! provider, the built-in tools and the agentic loop into an HTTP
//! server.

#[macro_use]
extern crate tracing;

mod server;
mod tools;

use std::env;
use std::sync::Arc;

use pitwall_core::tool::Registry;
use pitwall_core::{LoopConfig, Orchestrator};
use pitwall_openai_model::{OpenAIConfigBuilder, OpenAIProvider};
use time::OffsetDateTime;
use time::macros::format_description;
use tokio::net::TcpListener;

use crate::server::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        eprintln!("OPENAI_API_KEY environment variable is not set");
        return;
    };
    let mut config = OpenAIConfigBuilder::with_api_key(api_key);
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    if let Ok(model) = env::var("OPENAI_MODEL") {
        config = config.with_model(model);
    }
    let provider = OpenAIProvider::new(config.build());

    let mut registry = Registry::new();
    registry.add_tool(tools::CurrentDateTool::new());
    registry.add_tool(tools::FetchUrlTool::new());
    info!(tools = registry.len(), "registry built");

    let state = Arc::new(AppState {
        orchestrator: Orchestrator::new(
            provider,
            Arc::new(registry),
            LoopConfig::from_env(),
        ),
        system_prompt: build_system_prompt(),
    });

    let addr = env::var("PITWALL_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8000".to_owned());
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("failed to bind {addr}: {err}");
            return;
        }
    };
    info!(%addr, "listening");
    if let Err(err) = axum::serve(listener, server::router(state)).await {
        error!("server error: {err}");
    }
}

fn build_system_prompt() -> String {
    let format = format_description!("[year]-[month]-[day]");
    let today = OffsetDateTime::now_utc()
        .format(format)
        .unwrap_or_else(|_| "unknown".to_owned());
    include_str!("./system_prompt.md").replace("{{TODAY}}", &today)
}
