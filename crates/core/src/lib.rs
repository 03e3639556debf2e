//! Core logic including the agentic loop, tool execution and loop
//! configuration.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod config;
mod model_client;
mod orchestrator;
pub mod tool;

pub use config::LoopConfig;
pub use model_client::ModelClient;
pub use orchestrator::{LoopOutcome, Orchestrator, TURN_LIMIT_NOTICE};
