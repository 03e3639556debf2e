//! An abstraction layer for the model capability.
//!
//! This crate establishes the protocol between the agentic loop and
//! whatever language model backs it, so the loop can seamlessly switch
//! between providers (or a scripted fake in tests) without modifying
//! the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
