//! The wire protocol between the agentic loop and its thin clients.
//!
//! A chat response is transmitted as a single undifferentiated text
//! stream: assistant-visible prose interleaved with four literal marker
//! tokens that delimit tool lifecycle boundaries. There is no framing
//! layer, no JSON envelope and no length prefixes, so the receiving
//! side has to parse the stream incrementally, byte by byte, and a
//! marker may be split across any network chunk boundary.
//!
//! [`encode`] turns [`StreamEvent`]s into the stream; [`Decoder`]
//! reconstructs them on the other end.

#![deny(missing_docs)]

mod decode;
mod encode;
mod event;

pub use decode::{Decoder, coalesce};
pub use encode::{encode, encode_event};
pub use event::*;
