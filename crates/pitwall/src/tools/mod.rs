//! A set of built-in tools that models can use.

mod clock;
mod fetch;

pub use clock::CurrentDateTool;
pub use fetch::FetchUrlTool;
