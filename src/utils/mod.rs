//! Shared utilities

pub mod error;
pub mod span;

pub use error::{Error, Result, Stage};
pub use span::Span;
