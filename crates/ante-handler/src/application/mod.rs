//! # Application Layer
//!
//! Chain assembly and the [`crate::ports::AnteHandlerApi`] implementation.

pub mod handler;

pub use handler::{full_decorators, minimal_decorators, AnteHandler, HandlerOptions};
