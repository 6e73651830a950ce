//! Ports layer for the ante pipeline.
//!
//! - Inbound (Driving) port: `AnteHandlerApi`, what the host calls
//! - Outbound (Driven) ports: keepers the decorators depend on

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
