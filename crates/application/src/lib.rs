//! Application layer - Use cases and orchestration
//!
//! Contains the request pipeline, the gateway services wrapping each
//! provider port, and the port definitions infrastructure implements.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, PipelineError, PipelineStage};
pub use ports::*;
pub use services::*;
