//! MindSpace HTTP presentation layer
//!
//! This crate provides the HTTP API and client UI for MindSpace.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use error::{ApiError, ErrorResponse, set_expose_internal_errors};
pub use middleware::{ChatJson, REQUEST_ID_HEADER, RequestIdLayer};
pub use routes::create_router;
pub use shutdown::{drain_within, wait_for_signal};
pub use state::AppState;
