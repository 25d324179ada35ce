//! HTTP middleware components
//!
//! Request correlation and request-body extraction.

pub mod request_id;
pub mod validation;

pub use request_id::{REQUEST_ID_HEADER, RequestIdLayer, RequestIdService};
pub use validation::ChatJson;
