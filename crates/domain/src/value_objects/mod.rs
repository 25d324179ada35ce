//! Value Objects - Immutable, identity-less domain primitives

mod request_id;

pub use request_id::RequestId;
