//! Domain layer for MindSpace
//!
//! Contains the conversation vocabulary, request/response shapes, audio
//! artifact naming and domain errors. This layer performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
