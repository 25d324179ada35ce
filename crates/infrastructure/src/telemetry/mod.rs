//! Logging initialisation
//!
//! Installs a `tracing` subscriber with an `EnvFilter` and either a text or
//! JSON formatter.

mod logging;

pub use logging::{DEFAULT_LOG_FILTER, LoggingConfig, TelemetryError, init_logging};
