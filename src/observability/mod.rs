//! Observability subsystem.
//!
//! Structured logging via `tracing`. Requests carry a UUID correlation ID
//! (see the request-id layers in the HTTP server) that appears in every
//! log line touching the request.

pub mod logging;

pub use logging::init_logging;
