//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers)
//!     → request.rs (cookies, request ID)
//!     → [pipeline decides redirect or rewrite]
//!     → response.rs (redirects, header hygiene)
//!     → forward to upstream / send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
