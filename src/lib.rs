//! Multi-tenant edge gateway for the FlawIS platform.
//!
//! Every incoming request runs through a three-stage resolution pipeline:
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                   GATEWAY                    │
//!                     │                                              │
//!   Client Request    │  ┌────────┐   ┌────────┐   ┌──────────────┐ │
//!   ──────────────────┼─▶│ locale │──▶│ tenant │──▶│  auth gate   │ │
//!                     │  └───┬────┘   └───┬────┘   └──────┬───────┘ │
//!                     │      │ redirect   │ rewrite       │ redirect│
//!                     │      ▼            ▼               ▼         │
//!                     │  307 to client    /{lng}/{section}/...      │
//!                     │                        │                    │
//!                     │                        ▼                    │
//!   Client Response   │               ┌──────────────┐              │
//!   ◀─────────────────┼───────────────│  forwarder   │◀─────────────┼── App
//!                     │   (streamed)  └──────────────┘              │   Upstream
//!                     │                                              │
//!                     │  /search ───▶ streaming passthrough ────────┼── Search
//!                     │                                              │   Service
//!                     └──────────────────────────────────────────────┘
//! ```
//!
//! Cross-cutting concerns: config (TOML, hot reload), observability
//! (tracing, request IDs), lifecycle (graceful shutdown).

// Core subsystems
pub mod config;
pub mod http;
pub mod i18n;
pub mod pipeline;
pub mod search;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
