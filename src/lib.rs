//! Tasktrack: asynchronous task submission and status tracking.
//!
//! A client submits an anonymous unit of work and immediately receives an
//! opaque GUID. The work runs in the background while the client polls the
//! GUID for its lifecycle status (`created`, `running`, `finished`).
//!
//! # Architecture
//!
//! Tasktrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, HTTP)
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, persistence contract, runner, and facade
//! - [`http`]: HTTP routes exposing submission and lookup
//! - [`config`]: Layered process configuration
//! - [`telemetry`]: Logging setup

pub mod config;
pub mod http;
pub mod task;
pub mod telemetry;
