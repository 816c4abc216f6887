//! Task lifecycle tracking.
//!
//! A client submits an anonymous unit of work, receives a GUID immediately,
//! and later polls that GUID for the task's status. Each task moves through
//! `created -> running -> finished`, driven by a detached run. The module
//! follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
