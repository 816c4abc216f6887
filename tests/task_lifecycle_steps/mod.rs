//! Step definitions for task lifecycle BDD scenarios.

mod given;
mod then;
mod when;
pub mod world;
