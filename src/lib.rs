//! Two-player chess rules engine.
//!
//! - [`engine`]: board, per-piece move generation, and the [`engine::Match`]
//!   orchestrator (validation, execute/undo, check and checkmate).
//! - [`console`]: text rendering and coordinate input for terminal front-ends.
//! - [`config`]: front-end settings read from the environment.

pub mod config;
pub mod console;
pub mod engine;
