//! Disguise-identity resolution and application engine.
//!
//! Given a user-supplied name or identifier, `veil` determines a
//! presentable display name and an optional visual skin, then applies both
//! to a live entity through a [`provider::DisguiseProvider`], retrying on
//! recoverable name collisions and degrading gracefully when upstream
//! lookup services are unavailable.
//!
//! The moving parts:
//!
//! - [`name`] — input sanitization and retry-candidate generation
//! - [`resolver`] — ordered multi-service fallback skin resolution
//! - [`service`] — cleanup, collision retries, two-phase orchestration
//! - [`sched`] — primary/worker execution contexts
//!
//! Providers, the entity directory, and the message sink are traits;
//! hosts embedding the engine supply their own implementations and the
//! CLI runs against the bundled in-process ones.

pub mod app;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod messenger;
pub mod name;
pub mod provider;
pub mod resolver;
pub mod sched;
pub mod service;

pub use error::{Result, VeilError};
