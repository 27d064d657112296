//! `sealkit`: the caller-facing side of `sealkit-core`.
//!
//! - [`commands`]: async commands over request/result DTOs
//! - [`preferences`]: JSON preferences
//! - [`logging`]: stderr `tracing` subscriber
//! - [`cli`]: the `sealkit` binary

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod preferences;

pub use error::{CommandError, ErrorKind};
