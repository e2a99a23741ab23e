//! CLI tool for exercising a ring map.
//!
//! Provides commands for:
//! - Simulating bulk loads and membership changes
//! - Printing the vnode layout of a ring

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
