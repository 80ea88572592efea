//! Host side of the VMIL system.
//!
//! This crate:
//! - resolves program names to byte streams through an explicit [`Environment`],
//! - reads the shell [`Config`] (JSON, optional),
//! - launches programs into a [`kernel::Runtime`] and drives it to completion.
//!
//! The VM, loader and runtime never see the environment; they only receive
//! streams and memory.

pub mod config;
pub mod environment;
pub mod shell;

pub use config::{Config, ConfigError};
pub use environment::Environment;
pub use shell::{DriveReport, LaunchError, LaunchSummary, Shell, StopReason};
