//! CLI commands
//!
//! Command implementations for the `postgate` binary.

mod auth;
mod progress;
mod share;
mod style;

pub use auth::run_auth;
pub use share::{ShareArgs, run_share};
