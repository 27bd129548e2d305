//! Session authentication
//!
//! Supports environment variables and a stored session file.

mod session;

pub use session::{Session, get_session, session_file_path, test_session};

/// Source of the session credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token and user id from environment variables
    EnvVar,
    /// Token and user id from the session file
    SessionFile,
}
