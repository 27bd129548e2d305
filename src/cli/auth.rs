//! Auth command - test and manage the session

use crate::cli::style::{Stylize, check};
use anstream::println;
use postgate::auth::{get_session, session_file_path, test_session};
use postgate::config::ServiceConfig;
use postgate::error::Result;

/// Run the auth test command
pub async fn run_auth_test(config: &ServiceConfig) -> Result<()> {
    println!("Testing session against {}...", config.base_url.accent());
    let session = get_session(None)?;
    let name = test_session(config, &session).await?;
    println!("{} Authenticated as: {}", check(), name.emphasis());
    println!("User id: {}", session.author_id);
    println!("Session source: {:?}", session.source);
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup() {
    println!("postgate Session Setup");
    println!("======================");
    println!();
    println!("Option 1: Environment variables");
    println!("  Set POSTGATE_TOKEN to your bearer token");
    println!("  Set POSTGATE_USER_ID to your user id");
    println!();
    println!("Option 2: Session file");
    match session_file_path() {
        Some(path) => println!("  Write {}", path.display().accent()),
        None => println!("  Write postgate/session.json in your config directory"),
    }
    println!("  {}", r#"{"user_id": 42, "token": "<token>"}"#.muted());
    println!();
    println!("Backend:");
    println!("  Set POSTGATE_URL or pass --url (default http://localhost:8080)");
}

/// Wrapper for auth commands
pub async fn run_auth(config: &ServiceConfig, action: &str) -> Result<()> {
    match action {
        "test" => run_auth_test(config).await,
        "setup" => {
            run_auth_setup();
            Ok(())
        }
        _ => {
            println!("Unknown action: {action}. Use 'test' or 'setup'.");
            Ok(())
        }
    }
}
