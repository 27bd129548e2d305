//! postgate - share posts with moderated images
//!
//! CLI binary for publishing a post and its optional image.

use anyhow::Result;
use clap::{Parser, Subcommand};
use postgate::config::ServiceConfig;
use postgate::submit::SubmissionOutcome;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "postgate")]
#[command(about = "Share posts with moderated image uploads")]
#[command(version)]
struct Cli {
    /// Backend URL (defaults to $POSTGATE_URL or http://localhost:8080)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Request timeout in seconds (defaults to $POSTGATE_TIMEOUT_SECS or 30)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Share a post, optionally with an image
    Share {
        /// Post text
        #[arg(short, long, default_value = "")]
        description: String,

        /// Image to attach
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// MIME type of the image (guessed from the extension by default)
        #[arg(long)]
        mime: Option<String>,

        /// Refuse to share without an image
        #[arg(long)]
        require_image: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Session management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test the current session
    Test,
    /// Show session setup instructions
    Setup,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "postgate=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ServiceConfig::resolve(cli.url.as_deref(), cli.timeout)?;

    match cli.command {
        Commands::Share {
            description,
            image,
            mime,
            require_image,
            yes,
        } => {
            let args = cli::ShareArgs {
                description,
                image,
                mime,
                require_image,
                yes,
            };
            let outcome = cli::run_share(config, args).await?;
            if matches!(outcome, SubmissionOutcome::Refused(_)) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Auth { action } => {
            let action_str = match action {
                AuthAction::Test => "test",
                AuthAction::Setup => "setup",
            };
            cli::run_auth(&config, action_str).await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
