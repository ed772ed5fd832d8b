//! Lingofy CLI - the content studio from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Check the server is up
//! lingofy status
//!
//! # Edit the default profile, attach a photo and save it
//! lingofy save --set product.title="Stoneware Mug" --set product.price=24 --image mug.webp
//!
//! # Generate a product photo for a saved profile
//! lingofy generate --profile profile.json --prompt "on a walnut table" --out mug.png
//!
//! # Ask the assistant for help
//! lingofy chat
//! ```
//!
//! # Commands
//!
//! - `status` - Check the server is reachable
//! - `profile show` / `profile fields` - Inspect profiles and editable fields
//! - `save` - Edit, attach images and save a profile
//! - `generate` - Generate a product photo
//! - `chat` - Talk to the assistant

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use lingofy_studio::{HttpBackend, StudioConfig};

mod commands;

use commands::CliError;
use commands::save::SaveOptions;

#[derive(Parser)]
#[command(name = "lingofy")]
#[command(author, version, about = "Lingofy content studio CLI")]
struct Cli {
    /// Base URL of the Lingofy server
    #[arg(long, global = true, env = "LINGOFY_API_URL")]
    api_url: Option<Url>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is reachable
    Status,
    /// Inspect store profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Edit a profile, attach images and save it
    Save {
        /// Profile JSON to start from (default profile if omitted)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Field edit as section.field=value (repeatable)
        #[arg(short, long = "set", value_name = "SECTION.FIELD=VALUE")]
        set: Vec<String>,

        /// Image file to add to the gallery (repeatable)
        #[arg(short, long = "image", value_name = "FILE")]
        image: Vec<PathBuf>,

        /// Generate an AI product photo before saving
        #[arg(short, long)]
        generate: bool,

        /// Extra instructions for the generated photo
        #[arg(long, requires = "generate")]
        prompt: Option<String>,

        /// Write the edited profile here before saving
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Generate a product photo without saving
    Generate {
        /// Profile JSON describing the product (default profile if omitted)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Extra instructions for the photo
        #[arg(long)]
        prompt: Option<String>,

        /// Write the image bytes here instead of printing a data URL
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Chat with the assistant
    Chat,
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Print a profile as JSON
    Show {
        /// Profile JSON file (default profile if omitted)
        path: Option<PathBuf>,
    },
    /// List editable fields
    Fields,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output can be piped
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn studio_config(cli: &Cli) -> Result<StudioConfig, CliError> {
    let mut config = StudioConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();

    // Offline commands don't need a backend
    if let Commands::Profile { action } = &cli.command {
        return match action {
            ProfileAction::Show { path } => {
                commands::profile::show(path.as_deref(), &mut stdout).await
            }
            ProfileAction::Fields => commands::profile::fields(&mut stdout),
        };
    }

    let backend = HttpBackend::new(&studio_config(&cli)?)?;
    tracing::debug!(api_url = %backend.base_url(), "using Lingofy server");

    match cli.command {
        Commands::Status => commands::status::run(&backend, &mut stdout).await?,
        Commands::Save {
            profile,
            set,
            image,
            generate,
            prompt,
            out,
        } => {
            let options = SaveOptions {
                profile,
                assignments: set,
                images: image,
                generate,
                prompt,
                out,
            };
            commands::save::run(Arc::new(backend), options, &mut stdout).await?;
        }
        Commands::Generate {
            profile,
            prompt,
            out,
        } => {
            commands::generate::run(
                &backend,
                profile.as_deref(),
                prompt.as_deref(),
                out,
                &mut stdout,
            )
            .await?;
        }
        Commands::Chat => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            commands::chat::run(&backend, stdin, &mut stdout).await?;
        }
        Commands::Profile { .. } => {}
    }
    Ok(())
}
