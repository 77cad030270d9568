//! Issue login credentials for every family with a phone number.
//!
//! Reads a families JSON file and writes a fresh credentials map keyed by the
//! primary member's first phone number. Every run regenerates all passwords.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use era_directory::config::AppConfig;
use era_directory::domain::credentials::issue_credentials;
use era_directory::storage::{force_sync, should_sync, JsonFileStore, CREDENTIALS_KEY};
use shared::{CredentialMap, Family};

#[derive(Debug, Parser)]
#[command(name = "issue-credentials")]
#[command(about = "Generate family login credentials from the directory snapshot")]
struct Args {
    /// Families snapshot to read
    #[arg(long, default_value = "seed/families.json")]
    families: PathBuf,

    /// Credentials file to write
    #[arg(long, default_value = "seed/credentials.json")]
    output: PathBuf,

    /// Password length; defaults to `password_length` from the app config
    #[arg(long)]
    length: Option<usize>,

    /// Also push the new credentials into the JSON store in this directory
    #[arg(long, env = "ERA_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    info!("Reading families from {}", args.families.display());
    let content = fs::read_to_string(&args.families)
        .with_context(|| format!("Failed to read {}", args.families.display()))?;
    let families: Vec<Family> =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", args.families.display()))?;

    let length = match args.length {
        Some(length) => length,
        None => AppConfig::load()?.password_length,
    };
    if length == 0 {
        anyhow::bail!("Password length must be at least 1");
    }

    let credentials = issue_credentials(&families, length);
    info!("Generated {} credentials with {}-character passwords", credentials.len(), length);

    write_pretty(&args.output, &credentials)?;
    info!("Saved to {}", args.output.display());

    if let Some(data_dir) = args.data_dir {
        push_to_store(&data_dir, &credentials)?;
    }

    Ok(())
}

/// JSON with four-space indentation, matching the bundled snapshot files
fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .context("Failed to serialize credentials")?;
    fs::write(path, buffer).with_context(|| format!("Failed to write {}", path.display()))
}

fn push_to_store(data_dir: &Path, credentials: &CredentialMap) -> Result<()> {
    let store = JsonFileStore::new(data_dir)?;
    if !should_sync(&store, CREDENTIALS_KEY, credentials)? {
        info!("Store in {} already holds these credentials", data_dir.display());
        return Ok(());
    }
    force_sync(&store, CREDENTIALS_KEY, credentials)?;
    info!("Pushed credentials into store at {}", data_dir.display());
    Ok(())
}
