//! # Command Line Interface
//!
//! Materializes the interception CA, runs commands with it injected, and
//! always invokes the hidden cleanup workflow before the process exits.

pub mod exec;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crate::config::{Configuration, ObservabilityConfig, CACHE_PATH};
use crate::observability::{init_logging, MetricsRecorder};
use crate::resources::GlobalResources;
use crate::workflow::{ca_id, global_cleanup_id, init_ca_workflow, init_cleanup, Engine};
use crate::{APP_NAME, VERSION};

#[derive(Parser)]
#[command(name = "intercept-ca")]
#[command(about = "Transient TLS interception CA for command-line tools")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base directory for version caches and the temporary directory
    #[arg(long, global = true)]
    pub cache_path: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the interception CA and print where its certificate lives
    Ca {
        /// Also print the certificate PEM
        #[arg(long)]
        pem: bool,

        /// Also print the CA private key PEM (held in memory only)
        #[arg(long)]
        key: bool,
    },

    /// Run a command with the interception CA in its trust environment
    Exec {
        /// Command and arguments
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// List user-facing workflows
    Workflows,
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut overrides = Vec::new();
    if let Some(cache_path) = &cli.cache_path {
        overrides.push((CACHE_PATH, cache_path.display().to_string()));
    }
    let configuration = Configuration::load(cli.config.as_deref(), overrides)?;

    let mut observability = ObservabilityConfig::from_configuration(&configuration);
    if cli.verbose {
        observability = observability.verbose();
    }
    init_logging(&observability);
    MetricsRecorder::new().describe();

    debug!(app_name = APP_NAME, version = VERSION, "Starting");

    let resources = Arc::new(GlobalResources::with_rcgen(VERSION));
    let mut engine = Engine::new(configuration);
    init_ca_workflow(&mut engine, resources.clone())?;
    init_cleanup(&mut engine, resources.clone())?;
    let engine = Arc::new(engine);

    let outcome = handle_command(cli.command, &engine, &resources).await;

    let cleanup_engine = engine.clone();
    tokio::task::spawn_blocking(move || cleanup_engine.invoke(&global_cleanup_id(), Vec::new()))
        .await
        .context("cleanup task panicked")??;

    outcome
}

async fn handle_command(
    command: Commands,
    engine: &Arc<Engine>,
    resources: &Arc<GlobalResources>,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Ca { pem, key } => {
            let ca_engine = engine.clone();
            let output = tokio::task::spawn_blocking(move || ca_engine.invoke(&ca_id(), Vec::new()))
                .await
                .context("CA task panicked")??;

            for data in output {
                if let Some(path) = data.payload["cert_file_path"].as_str() {
                    println!("{}", path);
                }
                if pem {
                    print!("{}", data.payload["cert_pem"].as_str().unwrap_or_default());
                }
            }

            if key {
                // The key never leaves memory through a workflow payload.
                let configuration = engine.configuration().clone();
                let ca_resources = resources.clone();
                let record = tokio::task::spawn_blocking(move || {
                    ca_resources.certificate_authority(&configuration)
                })
                .await
                .context("CA task panicked")??;

                match record.private_key() {
                    Some(private_key) => print!("{}", private_key.expose_secret()),
                    None => anyhow::bail!("Certificate Authority has no private key in memory"),
                }
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Exec { command } => {
            let configuration = engine.configuration().clone();
            let ca_resources = resources.clone();
            let record = tokio::task::spawn_blocking(move || {
                ca_resources.certificate_authority(&configuration)
            })
            .await
            .context("CA task panicked")?
            .context("Failed to create Certificate Authority")?;

            info!(
                path = %record.cert_file_path().display(),
                command = %command.join(" "),
                "Running command with interception CA"
            );
            let code = exec::run_with_ca(&command, &record).await?;
            Ok(ExitCode::from(code))
        }

        Commands::Workflows => {
            for identifier in engine.visible_workflows() {
                println!("{}", identifier.name());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
