//! Resolves one notebook server address interactively.
//!
//! Usage:
//!
//! ```text
//! nbconnect <ADDRESS> [--allow-unauthorized] [--config FILE] [--origin NAME]
//! ```
//!
//! Passwords and trust decisions are asked on the terminal. Ctrl-C cancels
//! the attempt. The optional configuration file is a JSON document such as:
//!
//! ```json
//! {
//!   "allow_unauthorized_connections": false,
//!   "extension_origin": "nbconnect",
//!   "request_timeout_secs": 30
//! }
//! ```

use anyhow::{Context as _, Result};
use clap::Parser;
use nbconnect::connection::{
    adapters::{
        ConsolePrompt, HostDisplayName, ReqwestNotebookServerApi,
        memory::InMemoryCredentialStore,
    },
    domain::{ConnectionFailure, ConnectionOutcome, RawAddress},
    services::{ConnectionResolver, ResolverConfig},
};
use std::io::Write as _;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

/// Connect to a notebook server from an address.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Server address, for example `localhost:8888/lab?token=...`.
    address: String,

    /// Accept untrusted certificates without asking.
    #[arg(long)]
    allow_unauthorized: bool,

    /// Path to a JSON resolver configuration.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Extension origin stamped on the issued handle.
    #[arg(long, value_name = "NAME")]
    origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = load_config(&cli).await?;

    let api = ReqwestNotebookServerApi::new(&config).context("failed to build HTTP client")?;
    let prompt = ConsolePrompt::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr());
    let resolver = ConnectionResolver::new(
        Arc::new(api),
        Arc::new(prompt),
        Arc::new(HostDisplayName),
        Arc::new(InMemoryCredentialStore::new()),
        config,
    );

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received; cancelling");
            trigger.cancel();
        }
    });

    let outcome = resolver
        .resolve(&RawAddress::from(cli.address), &cancel)
        .await;
    report(&outcome)
}

async fn load_config(cli: &Cli) -> Result<ResolverConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let document = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            ResolverConfig::from_json_str(&document)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => ResolverConfig::default(),
    };

    if cli.allow_unauthorized {
        config.allow_unauthorized_connections = true;
    }
    if let Some(origin) = &cli.origin {
        config = config.with_extension_origin(origin.as_str());
    }
    config.validate().context("invalid resolver configuration")?;
    Ok(config)
}

fn report(outcome: &ConnectionOutcome) -> Result<ExitCode> {
    match outcome {
        ConnectionOutcome::Resolved(server) => {
            let mut stdout = std::io::stdout().lock();
            writeln!(
                stdout,
                "{} {} {} {}",
                server.handle().id(),
                server.base_endpoint(),
                server.auth_method(),
                server.display_name()
            )?;
            Ok(ExitCode::SUCCESS)
        }
        ConnectionOutcome::Failed(ConnectionFailure::Cancelled) => Ok(ExitCode::from(130)),
        ConnectionOutcome::Failed(failure) => {
            writeln!(std::io::stderr().lock(), "nbconnect: {failure}")?;
            Ok(ExitCode::FAILURE)
        }
    }
}
