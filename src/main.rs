//! CLI entry point for the proxyview tool.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use proxyview_core::resolve::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use proxyview_core::{
    DEFAULT_PROXY_ENDPOINT, Delivery, Engine, ProxyEndpoint, Resolution, TransferGate,
};
use tracing::{debug, info, warn};

mod app_config;
mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let loaded = app_config::load_default_file_config()?;
    if let Some(path) = &loaded.path
        && loaded.config.is_some()
    {
        debug!(path = %path.display(), "configuration loaded from file");
    }
    let file_config = loaded.config.unwrap_or_default();

    let template = args
        .proxy
        .clone()
        .or(file_config.proxy)
        .unwrap_or_else(|| DEFAULT_PROXY_ENDPOINT.to_string());
    let proxy = ProxyEndpoint::new(template).context("proxy endpoint configuration")?;

    let engine = Engine::with_timeouts(
        proxy,
        Arc::new(PromptGate {
            assume_yes: args.yes,
        }),
        file_config.connect_timeout_secs.unwrap_or(CONNECT_TIMEOUT_SECS),
        file_config.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
    );

    if args.navigate {
        match engine.navigate(&args.url) {
            Ok(message) => emit(&message)?,
            Err(error) => return emit_failure(&error.to_string()),
        }
        return Ok(());
    }

    let outcome = match args.category {
        Some(category) => engine.resolve_as(&args.url, category.into()).await,
        None => engine.resolve(&args.url).await,
    };

    match outcome {
        Ok(Resolution::Cancelled) => {
            info!("transfer declined; nothing delivered");
            Ok(())
        }
        Ok(resolution) => {
            for message in resolution.messages() {
                emit(message)?;
            }
            Ok(())
        }
        Err(error) => emit_failure(&error.to_string()),
    }
}

/// Prints one delivery message as a JSON line.
fn emit(message: &Delivery) -> Result<()> {
    let json = serde_json::to_string(message).context("serializing delivery message")?;
    println!("{json}");
    Ok(())
}

/// Reports a failed resolution as an `error` delivery, then exits nonzero.
fn emit_failure(message: &str) -> Result<()> {
    emit(&Delivery::Error {
        status: None,
        message: message.to_string(),
    })?;
    std::process::exit(1);
}

/// Interactive confirmation gate for large binary transfers.
struct PromptGate {
    assume_yes: bool,
}

#[async_trait]
impl TransferGate for PromptGate {
    async fn confirm_large_transfer(&self, url: &str, size: u64) -> bool {
        if self.assume_yes {
            return true;
        }
        if !io::stdin().is_terminal() {
            warn!(url, size, "large transfer requires confirmation; rerun with --yes");
            return false;
        }
        eprint!("Too large resource ({size} bytes). Proceed anyway? [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}
