// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # brainaudit
//!
//! Entry point for the `brainaudit` binary. Parses CLI arguments,
//! initializes logging, derives the brainwallet and, for `check`, looks the
//! address up on a block explorer.
//!
//! The binary supports three subcommands:
//!
//! - `derive`  : passphrase to private key, WIF, public key and address
//! - `check`   : `derive`, then balance lookup and verdict
//! - `version` : print build version information
//!
//! `check` runs in two stages. The derivation is computed (and, in text
//! mode, printed) before any network traffic. A failed, timed out or
//! cancelled lookup is reported on its own and exits with status 2; it never
//! discards or recomputes the derivation.

mod cli;
mod logging;
mod lookup;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tokio::signal;

use brainaudit_core::{DerivationResult, Deriver};

use cli::{BrainauditCli, CheckArgs, Commands, KeyArgs};
use logging::LogFormat;
use lookup::{default_explorer_url, fetch_cancellable, BlockCypherClient, LookupError};
use report::{render_balance, render_derivation, AuditReport};

/// Exit status when derivation succeeded but the balance lookup did not.
const LOOKUP_FAILED_EXIT_CODE: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = BrainauditCli::parse();
    logging::init_logging(
        logging::DEFAULT_DIRECTIVE,
        LogFormat::from_str_lossy(&cli.log_format),
    );

    match cli.command {
        Commands::Derive(args) => derive_command(args),
        Commands::Check(args) => check_command(args).await,
        Commands::Version => {
            print_version();
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Stage one: passphrase in, four strings out. Pure computation.
fn run_derivation(args: &KeyArgs) -> Result<DerivationResult> {
    let passphrase = args
        .resolve_passphrase()
        .context("failed to read passphrase from stdin")?;

    let deriver = Deriver::for_network(args.network, args.key_format());
    tracing::info!(
        network = %args.network,
        key_format = ?args.key_format(),
        "deriving brainwallet"
    );

    deriver
        .derive(&passphrase)
        .context("brainwallet derivation failed")
}

fn derive_command(args: KeyArgs) -> Result<ExitCode> {
    let result = run_derivation(&args)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&result).context("failed to serialize derivation")?;
        println!("{}", json);
    } else {
        print!(
            "{}",
            render_derivation(&result, args.network, args.key_format())
        );
    }

    Ok(ExitCode::SUCCESS)
}

async fn check_command(args: CheckArgs) -> Result<ExitCode> {
    let key = &args.key;
    let result = run_derivation(key)?;

    if !key.json {
        println!(
            "{}",
            render_derivation(&result, key.network, key.key_format())
        );
    }

    // --- Stage two: balance lookup ---
    let timeout = Duration::from_millis(args.timeout_ms);
    let base_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| default_explorer_url(key.network).to_string());
    tracing::info!(
        address = %result.address,
        explorer = %base_url,
        timeout_ms = args.timeout_ms,
        "looking up address"
    );

    let outcome = lookup_balance(base_url, &result.address, timeout).await;

    if key.json {
        let report = AuditReport::derivation_only(key.network, key.key_format(), &result);
        let report = match &outcome {
            Ok(summary) => report.with_balance(summary),
            Err(e) => report.with_lookup_error(e),
        };
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{}", json);
    } else {
        match &outcome {
            Ok(summary) => print!("{}", render_balance(summary)),
            Err(e) => eprintln!("Balance lookup failed: {}", e),
        }
    }

    match outcome {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            tracing::warn!(error = %e, "balance lookup failed; derivation result stands");
            Ok(ExitCode::from(LOOKUP_FAILED_EXIT_CODE))
        }
    }
}

async fn lookup_balance(
    base_url: String,
    address: &str,
    timeout: Duration,
) -> std::result::Result<lookup::BalanceSummary, LookupError> {
    let client = BlockCypherClient::new(base_url, timeout)?;
    fetch_cancellable(&client, address, timeout, cancel_signal()).await
}

/// Prints version information to stdout.
fn print_version() {
    println!("brainaudit {}", env!("CARGO_PKG_VERSION"));
    println!("core       {}", brainaudit_core::VERSION);
}

/// Resolves on Ctrl+C. If the handler cannot be installed, never resolves,
/// so the lookup runs to its own timeout.
async fn cancel_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!("failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
