//! # CLI Interface
//!
//! Defines the command-line argument structure for `brainaudit` using
//! `clap` derive. Supports three subcommands: `derive`, `check`, and
//! `version`.

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};

use brainaudit_core::{Network, PublicKeyFormat};

use crate::lookup::DEFAULT_LOOKUP_TIMEOUT_MS;

/// Passphrase value meaning "read it from stdin".
pub const STDIN_MARKER: &str = "-";

/// Brainwallet auditor.
///
/// Derives the private key, WIF, public key and Bitcoin address a passphrase
/// maps to under the classic SHA-256 brainwallet scheme, and optionally asks
/// a block explorer whether that address has already been swept.
#[derive(Parser, Debug)]
#[command(
    name = "brainaudit",
    about = "Derive and audit Bitcoin brainwallets",
    version,
    propagate_version = true
)]
pub struct BrainauditCli {
    /// Log output format: pretty or json. Logs go to stderr.
    #[arg(
        long,
        global = true,
        env = "BRAINAUDIT_LOG_FORMAT",
        default_value = "pretty"
    )]
    pub log_format: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive keys and address from a passphrase. No network access.
    Derive(KeyArgs),
    /// Derive, then look up the address balance on a block explorer.
    Check(CheckArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments shared by `derive` and `check`.
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// The passphrase, used byte for byte. Pass `-` to read it from stdin
    /// (one trailing newline is stripped) and keep it out of `ps` output.
    pub passphrase: String,

    /// Network whose version bytes to use: mainnet or testnet.
    #[arg(long, short = 'n', env = "BRAINAUDIT_NETWORK", default_value = "mainnet")]
    pub network: Network,

    /// Use compressed public keys (and the matching WIF suffix).
    #[arg(long)]
    pub compressed: bool,

    /// Print JSON instead of labelled text.
    #[arg(long)]
    pub json: bool,
}

impl KeyArgs {
    pub fn key_format(&self) -> PublicKeyFormat {
        if self.compressed {
            PublicKeyFormat::Compressed
        } else {
            PublicKeyFormat::Uncompressed
        }
    }

    /// The passphrase argument, or stdin if it is [`STDIN_MARKER`].
    pub fn resolve_passphrase(&self) -> io::Result<String> {
        if self.passphrase == STDIN_MARKER {
            read_passphrase(io::stdin().lock())
        } else {
            Ok(self.passphrase.clone())
        }
    }
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Explorer address endpoint. Defaults to BlockCypher for the network.
    #[arg(long, env = "BRAINAUDIT_API_URL")]
    pub api_url: Option<String>,

    /// Lookup timeout in milliseconds.
    #[arg(long, env = "BRAINAUDIT_TIMEOUT_MS", default_value_t = DEFAULT_LOOKUP_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

/// Read a passphrase from `reader`, dropping one trailing line ending.
pub fn read_passphrase<R: Read>(mut reader: R) -> io::Result<String> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    Ok(strip_line_ending(&input).to_string())
}

/// Remove a single trailing `\n` or `\r\n`. Other whitespace is significant.
pub fn strip_line_ending(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}
