//! Human and JSON rendering of an audit.

use serde::Serialize;
use std::fmt::Write as _;

use brainaudit_core::{DerivationResult, Network, PublicKeyFormat};

use crate::lookup::BalanceSummary;

const SATOSHIS_PER_BTC: u64 = 100_000_000;

/// What the address history says about the passphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditVerdict {
    /// No transactions have ever touched the address.
    Unused,
    /// The address has been used and is now empty.
    Drained,
    /// The address still holds funds.
    Funded,
}

impl AuditVerdict {
    pub fn from_summary(summary: &BalanceSummary) -> Self {
        if summary.tx_count == 0 {
            AuditVerdict::Unused
        } else if summary.final_balance == 0 {
            AuditVerdict::Drained
        } else {
            AuditVerdict::Funded
        }
    }

    /// Answer to "Emptied?".
    pub fn describe(self) -> &'static str {
        match self {
            AuditVerdict::Unused => "No activity yet, but anyone can derive this key",
            AuditVerdict::Drained => "Yes, pwned!",
            AuditVerdict::Funded => "No, but still unsafe!",
        }
    }
}

/// Satoshis as a BTC decimal with exactly 8 fractional digits.
pub fn format_btc(satoshis: u64) -> String {
    format!(
        "{}.{:08}",
        satoshis / SATOSHIS_PER_BTC,
        satoshis % SATOSHIS_PER_BTC
    )
}

pub fn render_derivation(
    result: &DerivationResult,
    network: Network,
    key_format: PublicKeyFormat,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Network          : {network}");
    let _ = writeln!(out, "Public key format: {}", format_name(key_format));
    let _ = writeln!(out, "Private key (hex): {}", result.private_key_hex);
    let _ = writeln!(out, "Private key (WIF): {}", result.private_key_wif);
    let _ = writeln!(out, "Public key (hex) : {}", result.public_key_hex);
    let _ = writeln!(out, "Address          : {}", result.address);
    out
}

pub fn render_balance(summary: &BalanceSummary) -> String {
    let verdict = AuditVerdict::from_summary(summary);
    let mut out = String::new();
    let _ = writeln!(out, "Total received   : {} BTC", format_btc(summary.total_received));
    let _ = writeln!(out, "Total sent       : {} BTC", format_btc(summary.total_sent));
    let _ = writeln!(out, "Final balance    : {} BTC", format_btc(summary.final_balance));
    let _ = writeln!(out, "Transactions     : {}", summary.tx_count);
    let _ = writeln!(out, "Emptied?         : {}", verdict.describe());
    out
}

fn format_name(key_format: PublicKeyFormat) -> &'static str {
    match key_format {
        PublicKeyFormat::Uncompressed => "uncompressed",
        PublicKeyFormat::Compressed => "compressed",
    }
}

/// Machine-readable output of `brainaudit check --json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport<'a> {
    pub network: Network,
    pub key_format: PublicKeyFormat,
    pub derivation: &'a DerivationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<&'a BalanceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<AuditVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_error: Option<String>,
}

impl<'a> AuditReport<'a> {
    pub fn derivation_only(
        network: Network,
        key_format: PublicKeyFormat,
        derivation: &'a DerivationResult,
    ) -> Self {
        Self {
            network,
            key_format,
            derivation,
            balance: None,
            verdict: None,
            lookup_error: None,
        }
    }

    pub fn with_balance(mut self, summary: &'a BalanceSummary) -> Self {
        self.verdict = Some(AuditVerdict::from_summary(summary));
        self.balance = Some(summary);
        self
    }

    pub fn with_lookup_error(mut self, error: impl ToString) -> Self {
        self.lookup_error = Some(error.to_string());
        self
    }
}
