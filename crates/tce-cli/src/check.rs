//! # Check Subcommand
//!
//! Evaluate one candidate transfer against the configured engine.
//!
//! ```bash
//! tce --config engine.yaml check --from 0x…a11ce --to 0x…b0b --amount 10
//! ```
//!
//! Exit code 0 when every module approves, 1 when the transfer is blocked.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use tce_core::{Address, TransferCheckRequest};
use tce_registry::{ComplianceDecision, Verdict};

use crate::config::EngineConfig;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Sender of the transfer.
    #[arg(long)]
    pub from: Address,

    /// Recipient of the transfer.
    #[arg(long)]
    pub to: Address,

    /// Amount in the asset's base units.
    #[arg(long)]
    pub amount: u128,

    /// Opaque auxiliary data handed to every module.
    #[arg(long, default_value = "")]
    pub aux: String,

    /// Print a JSON report instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable outcome of a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub sender: Address,
    pub recipient: Address,
    pub amount: u128,
    pub allowed: bool,
    pub modules: Vec<ModuleOutcome>,
}

/// One module's line in a [`CheckReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleOutcome {
    pub slot: Address,
    pub module: Option<&'static str>,
    pub verdict: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CheckReport {
    pub fn new(request: &TransferCheckRequest, decision: &ComplianceDecision) -> Self {
        Self {
            sender: request.sender,
            recipient: request.recipient,
            amount: request.amount,
            allowed: decision.allowed(),
            modules: decision
                .verdicts
                .iter()
                .map(|v| {
                    let (verdict, reason) = match &v.verdict {
                        Verdict::Approved => ("approved", None),
                        Verdict::Denied => ("denied", None),
                        Verdict::Rejected(r) => ("rejected", Some(r.to_string())),
                    };
                    ModuleOutcome {
                        slot: v.slot,
                        module: v.module,
                        verdict,
                        reason,
                    }
                })
                .collect(),
        }
    }
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs, config_path: &Path) -> Result<u8> {
    let registry = EngineConfig::load(config_path)?.build()?;
    let request = TransferCheckRequest::new(args.from, args.to, args.amount)
        .with_aux_data(args.aux.as_bytes());

    let report = CheckReport::new(&request, &registry.evaluate(&request));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("  transfer: {request}");
        for m in &report.modules {
            let reason = m.reason.as_deref().map(|r| format!(" ({r})")).unwrap_or_default();
            println!(
                "    - {} {:<16} {}{reason}",
                m.slot,
                m.module.unwrap_or("<uninitialized>"),
                m.verdict.to_uppercase()
            );
        }
        println!("  decision: {}", if report.allowed { "ALLOWED" } else { "BLOCKED" });
    }

    Ok(if report.allowed { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tce_modules::Rejection;
    use tce_registry::ModuleVerdict;

    fn request() -> TransferCheckRequest {
        TransferCheckRequest::new(Address::from_low_u64(1), Address::from_low_u64(2), 10)
    }

    #[test]
    fn test_report_of_empty_decision_is_allowed() {
        let report = CheckReport::new(&request(), &ComplianceDecision::default());
        assert!(report.allowed);
        assert!(report.modules.is_empty());
    }

    #[test]
    fn test_report_carries_rejection_reason() {
        let decision = ComplianceDecision {
            verdicts: vec![
                ModuleVerdict {
                    slot: Address::from_low_u64(7),
                    module: Some("EngenCreditCheck"),
                    verdict: Verdict::Rejected(Rejection::NotEnoughCredits {
                        available: 50,
                        required: 100,
                    }),
                },
                ModuleVerdict {
                    slot: Address::from_low_u64(8),
                    module: Some("KintoKYC"),
                    verdict: Verdict::Approved,
                },
            ],
        };
        let report = CheckReport::new(&request(), &decision);
        assert!(!report.allowed);
        assert_eq!(report.modules[0].verdict, "rejected");
        assert!(report.modules[0]
            .reason
            .as_deref()
            .is_some_and(|r| r.starts_with("NotEnoughCredits")));
        assert_eq!(report.modules[1].reason, None);
    }

    #[test]
    fn test_json_report_shape() {
        let report = CheckReport::new(&request(), &ComplianceDecision::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sender"], "0x0000000000000000000000000000000000000001");
        assert_eq!(json["allowed"], true);
        assert_eq!(json["amount"], 10);
    }
}
