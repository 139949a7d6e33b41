//! Handlers run against the bundled engine file.

use std::path::PathBuf;

use tce_cli::check::{run_check, CheckArgs};
use tce_cli::config::EngineConfig;
use tce_cli::modules::{list_modules, run_modules, ModulesArgs};
use tce_cli::validate::{run_validate, ValidateArgs};
use tce_core::{Address, TransferCheckRequest};
use tce_registry::Verdict;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/engine.yaml")
}

fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

fn check(from: &str, to: &str) -> CheckArgs {
    CheckArgs {
        from: addr(from),
        to: addr(to),
        amount: 10,
        aux: String::new(),
        json: true,
    }
}

const ALICE: &str = "0x00000000000000000000000000000000000a11ce";
const BOB: &str = "0x0000000000000000000000000000000000000b0b";
const CAROL: &str = "0x00000000000000000000000000000000000ca201";

#[test]
fn test_fixture_is_valid() {
    let config = EngineConfig::load(&fixture()).unwrap();
    assert!(config.problems().is_empty());
    assert_eq!(run_validate(&ValidateArgs { build: true }, &fixture()).unwrap(), 0);
}

#[test]
fn test_fixture_module_listing() {
    let registry = EngineConfig::load(&fixture()).unwrap().build().unwrap();
    let listings = list_modules(&registry).unwrap();
    let names: Vec<_> = listings.iter().map(|l| l.module).collect();
    assert_eq!(names, vec![Some("EngenCreditCheck"), Some("KintoKYC")]);
    assert_eq!(listings[1].revision, Some(2));
    assert_eq!(run_modules(&ModulesArgs { json: false }, &fixture()).unwrap(), 0);
}

#[test]
fn test_check_exit_codes() {
    // Alice: enough credits, both parties verified.
    assert_eq!(run_check(&check(ALICE, BOB), &fixture()).unwrap(), 0);
    // Bob: below the credit threshold.
    assert_eq!(run_check(&check(BOB, ALICE), &fixture()).unwrap(), 1);
    // Carol is not verified.
    assert_eq!(run_check(&check(ALICE, CAROL), &fixture()).unwrap(), 1);
}

#[test]
fn test_fixture_kyc_gates_the_recipient() {
    let registry = EngineConfig::load(&fixture()).unwrap().build().unwrap();
    let decision = registry.evaluate(&TransferCheckRequest::new(addr(ALICE), addr(CAROL), 10));
    assert_eq!(decision.verdicts[0].verdict, Verdict::Approved);
    assert_eq!(decision.verdicts[1].module, Some("KintoKYC"));
    assert_eq!(decision.verdicts[1].verdict, Verdict::Denied);
    assert!(!decision.allowed());
}

#[test]
fn test_invalid_file_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("engine.yaml");
    std::fs::write(
        &path,
        r#"
owner: "0x00000000000000000000000000000000000000aa"
modules:
  - kind: engen_credit_check
    address: "0x0000000000000000000000000000000000000001"
    source: "0x00000000000000000000000000000000000000c0"
    threshold: 100
"#,
    )
    .unwrap();

    assert_eq!(run_validate(&ValidateArgs { build: false }, &path).unwrap(), 1);
    assert!(run_check(&check(ALICE, BOB), &path).is_err());
}
