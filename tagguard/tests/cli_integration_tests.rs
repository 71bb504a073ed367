// tagguard/tests/cli_integration_tests.rs
//! Command-line tests for the `tagguard` binary.
//!
//! Only the offline subcommands (`classify`, `rule`) are exercised here; the
//! fleet walk is covered against an in-memory inventory in `tagguard-core`.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const COMPLIANT_TAGS: &str = r#"[
    {"key": "uai", "value": "uai1234567"},
    {"key": "env", "value": "prd"},
    {"key": "Name", "value": "orders"}
]"#;

fn tagguard() -> Command {
    let mut cmd = Command::cargo_bin("tagguard").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn temp_file(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

#[test_log::test]
fn test_classify_compliant_from_stdin() {
    tagguard()
        .args(["classify", "--arn", "arn:aws:ecs:us-east-1:123456789012:cluster/orders"])
        .write_stdin(COMPLIANT_TAGS)
        .assert()
        .success()
        .stdout(predicate::str::contains("Tags are COMPLIANT on ECS Resource (orders)"));
}

#[test_log::test]
fn test_classify_non_compliant_json() -> Result<()> {
    let tags = temp_file(
        r#"[{"key": "uai", "value": "uai123"}, {"key": "env", "value": "production"}, {"key": "team", "value": "x"}]"#,
    )?;
    let output = tagguard()
        .args(["classify", "--json", "--kind", "task-definition", "--arn", "arn:aws:ecs:us-east-1:1:task-definition/web:3"])
        .arg("--input-file")
        .arg(tags.path())
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["verdict"]["compliance"], "NON_COMPLIANT");
    assert_eq!(value["verdict"]["kind"], "TaskDefinition");
    assert_eq!(
        value["verdict"]["annotation"],
        "One or More Tags are NON_COMPLIANT on ECS Resource (web:3). Results: ([['uai', 'NON_COMPLIANT'], ['env', 'NON_COMPLIANT'], 'NO_TAGS'])"
    );
    assert_eq!(value["classified"][2]["verdict"], "UNRECOGNIZED");
    Ok(())
}

#[test_log::test]
fn test_classify_service_with_legacy_arn() -> Result<()> {
    let output = tagguard()
        .args(["classify", "--json", "--kind", "service", "--arn", "arn:aws:ecs:us-east-1:123456789012:service/api"])
        .write_stdin(COMPLIANT_TAGS)
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["verdict"]["compliance"], "NON_COMPLIANT");
    assert_eq!(value["verdict"]["annotation"], "(api) uses old ARN and does not support TAGS");
    Ok(())
}

#[test_log::test]
fn test_classify_empty_tag_list() {
    tagguard()
        .args(["classify", "--arn", "svc/api"])
        .write_stdin("[]")
        .assert()
        .success()
        .stdout(predicate::str::contains("NO Tags at all on ECS Resource (api)"));
}

#[test_log::test]
fn test_classify_with_custom_config() -> Result<()> {
    let config = temp_file(
        r#"
required_compliant: 1
annotations:
  compliant: "fine: {name}"
rules:
  - name: uai
    key_matchers:
      - contains: "uai"
    value_pattern: '^uai'
"#,
    )?;
    tagguard()
        .arg("--config")
        .arg(config.path())
        .args(["--disable", "env,name_or_app", "classify", "--arn", "cluster/blue"])
        .write_stdin(r#"[{"key": "uai", "value": "uai1"}]"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("fine: blue"));
    Ok(())
}

#[test_log::test]
fn test_classify_rejects_malformed_input() {
    tagguard()
        .args(["classify"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON array"));
}

#[test]
fn test_rule_prints_cloudformation() -> Result<()> {
    let params = temp_file(
        r#"{
  "Version": "1.0",
  "Parameters": {
    "RuleName": "ecs-tags",
    "SourceIdentifier": "required-tags",
    "Description": "Required tags",
    "InputParameters": "{\"tag1Key\": \"uai\"}",
    "SourcePeriodic": "TwentyFour_Hours",
    "SourceEvents": "AWS::ECS::Cluster"
  }
}"#,
    )?;
    let output = tagguard().arg("rule").arg(params.path()).output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["Type"], "AWS::Config::ConfigRule");
    assert_eq!(value["Properties"]["Source"]["SourceIdentifier"], "REQUIRED_TAGS");
    assert_eq!(value["Properties"]["ConfigRuleName"], "ecs-tags");
    assert_eq!(value["Properties"]["InputParameters"]["tag1Key"], "uai");
    Ok(())
}

#[test]
fn test_rule_rejects_unknown_identifier() -> Result<()> {
    let params = temp_file(r#"{"Parameters": {"SourceIdentifier": "NOT_A_RULE"}}"#)?;
    tagguard()
        .arg("rule")
        .arg(params.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Parameters.SourceIdentifier"));
    Ok(())
}

#[test]
fn test_no_arguments_prints_help() {
    tagguard()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
