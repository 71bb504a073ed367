// tagguard/src/commands/rule.rs
//! `tagguard rule`: validates a managed rule's `parameters.json`.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;

use tagguard_core::ManagedRule;

use crate::cli::RuleCommand;

pub fn run_rule<W: Write>(cmd: &RuleCommand, out: &mut W) -> Result<()> {
    let text = fs::read_to_string(&cmd.parameters)
        .with_context(|| format!("Failed to read {}", cmd.parameters.display()))?;
    let rule = ManagedRule::from_parameters(&text)
        .with_context(|| format!("Invalid rule parameters in {}", cmd.parameters.display()))?;

    serde_json::to_writer_pretty(&mut *out, &rule.to_cloudformation())?;
    writeln!(out)?;
    Ok(())
}
