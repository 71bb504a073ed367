// tagguard/src/commands/mod.rs
//! Subcommand implementations.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use tagguard_core::{merge_rules, RuleSetConfig};

pub mod classify;
pub mod rule;
pub mod scan;

/// Builds the effective rule set: defaults, merged with the user file if
/// given, then filtered by the enable/disable lists.
pub fn load_rule_set(config_path: Option<&Path>, enable: &[String], disable: &[String]) -> Result<RuleSetConfig> {
    let defaults = RuleSetConfig::load_default_rules()?;
    let user = config_path
        .map(RuleSetConfig::load_from_file)
        .transpose()
        .context("Failed to load custom rules")?;

    let mut config = merge_rules(defaults, user);
    config.set_active_rules(enable, disable);
    config.validate()?;
    debug!("Effective rule set has {} rules.", config.rules.len());
    Ok(config)
}
