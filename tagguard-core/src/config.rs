//! Configuration management for `tagguard-core`.
//!
//! This module defines the data structures for tag rules, annotation templates and
//! evaluation thresholds. It handles YAML (de)serialization and provides utilities
//! for loading, merging, filtering and validating rule sets.
//!
//! License: MIT OR Apache-2.0

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Maximum allowed length for a value pattern string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// AWS Config rejects annotations longer than this.
pub const DEFAULT_ANNOTATION_LIMIT: usize = 255;

/// Number of rule categories a resource must pass to be COMPLIANT.
pub const DEFAULT_REQUIRED_COMPLIANT: usize = 3;

/// Whether a matching value pattern means the tag is compliant or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// The value must contain a match of the pattern.
    #[default]
    MustMatch,
    /// Any match of the pattern makes the tag NON_COMPLIANT.
    MustNotMatch,
}

/// Selects the tag keys a rule applies to by substring.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct KeyMatcher {
    /// Substring the tag key must contain.
    pub contains: String,
    /// Case-insensitive unless set.
    #[serde(default)]
    pub case_sensitive: bool,
}

impl KeyMatcher {
    pub fn matches(&self, key: &str) -> bool {
        if self.case_sensitive {
            key.contains(&self.contains)
        } else {
            key.to_lowercase().contains(&self.contains.to_lowercase())
        }
    }
}

/// A single tag rule: which keys it claims and what their values must look like.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TagRule {
    /// Unique identifier for the rule (e.g., "uai").
    pub name: String,
    /// Human-readable description of what the rule enforces.
    pub description: Option<String>,
    /// The rule claims a tag when any matcher hits its key.
    pub key_matchers: Vec<KeyMatcher>,
    /// Regex searched for in the tag value.
    pub value_pattern: Option<String>,
    pub polarity: Polarity,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
}

impl Default for TagRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            key_matchers: Vec::new(),
            value_pattern: None,
            polarity: Polarity::MustMatch,
            enabled: None,
        }
    }
}

impl TagRule {
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

/// Annotation templates rendered with TinyTemplate.
///
/// Available placeholders: `{name}` (resource display name) and `{results}`
/// (rendered tag classification, `non_compliant` only).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnnotationTemplates {
    pub no_tags: String,
    pub compliant: String,
    pub non_compliant: String,
    pub legacy_arn: String,
}

impl Default for AnnotationTemplates {
    fn default() -> Self {
        Self {
            no_tags: "NO Tags at all on ECS Resource ({name})".to_string(),
            compliant: "Tags are COMPLIANT on ECS Resource ({name})".to_string(),
            non_compliant:
                "One or More Tags are NON_COMPLIANT on ECS Resource ({name}). Results: ({results})"
                    .to_string(),
            legacy_arn: "({name}) uses old ARN and does not support TAGS".to_string(),
        }
    }
}

/// Represents the top-level rule set configuration for TagGuard.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RuleSetConfig {
    /// Ordered list of tag rules; the first rule claiming a key wins.
    pub rules: Vec<TagRule>,
    /// Compliant tag count a resource needs to be COMPLIANT.
    pub required_compliant: usize,
    /// Hard character limit applied to every annotation.
    pub annotation_limit: usize,
    pub annotations: AnnotationTemplates,
}

impl Default for RuleSetConfig {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            required_compliant: DEFAULT_REQUIRED_COMPLIANT,
            annotation_limit: DEFAULT_ANNOTATION_LIMIT,
            annotations: AnnotationTemplates::default(),
        }
    }
}

impl RuleSetConfig {
    /// Loads a rule set from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading custom rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RuleSetConfig = serde_yml::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        config.validate()?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());

        Ok(config)
    }

    /// Loads the built-in rule set from the embedded configuration.
    pub fn load_default_rules() -> Result<Self> {
        debug!("Loading default rules from embedded string...");
        let default_yaml = include_str!("../config/default_rules.yaml");
        let config: RuleSetConfig =
            serde_yml::from_str(default_yaml).context("Failed to parse default rules")?;

        debug!("Loaded {} default rules.", config.rules.len());
        Ok(config)
    }

    /// Rules that take part in classification.
    pub fn active_rules(&self) -> impl Iterator<Item = &TagRule> {
        self.rules.iter().filter(|r| r.is_enabled())
    }

    /// Filters active rules based on enable/disable lists provided via CLI.
    ///
    /// A non-empty `enable_rules` keeps only the named rules; `disable_rules`
    /// is applied afterwards.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();

        debug!("Initial rules count before filtering: {}", self.rules.len());

        let all_rule_names: HashSet<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();

        for rule_name in enable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `enable_rules` list does not exist.", rule_name);
        }

        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable_rules` list does not exist.", rule_name);
        }

        self.rules.retain(|rule| {
            let name = rule.name.as_str();
            !disable_set.contains(name) && (enable_set.is_empty() || enable_set.contains(name))
        });

        debug!("Final active rules count after filtering: {}", self.rules.len());
    }

    /// Validates rule integrity and thresholds.
    pub fn validate(&self) -> Result<()> {
        let mut errors = validate_rules(&self.rules);

        if self.annotation_limit == 0 {
            errors.push("`annotation_limit` must be greater than 0.".to_string());
        }
        if self.required_compliant == 0 {
            errors.push("`required_compliant` must be greater than 0.".to_string());
        }

        if !errors.is_empty() {
            return Err(anyhow!("Rule validation failed:\n{}", errors.join("\n")));
        }

        let active = self.active_rules().count();
        if self.required_compliant > active {
            warn!(
                "`required_compliant` is {} but only {} rules are active; no resource can be COMPLIANT.",
                self.required_compliant, active
            );
        }
        Ok(())
    }
}

/// Merges user-defined rules and settings over the defaults.
///
/// User rules replace default rules of the same name in place; new rules are
/// appended, so the first-match order of the defaults is kept.
pub fn merge_rules(default_config: RuleSetConfig, user_config: Option<RuleSetConfig>) -> RuleSetConfig {
    debug!("merge_rules called. Initial default rules count: {}", default_config.rules.len());

    let Some(user_cfg) = user_config else {
        return default_config;
    };

    debug!("User config provided. Merging {} user rules.", user_cfg.rules.len());
    let mut final_rules = default_config.rules;
    for user_rule in user_cfg.rules {
        match final_rules.iter_mut().find(|r| r.name == user_rule.name) {
            Some(existing) => *existing = user_rule,
            None => final_rules.push(user_rule),
        }
    }

    debug!("Final total rules after merge: {}", final_rules.len());

    RuleSetConfig {
        rules: final_rules,
        required_compliant: user_cfg.required_compliant,
        annotation_limit: user_cfg.annotation_limit,
        annotations: user_cfg.annotations,
    }
}

fn validate_rules(rules: &[TagRule]) -> Vec<String> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.clone()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        if rule.key_matchers.is_empty() {
            errors.push(format!("Rule '{}' has no `key_matchers`.", rule.name));
        }
        if rule.key_matchers.iter().any(|m| m.contains.is_empty()) {
            errors.push(format!("Rule '{}' has a key matcher with an empty `contains`.", rule.name));
        }

        let pattern = match &rule.value_pattern {
            Some(p) => p,
            None => {
                errors.push(format!("Rule '{}' is missing the `value_pattern` field.", rule.name));
                continue;
            }
        };

        if pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `value_pattern` field.", rule.name));
        } else if let Err(e) = Regex::new(pattern) {
            errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.name, e));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_matcher_case_handling() {
        let insensitive = KeyMatcher { contains: "uai".to_string(), case_sensitive: false };
        assert!(insensitive.matches("UAI-Code"));
        assert!(insensitive.matches("app-uai"));

        let sensitive = KeyMatcher { contains: "Name".to_string(), case_sensitive: true };
        assert!(sensitive.matches("Name"));
        assert!(sensitive.matches("ServiceName"));
        assert!(!sensitive.matches("name"));
    }

    #[test]
    fn default_rules_are_valid_and_ordered() {
        let config = RuleSetConfig::load_default_rules().unwrap();
        config.validate().unwrap();
        let names: Vec<&str> = config.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["uai", "env", "name_or_app"]);
        assert_eq!(config.required_compliant, 3);
        assert_eq!(config.annotation_limit, 255);
        assert_eq!(config.annotations, AnnotationTemplates::default());
    }

    #[test]
    fn set_active_rules_enable_then_disable() {
        let mut config = RuleSetConfig::load_default_rules().unwrap();
        config.set_active_rules(&["uai".to_string(), "env".to_string()], &["env".to_string()]);
        let names: Vec<&str> = config.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["uai"]);
    }

    #[test]
    fn validate_rejects_bad_rules() {
        let config = RuleSetConfig {
            rules: vec![
                TagRule {
                    name: "dup".to_string(),
                    key_matchers: vec![KeyMatcher { contains: "a".to_string(), case_sensitive: false }],
                    value_pattern: Some("(".to_string()),
                    ..Default::default()
                },
                TagRule {
                    name: "dup".to_string(),
                    value_pattern: Some("x".to_string()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid regex pattern"));
        assert!(err.contains("Duplicate rule name found: 'dup'."));
        assert!(err.contains("Rule 'dup' has no `key_matchers`."));
    }
}
