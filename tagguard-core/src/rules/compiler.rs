//! compiler.rs - Compiles tag rules into matchers.
//!
//! This module converts the enabled `TagRule`s of a `RuleSetConfig` into
//! `CompiledRules`, which are consulted for every tag during classification.
//!
//! License: MIT OR APACHE 2.0

use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::config::{KeyMatcher, Polarity, TagRule, MAX_PATTERN_LENGTH};
use crate::errors::TagGuardError;

/// Represents a single compiled tag rule.
#[derive(Debug)]
pub struct CompiledRule {
    /// The unique name of the tag rule.
    pub name: String,
    /// Matchers deciding whether the rule claims a tag key.
    pub key_matchers: Vec<KeyMatcher>,
    /// The compiled value regex.
    pub regex: Regex,
    pub polarity: Polarity,
}

impl CompiledRule {
    /// Returns true if any key matcher hits `key`.
    pub fn claims(&self, key: &str) -> bool {
        self.key_matchers.iter().any(|m| m.matches(key))
    }

    /// Returns true if `value` satisfies the rule.
    pub fn accepts(&self, value: &str) -> bool {
        let found = self.regex.is_match(value);
        match self.polarity {
            Polarity::MustMatch => found,
            Polarity::MustNotMatch => !found,
        }
    }
}

/// The ordered collection of compiled rules.
#[derive(Debug)]
pub struct CompiledRules {
    pub rules: Vec<CompiledRule>,
}

impl CompiledRules {
    /// The first rule claiming `key`, if any.
    pub fn rule_for(&self, key: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.claims(key))
    }
}

/// Compiles a list of `TagRule`s into `CompiledRules`, skipping disabled rules.
///
/// All errors are collected and reported together.
pub fn compile_rules(rules_to_compile: Vec<TagRule>) -> Result<CompiledRules, TagGuardError> {
    debug!("Starting compilation of {} rules.", rules_to_compile.len());

    let mut compiled_rules = Vec::new();
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        if !rule.is_enabled() {
            debug!("Skipping disabled rule '{}'.", rule.name);
            continue;
        }

        let Some(pattern) = rule.value_pattern.as_ref() else {
            warn!("Skipping rule '{}' because its value pattern is missing.", &rule.name);
            continue;
        };

        if pattern.len() > MAX_PATTERN_LENGTH {
            compilation_errors.push(TagGuardError::PatternLengthExceeded(
                rule.name,
                pattern.len(),
                MAX_PATTERN_LENGTH,
            ));
            continue;
        }

        let regex_result = RegexBuilder::new(pattern)
            .size_limit(1 << 20)
            .build();

        match regex_result {
            Ok(regex) => {
                debug!(
                    target: "tagguard_core::rules",
                    "Rule '{}' compiled successfully.",
                    &rule.name
                );
                compiled_rules.push(CompiledRule {
                    name: rule.name,
                    key_matchers: rule.key_matchers,
                    regex,
                    polarity: rule.polarity,
                });
            }
            Err(e) => {
                compilation_errors.push(TagGuardError::RuleCompilationError(rule.name, e));
            }
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        return Err(TagGuardError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )));
    }

    debug!("Finished compiling rules. Total compiled: {}.", compiled_rules.len());
    Ok(CompiledRules { rules: compiled_rules })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSetConfig;

    fn rule(name: &str, contains: &str, pattern: &str) -> TagRule {
        TagRule {
            name: name.to_string(),
            key_matchers: vec![KeyMatcher { contains: contains.to_string(), case_sensitive: false }],
            value_pattern: Some(pattern.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn compiles_default_rules_in_order() {
        let config = RuleSetConfig::load_default_rules().unwrap();
        let compiled = compile_rules(config.rules).unwrap();
        assert_eq!(compiled.rules.len(), 3);
        assert_eq!(compiled.rule_for("APP_UAI").unwrap().name, "uai");
        assert_eq!(compiled.rule_for("Environment").unwrap().name, "env");
        assert_eq!(compiled.rule_for("Name").unwrap().name, "name_or_app");
        assert!(compiled.rule_for("owner").is_none());
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let mut disabled = rule("off", "x", "x");
        disabled.enabled = Some(false);
        let compiled = compile_rules(vec![disabled, rule("on", "y", "y")]).unwrap();
        assert_eq!(compiled.rules.len(), 1);
        assert_eq!(compiled.rules[0].name, "on");
    }

    #[test]
    fn reports_every_bad_rule() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = compile_rules(vec![rule("bad", "b", "(unclosed"), rule("long", "l", &long)])
            .unwrap_err()
            .to_string();
        assert!(err.contains("Failed to compile 2 rule(s)"));
        assert!(err.contains("Failed to compile tag rule 'bad'"));
        assert!(err.contains("Rule 'long': pattern length (501) exceeds maximum allowed (500)"));
    }

    #[test]
    fn polarity_inverts_acceptance() {
        let mut no_space = rule("name", "name", r"\s");
        no_space.polarity = Polarity::MustNotMatch;
        let compiled = compile_rules(vec![no_space]).unwrap();
        assert!(compiled.rules[0].accepts("web-api"));
        assert!(!compiled.rules[0].accepts("web api"));
    }
}
