// tagguard-core/src/engines/regex_engine.rs
//! A `ClassificationEngine` implementation that judges tag values with the
//! regular expressions of the configured rule set.
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::debug;

use crate::classification::{ClassifiedTag, Tag, TagVerdict};
use crate::config::RuleSetConfig;
use crate::engine::ClassificationEngine;
use crate::rules::compiler::{compile_rules, CompiledRules};

#[derive(Debug)]
pub struct RegexClassifier {
    compiled_rules: CompiledRules,
}

impl RegexClassifier {
    pub fn new(config: &RuleSetConfig) -> Result<Self> {
        let compiled_rules = compile_rules(config.rules.clone())
            .context("Failed to compile tag rules for RegexClassifier")?;
        Ok(Self { compiled_rules })
    }

    fn classify_one(&self, tag: &Tag) -> ClassifiedTag {
        let Some(rule) = self.compiled_rules.rule_for(&tag.key) else {
            debug!("Tag '{}' is not claimed by any rule.", tag.key);
            return ClassifiedTag { key: tag.key.clone(), verdict: TagVerdict::Unrecognized, rule: None };
        };

        let verdict = if rule.accepts(&tag.value) {
            TagVerdict::Compliant
        } else {
            TagVerdict::NonCompliant
        };
        debug!("Tag '{}' checked by rule '{}': {}", tag.key, rule.name, verdict);

        ClassifiedTag { key: tag.key.clone(), verdict, rule: Some(rule.name.clone()) }
    }
}

impl ClassificationEngine for RegexClassifier {
    fn classify(&self, tags: &[Tag]) -> Vec<ClassifiedTag> {
        tags.iter().map(|t| self.classify_one(t)).collect()
    }

    fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled_rules
    }
}
