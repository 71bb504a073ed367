// tagguard-core/src/lib.rs
//! # TagGuard Core Library
//!
//! `tagguard-core` implements an AWS Config custom rule that checks the tags of
//! Amazon ECS task definitions, clusters and services. It defines the tag rule
//! configuration, compiles it into a classifier, turns classified tags into
//! per-resource verdicts, walks a whole account's ECS fleet and reports the
//! resulting batch back to AWS Config.
//!
//! ## Modules
//!
//! * `config`: Defines `TagRule`s and `RuleSetConfig` (YAML, defaults, merging, validation).
//! * `rules`: Compiles rules into `CompiledRules`.
//! * `engine`: Defines the `ClassificationEngine` trait.
//! * `engines`: Concrete classifiers (`RegexClassifier`).
//! * `classification`: `Tag`, `ClassifiedTag` and rendering helpers.
//! * `verdict`: `ResourceVerdict`, `ResourceKind`, `ComplianceType`, annotation truncation.
//! * `evaluator`: The per-resource `ResourceEvaluator`.
//! * `inventory`: The `EcsInventory` collaborator trait and pagination.
//! * `walker`: The `FleetWalker` producing an `EvaluationBatch`.
//! * `reporter`: The `Reporter`, `EvaluationSink` trait and stale-evaluation cleanup.
//! * `managed_rule`: Typed managed Config rule parameters.
//! * `aws`: AWS SDK implementations of the collaborator traits.
//! * `headless`: One-shot evaluation of a tag list without AWS access.
//!
//! ## Usage Example
//!
//! ```rust
//! use tagguard_core::{headless_evaluate_tags, ComplianceType, ResourceKind, RuleSetConfig, Tag};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = RuleSetConfig::load_default_rules()?;
//!     let tags = vec![
//!         Tag::new("uai", "uai1234567"),
//!         Tag::new("env", "prd"),
//!         Tag::new("Name", "orders"),
//!     ];
//!     let result = headless_evaluate_tags(
//!         &config,
//!         "arn:aws:ecs:us-east-1:123456789012:cluster/orders",
//!         ResourceKind::Cluster,
//!         &tags,
//!     )?;
//!     assert_eq!(result.verdict.compliance, ComplianceType::Compliant);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return `anyhow::Result`; configuration and parameter
//! problems surface as `TagGuardError` variants. Collaborator failures are
//! never swallowed: they abort the walk or the report.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod aws;
pub mod classification;
pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod evaluator;
pub mod headless;
pub mod inventory;
pub mod managed_rule;
pub mod reporter;
pub mod rules;
pub mod verdict;
pub mod walker;

/// Re-exports the configuration types and functions for managing tag rules.
pub use config::{
    merge_rules, AnnotationTemplates, KeyMatcher, Polarity, RuleSetConfig, TagRule,
    DEFAULT_ANNOTATION_LIMIT, DEFAULT_REQUIRED_COMPLIANT, MAX_PATTERN_LENGTH,
};

pub use errors::TagGuardError;

pub use classification::{ClassifiedTag, Tag, TagVerdict};
pub use engine::ClassificationEngine;
pub use engines::regex_engine::RegexClassifier;
pub use evaluator::ResourceEvaluator;
pub use verdict::{ComplianceType, EvaluationBatch, ResourceKind, ResourceVerdict};

pub use inventory::{fetch_all, EcsInventory, Page, ServiceSummary};
pub use walker::FleetWalker;
pub use reporter::{Evaluation, EvaluationSink, PriorEvaluation, ReportSummary, Reporter};

pub use managed_rule::{ManagedRule, MaximumExecutionFrequency};

pub use headless::{headless_evaluate_tags, HeadlessEvaluation};

pub use rules::compiler::{compile_rules, CompiledRule, CompiledRules};
