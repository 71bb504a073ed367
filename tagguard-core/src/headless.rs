// tagguard-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for evaluating tags without any AWS access.
//! Used for dry runs over exported tag lists and for rule authoring.

use anyhow::Result;

use crate::classification::{ClassifiedTag, Tag};
use crate::config::RuleSetConfig;
use crate::evaluator::ResourceEvaluator;
use crate::verdict::{display_name, ResourceKind, ResourceVerdict};

/// The classification and verdict for one resource's tags.
#[derive(Debug, Clone)]
pub struct HeadlessEvaluation {
    pub classified: Vec<ClassifiedTag>,
    pub verdict: ResourceVerdict,
}

/// Classifies `tags` and evaluates them as `kind`, in one call.
///
/// # Arguments
///
/// * `config` - The merged rule set (defaults + optional user overrides).
/// * `resource_arn` - Identifier used for the verdict and its display name.
/// * `kind` - The resource kind to evaluate as.
/// * `tags` - The tags to judge.
pub fn headless_evaluate_tags(
    config: &RuleSetConfig,
    resource_arn: &str,
    kind: ResourceKind,
    tags: &[Tag],
) -> Result<HeadlessEvaluation> {
    let evaluator = ResourceEvaluator::new(config)?;
    let classified = evaluator.classifier().classify(tags);
    let verdict = evaluator.evaluate(resource_arn, kind, display_name(resource_arn), tags)?;
    Ok(HeadlessEvaluation { classified, verdict })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::TagVerdict;
    use crate::verdict::ComplianceType;

    #[test]
    fn test_headless_evaluate_tags() -> Result<()> {
        let config = RuleSetConfig::load_default_rules()?;
        let tags = vec![
            Tag::new("uai", "uai1234567"),
            Tag::new("env", "dev"),
            Tag::new("app", "checkout"),
        ];
        let result = headless_evaluate_tags(
            &config,
            "arn:aws:ecs:us-east-1:123456789012:cluster/checkout",
            ResourceKind::Cluster,
            &tags,
        )?;

        assert!(result.classified.iter().all(|c| c.verdict == TagVerdict::Compliant));
        assert_eq!(result.verdict.compliance, ComplianceType::Compliant);
        assert_eq!(result.verdict.annotation, "Tags are COMPLIANT on ECS Resource (checkout)");
        Ok(())
    }

    #[test]
    fn test_headless_legacy_service_arn() -> Result<()> {
        let config = RuleSetConfig::load_default_rules()?;
        let tags = vec![
            Tag::new("uai", "uai1234567"),
            Tag::new("env", "prd"),
            Tag::new("Name", "api"),
        ];
        let result = headless_evaluate_tags(
            &config,
            "arn:aws:ecs:us-east-1:123456789012:service/api",
            ResourceKind::Service,
            &tags,
        )?;

        assert_eq!(result.classified.len(), 3);
        assert_eq!(result.verdict.compliance, ComplianceType::NonCompliant);
        assert_eq!(result.verdict.annotation, "(api) uses old ARN and does not support TAGS");
        Ok(())
    }
}
