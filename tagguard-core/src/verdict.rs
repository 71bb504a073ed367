// tagguard-core/src/verdict.rs
//! Per-resource compliance verdicts and the batch a fleet walk produces.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The ECS resource kinds the rule evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    TaskDefinition,
    Service,
    Cluster,
}

impl ResourceKind {
    /// The AWS Config resource type string.
    pub fn resource_type(&self) -> &'static str {
        match self {
            ResourceKind::TaskDefinition => "AWS::ECS::TaskDefinition",
            ResourceKind::Service => "AWS::ECS::Service",
            ResourceKind::Cluster => "AWS::ECS::Cluster",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource_type())
    }
}

/// AWS Config compliance types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceType {
    Compliant,
    NonCompliant,
    NotApplicable,
    InsufficientData,
}

impl ComplianceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceType::Compliant => "COMPLIANT",
            ComplianceType::NonCompliant => "NON_COMPLIANT",
            ComplianceType::NotApplicable => "NOT_APPLICABLE",
            ComplianceType::InsufficientData => "INSUFFICIENT_DATA",
        }
    }
}

impl fmt::Display for ComplianceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of evaluating one resource in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceVerdict {
    pub resource_id: String,
    pub kind: ResourceKind,
    pub compliance: ComplianceType,
    /// Never longer than the configured annotation limit.
    pub annotation: String,
}

/// Verdicts of one fleet walk, in walk order.
pub type EvaluationBatch = Vec<ResourceVerdict>;

/// Cuts `annotation` to at most `limit` characters.
pub fn truncate_annotation(annotation: &str, limit: usize) -> String {
    match annotation.char_indices().nth(limit) {
        Some((byte_idx, _)) => annotation[..byte_idx].to_string(),
        None => annotation.to_string(),
    }
}

/// Short display name: everything after the last `/` of the identifier.
pub fn display_name(resource_arn: &str) -> &str {
    resource_arn.rsplit('/').next().unwrap_or(resource_arn)
}

/// Service ARNs without a cluster segment (fewer than two `/`) predate tag support.
///
/// Old: `arn:aws:ecs:us-east-1:123456789123:service/api`
/// New: `arn:aws:ecs:us-east-1:123456789123:service/cluster_name/api`
pub fn is_legacy_service_arn(service_arn: &str) -> bool {
    service_arn.matches('/').count() < 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_is_exact_and_char_safe() {
        let long = "x".repeat(300);
        assert_eq!(truncate_annotation(&long, 255).chars().count(), 255);
        assert_eq!(truncate_annotation("short", 255), "short");
        let exact = "y".repeat(255);
        assert_eq!(truncate_annotation(&exact, 255), exact);

        let wide = "é".repeat(300);
        let cut = truncate_annotation(&wide, 255);
        assert_eq!(cut.chars().count(), 255);
    }

    #[test]
    fn display_name_takes_last_segment() {
        assert_eq!(display_name("arn:aws:ecs:us-east-1:1:task-definition/users:1"), "users:1");
        assert_eq!(display_name("arn:aws:ecs:us-east-1:1:service/prod/api"), "api");
        assert_eq!(display_name("no-separator"), "no-separator");
    }

    #[test]
    fn legacy_service_arn_detection() {
        assert!(is_legacy_service_arn("service/api"));
        assert!(is_legacy_service_arn("arn:aws:ecs:us-east-1:123456789123:service/api"));
        assert!(!is_legacy_service_arn("arn:aws:ecs:us-east-1:123456789123:service/cluster_name/api"));
    }

    #[test]
    fn config_type_strings() {
        assert_eq!(ResourceKind::TaskDefinition.resource_type(), "AWS::ECS::TaskDefinition");
        assert_eq!(ResourceKind::Service.to_string(), "AWS::ECS::Service");
        assert_eq!(
            serde_json::to_string(&ComplianceType::NonCompliant).unwrap(),
            "\"NON_COMPLIANT\""
        );
    }
}
