//! Resource evaluation: turns the tags of one ECS resource into a single
//! compliance verdict with a human-readable annotation.
//!
//! The evaluator owns its classifier and annotation templates; both are
//! fixed at construction.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::classification::{compliant_count, render_results, Tag};
use crate::config::{AnnotationTemplates, RuleSetConfig};
use crate::engine::ClassificationEngine;
use crate::engines::regex_engine::RegexClassifier;
use crate::errors::TagGuardError;
use crate::inventory::{fetch_all, EcsInventory};
use crate::verdict::{
    display_name, is_legacy_service_arn, truncate_annotation, ComplianceType, ResourceKind, ResourceVerdict,
};

const NO_TAGS: &str = "no_tags";
const COMPLIANT: &str = "compliant";
const NON_COMPLIANT: &str = "non_compliant";
const LEGACY_ARN: &str = "legacy_arn";

#[derive(Serialize)]
struct AnnotationContext<'a> {
    name: &'a str,
    results: &'a str,
}

/// Parses and validates the four annotation templates.
fn template_engine(templates: &AnnotationTemplates) -> Result<TinyTemplate<'_>, TagGuardError> {
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    for (name, text) in [
        (NO_TAGS, &templates.no_tags),
        (COMPLIANT, &templates.compliant),
        (NON_COMPLIANT, &templates.non_compliant),
        (LEGACY_ARN, &templates.legacy_arn),
    ] {
        tt.add_template(name, text)
            .map_err(|e| TagGuardError::TemplateError(name.to_string(), e.to_string()))?;
    }
    Ok(tt)
}

/// Evaluates resources against one rule set. Borrows the annotation
/// templates of the `RuleSetConfig` it was built from.
pub struct ResourceEvaluator<'a> {
    classifier: Box<dyn ClassificationEngine>,
    required_compliant: usize,
    annotation_limit: usize,
    templates: TinyTemplate<'a>,
}

impl<'a> ResourceEvaluator<'a> {
    /// Builds an evaluator with a `RegexClassifier` over the config's rules.
    pub fn new(config: &'a RuleSetConfig) -> Result<Self> {
        let classifier = RegexClassifier::new(config)?;
        Self::with_classifier(config, Box::new(classifier))
    }

    pub fn with_classifier(config: &'a RuleSetConfig, classifier: Box<dyn ClassificationEngine>) -> Result<Self> {
        let templates = template_engine(&config.annotations).context("Invalid annotation templates")?;
        debug!(
            "Evaluator ready: {} compiled rules, {} compliant tags required.",
            classifier.compiled_rules().rules.len(),
            config.required_compliant
        );
        Ok(Self {
            classifier,
            required_compliant: config.required_compliant,
            annotation_limit: config.annotation_limit,
            templates,
        })
    }

    pub fn required_compliant(&self) -> usize {
        self.required_compliant
    }

    pub fn classifier(&self) -> &dyn ClassificationEngine {
        self.classifier.as_ref()
    }

    fn annotate(&self, template: &str, name: &str, results: &str) -> Result<String, TagGuardError> {
        let rendered = self
            .templates
            .render(template, &AnnotationContext { name, results })
            .map_err(|e| TagGuardError::TemplateError(template.to_string(), e.to_string()))?;
        Ok(truncate_annotation(&rendered, self.annotation_limit))
    }

    fn verdict(
        &self,
        resource_arn: &str,
        kind: ResourceKind,
        compliance: ComplianceType,
        template: &str,
        name: &str,
        results: &str,
    ) -> Result<ResourceVerdict, TagGuardError> {
        Ok(ResourceVerdict {
            resource_id: resource_arn.to_string(),
            kind,
            compliance,
            annotation: self.annotate(template, name, results)?,
        })
    }

    fn legacy_verdict(&self, resource_arn: &str, name: &str) -> Result<ResourceVerdict, TagGuardError> {
        info!("Service '{}' uses an old ARN format without tag support.", name);
        self.verdict(resource_arn, ResourceKind::Service, ComplianceType::NonCompliant, LEGACY_ARN, name, "")
    }

    /// Evaluates already-fetched tags.
    ///
    /// `name` is the display name used in the annotation. Services with a
    /// legacy ARN are NON_COMPLIANT whatever their tags.
    pub fn evaluate(
        &self,
        resource_arn: &str,
        kind: ResourceKind,
        name: &str,
        tags: &[Tag],
    ) -> Result<ResourceVerdict, TagGuardError> {
        if kind == ResourceKind::Service && is_legacy_service_arn(resource_arn) {
            return self.legacy_verdict(resource_arn, name);
        }
        if tags.is_empty() {
            return self.verdict(resource_arn, kind, ComplianceType::NonCompliant, NO_TAGS, name, "");
        }

        let classified = self.classifier.classify(tags);
        let count = compliant_count(&classified);
        debug!("{} '{}': {} of {} required tags compliant.", kind, name, count, self.required_compliant);

        if count == self.required_compliant {
            self.verdict(resource_arn, kind, ComplianceType::Compliant, COMPLIANT, name, "")
        } else {
            let results = render_results(&classified);
            self.verdict(resource_arn, kind, ComplianceType::NonCompliant, NON_COMPLIANT, name, &results)
        }
    }

    /// Evaluates a resource, fetching its tags from `inventory`.
    ///
    /// Services with a legacy ARN are NON_COMPLIANT without a tag fetch.
    /// `name` overrides the display name derived from the ARN.
    pub async fn evaluate_resource(
        &self,
        inventory: &dyn EcsInventory,
        resource_arn: &str,
        kind: ResourceKind,
        name: Option<&str>,
    ) -> Result<ResourceVerdict> {
        let name = name.unwrap_or_else(|| display_name(resource_arn));

        if kind == ResourceKind::Service && is_legacy_service_arn(resource_arn) {
            return Ok(self.legacy_verdict(resource_arn, name)?);
        }

        let tags = fetch_all(|token| inventory.list_tags_for_resource(resource_arn, token))
            .await
            .with_context(|| format!("Failed to list tags for {}", resource_arn))?;

        Ok(self.evaluate(resource_arn, kind, name, &tags)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{ClassifiedTag, TagVerdict};
    use crate::rules::compiler::CompiledRules;

    fn default_config() -> RuleSetConfig {
        RuleSetConfig::load_default_rules().unwrap()
    }

    fn compliant_tags() -> Vec<Tag> {
        vec![
            Tag::new("uai", "uai3001234"),
            Tag::new("env", "prd"),
            Tag::new("Name", "orders"),
        ]
    }

    #[test]
    fn empty_tags_are_non_compliant_for_every_kind() {
        let config = default_config();
        let ev = ResourceEvaluator::new(&config).unwrap();
        for kind in [ResourceKind::TaskDefinition, ResourceKind::Service, ResourceKind::Cluster] {
            let v = ev.evaluate("arn:aws:ecs:r:1:x/c/res", kind, "res", &[]).unwrap();
            assert_eq!(v.compliance, ComplianceType::NonCompliant);
            assert_eq!(v.annotation, "NO Tags at all on ECS Resource (res)");
            assert_eq!(v.kind, kind);
        }
    }

    #[test]
    fn one_good_tag_per_category_is_compliant() {
        let config = default_config();
        let v = ResourceEvaluator::new(&config)
            .unwrap()
            .evaluate("arn:aws:ecs:r:1:cluster/prod", ResourceKind::Cluster, "prod", &compliant_tags())
            .unwrap();
        assert_eq!(v.compliance, ComplianceType::Compliant);
        assert_eq!(v.annotation, "Tags are COMPLIANT on ECS Resource (prod)");
    }

    #[test]
    fn non_compliant_annotation_lists_results() {
        let mut tags = compliant_tags();
        tags[1] = Tag::new("env", "production");
        tags.push(Tag::new("owner", "team"));
        let config = default_config();
        let v = ResourceEvaluator::new(&config)
            .unwrap()
            .evaluate("arn", ResourceKind::TaskDefinition, "users:1", &tags)
            .unwrap();
        assert_eq!(v.compliance, ComplianceType::NonCompliant);
        assert_eq!(
            v.annotation,
            "One or More Tags are NON_COMPLIANT on ECS Resource (users:1). Results: \
             ([['uai', 'COMPLIANT'], ['env', 'NON_COMPLIANT'], ['Name', 'COMPLIANT'], 'NO_TAGS'])"
        );
    }

    #[test]
    fn extra_compliant_tags_break_exact_count() {
        let mut tags = compliant_tags();
        tags.push(Tag::new("app", "orders"));
        let config = default_config();
        let v = ResourceEvaluator::new(&config).unwrap().evaluate("arn", ResourceKind::Cluster, "c", &tags).unwrap();
        assert_eq!(v.compliance, ComplianceType::NonCompliant);
    }

    #[test]
    fn long_annotations_are_truncated_to_limit() {
        let tags: Vec<Tag> = (0..40).map(|i| Tag::new(format!("env{i}"), "bogus")).collect();
        let config = default_config();
        let v = ResourceEvaluator::new(&config).unwrap().evaluate("arn", ResourceKind::Cluster, "c", &tags).unwrap();
        assert_eq!(v.annotation.chars().count(), 255);
        assert!(v.annotation.starts_with("One or More Tags are NON_COMPLIANT on ECS Resource (c)."));
    }

    #[test]
    fn templates_are_configurable() {
        let mut config = default_config();
        config.annotations.no_tags = "{name} has no tags".to_string();
        config.annotation_limit = 10;
        let ev = ResourceEvaluator::new(&config).unwrap();
        let v = ev.evaluate("arn", ResourceKind::Cluster, "payments-cluster", &[]).unwrap();
        assert_eq!(v.annotation, "payments-c");
    }

    #[test]
    fn malformed_template_is_rejected_at_construction() {
        let mut config = default_config();
        config.annotations.compliant = "{name".to_string();
        assert!(ResourceEvaluator::new(&config).is_err());
    }

    struct AlwaysCompliant(CompiledRules);

    impl ClassificationEngine for AlwaysCompliant {
        fn classify(&self, tags: &[Tag]) -> Vec<ClassifiedTag> {
            tags.iter()
                .map(|t| ClassifiedTag { key: t.key.clone(), verdict: TagVerdict::Compliant, rule: None })
                .collect()
        }
        fn compiled_rules(&self) -> &CompiledRules {
            &self.0
        }
    }

    #[test]
    fn custom_classifier_is_used() {
        let mut config = RuleSetConfig::default();
        config.required_compliant = 1;
        let ev = ResourceEvaluator::with_classifier(
            &config,
            Box::new(AlwaysCompliant(CompiledRules { rules: Vec::new() })),
        )
        .unwrap();
        let v = ev
            .evaluate("arn:aws:ecs:r:1:service/c/svc", ResourceKind::Service, "svc", &[Tag::new("anything", "x y")])
            .unwrap();
        assert_eq!(v.compliance, ComplianceType::Compliant);
    }

    #[test]
    fn legacy_service_arn_is_non_compliant_even_with_good_tags() {
        let config = default_config();
        let ev = ResourceEvaluator::new(&config).unwrap();
        let arn = "arn:aws:ecs:us-east-1:123456789012:service/api";

        let v = ev.evaluate(arn, ResourceKind::Service, "api", &compliant_tags()).unwrap();
        assert_eq!(v.compliance, ComplianceType::NonCompliant);
        assert_eq!(v.annotation, "(api) uses old ARN and does not support TAGS");

        let v = ev.evaluate(arn, ResourceKind::Service, "api", &[]).unwrap();
        assert_eq!(v.compliance, ComplianceType::NonCompliant);
        assert_eq!(v.annotation, "(api) uses old ARN and does not support TAGS");
    }

    #[test]
    fn legacy_arn_shape_only_matters_for_services() {
        let config = default_config();
        let ev = ResourceEvaluator::new(&config).unwrap();
        let v = ev
            .evaluate("arn:aws:ecs:us-east-1:123456789012:cluster/api", ResourceKind::Cluster, "api", &compliant_tags())
            .unwrap();
        assert_eq!(v.compliance, ComplianceType::Compliant);
    }
}
