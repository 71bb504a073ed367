// tagguard-core/src/aws/config_service.rs
//! AWS Config-backed implementation of `EvaluationSink`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_config::primitives::DateTime;
use aws_sdk_config::types::{ComplianceType as SdkComplianceType, Evaluation as SdkEvaluation};
use aws_sdk_config::Client;
use std::collections::HashSet;

use crate::inventory::{fetch_all, Page};
use crate::reporter::{Evaluation, EvaluationSink, PriorEvaluation};
use crate::verdict::ComplianceType;

/// GetComplianceDetailsByConfigRule page size limit.
const COMPLIANCE_PAGE_SIZE: i32 = 100;

pub struct AwsConfigSink {
    client: Client,
}

impl AwsConfigSink {
    pub fn new(config: &SdkConfig) -> Self {
        Self { client: Client::new(config) }
    }

    async fn compliance_page(&self, config_rule_name: &str, next_token: Option<String>) -> Result<Page<PriorEvaluation>> {
        let output = self
            .client
            .get_compliance_details_by_config_rule()
            .config_rule_name(config_rule_name)
            .compliance_types(SdkComplianceType::Compliant)
            .compliance_types(SdkComplianceType::NonCompliant)
            .limit(COMPLIANCE_PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .context("GetComplianceDetailsByConfigRule failed")?;

        let items = output
            .evaluation_results()
            .iter()
            .filter_map(|r| {
                let qualifier = r.evaluation_result_identifier()?.evaluation_result_qualifier()?;
                Some(PriorEvaluation {
                    resource_id: qualifier.resource_id()?.to_string(),
                    resource_type: qualifier.resource_type()?.to_string(),
                })
            })
            .collect();

        Ok(Page { items, next_token: output.next_token().map(str::to_string) })
    }
}

fn to_sdk_evaluation(evaluation: &Evaluation) -> Result<SdkEvaluation> {
    let compliance_type = match evaluation.compliance_type {
        ComplianceType::Compliant => SdkComplianceType::Compliant,
        ComplianceType::NonCompliant => SdkComplianceType::NonCompliant,
        ComplianceType::NotApplicable => SdkComplianceType::NotApplicable,
        ComplianceType::InsufficientData => SdkComplianceType::InsufficientData,
    };

    SdkEvaluation::builder()
        .compliance_resource_type(&evaluation.resource_type)
        .compliance_resource_id(&evaluation.resource_id)
        .compliance_type(compliance_type)
        .set_annotation(evaluation.annotation.clone())
        .ordering_timestamp(DateTime::from_millis(evaluation.ordering_timestamp.timestamp_millis()))
        .build()
        .with_context(|| format!("Invalid evaluation for {}", evaluation.resource_id))
}

#[async_trait]
impl EvaluationSink for AwsConfigSink {
    async fn previous_evaluations(&self, config_rule_name: &str) -> Result<Vec<PriorEvaluation>> {
        fetch_all(|token| self.compliance_page(config_rule_name, token)).await
    }

    async fn put_evaluations(
        &self,
        result_token: &str,
        evaluations: &[Evaluation],
        test_mode: bool,
    ) -> Result<Vec<Evaluation>> {
        let sdk_evaluations = evaluations
            .iter()
            .map(to_sdk_evaluation)
            .collect::<Result<Vec<_>>>()?;

        let output = self
            .client
            .put_evaluations()
            .result_token(result_token)
            .set_evaluations(Some(sdk_evaluations))
            .test_mode(test_mode)
            .send()
            .await
            .context("PutEvaluations failed")?;

        let failed: HashSet<&str> = output
            .failed_evaluations()
            .iter()
            .map(|e| e.compliance_resource_id())
            .collect();

        Ok(evaluations
            .iter()
            .filter(|e| failed.contains(e.resource_id.as_str()))
            .cloned()
            .collect())
    }
}
