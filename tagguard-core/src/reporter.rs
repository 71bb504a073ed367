// tagguard-core/src/reporter.rs
//! Hands an evaluation batch to AWS Config and reconciles it with what the
//! rule reported before.
//!
//! Resources that were reported as COMPLIANT or NON_COMPLIANT by an earlier
//! pass but are missing from the current batch (deleted services, removed
//! task definitions) are re-reported as NOT_APPLICABLE so stale results do
//! not linger in the Config console.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::verdict::{ComplianceType, EvaluationBatch, ResourceVerdict};

/// PutEvaluations accepts at most this many evaluations per call.
pub const PUT_EVALUATIONS_BATCH: usize = 100;

/// Resource type used for the "evaluation ran, nothing found" marker.
pub const DEFAULT_RESOURCE_TYPE: &str = "AWS::::Account";

/// One evaluation as delivered to AWS Config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub resource_id: String,
    pub resource_type: String,
    pub compliance_type: ComplianceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    pub ordering_timestamp: DateTime<Utc>,
}

impl Evaluation {
    pub fn from_verdict(verdict: &ResourceVerdict, ordering_timestamp: DateTime<Utc>) -> Self {
        Self {
            resource_id: verdict.resource_id.clone(),
            resource_type: verdict.kind.resource_type().to_string(),
            compliance_type: verdict.compliance,
            annotation: Some(verdict.annotation.clone()),
            ordering_timestamp,
        }
    }

    pub fn not_applicable(resource_id: &str, resource_type: &str, ordering_timestamp: DateTime<Utc>) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            resource_type: resource_type.to_string(),
            compliance_type: ComplianceType::NotApplicable,
            annotation: None,
            ordering_timestamp,
        }
    }
}

/// A resource the rule reported on in an earlier pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorEvaluation {
    pub resource_id: String,
    pub resource_type: String,
}

/// The AWS Config side of the reporting protocol.
#[async_trait]
pub trait EvaluationSink: Send + Sync {
    /// Every COMPLIANT or NON_COMPLIANT result currently recorded for the rule.
    async fn previous_evaluations(&self, config_rule_name: &str) -> Result<Vec<PriorEvaluation>>;

    /// Delivers up to `PUT_EVALUATIONS_BATCH` evaluations; returns the ones Config rejected.
    async fn put_evaluations(
        &self,
        result_token: &str,
        evaluations: &[Evaluation],
        test_mode: bool,
    ) -> Result<Vec<Evaluation>>;
}

/// Counts from one report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub reported: usize,
    pub stale: usize,
    pub failed: usize,
}

pub struct Reporter<'a> {
    sink: &'a dyn EvaluationSink,
    config_rule_name: String,
    result_token: String,
    account_id: String,
    test_mode: bool,
}

impl<'a> Reporter<'a> {
    pub fn new(
        sink: &'a dyn EvaluationSink,
        config_rule_name: impl Into<String>,
        result_token: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            config_rule_name: config_rule_name.into(),
            result_token: result_token.into(),
            account_id: account_id.into(),
            test_mode: false,
        }
    }

    /// Evaluations are validated by Config but not recorded.
    pub fn test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Builds the full evaluation list: current verdicts, then stale resources
    /// as NOT_APPLICABLE. An empty result gets the account marker.
    pub fn build_evaluations(
        &self,
        batch: &EvaluationBatch,
        prior: &[PriorEvaluation],
        ordering_timestamp: DateTime<Utc>,
    ) -> (Vec<Evaluation>, usize) {
        let mut evaluations: Vec<Evaluation> = batch
            .iter()
            .map(|v| Evaluation::from_verdict(v, ordering_timestamp))
            .collect();

        let mut seen: HashSet<&str> = batch.iter().map(|v| v.resource_id.as_str()).collect();
        let mut stale = 0;
        for old in prior {
            if seen.insert(old.resource_id.as_str()) {
                debug!("Marking stale evaluation NOT_APPLICABLE: {}", old.resource_id);
                evaluations.push(Evaluation::not_applicable(&old.resource_id, &old.resource_type, ordering_timestamp));
                stale += 1;
            }
        }

        if evaluations.is_empty() {
            info!("No ECS resources found; reporting NOT_APPLICABLE for account {}.", self.account_id);
            evaluations.push(Evaluation::not_applicable(&self.account_id, DEFAULT_RESOURCE_TYPE, ordering_timestamp));
        }

        (evaluations, stale)
    }

    /// Reconciles and delivers the batch.
    pub async fn report(&self, batch: &EvaluationBatch, ordering_timestamp: DateTime<Utc>) -> Result<ReportSummary> {
        let prior = self
            .sink
            .previous_evaluations(&self.config_rule_name)
            .await
            .with_context(|| format!("Failed to fetch previous evaluations for rule {}", self.config_rule_name))?;

        let (evaluations, stale) = self.build_evaluations(batch, &prior, ordering_timestamp);

        let mut failed = 0;
        for chunk in evaluations.chunks(PUT_EVALUATIONS_BATCH) {
            let rejected = self
                .sink
                .put_evaluations(&self.result_token, chunk, self.test_mode)
                .await
                .context("Failed to put evaluations")?;
            for evaluation in &rejected {
                warn!("AWS Config rejected the evaluation for {}.", evaluation.resource_id);
            }
            failed += rejected.len();
        }

        let summary = ReportSummary { reported: evaluations.len(), stale, failed };
        info!(
            "Reported {} evaluations ({} stale, {} rejected) for rule {}.",
            summary.reported, summary.stale, summary.failed, self.config_rule_name
        );
        Ok(summary)
    }
}
