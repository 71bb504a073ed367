// tagguard-core/src/walker.rs
//! Fleet walk: evaluates every task definition, cluster and service of an
//! account and collects the verdicts into one ordered batch.
//!
//! Resources are evaluated one after another. Any inventory failure aborts
//! the walk; a partial batch is never returned.

use anyhow::{Context, Result};
use log::info;

use crate::evaluator::ResourceEvaluator;
use crate::inventory::{fetch_all, EcsInventory, DESCRIBE_SERVICES_BATCH};
use crate::verdict::{display_name, EvaluationBatch, ResourceKind};

pub struct FleetWalker<'a, 't> {
    inventory: &'a dyn EcsInventory,
    evaluator: &'a ResourceEvaluator<'t>,
}

impl<'a, 't> FleetWalker<'a, 't> {
    pub fn new(inventory: &'a dyn EcsInventory, evaluator: &'a ResourceEvaluator<'t>) -> Self {
        Self { inventory, evaluator }
    }

    /// Walks the fleet.
    ///
    /// Batch order: all task definitions, then for each cluster the cluster
    /// verdict followed by its services.
    pub async fn walk(&self) -> Result<EvaluationBatch> {
        let inventory = self.inventory;
        let mut batch = EvaluationBatch::new();

        let task_definition_arns = fetch_all(|token| inventory.list_task_definitions(token))
            .await
            .context("Failed to list task definitions")?;
        info!("Found {} task definitions.", task_definition_arns.len());

        for arn in &task_definition_arns {
            info!("Processing Task Definition: {}", display_name(arn));
            batch.push(
                self.evaluator
                    .evaluate_resource(inventory, arn, ResourceKind::TaskDefinition, None)
                    .await?,
            );
        }

        let cluster_arns = fetch_all(|token| inventory.list_clusters(token))
            .await
            .context("Failed to list clusters")?;
        info!("Found {} clusters.", cluster_arns.len());

        for cluster_arn in &cluster_arns {
            self.walk_cluster(cluster_arn, &mut batch).await?;
        }

        info!("Fleet walk produced {} verdicts.", batch.len());
        Ok(batch)
    }

    async fn walk_cluster(&self, cluster_arn: &str, batch: &mut EvaluationBatch) -> Result<()> {
        let inventory = self.inventory;
        info!("Processing Cluster: {}", display_name(cluster_arn));

        batch.push(
            self.evaluator
                .evaluate_resource(inventory, cluster_arn, ResourceKind::Cluster, None)
                .await?,
        );

        let service_arns = fetch_all(|token| inventory.list_services(cluster_arn, token))
            .await
            .with_context(|| format!("Failed to list services in {}", cluster_arn))?;
        if service_arns.is_empty() {
            return Ok(());
        }

        for chunk in service_arns.chunks(DESCRIBE_SERVICES_BATCH) {
            let services = inventory
                .describe_services(cluster_arn, chunk)
                .await
                .with_context(|| format!("Failed to describe services in {}", cluster_arn))?;

            for service in &services {
                info!("Processing Service: {}", service.service_name);
                batch.push(
                    self.evaluator
                        .evaluate_resource(
                            inventory,
                            &service.service_arn,
                            ResourceKind::Service,
                            Some(&service.service_name),
                        )
                        .await?,
                );
            }
        }
        Ok(())
    }
}
