// tagguard-core/src/aws/ecs.rs
//! ECS-backed implementation of `EcsInventory`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ecs::Client;
use log::debug;

use crate::classification::Tag;
use crate::inventory::{
    check_describe_failures, DescribeFailure, EcsInventory, Page, ServiceSummary, LIST_PAGE_SIZE,
};
use crate::verdict::display_name;

pub struct AwsEcsInventory {
    client: Client,
}

impl AwsEcsInventory {
    pub fn new(config: &SdkConfig) -> Self {
        Self { client: Client::new(config) }
    }
}

#[async_trait]
impl EcsInventory for AwsEcsInventory {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page<String>> {
        let output = self
            .client
            .list_clusters()
            .max_results(LIST_PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .context("ListClusters failed")?;

        Ok(Page {
            items: output.cluster_arns().to_vec(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn list_task_definitions(&self, next_token: Option<String>) -> Result<Page<String>> {
        let output = self
            .client
            .list_task_definitions()
            .max_results(LIST_PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .context("ListTaskDefinitions failed")?;

        Ok(Page {
            items: output.task_definition_arns().to_vec(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn list_services(&self, cluster_arn: &str, next_token: Option<String>) -> Result<Page<String>> {
        let output = self
            .client
            .list_services()
            .cluster(cluster_arn)
            .max_results(LIST_PAGE_SIZE)
            .set_next_token(next_token)
            .send()
            .await
            .context("ListServices failed")?;

        Ok(Page {
            items: output.service_arns().to_vec(),
            next_token: output.next_token().map(str::to_string),
        })
    }

    async fn describe_services(&self, cluster_arn: &str, service_arns: &[String]) -> Result<Vec<ServiceSummary>> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster_arn)
            .set_services(Some(service_arns.to_vec()))
            .send()
            .await
            .context("DescribeServices failed")?;

        let failures: Vec<DescribeFailure> = output
            .failures()
            .iter()
            .map(|f| DescribeFailure {
                arn: f.arn().map(str::to_string),
                reason: f.reason().map(str::to_string),
            })
            .collect();
        check_describe_failures(cluster_arn, &failures)?;
        debug!("Described {} of {} services in {}.", output.services().len(), service_arns.len(), cluster_arn);

        Ok(output
            .services()
            .iter()
            .filter_map(|s| {
                let arn = s.service_arn()?;
                Some(ServiceSummary {
                    service_arn: arn.to_string(),
                    service_name: s.service_name().unwrap_or_else(|| display_name(arn)).to_string(),
                })
            })
            .collect())
    }

    async fn list_tags_for_resource(&self, resource_arn: &str, _next_token: Option<String>) -> Result<Page<Tag>> {
        // ListTagsForResource returns every tag in one response.
        let output = self
            .client
            .list_tags_for_resource()
            .resource_arn(resource_arn)
            .send()
            .await
            .context("ListTagsForResource failed")?;

        Ok(Page::last(
            output
                .tags()
                .iter()
                .map(|t| Tag::new(t.key().unwrap_or_default(), t.value().unwrap_or_default()))
                .collect(),
        ))
    }
}
