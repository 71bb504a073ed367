// tagguard-core/src/inventory.rs
//! The ECS inventory collaborator and the pagination helper.
//!
//! `EcsInventory` is the seam between the evaluation logic and the ECS API:
//! the AWS adapter implements it with the SDK, tests implement it in memory.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::classification::Tag;

/// Page size requested from listing calls.
pub const LIST_PAGE_SIZE: i32 = 100;

/// DescribeServices accepts at most this many service ARNs per call.
pub const DESCRIBE_SERVICES_BATCH: usize = 10;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next_token: None }
    }
}

/// A described service: its ARN and short name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub service_arn: String,
    pub service_name: String,
}

/// Failure reason DescribeServices gives for a service that no longer exists.
pub const MISSING_REASON: &str = "MISSING";

/// One entry of a DescribeServices `failures` list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DescribeFailure {
    pub arn: Option<String>,
    pub reason: Option<String>,
}

/// Checks DescribeServices failures.
///
/// Services deleted since they were listed (`MISSING`) are skipped with a
/// warning. Any other failure is an error, so a service is never silently
/// dropped from the batch.
pub fn check_describe_failures(cluster_arn: &str, failures: &[DescribeFailure]) -> Result<()> {
    let mut fatal = Vec::new();
    for failure in failures {
        let arn = failure.arn.as_deref().unwrap_or("<unknown>");
        match failure.reason.as_deref() {
            Some(MISSING_REASON) => warn!("Service {} in {} disappeared before it could be described.", arn, cluster_arn),
            reason => fatal.push(format!("{} ({})", arn, reason.unwrap_or("no reason given"))),
        }
    }
    if fatal.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("DescribeServices failed in {} for: {}", cluster_arn, fatal.join(", ")))
    }
}

/// Read access to the ECS resources of one account and region.
#[async_trait]
pub trait EcsInventory: Send + Sync {
    async fn list_clusters(&self, next_token: Option<String>) -> Result<Page<String>>;

    async fn list_task_definitions(&self, next_token: Option<String>) -> Result<Page<String>>;

    async fn list_services(&self, cluster_arn: &str, next_token: Option<String>) -> Result<Page<String>>;

    /// Describes up to `DESCRIBE_SERVICES_BATCH` services of one cluster.
    ///
    /// Implementations fail rather than omit a service that could not be
    /// described, see `check_describe_failures`.
    async fn describe_services(&self, cluster_arn: &str, service_arns: &[String]) -> Result<Vec<ServiceSummary>>;

    async fn list_tags_for_resource(&self, resource_arn: &str, next_token: Option<String>) -> Result<Page<Tag>>;
}

/// Fetches every page of a listing, concatenating items in order.
///
/// `fetch` is called with `None` first, then with each continuation token
/// until a page arrives without one. Errors propagate immediately.
pub async fn fetch_all<T, F, Fut>(mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut next_token = None;
    let mut pages = 0usize;
    loop {
        let page = fetch(next_token.take()).await?;
        pages += 1;
        items.extend(page.items);
        match page.next_token {
            Some(token) if !token.is_empty() => next_token = Some(token),
            _ => break,
        }
    }
    debug!("Fetched {} items over {} page(s).", items.len(), pages);
    Ok(items)
}
