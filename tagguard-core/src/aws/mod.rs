// tagguard-core/src/aws/mod.rs
//! AWS SDK implementations of the inventory and reporting collaborators.

use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_ecs::config::SharedCredentialsProvider;
use log::info;

pub mod config_service;
pub mod ecs;

pub use config_service::AwsConfigSink;
pub use ecs::AwsEcsInventory;

/// Session name used when assuming the Config service role.
pub const ASSUME_ROLE_SESSION_NAME: &str = "tagguard-evaluation";

/// Loads the shared SDK configuration.
///
/// With `assume_role_arn`, credentials come from STS for that role, which is
/// how the rule evaluates resources in another account.
pub async fn load_sdk_config(region: Option<String>, assume_role_arn: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    let base = loader.load().await;

    let Some(role_arn) = assume_role_arn else {
        return base;
    };

    info!("Assuming role {} for evaluation.", role_arn);
    let provider = AssumeRoleProvider::builder(role_arn)
        .session_name(ASSUME_ROLE_SESSION_NAME)
        .configure(&base)
        .build()
        .await;

    base.into_builder()
        .credentials_provider(SharedCredentialsProvider::new(provider))
        .build()
}
