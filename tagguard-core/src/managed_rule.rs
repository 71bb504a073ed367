//! managed_rule.rs - AWS managed Config rule definitions.
//!
//! Parses the `parameters.json` of a managed rule into a typed `ManagedRule`.
//! Every string that names an AWS enumeration (rule identifier, execution
//! frequency, resource type) is resolved through an explicit table, and an
//! unknown value fails with a descriptive `TagGuardError::InvalidParameter`.
//!
//! License: MIT OR Apache-2.0

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

use crate::errors::TagGuardError;

const MANAGED_RULES_DOC: &str =
    "https://docs.aws.amazon.com/config/latest/developerguide/managed-rules-by-aws-config.html";
const FREQUENCY_DOC: &str = "https://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide/aws-resource-config-configrule.html#cfn-config-configrule-maximumexecutionfrequency";
const RESOURCE_TYPES_DOC: &str =
    "https://docs.aws.amazon.com/config/latest/developerguide/resource-config-reference.html";
const INPUT_PARAMETERS_DOC: &str =
    "https://docs.aws.amazon.com/config/latest/developerguide/evaluate-config_develop-rules_example.html";

/// Managed rule identifiers this deployer knows about.
const MANAGED_RULE_IDENTIFIERS: &[&str] = &[
    "ACCESS_KEYS_ROTATED",
    "ACCOUNT_PART_OF_ORGANIZATIONS",
    "ACM_CERTIFICATE_EXPIRATION_CHECK",
    "ALB_HTTP_TO_HTTPS_REDIRECTION_CHECK",
    "API_GW_EXECUTION_LOGGING_ENABLED",
    "APPROVED_AMIS_BY_ID",
    "APPROVED_AMIS_BY_TAG",
    "AUTOSCALING_GROUP_ELB_HEALTHCHECK_REQUIRED",
    "CLOUD_TRAIL_ENABLED",
    "CLOUD_TRAIL_ENCRYPTION_ENABLED",
    "CLOUD_TRAIL_LOG_FILE_VALIDATION_ENABLED",
    "CLOUDWATCH_ALARM_ACTION_CHECK",
    "CLOUDWATCH_LOG_GROUP_ENCRYPTED",
    "DB_INSTANCE_BACKUP_ENABLED",
    "DESIRED_INSTANCE_TENANCY",
    "DESIRED_INSTANCE_TYPE",
    "DYNAMODB_TABLE_ENCRYPTED_KMS",
    "DYNAMODB_THROUGHPUT_LIMIT_CHECK",
    "EBS_OPTIMIZED_INSTANCE",
    "EC2_EBS_ENCRYPTION_BY_DEFAULT",
    "EC2_INSTANCE_DETAILED_MONITORING_ENABLED",
    "EC2_INSTANCE_MANAGED_BY_SSM",
    "EC2_INSTANCE_NO_PUBLIC_IP",
    "EC2_STOPPED_INSTANCE",
    "EC2_VOLUME_INUSE_CHECK",
    "ECS_CONTAINERS_NONPRIVILEGED",
    "ECS_CONTAINERS_READONLY_ACCESS",
    "ECS_TASK_DEFINITION_USER_FOR_HOST_MODE_CHECK",
    "EFS_ENCRYPTED_CHECK",
    "EIP_ATTACHED",
    "EKS_ENDPOINT_NO_PUBLIC_ACCESS",
    "ELB_LOGGING_ENABLED",
    "ENCRYPTED_VOLUMES",
    "GUARDDUTY_ENABLED_CENTRALIZED",
    "IAM_GROUP_HAS_USERS_CHECK",
    "IAM_PASSWORD_POLICY",
    "IAM_POLICY_NO_STATEMENTS_WITH_ADMIN_ACCESS",
    "IAM_ROOT_ACCESS_KEY_CHECK",
    "IAM_USER_MFA_ENABLED",
    "IAM_USER_NO_POLICIES_CHECK",
    "INCOMING_SSH_DISABLED",
    "INSTANCES_IN_VPC",
    "LAMBDA_CONCURRENCY_CHECK",
    "LAMBDA_FUNCTION_PUBLIC_ACCESS_PROHIBITED",
    "LAMBDA_INSIDE_VPC",
    "MFA_ENABLED_FOR_IAM_CONSOLE_ACCESS",
    "MULTI_REGION_CLOUD_TRAIL_ENABLED",
    "RDS_INSTANCE_PUBLIC_ACCESS_CHECK",
    "RDS_MULTI_AZ_SUPPORT",
    "RDS_SNAPSHOTS_PUBLIC_PROHIBITED",
    "RDS_STORAGE_ENCRYPTED",
    "REQUIRED_TAGS",
    "RESTRICTED_INCOMING_TRAFFIC",
    "ROOT_ACCOUNT_MFA_ENABLED",
    "S3_BUCKET_LOGGING_ENABLED",
    "S3_BUCKET_PUBLIC_READ_PROHIBITED",
    "S3_BUCKET_PUBLIC_WRITE_PROHIBITED",
    "S3_BUCKET_SERVER_SIDE_ENCRYPTION_ENABLED",
    "S3_BUCKET_SSL_REQUESTS_ONLY",
    "S3_BUCKET_VERSIONING_ENABLED",
    "SECRETSMANAGER_ROTATION_ENABLED_CHECK",
    "SECURITYHUB_ENABLED",
    "SNS_ENCRYPTED_KMS",
    "VPC_DEFAULT_SECURITY_GROUP_CLOSED",
    "VPC_FLOW_LOGS_ENABLED",
    "VPC_SG_OPEN_ONLY_TO_AUTHORIZED_PORTS",
];

/// Resource types accepted in `SourceEvents`.
const RESOURCE_TYPES: &[&str] = &[
    "AWS::ACM::Certificate",
    "AWS::ApiGateway::RestApi",
    "AWS::ApiGateway::Stage",
    "AWS::AutoScaling::AutoScalingGroup",
    "AWS::CloudFormation::Stack",
    "AWS::CloudTrail::Trail",
    "AWS::CloudWatch::Alarm",
    "AWS::DynamoDB::Table",
    "AWS::EC2::Instance",
    "AWS::EC2::SecurityGroup",
    "AWS::EC2::Subnet",
    "AWS::EC2::Volume",
    "AWS::EC2::VPC",
    "AWS::ECR::Repository",
    "AWS::ECS::Cluster",
    "AWS::ECS::Service",
    "AWS::ECS::TaskDefinition",
    "AWS::EFS::FileSystem",
    "AWS::EKS::Cluster",
    "AWS::ElasticLoadBalancingV2::LoadBalancer",
    "AWS::IAM::Group",
    "AWS::IAM::Policy",
    "AWS::IAM::Role",
    "AWS::IAM::User",
    "AWS::KMS::Key",
    "AWS::Lambda::Function",
    "AWS::RDS::DBInstance",
    "AWS::RDS::DBSnapshot",
    "AWS::S3::Bucket",
    "AWS::SecretsManager::Secret",
    "AWS::SNS::Topic",
    "AWS::SQS::Queue",
];

/// The normalised form used for table lookups: upper case, `-` as `_`.
fn normalise(value: &str) -> String {
    value.trim().to_uppercase().replace('-', "_")
}

/// A managed rule identifier resolved through the identifier table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagedRuleIdentifier(&'static str);

impl ManagedRuleIdentifier {
    pub fn parse(value: &str) -> Result<Self, TagGuardError> {
        let wanted = normalise(value);
        MANAGED_RULE_IDENTIFIERS
            .iter()
            .find(|id| **id == wanted)
            .map(|id| ManagedRuleIdentifier(*id))
            .ok_or_else(|| TagGuardError::InvalidParameter {
                field: "SourceIdentifier",
                value: value.to_string(),
                reference: MANAGED_RULES_DOC,
            })
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ManagedRuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MaximumExecutionFrequency {
    OneHour,
    ThreeHours,
    SixHours,
    TwelveHours,
    #[default]
    TwentyFourHours,
}

impl MaximumExecutionFrequency {
    const TABLE: [(&'static str, MaximumExecutionFrequency); 5] = [
        ("ONE_HOUR", MaximumExecutionFrequency::OneHour),
        ("THREE_HOURS", MaximumExecutionFrequency::ThreeHours),
        ("SIX_HOURS", MaximumExecutionFrequency::SixHours),
        ("TWELVE_HOURS", MaximumExecutionFrequency::TwelveHours),
        ("TWENTYFOUR_HOURS", MaximumExecutionFrequency::TwentyFourHours),
    ];

    pub fn parse(value: &str) -> Result<Self, TagGuardError> {
        let wanted = normalise(value);
        Self::TABLE
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, freq)| *freq)
            .ok_or_else(|| TagGuardError::InvalidParameter {
                field: "MaximumExecutionFrequency",
                value: value.to_string(),
                reference: FREQUENCY_DOC,
            })
    }

    /// The CloudFormation value, e.g. `TwentyFour_Hours`.
    pub fn as_cfn(&self) -> &'static str {
        match self {
            MaximumExecutionFrequency::OneHour => "One_Hour",
            MaximumExecutionFrequency::ThreeHours => "Three_Hours",
            MaximumExecutionFrequency::SixHours => "Six_Hours",
            MaximumExecutionFrequency::TwelveHours => "Twelve_Hours",
            MaximumExecutionFrequency::TwentyFourHours => "TwentyFour_Hours",
        }
    }
}

/// A resource type resolved through the resource-type table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceType(&'static str);

impl ResourceType {
    pub fn parse(value: &str) -> Result<Self, TagGuardError> {
        let wanted = value.trim();
        RESOURCE_TYPES
            .iter()
            .find(|t| t.eq_ignore_ascii_case(wanted))
            .map(|t| ResourceType(*t))
            .ok_or_else(|| TagGuardError::InvalidParameter {
                field: "SourceEvents",
                value: value.to_string(),
                reference: RESOURCE_TYPES_DOC,
            })
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// The raw `Parameters` object of an RDK `parameters.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawParameters {
    rule_name: Option<String>,
    source_identifier: Option<String>,
    description: Option<String>,
    input_parameters: Option<String>,
    source_periodic: Option<String>,
    source_events: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParametersFile {
    parameters: RawParameters,
}

/// A validated managed Config rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagedRule {
    pub identifier: ManagedRuleIdentifier,
    pub config_rule_name: Option<String>,
    pub description: Option<String>,
    pub input_parameters: Option<Map<String, Value>>,
    pub maximum_execution_frequency: MaximumExecutionFrequency,
    /// Resource types that trigger the rule; `None` means any recorded change.
    pub rule_scope: Option<Vec<ResourceType>>,
}

impl ManagedRule {
    /// Parses the text of a `parameters.json` document.
    pub fn from_parameters(text: &str) -> Result<Self, TagGuardError> {
        let file: ParametersFile = serde_json::from_str(text)
            .map_err(|e| TagGuardError::InvalidRuleConfig(format!("Malformed parameters document: {}", e)))?;
        let param = file.parameters;

        let identifier = match param.source_identifier.as_deref() {
            Some(id) if !id.trim().is_empty() => ManagedRuleIdentifier::parse(id)?,
            other => {
                return Err(TagGuardError::InvalidParameter {
                    field: "SourceIdentifier",
                    value: other.unwrap_or_default().to_string(),
                    reference: MANAGED_RULES_DOC,
                })
            }
        };

        let input_parameters = match param.input_parameters.as_deref() {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => Some(map),
                _ => {
                    return Err(TagGuardError::InvalidParameter {
                        field: "InputParameters",
                        value: raw.to_string(),
                        reference: INPUT_PARAMETERS_DOC,
                    })
                }
            },
        };

        let maximum_execution_frequency = match param.source_periodic.as_deref() {
            Some(freq) if !freq.trim().is_empty() => MaximumExecutionFrequency::parse(freq)?,
            _ => MaximumExecutionFrequency::default(),
        };

        let rule_scope = match param.source_events.as_deref() {
            Some(events) if !events.trim().is_empty() => Some(
                events
                    .split(',')
                    .map(ResourceType::parse)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            _ => None,
        };

        let rule = ManagedRule {
            identifier,
            config_rule_name: param.rule_name,
            description: param.description,
            input_parameters,
            maximum_execution_frequency,
            rule_scope,
        };
        debug!("Parsed managed rule {}.", rule.identifier);
        Ok(rule)
    }

    /// Renders the rule as an `AWS::Config::ConfigRule` CloudFormation resource.
    pub fn to_cloudformation(&self) -> Value {
        let mut properties = Map::new();
        properties.insert(
            "Source".to_string(),
            json!({ "Owner": "AWS", "SourceIdentifier": self.identifier.as_str() }),
        );
        properties.insert(
            "MaximumExecutionFrequency".to_string(),
            json!(self.maximum_execution_frequency.as_cfn()),
        );
        if let Some(name) = &self.config_rule_name {
            properties.insert("ConfigRuleName".to_string(), json!(name));
        }
        if let Some(description) = &self.description {
            properties.insert("Description".to_string(), json!(description));
        }
        if let Some(input) = &self.input_parameters {
            properties.insert("InputParameters".to_string(), Value::Object(input.clone()));
        }
        if let Some(scope) = &self.rule_scope {
            let types: Vec<&str> = scope.iter().map(ResourceType::as_str).collect();
            properties.insert("Scope".to_string(), json!({ "ComplianceResourceTypes": types }));
        }
        json!({ "Type": "AWS::Config::ConfigRule", "Properties": properties })
    }
}
