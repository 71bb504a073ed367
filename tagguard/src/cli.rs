// tagguard/src/cli.rs
//! This file defines the command-line interface (CLI) for the tagguard application,
//! including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use tagguard_core::ResourceKind;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "tagguard",
    version = env!("CARGO_PKG_VERSION"),
    about = "Check ECS resource tags against AWS Config tag rules",
    long_about = "TagGuard evaluates the tags of Amazon ECS task definitions, clusters and services against a configurable rule set and reports the results to AWS Config as a custom rule.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Suppress all log output.
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// Path to a custom tag rule configuration file (YAML), merged over the defaults.
    #[arg(long = "config", value_name = "FILE", global = true, help = "Path to a custom tag rule configuration file (YAML).")]
    pub config: Option<PathBuf>,

    /// Explicitly enable only these rule names (comma-separated).
    #[arg(long, short = 'e', value_delimiter = ',', global = true, help = "Explicitly enable only these rule names (comma-separated).")]
    pub enable: Vec<String>,

    /// Explicitly disable these rule names (comma-separated).
    #[arg(long, short = 'x', value_delimiter = ',', global = true, help = "Explicitly disable these rule names (comma-separated).")]
    pub disable: Vec<String>,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `tagguard` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classifies a tag list and prints the verdict, without AWS access.
    #[command(about = "Classify a JSON tag list and print the resulting verdict.")]
    Classify(ClassifyCommand),

    /// Walks the ECS fleet of an account and optionally reports to AWS Config.
    #[command(about = "Evaluate every ECS task definition, cluster and service of an account.")]
    Scan(ScanCommand),

    /// Validates a managed rule `parameters.json`.
    #[command(about = "Validate a managed rule parameters.json and print its CloudFormation resource.")]
    Rule(RuleCommand),
}

/// Arguments for the `classify` command.
#[derive(Parser, Debug)]
pub struct ClassifyCommand {
    /// JSON file with `[{"key": .., "value": ..}]` (reads stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read the tag list from a file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Identifier of the resource the tags belong to.
    #[arg(long, value_name = "ARN", default_value = "resource", help = "Resource ARN used for the verdict and its display name.")]
    pub arn: String,

    /// Resource kind to evaluate as.
    #[arg(long, value_enum, default_value = "cluster", help = "Resource kind to evaluate the tags as.")]
    pub kind: KindChoice,

    /// Print the result as JSON instead of a table.
    #[arg(long, help = "Print the classification and verdict as JSON.")]
    pub json: bool,
}

/// Arguments for the `scan` command.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// AWS region to scan.
    #[arg(long, env = "AWS_REGION", value_name = "REGION", help = "AWS region to scan (defaults to the SDK's region chain).")]
    pub region: Option<String>,

    /// Role to assume before listing resources.
    #[arg(long = "assume-role", value_name = "ROLE_ARN", help = "Assume this IAM role for the evaluation.")]
    pub assume_role: Option<String>,

    /// Deliver the batch to AWS Config.
    #[arg(long, help = "Report the evaluations to AWS Config (needs --rule-name, --result-token and --account-id).")]
    pub report: bool,

    /// Config rule name, used to find stale evaluations.
    #[arg(long = "rule-name", env = "TAGGUARD_RULE_NAME", value_name = "NAME", help = "AWS Config rule name.")]
    pub rule_name: Option<String>,

    /// Result token of the triggering Config event.
    #[arg(long = "result-token", env = "TAGGUARD_RESULT_TOKEN", value_name = "TOKEN", help = "Result token from the AWS Config invocation event.")]
    pub result_token: Option<String>,

    /// Account id used when no ECS resources exist.
    #[arg(long = "account-id", env = "TAGGUARD_ACCOUNT_ID", value_name = "ID", help = "Account id reported as NOT_APPLICABLE when the account has no ECS resources.")]
    pub account_id: Option<String>,

    /// Ask AWS Config to validate without recording.
    #[arg(long = "test-mode", requires = "report", help = "Validate the evaluations with AWS Config without recording them.")]
    pub test_mode: bool,

    /// Print the batch as JSON instead of a table.
    #[arg(long, help = "Print the evaluation batch as JSON.")]
    pub json: bool,
}

/// Arguments for the `rule` command.
#[derive(Parser, Debug)]
pub struct RuleCommand {
    /// The `parameters.json` to validate.
    #[arg(value_name = "FILE", help = "Path to the rule's parameters.json.")]
    pub parameters: PathBuf,
}

/// Resource kinds selectable on the command line.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum KindChoice {
    TaskDefinition,
    Service,
    Cluster,
}

impl From<KindChoice> for ResourceKind {
    fn from(choice: KindChoice) -> Self {
        match choice {
            KindChoice::TaskDefinition => ResourceKind::TaskDefinition,
            KindChoice::Service => ResourceKind::Service,
            KindChoice::Cluster => ResourceKind::Cluster,
        }
    }
}
