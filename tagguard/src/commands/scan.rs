// tagguard/src/commands/scan.rs
//! `tagguard scan`: walks the account's ECS fleet and optionally reports the
//! batch to AWS Config.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use is_terminal::IsTerminal;
use log::info;
use std::io::{self, Write};

use tagguard_core::aws::{load_sdk_config, AwsConfigSink, AwsEcsInventory};
use tagguard_core::{FleetWalker, Reporter, ResourceEvaluator, RuleSetConfig};

use crate::cli::ScanCommand;
use crate::ui::output_format::print_info_message;
use crate::ui::verdict_table::batch_table;

/// Settings needed to deliver a batch, checked before any AWS call.
struct ReportTarget<'a> {
    rule_name: &'a str,
    result_token: &'a str,
    account_id: &'a str,
}

fn report_target(cmd: &ScanCommand) -> Result<Option<ReportTarget<'_>>> {
    if !cmd.report {
        return Ok(None);
    }
    let missing = |flag: &str| anyhow!("--report requires {}", flag);
    Ok(Some(ReportTarget {
        rule_name: cmd.rule_name.as_deref().ok_or_else(|| missing("--rule-name"))?,
        result_token: cmd.result_token.as_deref().ok_or_else(|| missing("--result-token"))?,
        account_id: cmd.account_id.as_deref().ok_or_else(|| missing("--account-id"))?,
    }))
}

pub async fn run_scan<W: Write>(config: &RuleSetConfig, cmd: &ScanCommand, out: &mut W) -> Result<()> {
    let target = report_target(cmd)?;
    let evaluator = ResourceEvaluator::new(config)?;

    let sdk_config = load_sdk_config(cmd.region.clone(), cmd.assume_role.as_deref()).await;
    let inventory = AwsEcsInventory::new(&sdk_config);

    let ordering_timestamp = Utc::now();
    let batch = FleetWalker::new(&inventory, &evaluator)
        .walk()
        .await
        .context("Fleet walk failed")?;

    if cmd.json {
        serde_json::to_writer_pretty(&mut *out, &batch)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}", batch_table(&batch, io::stdout().is_terminal()))?;
    }

    let Some(target) = target else {
        return Ok(());
    };

    let sink = AwsConfigSink::new(&sdk_config);
    let summary = Reporter::new(&sink, target.rule_name, target.result_token, target.account_id)
        .test_mode(cmd.test_mode)
        .report(&batch, ordering_timestamp)
        .await?;

    info!("Report summary: {:?}", summary);
    let _ = print_info_message(
        &mut io::stderr(),
        &format!(
            "Reported {} evaluations to {} ({} stale, {} rejected).",
            summary.reported, target.rule_name, summary.stale, summary.failed
        ),
        io::stderr().is_terminal(),
    );
    if summary.failed > 0 {
        return Err(anyhow!("AWS Config rejected {} evaluations", summary.failed));
    }
    Ok(())
}
