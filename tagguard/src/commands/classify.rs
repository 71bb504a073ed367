// tagguard/src/commands/classify.rs
//! `tagguard classify`: evaluates a tag list read from a file or stdin.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};

use tagguard_core::{headless_evaluate_tags, ClassifiedTag, ResourceVerdict, RuleSetConfig, Tag};

use crate::cli::ClassifyCommand;
use crate::ui::output_format::compliance_label;
use crate::ui::verdict_table::classification_table;

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    classified: &'a [ClassifiedTag],
    verdict: &'a ResourceVerdict,
}

fn read_input(cmd: &ClassifyCommand) -> Result<String> {
    match &cmd.input_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read tag list from {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read tag list from stdin")?;
            Ok(buf)
        }
    }
}

/// Parses `[{"key": .., "value": ..}]`.
pub fn parse_tags(text: &str) -> Result<Vec<Tag>> {
    serde_json::from_str(text).context("Tag list must be a JSON array of {\"key\", \"value\"} objects")
}

pub fn run_classify<W: Write>(config: &RuleSetConfig, cmd: &ClassifyCommand, out: &mut W) -> Result<()> {
    let tags = parse_tags(&read_input(cmd)?)?;
    info!("Classifying {} tags for {}.", tags.len(), cmd.arn);

    let result = headless_evaluate_tags(config, &cmd.arn, cmd.kind.into(), &tags)?;

    if cmd.json {
        let output = ClassifyOutput { classified: &result.classified, verdict: &result.verdict };
        serde_json::to_writer_pretty(&mut *out, &output)?;
        writeln!(out)?;
    } else {
        let color = io::stdout().is_terminal();
        if !result.classified.is_empty() {
            writeln!(out, "{}", classification_table(&result.classified))?;
        }
        writeln!(out, "{}: {}", compliance_label(result.verdict.compliance, color), result.verdict.annotation)?;
    }
    Ok(())
}
