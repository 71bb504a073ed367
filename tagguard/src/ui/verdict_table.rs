// tagguard/src/ui/verdict_table.rs
//! Table rendering for classifications and evaluation batches.

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use tagguard_core::classification::UNRECOGNIZED_MARKER;
use tagguard_core::verdict::display_name;
use tagguard_core::{ClassifiedTag, ResourceVerdict, TagVerdict};

use super::output_format::compliance_label;

fn new_table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

/// One row per tag: key, verdict and the deciding rule.
pub fn classification_table(classified: &[ClassifiedTag]) -> Table {
    let mut table = new_table(&["Key", "Verdict", "Rule"]);
    for tag in classified {
        let verdict = match tag.verdict {
            TagVerdict::Unrecognized => UNRECOGNIZED_MARKER.to_string(),
            v => v.to_string(),
        };
        table.add_row(vec![tag.key.clone(), verdict, tag.rule.clone().unwrap_or_else(|| "-".to_string())]);
    }
    table
}

/// One row per verdict, in batch order.
pub fn batch_table(batch: &[ResourceVerdict], color: bool) -> Table {
    let mut table = new_table(&["Type", "Resource", "Compliance", "Annotation"]);
    for verdict in batch {
        table.add_row(vec![
            verdict.kind.resource_type().to_string(),
            display_name(&verdict.resource_id).to_string(),
            compliance_label(verdict.compliance, color),
            verdict.annotation.clone(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagguard_core::{ComplianceType, ResourceKind};

    #[test]
    fn batch_table_lists_every_verdict() {
        let batch = vec![ResourceVerdict {
            resource_id: "arn:aws:ecs:us-east-1:1:cluster/blue".to_string(),
            kind: ResourceKind::Cluster,
            compliance: ComplianceType::NonCompliant,
            annotation: "NO Tags at all on ECS Resource (blue)".to_string(),
        }];
        let rendered = batch_table(&batch, false).to_string();
        assert!(rendered.contains("AWS::ECS::Cluster"));
        assert!(rendered.contains("blue"));
        assert!(rendered.contains("NON_COMPLIANT"));
    }

    #[test]
    fn unrecognized_tags_show_marker() {
        let classified = vec![ClassifiedTag { key: "team".to_string(), verdict: TagVerdict::Unrecognized, rule: None }];
        let rendered = classification_table(&classified).to_string();
        assert!(rendered.contains("NO_TAGS"));
        assert!(rendered.contains("team"));
    }
}
