// tagguard/src/ui/output_format.rs
//! Colored status messages on stderr.

use owo_colors::{OwoColorize, Style};
use std::io::{self, Write};

use tagguard_core::ComplianceType;

fn print_styled<W: Write>(out: &mut W, prefix: &str, msg: &str, style: Style, color: bool) -> io::Result<()> {
    if color {
        writeln!(out, "{} {}", prefix.style(style), msg)
    } else {
        writeln!(out, "{} {}", prefix, msg)
    }
}

pub fn print_info_message<W: Write>(out: &mut W, msg: &str, color: bool) -> io::Result<()> {
    print_styled(out, "[info]", msg, Style::new().cyan(), color)
}

/// Compliance type text, colored green/red when `color` is set.
pub fn compliance_label(compliance: ComplianceType, color: bool) -> String {
    if !color {
        return compliance.to_string();
    }
    match compliance {
        ComplianceType::Compliant => compliance.green().to_string(),
        ComplianceType::NonCompliant => compliance.red().to_string(),
        _ => compliance.dimmed().to_string(),
    }
}
