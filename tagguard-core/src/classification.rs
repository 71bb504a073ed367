// tagguard-core/src/classification.rs
//! Tag and classification data structures shared by the classifier and the
//! resource evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A key/value tag as returned by the tagging API. Duplicate keys are possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// Verdict for one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TagVerdict {
    Compliant,
    NonCompliant,
    /// No rule claims the key.
    Unrecognized,
}

impl fmt::Display for TagVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TagVerdict::Compliant => "COMPLIANT",
            TagVerdict::NonCompliant => "NON_COMPLIANT",
            TagVerdict::Unrecognized => "UNRECOGNIZED",
        };
        f.write_str(s)
    }
}

/// Marker rendered for tags no rule recognises.
pub const UNRECOGNIZED_MARKER: &str = "NO_TAGS";

/// A tag key with its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedTag {
    pub key: String,
    pub verdict: TagVerdict,
    /// Name of the rule that decided the verdict.
    #[serde(default)]
    pub rule: Option<String>,
}

impl ClassifiedTag {
    pub fn is_compliant(&self) -> bool {
        self.verdict == TagVerdict::Compliant
    }
}

impl fmt::Display for ClassifiedTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.verdict {
            TagVerdict::Unrecognized => f.write_str(UNRECOGNIZED_MARKER),
            verdict => write!(f, "{}: {}", self.key, verdict),
        }
    }
}

/// Quotes `s` as a list literal element: single quotes unless the text holds
/// a single quote and no double quote.
fn quote(s: &str) -> String {
    let delim = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

/// Renders a classification list for annotations as a nested list literal,
/// e.g. `[['uai', 'COMPLIANT'], ['env', 'NON_COMPLIANT'], 'NO_TAGS']`.
pub fn render_results(classified: &[ClassifiedTag]) -> String {
    let items: Vec<String> = classified
        .iter()
        .map(|c| match c.verdict {
            TagVerdict::Unrecognized => quote(UNRECOGNIZED_MARKER),
            verdict => format!("[{}, {}]", quote(&c.key), quote(&verdict.to_string())),
        })
        .collect();
    format!("[{}]", items.join(", "))
}

/// Number of tags classified COMPLIANT.
pub fn compliant_count(classified: &[ClassifiedTag]) -> usize {
    classified.iter().filter(|c| c.is_compliant()).count()
}
