// tagguard-core/src/engine.rs
//! Defines the core `ClassificationEngine` trait.
//!
//! The trait decouples resource evaluation from the way individual tags are
//! judged, so the evaluator can run against any classifier implementation.
//!
//! License: MIT OR APACHE 2.0

use crate::classification::{ClassifiedTag, Tag};
use crate::rules::compiler::CompiledRules;

/// A classifier that assigns a verdict to every tag of a resource.
pub trait ClassificationEngine: Send + Sync {
    /// Classifies each tag, in input order.
    ///
    /// Must be pure: the same tags always produce the same classification.
    fn classify(&self, tags: &[Tag]) -> Vec<ClassifiedTag>;

    /// Returns the compiled rules the engine applies.
    fn compiled_rules(&self) -> &CompiledRules;
}
