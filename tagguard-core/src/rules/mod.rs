//! Tag rule compilation.
//!
//! Turns the declarative `TagRule`s of a `RuleSetConfig` into `CompiledRules`
//! holding ready-to-use regular expressions. Compilation happens once, when a
//! classifier is constructed; the compiled set is immutable afterwards.

pub mod compiler;
