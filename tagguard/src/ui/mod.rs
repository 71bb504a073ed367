// tagguard/src/ui/mod.rs
//! Terminal rendering: status messages and verdict tables.

pub mod output_format;
pub mod verdict_table;
