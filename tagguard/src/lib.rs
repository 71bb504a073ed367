// tagguard/src/lib.rs
//! # TagGuard CLI
//!
//! Command-line front end for `tagguard-core`: classify tag lists offline,
//! scan an account's ECS fleet and report to AWS Config, and validate
//! managed rule parameters.

pub mod cli;
pub mod commands;
pub mod logger;
pub mod ui;
