// tagguard-core/src/engines/mod.rs
//! Classification engine implementations.
//!
//! Each engine lives in its own file and implements the `ClassificationEngine`
//! trait. New engines are declared here with `pub mod <engine_name>;`.

pub mod regex_engine;
