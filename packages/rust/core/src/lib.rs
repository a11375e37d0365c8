//! Sweep orchestration and keyword detection for Pastewatch.
//!
//! This crate ties together archive discovery, paste fetching, keyword
//! detection, and match storage into one end-to-end sweep (`run_sweep`).

pub mod keywords;
pub mod pipeline;
