//! Raw paste retrieval.
//!
//! This crate provides [`PasteFetcher`], which downloads the raw text body of
//! one paste at a time and is the per-paste error boundary of a sweep: a
//! failed fetch is logged and reported as `None`, never as an error.

pub mod fetcher;

pub use fetcher::PasteFetcher;
