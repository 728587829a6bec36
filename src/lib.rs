//! # XPath Rule Coverage Library
//!
//! Coverage verification for XPath-based static-analysis rules.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod lcov;
pub mod output;
pub mod ruledef;
pub mod testgen;
pub mod xpath;
