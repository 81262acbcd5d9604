//! Stagegate core library.
//!
//! This crate exposes programmatic APIs for inspecting a working copy before
//! a change is recorded, and for reverting destructive commits afterwards.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and loading of the rule configuration.
//! - `git`: Source-control capability behind the `SourceControl` trait.
//! - `staged`: Staged-file collection.
//! - `classify`: Artifact-kind classification of staged paths.
//! - `checks`: Checker contract, registry, and the checker family.
//! - `engine`: Dispatch, aggregation, and the accept/reject decision.
//! - `compose`: docker-compose allow-list guard.
//! - `sentinel`: Post-commit revert sentinel.
//! - `models`: Findings, checker results, reports, task file schema.
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod checks;
pub mod classify;
pub mod cli;
pub mod compose;
pub mod config;
pub mod engine;
pub mod git;
pub mod models;
pub mod output;
pub mod sentinel;
pub mod staged;
pub mod utils;
