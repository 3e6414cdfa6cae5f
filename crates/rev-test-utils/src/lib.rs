//! Shared test utilities for the revision workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`fixtures`]: block, document and classifier fixtures for the
//!   `guide` / `procedure` handbook used across test suites
//! - [`workspace`]: [`TestWorkspace`](workspace::TestWorkspace), a temporary
//!   directory holding `rev.toml`, document and revision files for CLI tests

pub mod fixtures;
pub mod workspace;
