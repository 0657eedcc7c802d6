// src/core/mod.rs

// The recon core: everything below the terminal UI.

/// Error and result types shared by the core.
pub mod error;

/// Option schema types and user-selected values.
pub mod options;

/// The static tool catalog and its load-time validation.
pub mod catalog;

pub mod target;

/// Turns a tool, a target and selected options into an argument vector.
pub mod builder;

/// Subprocess execution with in-band failure markers.
pub mod runner;

/// Soft-404 detection used to filter the directory brute-force step.
pub mod wildcard;

/// Plain data shared by the pipeline, the registry and the UI.
pub mod models;

pub mod registry;

/// The fixed recon sequence and single-tool runs.
pub mod pipeline;

pub mod report;

/// Background job execution.
pub mod worker;
