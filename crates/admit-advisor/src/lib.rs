//! Admission-probability estimation and Rush / Stable / Safe recommendations.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
