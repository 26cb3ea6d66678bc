//! Functional Freedom Score calculator: context-weighted self-assessment
//! scoring, append-only history with previous-result comparison, and a
//! portable report with personalized recommendations.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
