pub mod catalog;
pub mod delta;
pub mod domain;
pub mod history;
pub mod recommend;
pub mod report;
pub mod scoring;
mod service;

pub use report::{RenderedReport, ReportRenderer};
pub use service::{
    summarize, AssessmentError, AssessmentOutcome, AssessmentService, AssessmentSubmission,
    HistorySummary,
};
