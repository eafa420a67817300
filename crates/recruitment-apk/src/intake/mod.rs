//! Submission intake: wire format, validation, orchestration, and the HTTP
//! endpoint. The flow is validate, recompute the assessment server-side, then
//! fan out to the configured sinks.

pub mod domain;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    DispatchReport, LeadRecord, SubmissionRequest, ANSWER_FIELD_COUNT, TIMESTAMP_FORMAT,
};
pub use router::intake_router;
pub use service::{SubmissionError, SubmissionOutcome, SubmissionService};
pub use validation::validate;
