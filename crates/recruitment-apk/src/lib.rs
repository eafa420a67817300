//! Recruitment APK assessment engine and lead intake pipeline.
//!
//! The [`assessment`] module is the pure scoring core: a fixed 29-question
//! catalogue turned into a score, category, urgency, lead score, and pain
//! level, identical wherever it runs. The [`intake`] module validates incoming
//! submissions, recomputes the result server-side, and forwards the lead to
//! three independent best-effort sinks (CSV backup, mail notification, CRM).

pub mod assessment;
pub mod config;
pub mod error;
pub mod intake;
pub mod ratelimit;
pub mod sinks;
pub mod telemetry;
