//! Cognitive assessment battery backend.
//!
//! Generates sequence-memory puzzles, drives the progressive-difficulty game
//! per participant and stores results for the admin report.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
