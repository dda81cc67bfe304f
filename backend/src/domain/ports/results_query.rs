//! Driving port for the admin results report.

use async_trait::async_trait;

use crate::domain::{Error, ResultsReport};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultsQuery: Send + Sync {
    /// Build the report when `password` matches the admin password.
    async fn report(&self, password: Option<String>) -> Result<ResultsReport, Error>;
}

/// Fixture query that admits any caller and reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureResultsQuery;

#[async_trait]
impl ResultsQuery for FixtureResultsQuery {
    async fn report(&self, _password: Option<String>) -> Result<ResultsReport, Error> {
        Ok(ResultsReport::default())
    }
}
