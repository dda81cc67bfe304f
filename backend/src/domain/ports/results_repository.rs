//! Port for the append-only results store.

use async_trait::async_trait;

use crate::domain::AssessmentRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised by results store adapters.
    pub enum ResultsRepositoryError {
        /// The backing store could not be reached.
        Connection { message: String } => "results store connection failed: {message}",
        /// Reading or writing failed once connected.
        Query { message: String } => "results store query failed: {message}",
    }
}

/// Append-only storage of finished assessments.
///
/// Adapters treat unreadable stored content as absent rather than failing
/// the whole listing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultsRepository: Send + Sync {
    /// Append one record after all existing ones.
    async fn append(&self, record: &AssessmentRecord) -> Result<(), ResultsRepositoryError>;

    /// Every stored record in storage order.
    async fn list(&self) -> Result<Vec<AssessmentRecord>, ResultsRepositoryError>;
}

/// Fixture store that accepts writes and always reads as empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureResultsRepository;

#[async_trait]
impl ResultsRepository for FixtureResultsRepository {
    async fn append(&self, _record: &AssessmentRecord) -> Result<(), ResultsRepositoryError> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AssessmentRecord>, ResultsRepositoryError> {
        Ok(Vec::new())
    }
}
