//! Driving port for recording results of the other games in the battery.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::records::AssessmentOutcome;
use crate::domain::{Error, SessionId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BatteryResultsCommand: Send + Sync {
    /// Validate and persist `outcome` for the participant of `session`.
    ///
    /// Returns the identifier of the stored record.
    async fn record(&self, session: &SessionId, outcome: AssessmentOutcome)
    -> Result<Uuid, Error>;
}
