//! Result recording and admin reporting services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{
    BatteryResultsCommand, GameSessionStore, ResultsQuery, ResultsRepository,
    ResultsRepositoryError,
};
use crate::domain::records::{AssessmentOutcome, AssessmentRecord};
use crate::domain::sequence_service::{map_session_error, missing_session};
use crate::domain::{AdminPassword, Error, ResultsReport, SessionId};

pub(crate) fn map_results_error(error: ResultsRepositoryError) -> Error {
    match error {
        ResultsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("results store unavailable: {message}"))
        }
        ResultsRepositoryError::Query { message } => {
            Error::internal(format!("results store error: {message}"))
        }
    }
}

/// Records card-matching, pattern, stroop and trail-making outcomes.
#[derive(Clone)]
pub struct BatteryResultsService<S, R> {
    sessions: Arc<S>,
    results: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<S, R> BatteryResultsService<S, R> {
    pub fn new(sessions: Arc<S>, results: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions,
            results,
            clock,
        }
    }
}

#[async_trait]
impl<S, R> BatteryResultsCommand for BatteryResultsService<S, R>
where
    S: GameSessionStore,
    R: ResultsRepository,
{
    async fn record(&self, id: &SessionId, outcome: AssessmentOutcome) -> Result<Uuid, Error> {
        if let AssessmentOutcome::Sequence(_) = outcome {
            return Err(Error::invalid_request(
                "sequence results are recorded by the game itself",
            ));
        }
        outcome
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let session = self
            .sessions
            .load(id)
            .await
            .map_err(map_session_error)?
            .ok_or_else(missing_session)?;

        let kind = outcome.kind();
        let record = AssessmentRecord::new(session.participant, outcome, self.clock.utc());
        self.results.append(&record).await.map_err(|err| {
            warn!(session_id = %id, %kind, error = %err, "failed to persist result");
            map_results_error(err)
        })?;
        info!(session_id = %id, %kind, record_id = %record.id, "result recorded");
        Ok(record.id)
    }
}

/// Password-gated report over every stored result.
#[derive(Clone)]
pub struct ResultsQueryService<R> {
    results: Arc<R>,
    password: AdminPassword,
}

impl<R> ResultsQueryService<R> {
    pub fn new(results: Arc<R>, password: AdminPassword) -> Self {
        Self { results, password }
    }
}

#[async_trait]
impl<R> ResultsQuery for ResultsQueryService<R>
where
    R: ResultsRepository,
{
    async fn report(&self, password: Option<String>) -> Result<ResultsReport, Error> {
        if !self.password.verify(password.as_deref()) {
            warn!("results report requested with a wrong password");
            return Err(Error::forbidden("access denied"));
        }
        let records = self.results.list().await.map_err(map_results_error)?;
        Ok(ResultsReport::build(&records))
    }
}

#[cfg(test)]
#[path = "results_service_tests.rs"]
mod tests;
