//! Sequence-memory test service.
//!
//! Implements [`SequenceTestCommand`] over a session store and a results
//! store. Each request loads the participant session, applies one step of the
//! game and writes the session back. A terminating answer appends the summary
//! record before the session is saved, so a failed write leaves the pending
//! puzzle in place for the client to resubmit.
//!
//! Mutating requests for the same session run one at a time. Without that a
//! pair of concurrent answers could both read the pending puzzle and both
//! append a summary.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockable::Clock;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{info, warn};

use crate::domain::game::{GameError, GameRules};
use crate::domain::ports::{
    GameSessionStore, GameSessionStoreError, GameSnapshot, PracticeStatus, ProblemView,
    ResultsRepository, SequenceTestCommand, SubmitAnswerRequest, SubmitAnswerResponse,
};
use crate::domain::records::{AssessmentOutcome, AssessmentRecord};
use crate::domain::sequence::{PRACTICE_LEVEL, SequenceProblem};
use crate::domain::{Error, Participant, ParticipantDraft, ParticipantSession, SessionId};

use super::results_service::map_results_error;

pub(crate) fn map_session_error(error: GameSessionStoreError) -> Error {
    match error {
        GameSessionStoreError::Connection { message } => {
            Error::service_unavailable(format!("session store unavailable: {message}"))
        }
        GameSessionStoreError::Query { message } => {
            Error::internal(format!("session store error: {message}"))
        }
    }
}

pub(crate) fn missing_session() -> Error {
    Error::not_found("no participant session; submit the start form first")
}

/// Source of randomness for puzzle generation.
///
/// Seeded generators give reproducible puzzle streams for tests and demos.
pub struct PuzzleRng(Mutex<ChaCha8Rng>);

impl PuzzleRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(Mutex::new(ChaCha8Rng::seed_from_u64(seed)))
    }

    pub fn from_entropy() -> Self {
        Self(Mutex::new(ChaCha8Rng::from_os_rng()))
    }

    fn generate(&self, level: u32) -> Result<SequenceProblem, Error> {
        let mut rng = self
            .0
            .lock()
            .map_err(|_| Error::internal("puzzle generator lock poisoned"))?;
        SequenceProblem::generate(level, &mut *rng)
            .map_err(|err| Error::internal(format!("failed to lay out puzzle: {err}")))
    }
}

/// Per-session exclusive locks.
///
/// Entries nobody holds or waits on are dropped on the next acquisition.
#[derive(Default)]
struct SessionLocks(Mutex<HashMap<SessionId, Arc<AsyncMutex<()>>>>);

impl SessionLocks {
    async fn acquire(&self, id: &SessionId) -> Result<OwnedMutexGuard<()>, Error> {
        let lock = {
            let mut locks = self
                .0
                .lock()
                .map_err(|_| Error::internal("session lock table poisoned"))?;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(*id).or_default())
        };
        Ok(lock.lock_owned().await)
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.0.lock().map(|locks| locks.len()).unwrap_or_default()
    }
}

/// Sequence-memory service implementing the [`SequenceTestCommand`] port.
#[derive(Clone)]
pub struct SequenceTestService<S, R> {
    sessions: Arc<S>,
    results: Arc<R>,
    rules: GameRules,
    rng: Arc<PuzzleRng>,
    clock: Arc<dyn Clock>,
    locks: Arc<SessionLocks>,
}

impl<S, R> SequenceTestService<S, R> {
    pub fn new(
        sessions: Arc<S>,
        results: Arc<R>,
        rules: GameRules,
        rng: Arc<PuzzleRng>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sessions,
            results,
            rules,
            rng,
            clock,
            locks: Arc::default(),
        }
    }
}

impl<S, R> SequenceTestService<S, R>
where
    S: GameSessionStore,
{
    async fn load(&self, id: &SessionId) -> Result<ParticipantSession, Error> {
        self.sessions
            .load(id)
            .await
            .map_err(map_session_error)?
            .ok_or_else(missing_session)
    }

    async fn store(&self, id: &SessionId, session: ParticipantSession) -> Result<(), Error> {
        self.sessions
            .save(id, session)
            .await
            .map_err(map_session_error)
    }

    /// Generate a puzzle for the current level and make it the pending one.
    /// Callers hold the session lock.
    async fn issue_problem(
        &self,
        id: &SessionId,
        mut session: ParticipantSession,
    ) -> Result<ProblemView, Error> {
        Self::ensure_running(&session)?;
        let problem = self.rng.generate(session.game.current_level())?;
        session.current_problem = Some(problem.clone());
        let view = Self::view(&session, problem);
        self.store(id, session).await?;
        Ok(view)
    }

    fn ensure_running(session: &ParticipantSession) -> Result<(), Error> {
        match session.game.finished() {
            Some(status) => Err(Error::invalid_request(
                "the game has finished; restart the test to play again",
            )
            .with_details(serde_json::json!({ "status": status }))),
            None => Ok(()),
        }
    }

    fn view(session: &ParticipantSession, problem: SequenceProblem) -> ProblemView {
        ProblemView {
            problem,
            current_level: session.game.current_level(),
            chances_left: session.game.chances_left(),
        }
    }
}

#[async_trait]
impl<S, R> SequenceTestCommand for SequenceTestService<S, R>
where
    S: GameSessionStore,
    R: ResultsRepository,
{
    async fn begin(&self, draft: ParticipantDraft) -> Result<SessionId, Error> {
        let id = SessionId::random();
        let participant = Participant::from_draft(draft);
        self.store(&id, ParticipantSession::new(participant, self.rules))
            .await?;
        info!(session_id = %id, "participant session opened");
        Ok(id)
    }

    async fn end(&self, session: &SessionId) -> Result<(), Error> {
        self.sessions
            .remove(session)
            .await
            .map_err(map_session_error)
    }

    async fn participant(&self, session: &SessionId) -> Result<Participant, Error> {
        Ok(self.load(session).await?.participant)
    }

    async fn start_test(&self, id: &SessionId) -> Result<GameSnapshot, Error> {
        let _guard = self.locks.acquire(id).await?;
        let mut session = self.load(id).await?;
        session.restart(self.rules);
        let snapshot = GameSnapshot {
            participant: session.participant.clone(),
            current_level: session.game.current_level(),
            chances_left: session.game.chances_left(),
        };
        self.store(id, session).await?;
        Ok(snapshot)
    }

    async fn practice_problem(&self, id: &SessionId) -> Result<SequenceProblem, Error> {
        let _guard = self.locks.acquire(id).await?;
        let mut session = self.load(id).await?;
        let problem = self.rng.generate(PRACTICE_LEVEL)?;
        session.practice_problem = Some(problem.clone());
        self.store(id, session).await?;
        Ok(problem)
    }

    async fn submit_practice(
        &self,
        id: &SessionId,
        answer: Vec<usize>,
    ) -> Result<PracticeStatus, Error> {
        let session = self.load(id).await?;
        let problem = session
            .practice_problem
            .as_ref()
            .ok_or_else(|| Error::invalid_request("no practice problem has been issued"))?;
        let correct = problem
            .check(&answer)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        Ok(if correct {
            PracticeStatus::Correct
        } else {
            PracticeStatus::Incorrect
        })
    }

    async fn next_problem(&self, id: &SessionId) -> Result<ProblemView, Error> {
        let _guard = self.locks.acquire(id).await?;
        let session = self.load(id).await?;
        self.issue_problem(id, session).await
    }

    async fn current_problem(&self, id: &SessionId) -> Result<ProblemView, Error> {
        let _guard = self.locks.acquire(id).await?;
        let session = self.load(id).await?;
        match session.current_problem.clone() {
            Some(problem) => Ok(Self::view(&session, problem)),
            None => self.issue_problem(id, session).await,
        }
    }

    async fn submit_answer(
        &self,
        id: &SessionId,
        request: SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, Error> {
        let _guard = self.locks.acquire(id).await?;
        let mut session = self.load(id).await?;
        Self::ensure_running(&session)?;
        let problem = session
            .current_problem
            .take()
            .ok_or_else(|| Error::invalid_request("no problem is pending; fetch one first"))?;

        let turn = session
            .game
            .submit(&problem, request.answer, request.time_taken)
            .map_err(|err: GameError| Error::invalid_request(err.to_string()))?;

        if let Some(summary) = turn.summary {
            let final_level = summary.final_level;
            let record = AssessmentRecord::new(
                session.participant.clone(),
                AssessmentOutcome::Sequence(summary),
                self.clock.utc(),
            );
            if let Err(err) = self.results.append(&record).await {
                warn!(session_id = %id, error = %err, "failed to persist sequence summary");
                return Err(map_results_error(err));
            }
            info!(
                session_id = %id,
                level = final_level,
                status = ?turn.status,
                record_id = %record.id,
                "sequence test finished"
            );
        }

        self.store(id, session).await?;
        Ok(SubmitAnswerResponse {
            status: turn.status,
            correct: turn.correct,
            current_level: turn.current_level,
            chances_left: turn.chances_left,
        })
    }
}

#[cfg(test)]
#[path = "sequence_service_tests.rs"]
mod tests;
