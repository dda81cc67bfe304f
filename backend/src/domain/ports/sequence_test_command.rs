//! Driving port for the sequence-memory test flow.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::game::SubmitStatus;
use crate::domain::sequence::SequenceProblem;
use crate::domain::{Error, Participant, ParticipantDraft, SessionId};

/// Game progress shown when the test (re)starts.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GameSnapshot {
    pub participant: Participant,
    pub current_level: u32,
    pub chances_left: u32,
}

/// A scored puzzle together with the participant's standing.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProblemView {
    #[serde(flatten)]
    pub problem: SequenceProblem,
    pub current_level: u32,
    pub chances_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PracticeStatus {
    Correct,
    Incorrect,
}

/// Answer submitted for the pending puzzle.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
pub struct SubmitAnswerRequest {
    pub answer: Vec<usize>,
    /// Seconds taken to answer, as measured by the client.
    #[serde(default)]
    pub time_taken: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SubmitAnswerResponse {
    pub status: SubmitStatus,
    pub correct: bool,
    pub current_level: u32,
    pub chances_left: u32,
}

/// Use cases behind the sequence-memory endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SequenceTestCommand: Send + Sync {
    /// Open a fresh session for a participant.
    async fn begin(&self, draft: ParticipantDraft) -> Result<SessionId, Error>;

    /// Forget a session, e.g. when the participant starts over.
    async fn end(&self, session: &SessionId) -> Result<(), Error>;

    /// Participant registered for `session`.
    async fn participant(&self, session: &SessionId) -> Result<Participant, Error>;

    /// Reset progress to the first level.
    async fn start_test(&self, session: &SessionId) -> Result<GameSnapshot, Error>;

    /// Issue a level-0 practice puzzle.
    async fn practice_problem(&self, session: &SessionId) -> Result<SequenceProblem, Error>;

    /// Score an answer to the practice puzzle.
    async fn submit_practice(
        &self,
        session: &SessionId,
        answer: Vec<usize>,
    ) -> Result<PracticeStatus, Error>;

    /// Issue a new puzzle for the current level.
    async fn next_problem(&self, session: &SessionId) -> Result<ProblemView, Error>;

    /// Return the pending puzzle, issuing one if none is pending.
    async fn current_problem(&self, session: &SessionId) -> Result<ProblemView, Error>;

    /// Score the pending puzzle and advance the game.
    async fn submit_answer(
        &self,
        session: &SessionId,
        request: SubmitAnswerRequest,
    ) -> Result<SubmitAnswerResponse, Error>;
}
