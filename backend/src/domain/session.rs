//! Server-side participant sessions.
//!
//! The browser only holds an opaque [`SessionId`]; everything else about the
//! participant's progress lives in a [`ParticipantSession`] kept by a
//! [`GameSessionStore`](crate::domain::ports::GameSessionStore).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Participant;
use super::game::{GameRules, GameState};
use super::sequence::SequenceProblem;

/// Opaque identifier stored in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for SessionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything the server remembers about one participant.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantSession {
    pub participant: Participant,
    pub game: GameState,
    /// Puzzle awaiting an answer. Cleared once the answer is scored.
    pub current_problem: Option<SequenceProblem>,
    pub practice_problem: Option<SequenceProblem>,
}

impl ParticipantSession {
    pub fn new(participant: Participant, rules: GameRules) -> Self {
        Self {
            participant,
            game: GameState::new(rules),
            current_problem: None,
            practice_problem: None,
        }
    }

    /// Restart the game, keeping only the participant details.
    pub fn restart(&mut self, rules: GameRules) {
        self.game = GameState::new(rules);
        self.current_problem = None;
        self.practice_problem = None;
    }
}
