//! Progressive-difficulty state machine for the sequence-memory test.
//!
//! A correct answer advances one level and refills the chances. A wrong answer
//! spends a chance; when none remain the game ends. Termination yields exactly
//! one [`SequenceOutcome`] and any further submission is refused.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::records::{SequenceOutcome, TrialRecord};
use super::sequence::{AnswerError, MAX_LEVEL, SequenceProblem};

pub const DEFAULT_INITIAL_LEVEL: u32 = 1;
pub const DEFAULT_CHANCES_PER_LEVEL: u32 = 2;

/// Rejected rule combinations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameRulesError {
    #[error("chances per level must be at least 1")]
    NoChances,
    #[error("initial level must be at least 1")]
    PracticeLevelStart,
    #[error("maximum level {max} is below the initial level {initial}")]
    MaxBelowInitial { max: u32, initial: u32 },
    #[error("maximum level {max} exceeds {limit}, the largest level the canvas can lay out")]
    MaxAboveCanvas { max: u32, limit: u32 },
}

/// Tunable game rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameRules {
    initial_level: u32,
    chances_per_level: u32,
    max_level: u32,
}

impl GameRules {
    /// Validate a rule set. Without an explicit cap the game completes at
    /// [`MAX_LEVEL`], so every game ends.
    pub fn new(
        initial_level: u32,
        chances_per_level: u32,
        max_level: Option<u32>,
    ) -> Result<Self, GameRulesError> {
        if chances_per_level == 0 {
            return Err(GameRulesError::NoChances);
        }
        if initial_level == 0 {
            return Err(GameRulesError::PracticeLevelStart);
        }
        let max_level = max_level.unwrap_or(MAX_LEVEL);
        if max_level > MAX_LEVEL {
            return Err(GameRulesError::MaxAboveCanvas {
                max: max_level,
                limit: MAX_LEVEL,
            });
        }
        if max_level < initial_level {
            return Err(GameRulesError::MaxBelowInitial {
                max: max_level,
                initial: initial_level,
            });
        }
        Ok(Self {
            initial_level,
            chances_per_level,
            max_level,
        })
    }

    pub fn initial_level(&self) -> u32 {
        self.initial_level
    }

    pub fn chances_per_level(&self) -> u32 {
        self.chances_per_level
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            initial_level: DEFAULT_INITIAL_LEVEL,
            chances_per_level: DEFAULT_CHANCES_PER_LEVEL,
            max_level: MAX_LEVEL,
        }
    }
}

/// Outcome of a single submission, as reported to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    NextLevel,
    Retry,
    GameOver,
    TestComplete,
}

impl SubmitStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::TestComplete)
    }
}

/// Result of [`GameState::submit`].
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub status: SubmitStatus,
    pub correct: bool,
    pub current_level: u32,
    pub chances_left: u32,
    /// Present only on the submission that ended the game.
    pub summary: Option<SequenceOutcome>,
}

/// Submission rejections.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("the game has already finished")]
    Finished,
    #[error(transparent)]
    Answer(#[from] AnswerError),
    #[error("time taken must be a finite, non-negative number of seconds")]
    InvalidTimeTaken,
}

/// Per-participant game progress.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    rules: GameRules,
    current_level: u32,
    chances_left: u32,
    history: Vec<TrialRecord>,
    finished: Option<SubmitStatus>,
}

impl GameState {
    /// Fresh game at the initial level with full chances.
    pub fn new(rules: GameRules) -> Self {
        Self {
            rules,
            current_level: rules.initial_level,
            chances_left: rules.chances_per_level,
            history: Vec::new(),
            finished: None,
        }
    }

    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    pub fn chances_left(&self) -> u32 {
        self.chances_left
    }

    pub fn history(&self) -> &[TrialRecord] {
        &self.history
    }

    /// Terminal status, once the game has ended.
    pub fn finished(&self) -> Option<SubmitStatus> {
        self.finished
    }

    /// Score `answer` against `problem` and advance the game.
    ///
    /// # Examples
    /// ```
    /// use cogbattery::domain::game::{GameRules, GameState, SubmitStatus};
    /// use cogbattery::domain::sequence::SequenceProblem;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let mut game = GameState::new(GameRules::default());
    /// let problem = SequenceProblem::generate(game.current_level(), &mut ChaCha8Rng::seed_from_u64(1))
    ///     .expect("problem");
    /// let turn = game
    ///     .submit(&problem, problem.flash_sequence.clone(), None)
    ///     .expect("accepted");
    /// assert_eq!(turn.status, SubmitStatus::NextLevel);
    /// assert_eq!(game.current_level(), 2);
    /// ```
    pub fn submit(
        &mut self,
        problem: &SequenceProblem,
        answer: Vec<usize>,
        time_taken: Option<f64>,
    ) -> Result<Turn, GameError> {
        if self.finished.is_some() {
            return Err(GameError::Finished);
        }
        if time_taken.is_some_and(|t| !t.is_finite() || t < 0.0) {
            return Err(GameError::InvalidTimeTaken);
        }
        let correct = problem.check(&answer)?;
        let level = self.current_level;

        self.history.push(TrialRecord {
            level,
            correct,
            user_answer: answer,
            correct_answer: problem.flash_sequence.clone(),
            time_taken,
        });

        let status = if correct {
            if level >= self.rules.max_level {
                SubmitStatus::TestComplete
            } else {
                self.current_level += 1;
                self.chances_left = self.rules.chances_per_level;
                SubmitStatus::NextLevel
            }
        } else {
            self.chances_left = self.chances_left.saturating_sub(1);
            if self.chances_left == 0 {
                SubmitStatus::GameOver
            } else {
                SubmitStatus::Retry
            }
        };

        let summary = status.is_terminal().then(|| {
            self.finished = Some(status);
            SequenceOutcome {
                final_level: level,
                history: self.history.clone(),
            }
        });

        Ok(Turn {
            status,
            correct,
            current_level: self.current_level,
            chances_left: self.chances_left,
            summary,
        })
    }
}
