//! Stored assessment results.
//!
//! One [`AssessmentRecord`] is written per finished game. The outcome is a
//! tagged union so a single results store can hold every game in the battery.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Participant;

/// One answered sequence-memory puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrialRecord {
    pub level: u32,
    pub correct: bool,
    pub user_answer: Vec<usize>,
    pub correct_answer: Vec<usize>,
    /// Seconds the participant took to answer, when the client reported it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<f64>,
}

/// Summary written when a sequence-memory game terminates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SequenceOutcome {
    pub final_level: u32,
    pub history: Vec<TrialRecord>,
}

impl SequenceOutcome {
    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|trial| trial.correct).count()
    }

    pub fn wrong_count(&self) -> usize {
        self.history.len() - self.correct_count()
    }
}

/// One cleared card-matching level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CardLevelResult {
    pub level: u32,
    pub pairs: u32,
    pub time_taken: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CardOutcome {
    pub levels: Vec<CardLevelResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatternOutcome {
    pub level: u32,
    pub score: u32,
    pub total_problems: u32,
    /// Per-problem answer times in seconds.
    pub times: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StroopTrial {
    pub user_response: String,
    pub response_time: f64,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StroopRoundSummary {
    pub correct_count: u32,
    pub accuracy: f64,
    pub avg_reaction_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StroopSummary {
    pub rounds: Vec<StroopRoundSummary>,
    pub practice_failures: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StroopOutcome {
    pub practice_trials: Vec<StroopTrial>,
    pub test_trials: Vec<StroopTrial>,
    pub summary: StroopSummary,
}

/// Times in seconds and error counts for parts A and B.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrailMakingOutcome {
    pub test_a_time: f64,
    pub test_a_errors: u32,
    pub test_b_time: f64,
    pub test_b_errors: u32,
}

/// Game-specific result payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssessmentOutcome {
    Sequence(SequenceOutcome),
    CardMatching(CardOutcome),
    Pattern(PatternOutcome),
    Stroop(StroopOutcome),
    TrailMaking(TrailMakingOutcome),
}

/// Discriminant of [`AssessmentOutcome`], used for storage and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TestKind {
    Sequence,
    CardMatching,
    Pattern,
    Stroop,
    TrailMaking,
}

impl TestKind {
    pub const ALL: [Self; 5] = [
        Self::Sequence,
        Self::CardMatching,
        Self::Pattern,
        Self::Stroop,
        Self::TrailMaking,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sequence => "sequence",
            Self::CardMatching => "card_matching",
            Self::Pattern => "pattern",
            Self::Stroop => "stroop",
            Self::TrailMaking => "trail_making",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for client-reported outcomes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutcomeValidationError {
    #[error("{field} must be a finite, non-negative number")]
    InvalidDuration { field: &'static str },
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("score {score} exceeds total problems {total}")]
    ScoreAboveTotal { score: u32, total: u32 },
}

fn check_duration(field: &'static str, value: f64) -> Result<(), OutcomeValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(OutcomeValidationError::InvalidDuration { field })
    }
}

impl AssessmentOutcome {
    pub fn kind(&self) -> TestKind {
        match self {
            Self::Sequence(_) => TestKind::Sequence,
            Self::CardMatching(_) => TestKind::CardMatching,
            Self::Pattern(_) => TestKind::Pattern,
            Self::Stroop(_) => TestKind::Stroop,
            Self::TrailMaking(_) => TestKind::TrailMaking,
        }
    }

    /// Reject outcomes carrying impossible measurements.
    pub fn validate(&self) -> Result<(), OutcomeValidationError> {
        match self {
            Self::Sequence(outcome) => outcome
                .history
                .iter()
                .filter_map(|trial| trial.time_taken)
                .try_for_each(|t| check_duration("time_taken", t)),
            Self::CardMatching(outcome) => {
                if outcome.levels.is_empty() {
                    return Err(OutcomeValidationError::Empty { field: "levels" });
                }
                outcome
                    .levels
                    .iter()
                    .try_for_each(|level| check_duration("time_taken", level.time_taken))
            }
            Self::Pattern(outcome) => {
                if outcome.score > outcome.total_problems {
                    return Err(OutcomeValidationError::ScoreAboveTotal {
                        score: outcome.score,
                        total: outcome.total_problems,
                    });
                }
                outcome
                    .times
                    .iter()
                    .try_for_each(|t| check_duration("times", *t))
            }
            Self::Stroop(outcome) => {
                if outcome.test_trials.is_empty() {
                    return Err(OutcomeValidationError::Empty {
                        field: "test_trials",
                    });
                }
                outcome
                    .practice_trials
                    .iter()
                    .chain(&outcome.test_trials)
                    .try_for_each(|trial| check_duration("response_time", trial.response_time))?;
                outcome.summary.rounds.iter().try_for_each(|round| {
                    check_duration("avg_reaction_time", round.avg_reaction_time)?;
                    check_duration("accuracy", round.accuracy)
                })
            }
            Self::TrailMaking(outcome) => {
                check_duration("test_a_time", outcome.test_a_time)?;
                check_duration("test_b_time", outcome.test_b_time)
            }
        }
    }
}

/// Unit of persistence: one finished game for one participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub participant: Participant,
    pub recorded_at: DateTime<Utc>,
    pub outcome: AssessmentOutcome,
}

impl AssessmentRecord {
    /// Create a record with a fresh identifier.
    pub fn new(
        participant: Participant,
        outcome: AssessmentOutcome,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            participant,
            recorded_at,
            outcome,
        }
    }

    pub fn kind(&self) -> TestKind {
        self.outcome.kind()
    }
}
