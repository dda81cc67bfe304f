//! PostgreSQL-backed `ResultsRepository` using Diesel.
//!
//! Inserts run in a transaction so a failed write leaves no partial row.
//! Rows whose stored outcome cannot be decoded are skipped with a warning.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{ResultsRepository, ResultsRepositoryError};
use crate::domain::records::AssessmentOutcome;
use crate::domain::{AssessmentRecord, Participant, ParticipantDraft};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AssessmentResultRow, NewAssessmentResultRow};
use super::pool::{DbPool, PoolError};
use super::schema::assessment_results;

/// Diesel-backed implementation of the results store port.
#[derive(Clone)]
pub struct DieselResultsRepository {
    pool: DbPool,
}

impl DieselResultsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ResultsRepositoryError {
    map_basic_pool_error(error, ResultsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ResultsRepositoryError {
    map_basic_diesel_error(
        error,
        ResultsRepositoryError::query,
        ResultsRepositoryError::connection,
    )
}

/// Headline scores copied into dedicated columns.
#[derive(Debug, Default, PartialEq, Eq)]
struct ScoreColumns {
    final_level: Option<i32>,
    correct_count: Option<i32>,
    wrong_count: Option<i32>,
}

fn to_i32(value: usize) -> Option<i32> {
    i32::try_from(value).ok()
}

fn score_columns(outcome: &AssessmentOutcome) -> ScoreColumns {
    match outcome {
        AssessmentOutcome::Sequence(summary) => ScoreColumns {
            final_level: i32::try_from(summary.final_level).ok(),
            correct_count: to_i32(summary.correct_count()),
            wrong_count: to_i32(summary.wrong_count()),
        },
        AssessmentOutcome::Pattern(pattern) => ScoreColumns {
            final_level: i32::try_from(pattern.level).ok(),
            correct_count: i32::try_from(pattern.score).ok(),
            wrong_count: i32::try_from(pattern.total_problems.saturating_sub(pattern.score)).ok(),
        },
        AssessmentOutcome::CardMatching(card) => ScoreColumns {
            final_level: card
                .levels
                .iter()
                .map(|level| level.level)
                .max()
                .and_then(|level| i32::try_from(level).ok()),
            ..ScoreColumns::default()
        },
        AssessmentOutcome::Stroop(stroop) => {
            let correct = stroop.test_trials.iter().filter(|t| t.is_correct).count();
            ScoreColumns {
                final_level: None,
                correct_count: to_i32(correct),
                wrong_count: to_i32(stroop.test_trials.len() - correct),
            }
        }
        AssessmentOutcome::TrailMaking(trail) => ScoreColumns {
            final_level: None,
            correct_count: None,
            wrong_count: i32::try_from(trail.test_a_errors.saturating_add(trail.test_b_errors))
                .ok(),
        },
    }
}

fn row_to_record(row: AssessmentResultRow) -> Option<AssessmentRecord> {
    let AssessmentResultRow {
        id,
        participant_name,
        participant_age,
        participant_gender,
        test_date,
        test_kind,
        outcome,
        recorded_at,
    } = row;

    let outcome: AssessmentOutcome = match serde_json::from_value(outcome) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(%id, error = %err, "skipping result row with undecodable outcome");
            return None;
        }
    };
    if outcome.kind().as_str() != test_kind {
        warn!(
            %id,
            test_kind = %test_kind,
            "skipping result row whose kind disagrees with its outcome"
        );
        return None;
    }

    Some(AssessmentRecord {
        id,
        participant: Participant::from_draft(ParticipantDraft {
            name: Some(participant_name),
            age: Some(participant_age),
            gender: Some(participant_gender),
            test_date: Some(test_date),
        }),
        recorded_at,
        outcome,
    })
}

#[async_trait]
impl ResultsRepository for DieselResultsRepository {
    async fn append(&self, record: &AssessmentRecord) -> Result<(), ResultsRepositoryError> {
        let outcome = serde_json::to_value(&record.outcome)
            .map_err(|err| ResultsRepositoryError::query(format!("encode outcome: {err}")))?;
        let scores = score_columns(&record.outcome);
        let participant = &record.participant;
        let row = NewAssessmentResultRow {
            id: record.id,
            participant_name: participant.name(),
            participant_age: participant.age(),
            participant_gender: participant.gender(),
            test_date: participant.test_date(),
            test_kind: record.kind().as_str(),
            final_level: scores.final_level,
            correct_count: scores.correct_count,
            wrong_count: scores.wrong_count,
            outcome: &outcome,
            recorded_at: record.recorded_at,
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(assessment_results::table)
                    .values(&row)
                    .execute(conn)
                    .await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<AssessmentRecord>, ResultsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<AssessmentResultRow> = assessment_results::table
            .order(assessment_results::seq.asc())
            .select(AssessmentResultRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().filter_map(row_to_record).collect())
    }
}
