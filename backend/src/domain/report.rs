//! Admin-facing projection of stored results.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Participant;
use super::records::{AssessmentOutcome, AssessmentRecord};

/// Flattened sequence-memory result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SequenceRow {
    /// 1-based position among sequence results, in storage order.
    #[schema(example = 1)]
    pub id: usize,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub test_date: String,
    /// Level reached when the game ended.
    pub level: u32,
    pub correct: usize,
    pub wrong: usize,
}

/// Result of any other game, listed as stored.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OutcomeRow {
    pub id: Uuid,
    pub participant: Participant,
    pub recorded_at: DateTime<Utc>,
    pub outcome: AssessmentOutcome,
}

impl From<&AssessmentRecord> for OutcomeRow {
    fn from(record: &AssessmentRecord) -> Self {
        Self {
            id: record.id,
            participant: record.participant.clone(),
            recorded_at: record.recorded_at,
            outcome: record.outcome.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ResultsReport {
    pub sequence: Vec<SequenceRow>,
    pub card_matching: Vec<OutcomeRow>,
    pub pattern: Vec<OutcomeRow>,
    pub stroop: Vec<OutcomeRow>,
    pub trail_making: Vec<OutcomeRow>,
}

impl ResultsReport {
    /// Group `records` by game, preserving storage order within each group.
    pub fn build(records: &[AssessmentRecord]) -> Self {
        let mut report = Self::default();
        for record in records {
            match &record.outcome {
                AssessmentOutcome::Sequence(outcome) => {
                    let participant = &record.participant;
                    report.sequence.push(SequenceRow {
                        id: report.sequence.len() + 1,
                        name: participant.name().to_owned(),
                        age: participant.age().to_owned(),
                        gender: participant.gender().to_owned(),
                        test_date: participant.test_date().to_owned(),
                        level: outcome.final_level,
                        correct: outcome.correct_count(),
                        wrong: outcome.wrong_count(),
                    });
                }
                AssessmentOutcome::CardMatching(_) => report.card_matching.push(record.into()),
                AssessmentOutcome::Pattern(_) => report.pattern.push(record.into()),
                AssessmentOutcome::Stroop(_) => report.stroop.push(record.into()),
                AssessmentOutcome::TrailMaking(_) => report.trail_making.push(record.into()),
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;
    use crate::domain::ParticipantDraft;
    use crate::domain::records::{PatternOutcome, SequenceOutcome, TrialRecord};

    fn record(name: &str, outcome: AssessmentOutcome) -> AssessmentRecord {
        let participant = Participant::from_draft(ParticipantDraft {
            name: Some(name.into()),
            ..ParticipantDraft::default()
        });
        let at = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        AssessmentRecord::new(participant, outcome, at)
    }

    fn sequence(final_level: u32, results: &[bool]) -> AssessmentOutcome {
        AssessmentOutcome::Sequence(SequenceOutcome {
            final_level,
            history: results
                .iter()
                .map(|correct| TrialRecord {
                    level: final_level,
                    correct: *correct,
                    user_answer: vec![0, 1],
                    correct_answer: vec![0, 1],
                    time_taken: None,
                })
                .collect(),
        })
    }

    #[rstest]
    fn empty_store_gives_empty_report() {
        assert_eq!(ResultsReport::build(&[]), ResultsReport::default());
    }

    #[rstest]
    fn sequence_rows_are_numbered_in_storage_order() {
        let pattern = AssessmentOutcome::Pattern(PatternOutcome {
            level: 1,
            score: 2,
            total_problems: 3,
            times: vec![1.0, 2.0],
        });
        let records = vec![
            record("Ada", sequence(3, &[true, true, false, false])),
            record("Lin", pattern),
            record("Grace", sequence(1, &[false, false])),
        ];

        let report = ResultsReport::build(&records);

        assert_eq!(report.sequence.len(), 2);
        let first = &report.sequence[0];
        assert_eq!((first.id, first.name.as_str()), (1, "Ada"));
        assert_eq!((first.level, first.correct, first.wrong), (3, 2, 2));
        let second = &report.sequence[1];
        assert_eq!((second.id, second.name.as_str()), (2, "Grace"));
        assert_eq!(second.age, "N/A");
        assert_eq!(report.pattern.len(), 1);
        assert_eq!(report.pattern[0].participant.name(), "Lin");
    }
}
