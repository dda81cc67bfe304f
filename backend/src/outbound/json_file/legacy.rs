//! Decoder for results files written by the earlier single-game server.
//!
//! Those entries hold `user_info`, `final_level` and `history` with no id or
//! timestamp. They are surfaced as sequence records with an id derived from
//! the entry content and the Unix epoch as the recording time.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::records::{AssessmentOutcome, SequenceOutcome, TrialRecord};
use crate::domain::{AssessmentRecord, Participant, ParticipantDraft};

#[derive(Deserialize)]
struct LegacyEntry {
    #[serde(default)]
    user_info: ParticipantDraft,
    final_level: u32,
    #[serde(default)]
    history: Vec<LegacyTrial>,
}

#[derive(Deserialize)]
struct LegacyTrial {
    level: u32,
    correct: bool,
    #[serde(default)]
    user_answer: Option<Vec<usize>>,
    correct_answer: Vec<usize>,
    #[serde(default)]
    time_taken: Option<f64>,
}

pub(super) fn decode(entry: &Value) -> Option<AssessmentRecord> {
    let legacy = LegacyEntry::deserialize(entry).ok()?;
    let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, entry.to_string().as_bytes());
    let history = legacy
        .history
        .into_iter()
        .map(|trial| TrialRecord {
            level: trial.level,
            correct: trial.correct,
            user_answer: trial.user_answer.unwrap_or_default(),
            correct_answer: trial.correct_answer,
            time_taken: trial.time_taken,
        })
        .collect();
    Some(AssessmentRecord {
        id,
        participant: Participant::from_draft(legacy.user_info),
        recorded_at: DateTime::<Utc>::UNIX_EPOCH,
        outcome: AssessmentOutcome::Sequence(SequenceOutcome {
            final_level: legacy.final_level,
            history,
        }),
    })
}
