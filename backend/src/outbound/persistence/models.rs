//! Diesel row types for `assessment_results`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::assessment_results;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assessment_results)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AssessmentResultRow {
    pub id: Uuid,
    pub participant_name: String,
    pub participant_age: String,
    pub participant_gender: String,
    pub test_date: String,
    pub test_kind: String,
    pub outcome: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assessment_results)]
pub(crate) struct NewAssessmentResultRow<'a> {
    pub id: Uuid,
    pub participant_name: &'a str,
    pub participant_age: &'a str,
    pub participant_gender: &'a str,
    pub test_date: &'a str,
    pub test_kind: &'a str,
    pub final_level: Option<i32>,
    pub correct_count: Option<i32>,
    pub wrong_count: Option<i32>,
    pub outcome: &'a serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}
