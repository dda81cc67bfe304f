//! Result submission for the card-matching, pattern, stroop and
//! trail-making games.
//!
//! ```text
//! POST /api/submit-card-result     [{"level":1,"pairs":3,"time_taken":12.5}]
//! POST /api/submit-pattern-result  {"level":1,"score":4,"total_problems":5,"times":[...]}
//! POST /api/submit-stroop-result   {"practice_trials":[...],"test_trials":[...],"summary":{...}}
//! POST /save_trail_making_results  {"testA_time":31.2,"testA_errors":0,...}
//! ```
//!
//! Request bodies follow the browser client's field names; they are mapped
//! onto the stored outcome types here.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::records::{
    AssessmentOutcome, CardLevelResult, CardOutcome, PatternOutcome, StroopOutcome,
    StroopRoundSummary, StroopSummary, StroopTrial, TrailMakingOutcome,
};
use crate::domain::{Error, SessionId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Page the trail-making client moves to after a successful save.
pub const FINISH_URL: &str = "/finish";

/// Acknowledgement for a stored result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordedResponse {
    #[schema(example = "success")]
    pub status: String,
    pub id: Uuid,
}

impl RecordedResponse {
    fn success(id: Uuid) -> Self {
        Self {
            status: "success".to_owned(),
            id,
        }
    }
}

/// Stroop summary as sent by the client: either a list of rounds or the
/// numbered `round1`/`round2` fields.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct StroopSummaryPayload {
    #[serde(default)]
    pub rounds: Vec<StroopRoundSummary>,
    #[serde(default)]
    pub round1: Option<StroopRoundSummary>,
    #[serde(default)]
    pub round2: Option<StroopRoundSummary>,
    #[serde(default)]
    pub practice_failures: u32,
}

impl From<StroopSummaryPayload> for StroopSummary {
    fn from(payload: StroopSummaryPayload) -> Self {
        let StroopSummaryPayload {
            mut rounds,
            round1,
            round2,
            practice_failures,
        } = payload;
        rounds.extend(round1);
        rounds.extend(round2);
        Self {
            rounds,
            practice_failures,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StroopResultRequest {
    #[serde(default)]
    pub practice_trials: Vec<StroopTrial>,
    pub test_trials: Vec<StroopTrial>,
    #[serde(default)]
    pub summary: StroopSummaryPayload,
}

/// Trail-making times in seconds and error counts.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TrailMakingRequest {
    #[serde(alias = "testA_time")]
    pub test_a_time: f64,
    #[serde(alias = "testA_errors")]
    pub test_a_errors: u32,
    #[serde(alias = "testB_time")]
    pub test_b_time: f64,
    #[serde(alias = "testB_errors")]
    pub test_b_errors: u32,
}

impl From<TrailMakingRequest> for TrailMakingOutcome {
    fn from(value: TrailMakingRequest) -> Self {
        Self {
            test_a_time: value.test_a_time,
            test_a_errors: value.test_a_errors,
            test_b_time: value.test_b_time,
            test_b_errors: value.test_b_errors,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TrailMakingResponse {
    pub success: bool,
    #[schema(example = "/finish")]
    pub next_url: String,
}

async fn record(
    state: &HttpState,
    session: &SessionContext,
    outcome: AssessmentOutcome,
) -> ApiResult<Uuid> {
    let id: SessionId = session.require_session_id()?;
    state.battery.record(&id, outcome).await
}

/// Store the per-level card-matching results.
#[utoipa::path(
    post,
    path = "/api/submit-card-result",
    request_body = Vec<CardLevelResult>,
    responses(
        (status = 200, description = "Stored", body = RecordedResponse),
        (status = 400, description = "Empty or invalid levels", body = Error),
        (status = 404, description = "No participant session", body = Error),
        (status = 503, description = "Results store unavailable", body = Error)
    ),
    tags = ["battery"],
    operation_id = "submitCardResult"
)]
#[post("/submit-card-result")]
pub async fn submit_card_result(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Vec<CardLevelResult>>,
) -> ApiResult<web::Json<RecordedResponse>> {
    let outcome = AssessmentOutcome::CardMatching(CardOutcome {
        levels: payload.into_inner(),
    });
    let id = record(&state, &session, outcome).await?;
    Ok(web::Json(RecordedResponse::success(id)))
}

/// Store one pattern-recognition level.
#[utoipa::path(
    post,
    path = "/api/submit-pattern-result",
    request_body = PatternOutcome,
    responses(
        (status = 200, description = "Stored", body = RecordedResponse),
        (status = 400, description = "Score above total or invalid times", body = Error),
        (status = 404, description = "No participant session", body = Error),
        (status = 503, description = "Results store unavailable", body = Error)
    ),
    tags = ["battery"],
    operation_id = "submitPatternResult"
)]
#[post("/submit-pattern-result")]
pub async fn submit_pattern_result(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PatternOutcome>,
) -> ApiResult<web::Json<RecordedResponse>> {
    let outcome = AssessmentOutcome::Pattern(payload.into_inner());
    let id = record(&state, &session, outcome).await?;
    Ok(web::Json(RecordedResponse::success(id)))
}

/// Store stroop trials and the per-round summary.
#[utoipa::path(
    post,
    path = "/api/submit-stroop-result",
    request_body = StroopResultRequest,
    responses(
        (status = 200, description = "Stored", body = RecordedResponse),
        (status = 400, description = "No test trials or invalid timings", body = Error),
        (status = 404, description = "No participant session", body = Error),
        (status = 503, description = "Results store unavailable", body = Error)
    ),
    tags = ["battery"],
    operation_id = "submitStroopResult"
)]
#[post("/submit-stroop-result")]
pub async fn submit_stroop_result(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<StroopResultRequest>,
) -> ApiResult<web::Json<RecordedResponse>> {
    let StroopResultRequest {
        practice_trials,
        test_trials,
        summary,
    } = payload.into_inner();
    let outcome = AssessmentOutcome::Stroop(StroopOutcome {
        practice_trials,
        test_trials,
        summary: summary.into(),
    });
    let id = record(&state, &session, outcome).await?;
    Ok(web::Json(RecordedResponse::success(id)))
}

/// Store trail-making results and point the client at the finish page.
#[utoipa::path(
    post,
    path = "/save_trail_making_results",
    request_body = TrailMakingRequest,
    responses(
        (status = 200, description = "Stored", body = TrailMakingResponse),
        (status = 400, description = "Invalid times", body = Error),
        (status = 404, description = "No participant session", body = Error),
        (status = 503, description = "Results store unavailable", body = Error)
    ),
    tags = ["battery"],
    operation_id = "saveTrailMakingResults"
)]
#[post("/save_trail_making_results")]
pub async fn save_trail_making_results(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<TrailMakingRequest>,
) -> ApiResult<web::Json<TrailMakingResponse>> {
    let outcome = AssessmentOutcome::TrailMaking(payload.into_inner().into());
    record(&state, &session, outcome).await?;
    Ok(web::Json(TrailMakingResponse {
        success: true,
        next_url: FINISH_URL.to_owned(),
    }))
}

#[cfg(test)]
#[path = "battery_tests.rs"]
mod tests;
