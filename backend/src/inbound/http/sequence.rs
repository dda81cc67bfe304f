//! Sequence-memory game endpoints.
//!
//! ```text
//! GET  /api/get-practice-problem
//! POST /api/submit-practice-answer {"answer":[2,0]}
//! GET  /api/get-problem
//! GET  /api/get-current-problem
//! POST /api/submit-answer {"answer":[3,1],"time_taken":2.4}
//! ```
//!
//! Every endpoint needs the participant session opened by `/start-test`.

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{PracticeStatus, ProblemView, SubmitAnswerRequest, SubmitAnswerResponse};
use crate::domain::sequence::SequenceProblem;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PracticeAnswerRequest {
    pub answer: Vec<usize>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PracticeAnswerResponse {
    pub status: PracticeStatus,
}

/// Issue a level-0 practice puzzle.
#[utoipa::path(
    get,
    path = "/api/get-practice-problem",
    responses(
        (status = 200, description = "Practice puzzle", body = SequenceProblem),
        (status = 404, description = "No participant session", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["sequence"],
    operation_id = "getPracticeProblem"
)]
#[get("/get-practice-problem")]
pub async fn get_practice_problem(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SequenceProblem>> {
    let id = session.require_session_id()?;
    let problem = state.sequence.practice_problem(&id).await?;
    Ok(web::Json(problem))
}

/// Score the practice puzzle. Practice never affects the game.
#[utoipa::path(
    post,
    path = "/api/submit-practice-answer",
    request_body = PracticeAnswerRequest,
    responses(
        (status = 200, description = "Scored", body = PracticeAnswerResponse),
        (status = 400, description = "No practice puzzle or wrong answer length", body = Error),
        (status = 404, description = "No participant session", body = Error)
    ),
    tags = ["sequence"],
    operation_id = "submitPracticeAnswer"
)]
#[post("/submit-practice-answer")]
pub async fn submit_practice_answer(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<PracticeAnswerRequest>,
) -> ApiResult<web::Json<PracticeAnswerResponse>> {
    let id = session.require_session_id()?;
    let status = state
        .sequence
        .submit_practice(&id, payload.into_inner().answer)
        .await?;
    Ok(web::Json(PracticeAnswerResponse { status }))
}

/// Issue a new puzzle for the current level, replacing any pending one.
#[utoipa::path(
    get,
    path = "/api/get-problem",
    responses(
        (status = 200, description = "Puzzle and standing", body = ProblemView),
        (status = 400, description = "Game already finished", body = Error),
        (status = 404, description = "No participant session", body = Error)
    ),
    tags = ["sequence"],
    operation_id = "getProblem"
)]
#[get("/get-problem")]
pub async fn get_problem(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProblemView>> {
    let id = session.require_session_id()?;
    Ok(web::Json(state.sequence.next_problem(&id).await?))
}

/// Return the pending puzzle, issuing one when none is pending.
#[utoipa::path(
    get,
    path = "/api/get-current-problem",
    responses(
        (status = 200, description = "Puzzle and standing", body = ProblemView),
        (status = 400, description = "Game already finished", body = Error),
        (status = 404, description = "No participant session", body = Error)
    ),
    tags = ["sequence"],
    operation_id = "getCurrentProblem"
)]
#[get("/get-current-problem")]
pub async fn get_current_problem(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProblemView>> {
    let id = session.require_session_id()?;
    Ok(web::Json(state.sequence.current_problem(&id).await?))
}

/// Score the pending puzzle and advance the game.
#[utoipa::path(
    post,
    path = "/api/submit-answer",
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Scored; `status` tells the client what to do next",
            body = SubmitAnswerResponse),
        (status = 400, description = "No pending puzzle, finished game or wrong answer length",
            body = Error),
        (status = 404, description = "No participant session", body = Error),
        (status = 503, description = "Results store unavailable", body = Error)
    ),
    tags = ["sequence"],
    operation_id = "submitAnswer"
)]
#[post("/submit-answer")]
pub async fn submit_answer(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitAnswerRequest>,
) -> ApiResult<web::Json<SubmitAnswerResponse>> {
    let id = session.require_session_id()?;
    let response = state
        .sequence
        .submit_answer(&id, payload.into_inner())
        .await?;
    Ok(web::Json(response))
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod tests;
