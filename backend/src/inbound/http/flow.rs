//! Participant flow: battery index, start form and page guards.
//!
//! ```text
//! GET  /             Battery index
//! POST /start-test   name=Ada&age=36&gender=F&test_date=2024-05-01
//! GET  /practice     Participant details, or 303 to / without a session
//! GET  /test         Reset the sequence game, or 303 to / without a session
//! ```

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::GameSnapshot;
use crate::domain::{Error, ErrorCode, Participant, ParticipantDraft, SessionId, TestKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Start form fields. Every field is optional; blanks get defaults.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct StartTestForm {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub test_date: Option<String>,
}

impl From<StartTestForm> for ParticipantDraft {
    fn from(form: StartTestForm) -> Self {
        Self {
            name: form.name,
            age: form.age,
            gender: form.gender,
            test_date: form.test_date,
        }
    }
}

/// One game in the battery and the endpoint that records its result.
#[derive(Debug, Serialize, ToSchema)]
pub struct BatteryEntry {
    pub kind: TestKind,
    pub submit: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BatteryIndex {
    pub start: &'static str,
    pub tests: Vec<BatteryEntry>,
}

fn submit_path(kind: TestKind) -> &'static str {
    match kind {
        TestKind::Sequence => "/api/submit-answer",
        TestKind::CardMatching => "/api/submit-card-result",
        TestKind::Pattern => "/api/submit-pattern-result",
        TestKind::Stroop => "/api/submit-stroop-result",
        TestKind::TrailMaking => "/save_trail_making_results",
    }
}

fn see_other(location: &'static str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Resolve the cookie's session, treating an expired server-side entry as
/// absent so the guards below can send the participant back to the start.
async fn guarded<T, F, Fut>(
    state: &HttpState,
    session: &SessionContext,
    action: F,
) -> ApiResult<Option<T>>
where
    F: FnOnce(HttpState, SessionId) -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let Some(id) = session.session_id()? else {
        return Ok(None);
    };
    match action(state.clone(), id).await {
        Ok(value) => Ok(Some(value)),
        Err(error) if error.code() == ErrorCode::NotFound => {
            session.clear();
            Ok(None)
        }
        Err(error) => Err(error),
    }
}

/// List the games in the battery.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Battery index", body = BatteryIndex)),
    tags = ["flow"],
    operation_id = "index"
)]
#[get("/")]
pub async fn index() -> web::Json<BatteryIndex> {
    web::Json(BatteryIndex {
        start: "/start-test",
        tests: TestKind::ALL
            .into_iter()
            .map(|kind| BatteryEntry {
                kind,
                submit: submit_path(kind),
            })
            .collect(),
    })
}

/// Register a participant and open a fresh session.
#[utoipa::path(
    post,
    path = "/start-test",
    request_body(content = StartTestForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Session opened; continue to /practice",
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Malformed form body", body = Error),
        (status = 503, description = "Session store unavailable", body = Error)
    ),
    tags = ["flow"],
    operation_id = "startTest"
)]
#[post("/start-test")]
pub async fn start_test(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<StartTestForm>,
) -> ApiResult<HttpResponse> {
    if let Some(previous) = session.session_id()? {
        if let Err(error) = state.sequence.end(&previous).await {
            warn!(session_id = %previous, %error, "failed to drop previous session");
        }
    }
    let id = state.sequence.begin(form.into_inner().into()).await?;
    session.bind(&id)?;
    Ok(see_other("/practice"))
}

/// Participant details for the practice page.
#[utoipa::path(
    get,
    path = "/practice",
    responses(
        (status = 200, description = "Registered participant", body = Participant),
        (status = 303, description = "No session; back to /")
    ),
    tags = ["flow"],
    operation_id = "practice"
)]
#[get("/practice")]
pub async fn practice(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let participant = guarded(&state, &session, |state, id| async move {
        state.sequence.participant(&id).await
    })
    .await?;
    Ok(match participant {
        Some(participant) => HttpResponse::Ok().json(participant),
        None => see_other("/"),
    })
}

/// Reset the sequence game to its first level.
#[utoipa::path(
    get,
    path = "/test",
    responses(
        (status = 200, description = "Fresh game", body = GameSnapshot),
        (status = 303, description = "No session; back to /")
    ),
    tags = ["flow"],
    operation_id = "test"
)]
#[get("/test")]
pub async fn test_page(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let snapshot = guarded(&state, &session, |state, id| async move {
        state.sequence.start_test(&id).await
    })
    .await?;
    Ok(match snapshot {
        Some(snapshot) => HttpResponse::Ok().json(snapshot),
        None => see_other("/"),
    })
}

#[cfg(test)]
#[path = "flow_tests.rs"]
mod tests;
