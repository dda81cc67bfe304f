//! Admin results report.
//!
//! ```text
//! GET /results?pw=<admin password>
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Error, ResultsReport};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ResultsParams {
    /// Admin password.
    pub pw: Option<String>,
}

/// Every stored result, grouped by game.
#[utoipa::path(
    get,
    path = "/results",
    params(ResultsParams),
    responses(
        (status = 200, description = "Report", body = ResultsReport),
        (status = 403, description = "Wrong or missing password", body = Error),
        (status = 503, description = "Results store unavailable", body = Error)
    ),
    tags = ["results"],
    operation_id = "results"
)]
#[get("/results")]
pub async fn results(
    state: web::Data<HttpState>,
    params: web::Query<ResultsParams>,
) -> ApiResult<web::Json<ResultsReport>> {
    let report = state.results.report(params.into_inner().pw).await?;
    Ok(web::Json(report))
}
