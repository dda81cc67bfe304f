//! HTTP inbound adapter exposing the battery endpoints.

pub mod battery;
pub mod error;
pub mod flow;
pub mod health;
pub mod results;
pub mod sequence;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::web;

/// Register every participant-facing route plus the payload error handlers.
///
/// Health probes and API docs are mounted separately by the server.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use cogbattery::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_payload_error))
        .app_data(web::FormConfig::default().error_handler(error::form_payload_error))
        .app_data(web::QueryConfig::default().error_handler(error::query_payload_error))
        .service(flow::index)
        .service(flow::start_test)
        .service(flow::practice)
        .service(flow::test_page)
        .service(
            web::scope("/api")
                .service(sequence::get_practice_problem)
                .service(sequence::submit_practice_answer)
                .service(sequence::get_problem)
                .service(sequence::get_current_problem)
                .service(sequence::submit_answer)
                .service(battery::submit_card_result)
                .service(battery::submit_pattern_result)
                .service(battery::submit_stroop_result),
        )
        .service(battery::save_trail_making_results)
        .service(results::results);
}
