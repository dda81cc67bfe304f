//! OpenAPI documentation.
//!
//! [`ApiDoc`] collects every handler in the inbound HTTP layer together with
//! the domain types they exchange. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};

/// Document the session cookie issued by `POST /start-test`.
struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Opaque participant session cookie issued by POST /start-test.",
            ))),
        );
    }
}

/// OpenAPI document for the battery API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieAddon),
    info(
        title = "Cognitive assessment battery API",
        description = "Puzzle generation, answer scoring and result storage for the battery games."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::flow::index,
        crate::inbound::http::flow::start_test,
        crate::inbound::http::flow::practice,
        crate::inbound::http::flow::test_page,
        crate::inbound::http::sequence::get_practice_problem,
        crate::inbound::http::sequence::submit_practice_answer,
        crate::inbound::http::sequence::get_problem,
        crate::inbound::http::sequence::get_current_problem,
        crate::inbound::http::sequence::submit_answer,
        crate::inbound::http::battery::submit_card_result,
        crate::inbound::http::battery::submit_pattern_result,
        crate::inbound::http::battery::submit_stroop_result,
        crate::inbound::http::battery::save_trail_making_results,
        crate::inbound::http::results::results,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(Error, ErrorCode)),
    tags(
        (name = "flow", description = "Participant registration and page guards"),
        (name = "sequence", description = "Sequence-memory game"),
        (name = "battery", description = "Results of the other games"),
        (name = "results", description = "Admin report"),
        (name = "health", description = "Probes")
    )
)]
pub struct ApiDoc;
