//! Tests for the battery result handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test};
use mockall::predicate::always;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::game::GameRules;
use crate::domain::ports::{MockBatteryResultsCommand, MockSequenceTestCommand};
use crate::domain::ports::FixtureResultsQuery;
use crate::domain::records::TestKind;
use crate::inbound::http::configure;
use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
use crate::test_support::RecordingResultsRepository;
use crate::test_support::http::battery_state;

macro_rules! battery_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(test_session_middleware())
                .configure(configure),
        )
        .await
    };
}

fn stroop_trial(response_time: f64) -> Value {
    json!({
        "user_response": "space",
        "response_time": response_time,
        "correct_answer": "space",
        "is_correct": true
    })
}

#[rstest]
#[case("/api/submit-card-result", json!([{ "level": 1, "pairs": 3, "time_taken": 12.5 }]), TestKind::CardMatching)]
#[case(
    "/api/submit-pattern-result",
    json!({ "level": 2, "score": 4, "total_problems": 5, "times": [1.2, 2.0] }),
    TestKind::Pattern
)]
#[case(
    "/api/submit-stroop-result",
    json!({
        "practice_trials": [stroop_trial(0.8)],
        "test_trials": [stroop_trial(0.6), stroop_trial(0.7)],
        "summary": {
            "round1": { "correct_count": 2, "accuracy": 100.0, "avg_reaction_time": 0.65 },
            "practice_failures": 1
        }
    }),
    TestKind::Stroop
)]
#[case(
    "/save_trail_making_results",
    json!({ "testA_time": 31.2, "testA_errors": 0, "testB_time": 58.9, "testB_errors": 2 }),
    TestKind::TrailMaking
)]
#[actix_web::test]
async fn results_are_stored_for_the_session_participant(
    #[case] uri: &str,
    #[case] body: Value,
    #[case] kind: TestKind,
) {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = battery_app!(battery_state(results.clone(), GameRules::default()));
    let start = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/start-test")
            .set_form([("name", "Grace"), ("age", "41")])
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&start);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(uri)
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let records = results.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind(), kind);
    assert_eq!(records[0].participant.name(), "Grace");
    assert_eq!(records[0].participant.age(), "41");
}

#[rstest]
#[actix_web::test]
async fn trail_making_points_to_finish_page() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = battery_app!(battery_state(results, GameRules::default()));
    let start = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/start-test")
            .set_form([("name", "Grace")])
            .to_request(),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/save_trail_making_results")
            .cookie(session_cookie(&start))
            .set_json(json!({
                "test_a_time": 30.0, "test_a_errors": 1,
                "test_b_time": 60.0, "test_b_errors": 0
            }))
            .to_request(),
    )
    .await;

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "success": true, "next_url": "/finish" }));
}

#[rstest]
#[actix_web::test]
async fn submission_without_session_is_not_found() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = battery_app!(battery_state(results.clone(), GameRules::default()));

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/submit-pattern-result")
            .set_json(json!({ "level": 1, "score": 1, "total_problems": 5, "times": [] }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(results.records().is_empty());
}

#[rstest]
#[actix_web::test]
async fn invalid_outcome_is_rejected() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = battery_app!(battery_state(results.clone(), GameRules::default()));
    let start = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/start-test")
            .set_form([("name", "Grace")])
            .to_request(),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/submit-pattern-result")
            .cookie(session_cookie(&start))
            .set_json(json!({ "level": 1, "score": 6, "total_problems": 5, "times": [] }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(results.records().is_empty());
}

#[rstest]
#[actix_web::test]
async fn store_outage_surfaces_as_unavailable() {
    let mut sequence = MockSequenceTestCommand::new();
    sequence
        .expect_begin()
        .returning(|_| Ok(SessionId::random()));
    let mut battery = MockBatteryResultsCommand::new();
    battery
        .expect_record()
        .with(always(), always())
        .times(1)
        .returning(|_, _| Err(Error::service_unavailable("results store unavailable: refused")));
    let state = HttpState::new(
        Arc::new(sequence),
        Arc::new(battery),
        Arc::new(FixtureResultsQuery),
    );
    let app = battery_app!(state);
    let start = test::call_service(
        &app,
        test::TestRequest::post().uri("/start-test").set_form([("name", "Grace")]).to_request(),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/submit-card-result")
            .cookie(session_cookie(&start))
            .set_json(json!([{ "level": 1, "pairs": 2, "time_taken": 4.0 }]))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "service_unavailable");
    assert_eq!(body["message"], "Service temporarily unavailable");
}
