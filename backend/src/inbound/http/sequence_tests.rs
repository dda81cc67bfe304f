//! Tests for the sequence-memory handlers.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::game::GameRules;
use crate::domain::records::AssessmentOutcome;
use crate::inbound::http::configure;
use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
use crate::test_support::RecordingResultsRepository;
use crate::test_support::http::battery_state;

macro_rules! sequence_app {
    ($results:expr) => {
        test::init_service(
            App::new()
                .app_data(actix_web::web::Data::new(battery_state(
                    $results.clone(),
                    GameRules::default(),
                )))
                .wrap(test_session_middleware())
                .configure(configure),
        )
        .await
    };
}

async fn send<S>(app: &S, req: actix_http::Request) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

async fn open_session<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/start-test")
            .set_form([("name", "Ada")])
            .to_request(),
    )
    .await;
    session_cookie(&res)
}

fn get(uri: &str, cookie: &Cookie<'static>) -> actix_http::Request {
    test::TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request()
}

fn post(uri: &str, cookie: &Cookie<'static>, body: Value) -> actix_http::Request {
    test::TestRequest::post()
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
        .to_request()
}

fn flashes(problem: &Value) -> Vec<usize> {
    problem["flash_sequence"]
        .as_array()
        .expect("flash_sequence array")
        .iter()
        .map(|id| id.as_u64().expect("box id") as usize)
        .collect()
}

#[rstest]
#[case("/api/get-practice-problem")]
#[case("/api/get-problem")]
#[case("/api/get-current-problem")]
#[actix_web::test]
async fn endpoints_require_a_session(#[case] uri: &str) {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = sequence_app!(results);

    let (status, body) = send(&app, test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn practice_answers_are_scored_without_affecting_the_game() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = sequence_app!(results);
    let cookie = open_session(&app).await;

    let (status, problem) = send(&app, get("/api/get-practice-problem", &cookie)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(problem["boxes"].as_array().map(Vec::len), Some(4));
    let answer = flashes(&problem);

    let (_, correct) = send(
        &app,
        post("/api/submit-practice-answer", &cookie, json!({ "answer": answer })),
    )
    .await;
    let box_count = problem["boxes"].as_array().map_or(0, Vec::len);
    let other_box = vec![(answer[0] + 1) % box_count];
    let (_, incorrect) = send(
        &app,
        post("/api/submit-practice-answer", &cookie, json!({ "answer": other_box })),
    )
    .await;

    assert_eq!(correct["status"], "correct");
    assert_eq!(incorrect["status"], "incorrect");
    assert!(results.records().is_empty());
}

#[rstest]
#[actix_web::test]
async fn practice_answer_without_problem_is_rejected() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = sequence_app!(results);
    let cookie = open_session(&app).await;

    let (status, body) = send(
        &app,
        post("/api/submit-practice-answer", &cookie, json!({ "answer": [0] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn current_problem_is_stable_until_answered() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = sequence_app!(results);
    let cookie = open_session(&app).await;

    let (_, first) = send(&app, get("/api/get-current-problem", &cookie)).await;
    let (_, again) = send(&app, get("/api/get-current-problem", &cookie)).await;

    assert_eq!(first, again);
    assert_eq!(first["current_level"], 1);
    assert_eq!(first["boxes"].as_array().map(Vec::len), Some(5));
}

#[rstest]
#[actix_web::test]
async fn correct_answer_advances_level() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = sequence_app!(results);
    let cookie = open_session(&app).await;
    let (_, problem) = send(&app, get("/api/get-problem", &cookie)).await;

    let (status, body) = send(
        &app,
        post(
            "/api/submit-answer",
            &cookie,
            json!({ "answer": flashes(&problem), "time_taken": 1.5 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "next_level");
    assert_eq!(body["correct"], true);
    assert_eq!(body["current_level"], 2);
    assert_eq!(body["chances_left"], 2);
}

#[rstest]
#[actix_web::test]
async fn wrong_length_answer_is_invalid() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = sequence_app!(results);
    let cookie = open_session(&app).await;
    let _ = send(&app, get("/api/get-problem", &cookie)).await;

    let (status, body) = send(
        &app,
        post("/api/submit-answer", &cookie, json!({ "answer": [0, 1, 2, 3] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn malformed_body_is_invalid_request() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = sequence_app!(results);
    let cookie = open_session(&app).await;

    let (status, body) = send(
        &app,
        post("/api/submit-answer", &cookie, json!({ "answer": "first" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn exhausting_chances_ends_the_game_and_stores_one_summary() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = sequence_app!(results);
    let cookie = open_session(&app).await;

    let mut statuses = Vec::new();
    for _ in 0..2 {
        let (_, problem) = send(&app, get("/api/get-problem", &cookie)).await;
        let wrong: Vec<usize> = flashes(&problem).into_iter().rev().collect();
        let (status, body) = send(
            &app,
            post("/api/submit-answer", &cookie, json!({ "answer": wrong })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        statuses.push(body["status"].as_str().unwrap_or_default().to_owned());
    }

    assert_eq!(statuses, ["retry", "game_over"]);
    let records = results.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].participant.name(), "Ada");
    match &records[0].outcome {
        AssessmentOutcome::Sequence(summary) => {
            assert_eq!(summary.final_level, 1);
            assert_eq!(summary.history.len(), 2);
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let (status, _) = send(&app, get("/api/get-problem", &cookie)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(results.records().len(), 1);
}

#[rstest]
#[actix_web::test]
async fn resubmitting_without_new_problem_is_rejected() {
    let results = Arc::new(RecordingResultsRepository::default());
    let app = sequence_app!(results);
    let cookie = open_session(&app).await;
    let (_, problem) = send(&app, get("/api/get-problem", &cookie)).await;
    let answer = json!({ "answer": flashes(&problem) });

    let (first, _) = send(&app, post("/api/submit-answer", &cookie, answer.clone())).await;
    let (second, body) = send(&app, post("/api/submit-answer", &cookie, answer)).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}
