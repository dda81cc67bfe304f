//! Tests for result recording and the admin report.

use chrono::{TimeZone, Utc};
use mockable::MockClock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::game::GameRules;
use crate::domain::ports::{MockGameSessionStore, MockResultsRepository};
use crate::domain::records::{CardLevelResult, CardOutcome, SequenceOutcome, TrailMakingOutcome};
use crate::domain::{Participant, ParticipantDraft, ParticipantSession};

#[fixture]
fn clock() -> Arc<dyn Clock> {
    let mut clock = MockClock::new();
    let now = Utc
        .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    clock.expect_utc().return_const(now);
    Arc::new(clock)
}

fn trail() -> AssessmentOutcome {
    AssessmentOutcome::TrailMaking(TrailMakingOutcome {
        test_a_time: 25.0,
        test_a_errors: 1,
        test_b_time: 48.5,
        test_b_errors: 2,
    })
}

fn sessions_with(name: &str) -> MockGameSessionStore {
    let participant = Participant::from_draft(ParticipantDraft {
        name: Some(name.to_owned()),
        ..ParticipantDraft::default()
    });
    let mut sessions = MockGameSessionStore::new();
    sessions
        .expect_load()
        .returning(move |_| Ok(Some(ParticipantSession::new(participant.clone(), GameRules::default()))));
    sessions
}

#[rstest]
#[tokio::test]
async fn record_attaches_session_participant(clock: Arc<dyn Clock>) {
    let mut results = MockResultsRepository::new();
    results
        .expect_append()
        .withf(|record| {
            record.participant.name() == "Lin" && record.kind() == crate::domain::TestKind::TrailMaking
        })
        .times(1)
        .return_once(|_| Ok(()));
    let svc = BatteryResultsService::new(Arc::new(sessions_with("Lin")), Arc::new(results), clock);

    svc.record(&SessionId::random(), trail())
        .await
        .expect("recorded");
}

#[rstest]
#[tokio::test]
async fn record_without_session_is_not_found(clock: Arc<dyn Clock>) {
    let mut sessions = MockGameSessionStore::new();
    sessions.expect_load().returning(|_| Ok(None));
    let mut results = MockResultsRepository::new();
    results.expect_append().never();
    let svc = BatteryResultsService::new(Arc::new(sessions), Arc::new(results), clock);

    let err = svc
        .record(&SessionId::random(), trail())
        .await
        .expect_err("no session");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(AssessmentOutcome::CardMatching(CardOutcome { levels: Vec::new() }))]
#[case(AssessmentOutcome::Sequence(SequenceOutcome { final_level: 1, history: Vec::new() }))]
#[case(AssessmentOutcome::CardMatching(CardOutcome {
    levels: vec![CardLevelResult { level: 1, pairs: 2, time_taken: -3.0 }],
}))]
#[tokio::test]
async fn record_rejects_invalid_outcomes(clock: Arc<dyn Clock>, #[case] outcome: AssessmentOutcome) {
    let mut results = MockResultsRepository::new();
    results.expect_append().never();
    let svc = BatteryResultsService::new(Arc::new(sessions_with("Ada")), Arc::new(results), clock);

    let err = svc
        .record(&SessionId::random(), outcome)
        .await
        .expect_err("invalid");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn storage_failure_surfaces_as_internal(clock: Arc<dyn Clock>) {
    let mut results = MockResultsRepository::new();
    results
        .expect_append()
        .return_once(|_| Err(ResultsRepositoryError::query("disk full")));
    let svc = BatteryResultsService::new(Arc::new(sessions_with("Ada")), Arc::new(results), clock);

    let err = svc
        .record(&SessionId::random(), trail())
        .await
        .expect_err("write failed");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

fn query(results: MockResultsRepository) -> ResultsQueryService<MockResultsRepository> {
    ResultsQueryService::new(
        Arc::new(results),
        AdminPassword::new("hunter2").expect("password"),
    )
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("hunter3"))]
#[tokio::test]
async fn report_rejects_wrong_passwords(#[case] password: Option<&str>) {
    let mut results = MockResultsRepository::new();
    results.expect_list().never();
    let svc = query(results);

    let err = svc
        .report(password.map(str::to_owned))
        .await
        .expect_err("denied");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn report_projects_stored_records(clock: Arc<dyn Clock>) {
    let record = AssessmentRecord::new(Participant::default(), trail(), clock.utc());
    let mut results = MockResultsRepository::new();
    results
        .expect_list()
        .return_once(move || Ok(vec![record]));
    let svc = query(results);

    let report = svc
        .report(Some("hunter2".to_owned()))
        .await
        .expect("report");
    assert!(report.sequence.is_empty());
    assert_eq!(report.trail_making.len(), 1);
}
