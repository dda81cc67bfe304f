//! Builders for the HTTP state from loaded settings.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use cogbattery::domain::game::GameRules;
use cogbattery::domain::ports::ResultsRepository;
use cogbattery::domain::{
    AdminPassword, BatteryResultsService, PuzzleRng, ResultsQueryService, SequenceTestService,
};
use cogbattery::inbound::http::session_config::BuildMode;
use cogbattery::inbound::http::state::HttpState;
use cogbattery::outbound::json_file::JsonFileResultsRepository;
use cogbattery::outbound::persistence::{
    DbPool, DieselResultsRepository, PoolConfig, run_pending_migrations,
};
use cogbattery::outbound::session::InMemoryGameSessionStore;
use cogbattery::settings::{AppSettings, StorageBackend};

/// Runtime pieces shared by every request handler.
pub(crate) struct Wiring {
    pub(crate) rules: GameRules,
    pub(crate) session_ttl: Duration,
    pub(crate) password: AdminPassword,
    pub(crate) rng: PuzzleRng,
}

impl Wiring {
    pub(crate) fn from_settings(settings: &AppSettings, mode: BuildMode) -> std::io::Result<Self> {
        Ok(Self {
            rules: settings.game_rules().map_err(std::io::Error::other)?,
            session_ttl: settings.session_ttl().map_err(std::io::Error::other)?,
            password: settings.admin_password(mode).map_err(std::io::Error::other)?,
            rng: settings.puzzle_rng(),
        })
    }
}

/// Compose the domain services over `results` and an in-memory session store.
pub(crate) fn build_http_state<R>(results: Arc<R>, wiring: Wiring) -> web::Data<HttpState>
where
    R: ResultsRepository + 'static,
{
    let Wiring {
        rules,
        session_ttl,
        password,
        rng,
    } = wiring;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let sessions = Arc::new(InMemoryGameSessionStore::new(session_ttl, clock.clone()));

    web::Data::new(HttpState::new(
        Arc::new(SequenceTestService::new(
            sessions.clone(),
            results.clone(),
            rules,
            Arc::new(rng),
            clock.clone(),
        )),
        Arc::new(BatteryResultsService::new(sessions, results.clone(), clock)),
        Arc::new(ResultsQueryService::new(results, password)),
    ))
}

/// Open the configured results store and build the HTTP state over it.
///
/// PostgreSQL migrations run before the pool is created.
pub(crate) async fn build_state_from_settings(
    settings: &AppSettings,
    mode: BuildMode,
) -> std::io::Result<web::Data<HttpState>> {
    let wiring = Wiring::from_settings(settings, mode)?;
    match settings.storage().map_err(std::io::Error::other)? {
        StorageBackend::JsonFile(path) => {
            info!(path = %path, "storing results in JSON file");
            let repo = JsonFileResultsRepository::open(&path).map_err(std::io::Error::other)?;
            Ok(build_http_state(Arc::new(repo), wiring))
        }
        StorageBackend::Postgres(url) => {
            run_pending_migrations(&url)
                .await
                .map_err(std::io::Error::other)?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(std::io::Error::other)?;
            info!("storing results in PostgreSQL");
            Ok(build_http_state(
                Arc::new(DieselResultsRepository::new(pool)),
                wiring,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogbattery::domain::ParticipantDraft;
    use cogbattery::domain::ports::SubmitAnswerRequest;
    use rstest::rstest;

    fn wiring() -> Wiring {
        Wiring {
            rules: GameRules::new(1, 1, None).expect("rules"),
            session_ttl: Duration::from_secs(60),
            password: AdminPassword::new("pw").expect("password"),
            rng: PuzzleRng::from_seed(3),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn json_file_state_persists_game_over() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("results.json"))
            .expect("utf8 path");
        let repo = Arc::new(JsonFileResultsRepository::open(&path).expect("open"));
        let state = build_http_state(repo.clone(), wiring());

        let session = state
            .sequence
            .begin(ParticipantDraft::default())
            .await
            .expect("begin");
        state.sequence.start_test(&session).await.expect("start");
        let view = state.sequence.next_problem(&session).await.expect("problem");
        let mut wrong = view.problem.flash_sequence.clone();
        wrong.reverse();
        state
            .sequence
            .submit_answer(
                &session,
                SubmitAnswerRequest {
                    answer: wrong,
                    time_taken: None,
                },
            )
            .await
            .expect("submit");

        let stored = repo.list().await.expect("list");
        assert_eq!(stored.len(), 1);
        let report = state.results.report(Some("pw".to_owned())).await.expect("report");
        assert_eq!(report.sequence.len(), 1);
    }
}
