//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and with the `test-support` feature.

pub mod clock {
    //! A clock that only moves when told to.

    use std::sync::{Mutex, MutexGuard};
    use std::time::Duration;

    use chrono::{DateTime, Local, TimeDelta, Utc};
    use mockable::Clock;

    pub struct MutableClock(Mutex<DateTime<Utc>>);

    impl MutableClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub fn advance(&self, delta: Duration) {
            let delta = match TimeDelta::from_std(delta) {
                Ok(delta) => delta,
                Err(error) => panic!("duration out of range: {error}; delta={delta:?}"),
            };
            *self.lock() += delta;
        }

        pub fn advance_seconds(&self, seconds: i64) {
            *self.lock() += TimeDelta::seconds(seconds);
        }

        fn lock(&self) -> MutexGuard<'_, DateTime<Utc>> {
            match self.0.lock() {
                Ok(guard) => guard,
                Err(_) => panic!("clock mutex poisoned"),
            }
        }
    }

    impl Clock for MutableClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.lock()
        }
    }
}

pub mod results {
    //! In-memory results store that remembers every append.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::AssessmentRecord;
    use crate::domain::ports::{ResultsRepository, ResultsRepositoryError};

    #[derive(Default)]
    pub struct RecordingResultsRepository(Mutex<Vec<AssessmentRecord>>);

    impl RecordingResultsRepository {
        pub fn records(&self) -> Vec<AssessmentRecord> {
            self.0.lock().map(|r| r.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl ResultsRepository for RecordingResultsRepository {
        async fn append(&self, record: &AssessmentRecord) -> Result<(), ResultsRepositoryError> {
            self.0
                .lock()
                .map_err(|_| ResultsRepositoryError::query("recording lock poisoned"))?
                .push(record.clone());
            Ok(())
        }

        async fn list(&self) -> Result<Vec<AssessmentRecord>, ResultsRepositoryError> {
            Ok(self.records())
        }
    }
}

pub mod http {
    //! Fully wired HTTP state over in-memory adapters.

    use std::sync::Arc;

    use mockable::DefaultClock;

    use crate::domain::game::GameRules;
    use crate::domain::ports::ResultsRepository;
    use crate::domain::{
        AdminPassword, BatteryResultsService, PuzzleRng, ResultsQueryService,
        SequenceTestService,
    };
    use crate::inbound::http::state::HttpState;
    use crate::outbound::session::{DEFAULT_SESSION_TTL, InMemoryGameSessionStore};

    pub const TEST_ADMIN_PASSWORD: &str = "letmein";
    pub const TEST_RNG_SEED: u64 = 7;

    /// Build handler state backed by `results`, with seeded puzzles.
    pub fn battery_state<R>(results: Arc<R>, rules: GameRules) -> HttpState
    where
        R: ResultsRepository + 'static,
    {
        let clock = Arc::new(DefaultClock);
        let sessions = Arc::new(InMemoryGameSessionStore::new(
            DEFAULT_SESSION_TTL,
            clock.clone(),
        ));
        let password = match AdminPassword::new(TEST_ADMIN_PASSWORD) {
            Ok(password) => password,
            Err(error) => panic!("test admin password rejected: {error}"),
        };
        HttpState::new(
            Arc::new(SequenceTestService::new(
                sessions.clone(),
                results.clone(),
                rules,
                Arc::new(PuzzleRng::from_seed(TEST_RNG_SEED)),
                clock.clone(),
            )),
            Arc::new(BatteryResultsService::new(sessions, results.clone(), clock)),
            Arc::new(ResultsQueryService::new(results, password)),
        )
    }
}

pub use clock::MutableClock;
pub use results::RecordingResultsRepository;
