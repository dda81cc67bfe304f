//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod battery_results_command;
mod game_session_store;
mod results_query;
mod results_repository;
mod sequence_test_command;

pub use battery_results_command::BatteryResultsCommand;
#[cfg(test)]
pub use battery_results_command::MockBatteryResultsCommand;
#[cfg(test)]
pub use game_session_store::MockGameSessionStore;
pub use game_session_store::{GameSessionStore, GameSessionStoreError};
#[cfg(test)]
pub use results_query::MockResultsQuery;
pub use results_query::{FixtureResultsQuery, ResultsQuery};
#[cfg(test)]
pub use results_repository::MockResultsRepository;
pub use results_repository::{
    FixtureResultsRepository, ResultsRepository, ResultsRepositoryError,
};
#[cfg(test)]
pub use sequence_test_command::MockSequenceTestCommand;
pub use sequence_test_command::{
    GameSnapshot, PracticeStatus, ProblemView, SequenceTestCommand, SubmitAnswerRequest,
    SubmitAnswerResponse,
};
