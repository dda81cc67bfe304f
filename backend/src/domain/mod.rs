//! Domain model and services for the assessment battery.
//!
//! Purpose: keep puzzle generation, game progression and result bookkeeping
//! free of transport and storage concerns. Adapters reach the domain through
//! the traits in [`ports`].
//!
//! Public surface:
//! - `layout` and `sequence`: puzzle generation.
//! - `game`: the level/chances state machine.
//! - `records` and `report`: persisted results and the admin projection.
//! - `Error` / `ErrorCode`: transport-agnostic failures.

pub mod admin;
pub mod error;
pub mod game;
pub mod layout;
pub mod participant;
pub mod ports;
pub mod records;
pub mod report;
mod results_service;
pub mod sequence;
mod sequence_service;
pub mod session;
pub mod trace_id;

pub use self::admin::{AdminPassword, AdminPasswordError};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::participant::{Participant, ParticipantDraft};
pub use self::records::{AssessmentOutcome, AssessmentRecord, TestKind};
pub use self::report::ResultsReport;
pub use self::results_service::{BatteryResultsService, ResultsQueryService};
pub use self::sequence_service::{PuzzleRng, SequenceTestService};
pub use self::session::{ParticipantSession, SessionId};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use cogbattery::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
