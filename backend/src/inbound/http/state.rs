//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see the driving ports,
//! so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{BatteryResultsCommand, ResultsQuery, SequenceTestCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub sequence: Arc<dyn SequenceTestCommand>,
    pub battery: Arc<dyn BatteryResultsCommand>,
    pub results: Arc<dyn ResultsQuery>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        sequence: Arc<dyn SequenceTestCommand>,
        battery: Arc<dyn BatteryResultsCommand>,
        results: Arc<dyn ResultsQuery>,
    ) -> Self {
        Self {
            sequence,
            battery,
            results,
        }
    }
}
