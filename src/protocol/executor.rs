//! Boundary to the state-query engine.
//!
//! The host never interprets query bodies. It hands each authorized request to
//! a [`QueryExecutor`] together with the packet's [`GasMeter`] and gets back
//! either a response or an [`ExecutionFailure`]. Gas exhaustion has its own
//! variant so it can never be mistaken for an ordinary query error.

use crate::core::query::{QueryRequest, QueryResponse};
use crate::error::{constants, OutOfGas};
use crate::protocol::gas::GasMeter;
use thiserror::Error;

/// Why a single query did not produce a response
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionFailure {
    /// The query itself failed: unknown route, malformed body, missing target
    #[error("{0}")]
    Failed(String),

    /// The packet's gas budget ran out while executing
    #[error(transparent)]
    OutOfGas(#[from] OutOfGas),
}

impl ExecutionFailure {
    pub fn failed(message: impl Into<String>) -> Self {
        ExecutionFailure::Failed(message.into())
    }
}

/// Executes one query against the latest committed state.
///
/// Implementations charge `meter` in proportion to the work they perform and
/// must return [`ExecutionFailure::OutOfGas`] as soon as a charge fails.
pub trait QueryExecutor {
    fn execute(
        &self,
        request: &QueryRequest,
        meter: &mut GasMeter,
    ) -> Result<QueryResponse, ExecutionFailure>;
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute(
        &self,
        request: &QueryRequest,
        meter: &mut GasMeter,
    ) -> Result<QueryResponse, ExecutionFailure> {
        (**self).execute(request, meter)
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for Box<T> {
    fn execute(
        &self,
        request: &QueryRequest,
        meter: &mut GasMeter,
    ) -> Result<QueryResponse, ExecutionFailure> {
        (**self).execute(request, meter)
    }
}

/// Executors only serve the latest state; refuse anything else.
pub fn ensure_current_state(request: &QueryRequest) -> Result<(), ExecutionFailure> {
    if request.is_current_state() {
        return Ok(());
    }
    if request.height != 0 {
        return Err(ExecutionFailure::Failed(format!(
            "{} (height {})",
            constants::ERR_HISTORICAL_QUERY,
            request.height
        )));
    }
    Err(ExecutionFailure::Failed(
        constants::ERR_PROVE_QUERY.to_string(),
    ))
}
