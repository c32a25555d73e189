use crate::core::query::{QueryRequest, QueryResponse};
use crate::error::{constants, IcqError, Result};
use crate::protocol::executor::{ensure_current_state, ExecutionFailure, QueryExecutor};
use crate::protocol::gas::{GasMeter, DEFAULT_GAS_PER_QUERY};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

type HandlerFn = dyn Fn(&[u8], &mut GasMeter) -> std::result::Result<Vec<u8>, ExecutionFailure>
    + Send
    + Sync
    + 'static;

/// Query executor routing requests to handlers by exact path.
///
/// Every dispatched query is charged `gas_per_query` before its handler runs;
/// handlers charge the meter further for the work they do.
pub struct QueryRouter {
    handlers: Arc<RwLock<HashMap<Cow<'static, str>, Arc<HandlerFn>>>>,
    gas_per_query: u64,
}

impl Default for QueryRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryRouter {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            gas_per_query: DEFAULT_GAS_PER_QUERY,
        }
    }

    pub fn with_gas_per_query(mut self, gas: u64) -> Self {
        self.gas_per_query = gas;
        self
    }

    pub fn register<F>(&self, path: &str, handler: F) -> Result<()>
    where
        F: Fn(&[u8], &mut GasMeter) -> std::result::Result<Vec<u8>, ExecutionFailure>
            + Send
            + Sync
            + 'static,
    {
        let mut handlers = self.handlers.write().map_err(|_| {
            IcqError::LockPoisoned(constants::ERR_ROUTER_WRITE_LOCK.to_string())
        })?;

        handlers.insert(Cow::Owned(path.to_string()), Arc::new(handler));
        Ok(())
    }

    /// Registered paths, sorted
    pub fn routes(&self) -> Result<Vec<String>> {
        let handlers = self.handlers.read().map_err(|_| {
            IcqError::LockPoisoned(constants::ERR_ROUTER_READ_LOCK.to_string())
        })?;

        let mut routes: Vec<String> = handlers.keys().map(|k| k.to_string()).collect();
        routes.sort();
        Ok(routes)
    }
}

impl QueryExecutor for QueryRouter {
    fn execute(
        &self,
        request: &QueryRequest,
        meter: &mut GasMeter,
    ) -> std::result::Result<QueryResponse, ExecutionFailure> {
        ensure_current_state(request)?;

        // The lock is released before the handler runs, so handlers may
        // register further routes.
        let handler = {
            let handlers = self
                .handlers
                .read()
                .map_err(|_| ExecutionFailure::failed(constants::ERR_ROUTER_READ_LOCK))?;

            handlers.get(request.path.as_str()).cloned().ok_or_else(|| {
                ExecutionFailure::Failed(format!("{}: {}", constants::ERR_NO_ROUTE, request.path))
            })?
        };

        meter.consume_gas(self.gas_per_query, "query dispatch")?;
        let value = (*handler)(&request.data, meter)?;

        debug!(path = %request.path, gas_consumed = meter.gas_consumed(), "Query routed");
        Ok(QueryResponse::ok(value))
    }
}
