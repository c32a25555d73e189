//! Host parameters: the enable switch and the query allow-list.
//!
//! The policy is persisted by the surrounding application. The host reads a
//! snapshot from [`ParamStore`] at the start of every packet and never mutates
//! it while a packet is being processed.

use crate::core::query::QueryRequest;
use crate::error::{constants, IcqError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// Whether a freshly initialized host serves queries
pub const DEFAULT_HOST_ENABLED: bool = false;

/// Authorization policy for incoming queries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostParams {
    /// Master switch; when false every query is rejected
    #[serde(default)]
    pub host_enabled: bool,

    /// Exact query paths the host is willing to serve
    #[serde(default)]
    pub allow_queries: Vec<String>,
}

impl Default for HostParams {
    fn default() -> Self {
        Self {
            host_enabled: DEFAULT_HOST_ENABLED,
            allow_queries: Vec::new(),
        }
    }
}

impl HostParams {
    pub fn new<I, S>(host_enabled: bool, allow_queries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            host_enabled,
            allow_queries: allow_queries.into_iter().map(Into::into).collect(),
        }
    }

    /// Structural check run before the params are stored.
    ///
    /// Duplicate entries (exact, case-sensitive) are rejected. Any other
    /// string is accepted, and an empty list is valid.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.allow_queries.len());
        for path in &self.allow_queries {
            if !seen.insert(path.as_str()) {
                return Err(IcqError::Validation(format!(
                    "duplicate entry in allow_queries: {path}"
                )));
            }
        }
        Ok(())
    }

    /// Check a single request, returning why it is refused.
    pub fn authorize(&self, request: &QueryRequest) -> Result<()> {
        if !self.host_enabled {
            return Err(IcqError::Unauthorized(format!(
                "{}: {}",
                constants::ERR_HOST_DISABLED,
                request.path
            )));
        }

        if !request.is_current_state() {
            if request.height != 0 {
                return Err(IcqError::Unauthorized(format!(
                    "{} (height {}): {}",
                    constants::ERR_HISTORICAL_QUERY,
                    request.height,
                    request.path
                )));
            }
            return Err(IcqError::Unauthorized(format!(
                "{}: {}",
                constants::ERR_PROVE_QUERY,
                request.path
            )));
        }

        if !self.allow_queries.iter().any(|allowed| allowed == &request.path) {
            return Err(IcqError::Unauthorized(format!(
                "{}: {}",
                constants::ERR_PATH_NOT_ALLOWED,
                request.path
            )));
        }

        Ok(())
    }

    #[inline]
    pub fn is_allowed(&self, request: &QueryRequest) -> bool {
        self.authorize(request).is_ok()
    }
}

/// Shared handle to the currently persisted host params.
///
/// Readers take a full clone, so a packet never observes an update halfway
/// through its batch. Writers replace the whole value under the write lock.
#[derive(Debug, Clone, Default)]
pub struct ParamStore {
    inner: Arc<RwLock<HostParams>>,
}

impl ParamStore {
    /// Create a store holding `params`; invalid params are refused.
    pub fn new(params: HostParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            inner: Arc::new(RwLock::new(params)),
        })
    }

    /// Consistent snapshot of the current params
    pub fn params(&self) -> Result<HostParams> {
        let params = self
            .inner
            .read()
            .map_err(|_| IcqError::LockPoisoned(constants::ERR_PARAMS_READ_LOCK.to_string()))?;
        Ok(params.clone())
    }

    /// Validate and atomically replace the stored params
    pub fn set_params(&self, params: HostParams) -> Result<()> {
        params.validate()?;

        let mut current = self
            .inner
            .write()
            .map_err(|_| IcqError::LockPoisoned(constants::ERR_PARAMS_WRITE_LOCK.to_string()))?;
        *current = params;
        Ok(())
    }

    /// Administrative update entry point
    pub fn update(&self, host_enabled: bool, allow_queries: Vec<String>) -> Result<()> {
        self.set_params(HostParams {
            host_enabled,
            allow_queries,
        })
    }
}
