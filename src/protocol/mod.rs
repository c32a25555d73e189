//! # Host Protocol
//!
//! Packet handling for the host side of interchain queries.
//!
//! ## Components
//! - **Params**: enable switch, allow-list and the shared `ParamStore`
//! - **Gas**: per-packet `GasMeter`
//! - **Executor**: the `QueryExecutor` boundary to the state-query engine
//! - **Router**: a path-routed `QueryExecutor`
//! - **Host**: the packet orchestrator and `IcqHost`
//! - **Ack**: reference acknowledgement builder

pub mod ack;
pub mod executor;
pub mod gas;
pub mod host;
pub mod params;
pub mod router;
