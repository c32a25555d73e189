//! # interchain-query
//!
//! Host side of the asynchronous interchain query protocol.
//!
//! A controller chain sends a packet holding a batch of read-only queries. The
//! host decodes it, checks every query against its allow-list, executes the
//! batch under one gas budget and returns either all results, in order, or a
//! single structured failure.
//!
//! ## Quick Start
//! ```rust
//! use interchain_query::prelude::*;
//!
//! let router = QueryRouter::new();
//! router
//!     .register("/svc/Balances", |_data, _meter| Ok(b"100stake".to_vec()))
//!     .unwrap();
//!
//! let params = ParamStore::new(HostParams::new(true, ["/svc/Balances"])).unwrap();
//! let host = IcqHost::new(params, router, 100_000);
//!
//! let batch = serialize_query(&[QueryRequest::new("/svc/Balances", Vec::new())]).unwrap();
//! let packet = InterchainQueryPacketData::new(batch, "").to_bytes().unwrap();
//!
//! match host.on_recv_packet(&packet) {
//!     PacketOutcome::Acknowledged(ack) => {
//!         let responses = deserialize_response(&ack.data).unwrap();
//!         assert_eq!(responses[0].value, b"100stake");
//!     }
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```
//!
//! ## Modules
//! - [`core`]: wire types and codecs
//! - [`protocol`]: params, gas, executor boundary, orchestrator
//! - [`config`]: TOML/env configuration
//! - [`utils`]: logging and metrics
//! - [`error`]: error types

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::packet::{InterchainQueryPacketAck, InterchainQueryPacketData};
pub use crate::core::query::{QueryRequest, QueryResponse};
pub use crate::error::{IcqError, OutOfGas, Result};
pub use crate::protocol::host::{process_packet, IcqHost, PacketOutcome};

/// Commonly used types
pub mod prelude {
    pub use crate::config::HostConfig;
    pub use crate::core::packet::{InterchainQueryPacketAck, InterchainQueryPacketData};
    pub use crate::core::query::{
        deserialize_query, deserialize_response, serialize_query, serialize_response,
        QueryRequest, QueryResponse,
    };
    pub use crate::error::{IcqError, OutOfGas, Result};
    pub use crate::protocol::ack::Acknowledgement;
    pub use crate::protocol::executor::{ExecutionFailure, QueryExecutor};
    pub use crate::protocol::gas::GasMeter;
    pub use crate::protocol::host::{process_packet, IcqHost, PacketOutcome};
    pub use crate::protocol::params::{HostParams, ParamStore};
    pub use crate::protocol::router::QueryRouter;
}
