//! # Query Batches
//!
//! The units of work carried inside an interchain query packet and the
//! results sent back.
//!
//! A batch is an ordered list; responses are correlated to requests purely by
//! position, so neither encoder nor decoder may reorder elements. Both batch
//! codecs are deterministic and round-trip byte for byte.

use crate::core::serialization::{WireCodec, WireFormat};
use crate::error::{constants, IcqError, Result};
use serde::{Deserialize, Serialize};

/// One query the requesting chain wants executed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Queryable resource, e.g. `/cosmos.bank.v1beta1.Query/AllBalances`
    pub path: String,
    /// Opaque serialized request body
    pub data: Vec<u8>,
    /// Block height to query at; 0 means the latest committed state
    pub height: u64,
    /// Whether an inclusion proof is requested
    pub prove: bool,
}

impl QueryRequest {
    /// A query against current state with no proof.
    pub fn new(path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            data,
            height: 0,
            prove: false,
        }
    }

    pub fn with_height(mut self, height: u64) -> Self {
        self.height = height;
        self
    }

    pub fn with_prove(mut self, prove: bool) -> Self {
        self.prove = prove;
        self
    }

    /// True when the request targets the latest committed state without a proof.
    #[inline]
    pub fn is_current_state(&self) -> bool {
        self.height == 0 && !self.prove
    }
}

/// The request batch as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CosmosQuery {
    pub requests: Vec<QueryRequest>,
}

impl WireCodec for CosmosQuery {}

/// Result of a single executed query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Zero on success
    pub code: u32,
    pub log: String,
    /// Opaque serialized response body
    pub value: Vec<u8>,
    /// Height the query was served at
    pub height: u64,
}

impl QueryResponse {
    /// Successful response carrying `value`.
    pub fn ok(value: Vec<u8>) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.code == 0
    }
}

/// The response batch as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CosmosResponse {
    pub responses: Vec<QueryResponse>,
}

impl WireCodec for CosmosResponse {}

/// Encode a request batch.
pub fn serialize_query(requests: &[QueryRequest]) -> Result<Vec<u8>> {
    CosmosQuery {
        requests: requests.to_vec(),
    }
    .encode_format(WireFormat::Bincode)
}

/// Decode a request batch. An empty batch is a decode error.
pub fn deserialize_query(bytes: &[u8]) -> Result<Vec<QueryRequest>> {
    let query = CosmosQuery::decode_format(bytes, WireFormat::Bincode)?;
    if query.requests.is_empty() {
        return Err(IcqError::Decode(constants::ERR_EMPTY_QUERY_BATCH.to_string()));
    }
    Ok(query.requests)
}

/// Encode a response batch.
pub fn serialize_response(responses: &[QueryResponse]) -> Result<Vec<u8>> {
    CosmosResponse {
        responses: responses.to_vec(),
    }
    .encode_format(WireFormat::Bincode)
}

/// Decode a response batch. An empty batch is a decode error.
pub fn deserialize_response(bytes: &[u8]) -> Result<Vec<QueryResponse>> {
    let response = CosmosResponse::decode_format(bytes, WireFormat::Bincode)?;
    if response.responses.is_empty() {
        return Err(IcqError::Decode(
            constants::ERR_EMPTY_RESPONSE_BATCH.to_string(),
        ));
    }
    Ok(response.responses)
}
