//! Channel acknowledgement built from a [`PacketOutcome`].
//!
//! The orchestrator never writes acknowledgements itself. This is the
//! reference builder a channel integration can use: success wraps the packet
//! ack bytes, rejection becomes a `{kind, message}` descriptor, and an aborted
//! packet produces nothing at all.

use crate::core::serialization::{base64_bytes, WireCodec, WireFormat};
use crate::error::{ErrorKind, IcqError, Result};
use crate::protocol::host::PacketOutcome;
use serde::{Deserialize, Serialize};

/// Structured failure written into an error acknowledgement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&IcqError> for ErrorDescriptor {
    fn from(err: &IcqError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Channel-level acknowledgement envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acknowledgement {
    Result(#[serde(with = "base64_bytes")] Vec<u8>),
    Error(ErrorDescriptor),
}

impl WireCodec for Acknowledgement {}

impl Acknowledgement {
    /// Build the acknowledgement for `outcome`.
    ///
    /// Returns `None` for an aborted packet: the transaction is rolled back
    /// and nothing may be written to the channel.
    pub fn from_outcome(outcome: &PacketOutcome) -> Result<Option<Self>> {
        match outcome {
            PacketOutcome::Acknowledged(ack) => Ok(Some(Acknowledgement::Result(ack.to_bytes()?))),
            PacketOutcome::Rejected(err) => Ok(Some(Acknowledgement::Error(err.into()))),
            PacketOutcome::Aborted(_) => Ok(None),
        }
    }

    #[inline]
    pub fn success(&self) -> bool {
        matches!(self, Acknowledgement::Result(_))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.encode_format(WireFormat::Json)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode_format(bytes, WireFormat::Json)
    }
}
