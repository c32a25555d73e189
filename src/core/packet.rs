//! # Packet Envelope
//!
//! `InterchainQueryPacketData` is what the controller chain places on the
//! channel; `InterchainQueryPacketAck` is the success payload the host hands
//! back. Both are JSON with the opaque `data` field carried as base64.

use crate::core::query::{deserialize_query, QueryRequest};
use crate::core::serialization::{base64_bytes, WireCodec, WireFormat};
use crate::error::{constants, IcqError, Result};
use serde::{Deserialize, Serialize};

/// Outer payload of an interchain query packet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterchainQueryPacketData {
    /// Encoded request batch
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    /// Free-form note from the controller; ignored by the host
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub memo: String,
}

impl WireCodec for InterchainQueryPacketData {}

impl InterchainQueryPacketData {
    pub fn new(data: Vec<u8>, memo: impl Into<String>) -> Self {
        Self {
            data,
            memo: memo.into(),
        }
    }

    /// Stateless sanity check applied before the batch is decoded.
    pub fn validate_basic(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(IcqError::Decode(constants::ERR_EMPTY_PACKET.to_string()));
        }
        Ok(())
    }

    /// Serialize to the JSON bytes sent over the channel
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.encode_format(WireFormat::Json)
    }

    /// Parse the JSON bytes received from the channel
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(IcqError::Decode(constants::ERR_EMPTY_PACKET.to_string()));
        }
        Self::decode_format(bytes, WireFormat::Json)
    }

    /// Decode the embedded request batch.
    pub fn requests(&self) -> Result<Vec<QueryRequest>> {
        self.validate_basic()?;
        deserialize_query(&self.data)
    }
}

/// Success payload of an interchain query acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InterchainQueryPacketAck {
    /// Encoded response batch
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

impl WireCodec for InterchainQueryPacketAck {}

impl InterchainQueryPacketAck {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.encode_format(WireFormat::Json)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode_format(bytes, WireFormat::Json)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::core::query::serialize_query;

    #[test]
    fn test_packet_roundtrip() {
        let data = serialize_query(&[QueryRequest::new("/svc/Balances", b"x".to_vec())]).unwrap();
        let packet = InterchainQueryPacketData::new(data, "hello");
        let bytes = packet.to_bytes().unwrap();
        assert_eq!(InterchainQueryPacketData::from_bytes(&bytes).unwrap(), packet);
    }

    #[test]
    fn test_memo_omitted_when_empty() {
        let packet = InterchainQueryPacketData::new(vec![1, 2, 3], "");
        let text = String::from_utf8(packet.to_bytes().unwrap()).unwrap();
        assert_eq!(text, r#"{"data":"AQID"}"#);
    }

    #[test]
    fn test_empty_bytes_rejected() {
        assert!(matches!(
            InterchainQueryPacketData::from_bytes(&[]),
            Err(IcqError::Decode(_))
        ));
    }

    #[test]
    fn test_validate_basic_rejects_empty_data() {
        let packet = InterchainQueryPacketData::default();
        assert!(packet.validate_basic().is_err());
        assert!(packet.requests().is_err());
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert!(InterchainQueryPacketData::from_bytes(br#"{"data":"!!"}"#).is_err());
    }

    #[test]
    fn test_ack_roundtrip() {
        let ack = InterchainQueryPacketAck::new(vec![7, 8]);
        let bytes = ack.to_bytes().unwrap();
        assert_eq!(InterchainQueryPacketAck::from_bytes(&bytes).unwrap(), ack);
    }
}
