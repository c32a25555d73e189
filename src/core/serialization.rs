//! # Serialization Formats
//!
//! Abstraction over the two wire formats used by interchain query packets.
//!
//! ## Formats
//! - **Bincode**: the request and response batches. Varint integers, little
//!   endian, trailing bytes rejected. Encoding is deterministic, so every
//!   replica produces the same acknowledgement bytes.
//! - **JSON**: the outer packet envelope and acknowledgement, with opaque byte
//!   fields carried as base64 strings.
//!
//! ## Usage
//! ```ignore
//! use interchain_query::core::serialization::{WireCodec, WireFormat};
//!
//! let bytes = batch.encode_format(WireFormat::Bincode)?;
//! let decoded = CosmosQuery::decode_format(&bytes, WireFormat::Bincode)?;
//! ```

use crate::config::MAX_PACKET_SIZE;
use crate::error::IcqError;
use bincode::Options;
use serde::{Deserialize, Serialize};

/// Supported wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireFormat {
    /// Binary compact format (default, used for query batches)
    #[default]
    Bincode,
    /// JSON format (packet envelopes and acknowledgements)
    Json,
}

impl WireFormat {
    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            WireFormat::Bincode => "Bincode",
            WireFormat::Json => "JSON",
        }
    }
}

/// Bincode options for encoding: varint integers, no size limit.
///
/// Response batches are produced locally and may legitimately exceed the
/// inbound packet limit.
#[inline]
fn bincode_encode_options() -> impl Options {
    bincode::DefaultOptions::new()
}

/// Bincode options for decoding.
///
/// `DefaultOptions` rejects trailing bytes; the limit bounds allocations
/// driven by attacker-controlled length prefixes.
#[inline]
fn bincode_decode_options() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_PACKET_SIZE as u64)
}

/// Trait for types that travel over the wire in one of the supported formats
pub trait WireCodec: Serialize + for<'de> Deserialize<'de> + Sized {
    /// Serialize to bytes using the specified format
    fn encode_format(&self, format: WireFormat) -> crate::error::Result<Vec<u8>> {
        match format {
            WireFormat::Bincode => bincode_encode_options()
                .serialize(self)
                .map_err(|e| IcqError::Encode(e.to_string())),
            WireFormat::Json => {
                serde_json::to_vec(self).map_err(|e| IcqError::Encode(e.to_string()))
            }
        }
    }

    /// Deserialize from bytes using the specified format
    fn decode_format(data: &[u8], format: WireFormat) -> crate::error::Result<Self> {
        if data.len() > MAX_PACKET_SIZE {
            return Err(IcqError::Decode(format!(
                "payload of {} bytes exceeds maximum of {MAX_PACKET_SIZE}",
                data.len()
            )));
        }

        match format {
            WireFormat::Bincode => bincode_decode_options()
                .deserialize(data)
                .map_err(|e| IcqError::Decode(e.to_string())),
            WireFormat::Json => {
                serde_json::from_slice(data).map_err(|e| IcqError::Decode(e.to_string()))
            }
        }
    }
}

/// Serde adapter carrying `Vec<u8>` as a base64 string in JSON.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| serde::de::Error::custom(format!("invalid base64: {e}")))
    }
}
