//! # Core Protocol Components
//!
//! Wire types and codecs for interchain query packets.
//!
//! ## Components
//! - **Serialization**: the two wire formats (bincode for query batches, JSON for envelopes)
//! - **Query**: `QueryRequest`/`QueryResponse` and their batch codecs
//! - **Packet**: the `InterchainQueryPacketData` envelope and the packet acknowledgement data
//!
//! ## Wire Format
//! ```text
//! packet  = JSON { "data": base64(batch), "memo": "..." }
//! batch   = bincode varint( [ { path, data, height, prove }, ... ] )
//! ack     = JSON { "data": base64(bincode varint([ { code, log, value, height }, ... ])) }
//! ```
//!
//! ## Security
//! - Packets larger than `MAX_PACKET_SIZE` are rejected before parsing
//! - Bincode decoding is length-limited and rejects trailing bytes

pub mod packet;
pub mod query;
pub mod serialization;
