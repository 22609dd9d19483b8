//! Length-prefixed V1 packet format for serialized macaroons.
//!
//! This crate provides:
//! - [`Packet`] records of the form `<4 hex digits><key> <data>\n`
//! - A [`PacketWriter`] that concatenates packets into a byte buffer
//! - A [`PacketReader`] that walks a buffer packet by packet, reporting the
//!   byte offset of any structural fault
//! - Unpadded base64url encoding of the packet stream
//!
//! ## Quick Start
//!
//! ```rust
//! use macaroons_wire::{base64url_decode, base64url_encode, PacketKey, PacketReader, PacketWriter};
//!
//! let mut writer = PacketWriter::new();
//! writer.append(PacketKey::Identifier, b"12345")?;
//! writer.append(PacketKey::Cid, b"user = alice")?;
//! let token = base64url_encode(&writer.finish());
//!
//! let bytes = base64url_decode(&token)?;
//! let mut reader = PacketReader::new(&bytes);
//! while let Some(packet) = reader.read_packet()? {
//!     println!("{} ({} bytes)", packet.key(), packet.data().len());
//! }
//! # Ok::<(), macaroons_wire::WireError>(())
//! ```
//!
//! The packet stream knows nothing about macaroon semantics; assembling
//! packets into a macaroon happens in `macaroons-core`.

#![deny(missing_docs)]

/// Base64url encoding of packet streams.
pub mod encoding;
/// Error types for wire operations.
pub mod errors;
/// Packet structure and serialization.
pub mod packet;
/// Packet stream reader.
pub mod reader;
/// Packet stream writer.
pub mod writer;

pub use encoding::{base64url_decode, base64url_encode};
pub use errors::WireError;
pub use packet::{Packet, PacketKey, MAX_PACKET_SIZE, MIN_PACKET_SIZE, PACKET_HEADER_SIZE};
pub use reader::PacketReader;
pub use writer::PacketWriter;
