//! Packet stream reader.

use crate::errors::WireError;
use crate::packet::Packet;

/// Reader that walks a decoded packet stream.
///
/// Every structural error carries the byte offset of the packet that caused
/// it. A reader stops at the first error: once [`PacketReader::read_packet`]
/// has failed, iteration ends.
///
/// # Example
///
/// ```rust
/// use macaroons_wire::{PacketKey, PacketReader};
///
/// let bytes = b"0015identifier 12345\n0016cid user = 123456\n";
/// let mut reader = PacketReader::new(bytes);
/// let first = reader.read_packet()?.unwrap();
/// assert_eq!(first.key(), &PacketKey::Identifier);
/// assert_eq!(reader.position(), 21);
/// # Ok::<(), macaroons_wire::WireError>(())
/// ```
pub struct PacketReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> PacketReader<'a> {
    /// Creates a reader positioned at the first packet of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Returns the current read position in the buffer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns `true` once every byte has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.bytes.len()
    }

    /// Reads the next packet from the stream.
    ///
    /// Returns `Ok(None)` at the end of the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`WireError`](crate::WireError) if:
    /// - The size header is not four hex digits
    /// - The declared size runs past the end of the buffer
    /// - The packet lacks its separator or trailing newline
    pub fn read_packet(&mut self) -> Result<Option<Packet>, WireError> {
        if self.is_exhausted() {
            return Ok(None);
        }

        let offset = self.position;
        let packet = Packet::from_bytes(&self.bytes[offset..]).map_err(|e| match e {
            WireError::InvalidPacket { offset: _, reason } => {
                WireError::InvalidPacket { offset, reason }
            }
            WireError::TruncatedPacket { offset: _ } => WireError::TruncatedPacket { offset },
            other => other,
        });

        match packet {
            Ok(packet) => {
                self.position += packet.size();
                Ok(Some(packet))
            }
            Err(e) => {
                self.position = self.bytes.len();
                Err(e)
            }
        }
    }
}

impl Iterator for PacketReader<'_> {
    type Item = Result<Packet, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_packet().transpose()
    }
}
