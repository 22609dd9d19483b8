//! Packet stream writer.

use crate::errors::WireError;
use crate::packet::{Packet, PacketKey};

/// Writer that concatenates encoded packets into a byte buffer.
///
/// # Example
///
/// ```rust
/// use macaroons_wire::{PacketKey, PacketWriter};
///
/// let mut writer = PacketWriter::new();
/// writer.append(PacketKey::Identifier, b"1234567890987654321")?;
/// assert_eq!(writer.finish(), b"0023identifier 1234567890987654321\n".to_vec());
/// # Ok::<(), macaroons_wire::WireError>(())
/// ```
#[derive(Debug, Default)]
pub struct PacketWriter {
    buf: Vec<u8>,
}

impl PacketWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a packet with the given key and data.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::PacketTooLarge`] if the encoded packet would not
    /// fit in the four hex digit size header.
    pub fn append(&mut self, key: PacketKey, data: &[u8]) -> Result<(), WireError> {
        let packet = Packet::new(key, data)?;
        self.append_packet(&packet);
        Ok(())
    }

    /// Appends an already validated packet.
    pub fn append_packet(&mut self, packet: &Packet) {
        packet.encode_into(&mut self.buf);
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Finishes writing and returns the packet stream.
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}
