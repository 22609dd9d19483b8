use std::fmt;

use crate::errors::WireError;

/// Size header length in bytes: four hex digits.
pub const PACKET_HEADER_SIZE: usize = 4;

/// Largest size expressible in the header: `0xffff`.
pub const MAX_PACKET_SIZE: usize = 0xFFFF;

/// Smallest well-formed packet: header, separator and terminator.
pub const MIN_PACKET_SIZE: usize = PACKET_HEADER_SIZE + 2;

/// Packet key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PacketKey {
    /// Advisory location of the target service.
    Location,
    /// Macaroon identifier.
    Identifier,
    /// Final chained signature (raw bytes).
    Signature,
    /// Caveat identifier; opens a new caveat record.
    Cid,
    /// Verification id of a third-party caveat.
    Vid,
    /// Caveat location hint.
    Cl,
    /// Unknown/unsupported key.
    Unknown(String),
}

impl PacketKey {
    /// Creates a PacketKey from its textual form.
    pub fn parse(key: &str) -> Self {
        match key {
            "location" => PacketKey::Location,
            "identifier" => PacketKey::Identifier,
            "signature" => PacketKey::Signature,
            "cid" => PacketKey::Cid,
            "vid" => PacketKey::Vid,
            "cl" => PacketKey::Cl,
            other => PacketKey::Unknown(other.to_string()),
        }
    }

    /// Returns the textual form of this key.
    pub fn as_str(&self) -> &str {
        match self {
            PacketKey::Location => "location",
            PacketKey::Identifier => "identifier",
            PacketKey::Signature => "signature",
            PacketKey::Cid => "cid",
            PacketKey::Vid => "vid",
            PacketKey::Cl => "cl",
            PacketKey::Unknown(key) => key,
        }
    }
}

impl fmt::Display for PacketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the encoded size of a packet: header, key, space, data, newline.
pub fn encoded_size(key_len: usize, data_len: usize) -> usize {
    PACKET_HEADER_SIZE + key_len + 1 + data_len + 1
}

/// A single `<size><key> <data>\n` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    key: PacketKey,
    data: Vec<u8>,
}

impl Packet {
    /// Creates a packet, rejecting ones whose encoding would not fit the size header.
    pub fn new(key: PacketKey, data: impl Into<Vec<u8>>) -> Result<Self, WireError> {
        let data = data.into();
        let size = encoded_size(key.as_str().len(), data.len());
        if size > MAX_PACKET_SIZE {
            return Err(WireError::PacketTooLarge {
                size,
                max: MAX_PACKET_SIZE,
            });
        }
        Ok(Self { key, data })
    }

    /// Returns the packet key.
    pub fn key(&self) -> &PacketKey {
        &self.key
    }

    /// Returns the raw packet data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the packet, returning its data.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Encoded size of this packet in bytes, as written in its header.
    pub fn size(&self) -> usize {
        encoded_size(self.key.as_str().len(), self.data.len())
    }

    /// Appends the encoded packet to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(format!("{:04x}", self.size()).as_bytes());
        out.extend_from_slice(self.key.as_str().as_bytes());
        out.push(b' ');
        out.extend_from_slice(&self.data);
        out.push(b'\n');
    }

    /// Serializes the packet to bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.encode_into(&mut out);
        out
    }

    /// Deserializes the packet at the start of `bytes`.
    ///
    /// Bytes past the declared size are ignored. Offsets in errors are
    /// relative to the start of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() < PACKET_HEADER_SIZE {
            return Err(WireError::TruncatedPacket { offset: 0 });
        }

        let header = &bytes[..PACKET_HEADER_SIZE];
        if !header.iter().all(u8::is_ascii_hexdigit) {
            return Err(WireError::InvalidPacket {
                offset: 0,
                reason: format!("size header {:?} is not four hex digits", header),
            });
        }
        let size = header
            .iter()
            .fold(0usize, |acc, digit| acc * 16 + hex_value(*digit));

        if size < MIN_PACKET_SIZE {
            return Err(WireError::InvalidPacket {
                offset: 0,
                reason: format!("declared size {} is below minimum {}", size, MIN_PACKET_SIZE),
            });
        }
        if size > bytes.len() {
            return Err(WireError::TruncatedPacket { offset: 0 });
        }
        if bytes[size - 1] != b'\n' {
            return Err(WireError::InvalidPacket {
                offset: 0,
                reason: "missing trailing newline".to_string(),
            });
        }

        let body = &bytes[PACKET_HEADER_SIZE..size - 1];
        let split = body
            .iter()
            .position(|b| *b == b' ')
            .ok_or_else(|| WireError::InvalidPacket {
                offset: 0,
                reason: "missing separator between key and data".to_string(),
            })?;

        let key = std::str::from_utf8(&body[..split]).map_err(|_| WireError::InvalidPacket {
            offset: 0,
            reason: "key is not valid UTF-8".to_string(),
        })?;

        Ok(Self {
            key: PacketKey::parse(key),
            data: body[split + 1..].to_vec(),
        })
    }
}

fn hex_value(digit: u8) -> usize {
    match digit {
        b'0'..=b'9' => (digit - b'0') as usize,
        b'a'..=b'f' => (digit - b'a' + 10) as usize,
        b'A'..=b'F' => (digit - b'A' + 10) as usize,
        _ => 0,
    }
}
