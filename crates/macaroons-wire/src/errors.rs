use thiserror::Error;

/// Errors that can occur while encoding or decoding packet streams.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// Invalid packet structure (size header, separator, or terminator).
    #[error("invalid packet at offset {offset}: {reason}")]
    InvalidPacket {
        /// Byte offset where the packet starts.
        offset: usize,
        /// Reason for invalidity.
        reason: String,
    },
    /// The buffer ends before the declared packet size.
    #[error("truncated packet at offset {offset}")]
    TruncatedPacket {
        /// Byte offset where the packet starts.
        offset: usize,
    },
    /// Encoded packet exceeds the four hex digit size limit.
    #[error("packet size {size} exceeds maximum {max}")]
    PacketTooLarge {
        /// Actual encoded size.
        size: usize,
        /// Maximum allowed size.
        max: usize,
    },
    /// A packet key the format does not define.
    #[error("unknown packet key '{0}'")]
    UnknownKey(String),
    /// The outer base64url layer could not be decoded.
    #[error("invalid base64url encoding: {0}")]
    Encoding(#[from] base64::DecodeError),
    /// A mandatory packet never appeared in the stream.
    #[error("missing {0} packet")]
    MissingField(&'static str),
    /// A packet appeared with data it cannot carry.
    #[error("invalid {field} packet: {reason}")]
    InvalidField {
        /// Packet key.
        field: &'static str,
        /// Reason for invalidity.
        reason: String,
    },
}
