//! Token formats.
//!
//! A format turns a [`Macaroon`] into a printable token and back. Only the V1
//! packet format ships; other formats plug in through [`Serializer`].

use macaroons_wire::{
    base64url_decode, base64url_encode, Packet, PacketKey, PacketReader, PacketWriter, WireError,
};
use tracing::debug;

use crate::caveat::{Caveat, FirstPartyCaveat, ThirdPartyCaveat};
use crate::errors::MacaroonError;
use crate::macaroon::Macaroon;
use crate::signature::{Signature, SIGNATURE_SIZE};

/// A token format.
pub trait Serializer {
    /// Encodes `macaroon` as a printable token.
    fn serialize(&self, macaroon: &Macaroon) -> Result<String, MacaroonError>;

    /// Decodes a printable token.
    fn deserialize(&self, data: &str) -> Result<Macaroon, MacaroonError>;
}

/// The V1 format: a base64url (unpadded) stream of text packets.
///
/// Packets appear as `location`, `identifier`, then per caveat `cid`, `vid`
/// (third-party only) and `cl` (when located), and finally `signature`.
#[derive(Debug, Clone, Copy, Default)]
pub struct V1Serializer;

impl Serializer for V1Serializer {
    fn serialize(&self, macaroon: &Macaroon) -> Result<String, MacaroonError> {
        let mut writer = PacketWriter::new();

        if !macaroon.location().is_empty() {
            writer.append(PacketKey::Location, macaroon.location().as_bytes())?;
        }
        writer.append(PacketKey::Identifier, macaroon.identifier().as_bytes())?;

        for caveat in macaroon.caveats() {
            writer.append(PacketKey::Cid, caveat.caveat_id().as_bytes())?;
            if let Caveat::ThirdParty(caveat) = caveat {
                writer.append(PacketKey::Vid, caveat.verification_id())?;
            }
            if let Some(location) = caveat.location() {
                writer.append(PacketKey::Cl, location.as_bytes())?;
            }
        }

        writer.append(PacketKey::Signature, macaroon.signature().as_bytes())?;

        Ok(base64url_encode(&writer.finish()))
    }

    fn deserialize(&self, data: &str) -> Result<Macaroon, MacaroonError> {
        let bytes = base64url_decode(data)?;
        let mut reader = PacketReader::new(&bytes);

        let mut location = None;
        let mut identifier = None;
        let mut signature = None;
        let mut caveats = Vec::new();
        let mut pending: Option<CaveatRecord> = None;

        while let Some(packet) = reader.read_packet()? {
            match packet.key().clone() {
                PacketKey::Location => location = Some(text("location", packet)?),
                PacketKey::Identifier => identifier = Some(text("identifier", packet)?),
                PacketKey::Signature => {
                    signature = Some(Signature::from_slice(packet.data()).ok_or_else(|| {
                        WireError::InvalidField {
                            field: "signature",
                            reason: format!(
                                "expected {} bytes, found {}",
                                SIGNATURE_SIZE,
                                packet.data().len()
                            ),
                        }
                    })?);
                }
                PacketKey::Cid => {
                    if let Some(record) = pending.take() {
                        caveats.push(record.into_caveat());
                    }
                    pending = Some(CaveatRecord::new(text("cid", packet)?));
                }
                PacketKey::Vid => {
                    let record = pending.as_mut().ok_or_else(|| orphan("vid"))?;
                    record.vid = Some(packet.into_data());
                }
                PacketKey::Cl => {
                    let record = pending.as_mut().ok_or_else(|| orphan("cl"))?;
                    record.cl = Some(text("cl", packet)?);
                }
                PacketKey::Unknown(key) => {
                    debug!(key = %key, offset = reader.position(), "unknown packet key");
                    return Err(WireError::UnknownKey(key).into());
                }
            }
        }

        if let Some(record) = pending.take() {
            caveats.push(record.into_caveat());
        }

        let identifier = identifier.ok_or(WireError::MissingField("identifier"))?;
        let signature = signature.ok_or(WireError::MissingField("signature"))?;

        Ok(Macaroon::from_parts(
            location.unwrap_or_default(),
            identifier,
            signature,
            caveats,
        ))
    }
}

/// Caveat fields collected between two `cid` packets.
struct CaveatRecord {
    cid: String,
    vid: Option<Vec<u8>>,
    cl: Option<String>,
}

impl CaveatRecord {
    fn new(cid: String) -> Self {
        Self {
            cid,
            vid: None,
            cl: None,
        }
    }

    fn into_caveat(self) -> Caveat {
        match self.vid {
            Some(vid) => ThirdPartyCaveat::new(self.cid, vid, self.cl.as_deref()).into(),
            None => FirstPartyCaveat::new(self.cid, self.cl.as_deref()).into(),
        }
    }
}

fn text(field: &'static str, packet: Packet) -> Result<String, WireError> {
    String::from_utf8(packet.into_data()).map_err(|e| WireError::InvalidField {
        field,
        reason: format!("not valid UTF-8: {}", e),
    })
}

fn orphan(field: &'static str) -> WireError {
    WireError::InvalidField {
        field,
        reason: "appears before any cid packet".to_string(),
    }
}
