use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::errors::WireError;

/// URL-safe alphabet, no padding on encode, padding optional on decode.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes bytes as unpadded base64url.
pub fn base64url_encode(bytes: &[u8]) -> String {
    URL_SAFE_LENIENT.encode(bytes)
}

/// Decodes base64url text, with or without `=` padding.
///
/// Surrounding ASCII whitespace is ignored.
pub fn base64url_decode(text: &str) -> Result<Vec<u8>, WireError> {
    Ok(URL_SAFE_LENIENT.decode(text.trim())?)
}
