use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Compares two byte strings in time independent of their contents.
///
/// Slices of different lengths compare unequal.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Overwrites sensitive bytes with zeros.
pub fn secure_erase<Z: Zeroize + ?Sized>(buffer: &mut Z) {
    buffer.zeroize();
}
