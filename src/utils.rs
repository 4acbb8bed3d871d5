use std::convert::TryFrom;

/// Borrow 4 bytes of a slice as a fixed-size array.
///
/// Callers must have checked that `s[offset..offset + 4]` is in bounds.
#[inline]
pub(crate) fn array_ref4(s: &[u8], offset: usize) -> &[u8; 4] {
    <&[u8; 4]>::try_from(&s[offset..offset + 4]).expect("4-byte slice")
}
