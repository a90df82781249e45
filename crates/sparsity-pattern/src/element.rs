//! Column index element types.
//!
//! Row blocks are raw bytes; [`ColumnIndex`] describes how one stored
//! column is encoded. Values are little-endian and read with byte copies,
//! so blocks need no particular alignment.

use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// An unsigned integer type used to store column indices.
///
/// Implemented for `u32` and `u64`. Sealed: the encoding is part of the
/// storage format of a row block.
pub trait ColumnIndex:
    Copy + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static + sealed::Sealed
{
    /// Encoded width in bytes.
    const SIZE: usize;

    /// Convert a 1-based column index, if it fits.
    fn from_index(index: usize) -> Option<Self>;

    /// Widen back to `usize`.
    fn to_index(self) -> usize;

    /// Largest column index representable, saturated to `usize`.
    fn max_index() -> usize;

    /// Decode from exactly [`Self::SIZE`] bytes.
    fn read_le(bytes: &[u8]) -> Self;

    /// Encode into exactly [`Self::SIZE`] bytes.
    fn write_le(self, bytes: &mut [u8]);
}

macro_rules! impl_column_index {
    ($($ty:ty),*) => {$(
        impl sealed::Sealed for $ty {}

        impl ColumnIndex for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();

            fn from_index(index: usize) -> Option<Self> {
                <$ty>::try_from(index).ok()
            }

            fn to_index(self) -> usize {
                usize::try_from(self).unwrap_or(usize::MAX)
            }

            fn max_index() -> usize {
                usize::try_from(<$ty>::MAX).unwrap_or(usize::MAX)
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$ty>()];
                raw.copy_from_slice(bytes);
                <$ty>::from_le_bytes(raw)
            }

            fn write_le(self, bytes: &mut [u8]) {
                bytes.copy_from_slice(&self.to_le_bytes());
            }
        }
    )*};
}

impl_column_index!(u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_width() {
        assert_eq!(<u32 as ColumnIndex>::SIZE, 4);
        assert_eq!(<u64 as ColumnIndex>::SIZE, 8);
    }

    #[test]
    fn encoding_is_little_endian() {
        let mut buf = [0u8; 4];
        0x0102_0304u32.write_le(&mut buf);
        assert_eq!(buf, [4, 3, 2, 1]);
        assert_eq!(u32::read_le(&buf), 0x0102_0304);
    }

    #[test]
    fn from_index_rejects_overflow() {
        assert_eq!(u32::from_index(7), Some(7));
        assert_eq!(u64::from_index(usize::MAX), Some(usize::MAX as u64));
        assert_eq!(u64::max_index(), usize::MAX);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(u32::from_index(u32::MAX as usize + 1), None);
    }
}
