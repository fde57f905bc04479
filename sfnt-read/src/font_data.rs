//! raw font bytes

use std::ops::{Range, RangeBounds};

use bytemuck::AnyBitPattern;
use types::{BigEndian, FixedSize, Scalar};

use crate::read::{FontRead, FontReadWithArgs, ReadError};

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// Reads advance the cursor even when they fail, so that the final
/// [`position`](Cursor::position) check reports any overrun.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// An empty data object.
    pub const EMPTY: FontData<'static> = FontData { bytes: &[] };

    /// Create a new `FontData` with these bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns self[pos..]
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData { bytes })
    }

    /// returns self[..pos], and updates self to = self[pos..];
    pub fn take_up_to(&mut self, pos: usize) -> Option<FontData<'a>> {
        if pos > self.len() {
            return None;
        }
        let (head, tail) = self.bytes.split_at(pos);
        self.bytes = tail;
        Some(FontData { bytes: head })
    }

    /// Returns the subrange of the data, if it is in bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    /// Read a scalar at the provided location in the data.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.bytes
            .get(offset..end)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Read a big-endian value at the provided location in the data.
    pub fn read_be_at<T: Scalar>(&self, offset: usize) -> Result<BigEndian<T>, ReadError> {
        let end = offset
            .checked_add(T::RAW_BYTE_LEN)
            .ok_or(ReadError::OutOfBounds)?;
        self.bytes
            .get(offset..end)
            .and_then(BigEndian::from_slice)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Read a type that requires arguments from the given range.
    pub fn read_with_args<T>(&self, range: Range<usize>, args: &T::Args) -> Result<T, ReadError>
    where
        T: FontReadWithArgs<'a>,
    {
        self.slice(range)
            .ok_or(ReadError::OutOfBounds)
            .and_then(|data| T::read_with_args(data, args))
    }

    /// Interpret the bytes at `offset` as a reference to some type `T`.
    ///
    /// `T` is one of the big-endian record types; these all have an
    /// alignment of 1.
    pub fn read_ref_at<T: AnyBitPattern>(&self, offset: usize) -> Result<&'a T, ReadError> {
        let end = offset
            .checked_add(std::mem::size_of::<T>())
            .ok_or(ReadError::OutOfBounds)?;
        let bytes = self.bytes.get(offset..end).ok_or(ReadError::OutOfBounds)?;
        bytemuck::try_from_bytes(bytes).map_err(|_| ReadError::InvalidArrayLen)
    }

    /// Interpret the bytes in `range` as a slice of some type `T`.
    pub fn read_array<T: AnyBitPattern>(&self, range: Range<usize>) -> Result<&'a [T], ReadError> {
        let bytes = self.bytes.get(range).ok_or(ReadError::OutOfBounds)?;
        bytemuck::try_cast_slice(bytes).map_err(|_| ReadError::InvalidArrayLen)
    }

    pub(crate) fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// Return the data as a byte slice
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub(crate) fn advance<T: Scalar>(&mut self) {
        self.pos = self.pos.saturating_add(T::RAW_BYTE_LEN);
    }

    pub(crate) fn advance_by(&mut self, n_bytes: usize) {
        self.pos = self.pos.saturating_add(n_bytes);
    }

    pub(crate) fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.advance::<T>();
        temp
    }

    pub(crate) fn read_array<T: AnyBitPattern>(
        &mut self,
        n_elem: usize,
    ) -> Result<&'a [T], ReadError> {
        let len = n_elem
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(ReadError::OutOfBounds)?;
        let end = self.pos.checked_add(len).ok_or(ReadError::OutOfBounds)?;
        let temp = self.data.read_array(self.pos..end);
        self.pos = end;
        temp
    }

    /// return the current position, or an error if we are out of bounds
    pub(crate) fn position(&self) -> Result<usize, ReadError> {
        if self.pos > self.data.len() {
            return Err(ReadError::OutOfBounds);
        }
        Ok(self.pos)
    }

    /// The bytes that have not yet been consumed.
    pub(crate) fn remaining(&self) -> Option<FontData<'a>> {
        self.data.split_off(self.pos)
    }

    pub(crate) fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }
}

impl<'a> FontRead<'a> for FontData<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(data)
    }
}

impl AsRef<[u8]> for FontData<'_> {
    fn as_ref(&self) -> &[u8] {
        self.bytes
    }
}

impl<'a> From<&'a [u8]> for FontData<'a> {
    fn from(src: &'a [u8]) -> FontData<'a> {
        FontData::new(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_bounds_checked() {
        let data = FontData::new(&[0, 1, 0, 2, 3]);
        assert_eq!(data.read_at::<u16>(0), Ok(1));
        assert_eq!(data.read_at::<u16>(2), Ok(2));
        assert_eq!(data.read_at::<u16>(4), Err(ReadError::OutOfBounds));
        assert_eq!(data.read_at::<u8>(usize::MAX), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn array_length_must_be_multiple() {
        let data = FontData::new(&[0, 1, 0, 2, 3]);
        let arr: &[BigEndian<u16>] = data.read_array(0..4).unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[1].get(), 2);
        assert_eq!(
            data.read_array::<BigEndian<u16>>(0..5).err(),
            Some(ReadError::InvalidArrayLen)
        );
        assert_eq!(
            data.read_array::<BigEndian<u16>>(0..6).err(),
            Some(ReadError::OutOfBounds)
        );
    }

    #[test]
    fn slices_accept_any_range() {
        let data = FontData::new(&[1, 2, 3, 4]);
        assert_eq!(data.slice(1..3).unwrap().as_bytes(), &[2, 3]);
        assert_eq!(data.slice(..=1).unwrap().as_bytes(), &[1, 2]);
        assert_eq!(data.slice(2..).unwrap().as_bytes(), &[3, 4]);
        assert!(data.slice(3..5).is_none());
    }

    #[test]
    fn cursor_reads_in_sequence() {
        let data = FontData::new(&[0, 7, 0, 0, 0, 9, 5]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<u16>(), Ok(7));
        assert_eq!(cursor.read::<u32>(), Ok(9));
        assert_eq!(cursor.remaining_bytes(), 1);
        assert_eq!(cursor.remaining().unwrap().as_bytes(), &[5]);
    }

    #[test]
    fn cursor_reports_overrun() {
        let data = FontData::new(&[0, 7, 1]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<u16>(), Ok(7));
        assert!(cursor.read::<u16>().is_err());
        assert!(cursor.position().is_err());
    }
}
