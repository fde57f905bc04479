//! small utilities used in tests

use std::collections::HashMap;

use sfnt_types::Scalar;

/// A convenience type for generating a buffer of big-endian bytes.
#[derive(Debug, Clone, Default)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    /// The current length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the buffer contains zero bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Return a reference to the contents of the buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Write any scalar to this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write a scalar and remember its position, for a later [`write_at`](Self::write_at).
    pub fn push_with_tag(mut self, item: impl Scalar, tag: &str) -> Self {
        self.tagged_locations
            .insert(tag.to_string(), self.data.len());
        self.data.extend(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars into the buffer
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend(item.to_raw().as_ref());
        }
        self
    }

    /// Append raw bytes.
    pub fn extend_bytes(mut self, bytes: &[u8]) -> Self {
        self.data.extend_from_slice(bytes);
        self
    }

    pub fn offset_for(&self, tag: &str) -> usize {
        // panic on unrecognized tags
        self.tagged_locations.get(tag).copied().unwrap()
    }

    fn data_for(&mut self, tag: &str) -> &mut [u8] {
        let offset = self.offset_for(tag);
        &mut self.data[offset..]
    }

    /// Overwrite the value previously pushed with `tag`.
    pub fn write_at(&mut self, tag: &str, item: impl Scalar) {
        let data = self.data_for(tag);
        let raw = item.to_raw();
        let new_data: &[u8] = raw.as_ref();

        if data.len() < new_data.len() {
            panic!("not enough room left in buffer for the requested write.");
        }

        for (left, right) in data.iter_mut().zip(new_data) {
            *left = *right
        }
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}

impl std::ops::Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Build a [`BeBuffer`] from a list of scalars.
///
/// Bracketed lists are written element by element. Anything that is not a
/// single token (negative numbers, method calls) goes in parentheses:
///
/// ```
/// # use sfnt_test_data::be_buffer;
/// let buf = be_buffer! { 1u16, [2u8, 3], (4u32 + 1), (-1i8) };
/// assert_eq!(&*buf, &[0, 1, 2, 3, 0, 0, 0, 5, 0xFF]);
/// ```
#[macro_export]
macro_rules! be_buffer {
    ( $( $item:tt ),* $(,)? ) => {{
        let builder = $crate::bebuffer::BeBuffer::new();
        $(
            let builder = $crate::be_buffer_add!(builder, $item);
        )*
        builder
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! be_buffer_add {
    ($b:ident, [ $( $x:expr ),* $(,)? ]) => {
        $b.extend([ $( $x ),* ])
    };
    ($b:ident, $x:expr) => {
        $b.push($x)
    };
}

#[cfg(test)]
mod tests {
    use sfnt_types::Tag;

    #[test]
    fn macro_writes_big_endian() {
        let buf = be_buffer! {
            0x0102u16,
            (Tag::new(b"abcd")),
            [-1i16, 2],
            7u8,
        };
        assert_eq!(&*buf, &[1, 2, b'a', b'b', b'c', b'd', 0xFF, 0xFF, 0, 2, 7]);
    }

    #[test]
    fn write_at_tagged_location() {
        let mut buf = super::BeBuffer::new()
            .push(1u16)
            .push_with_tag(0u32, "offset")
            .push(3u16);
        buf.write_at("offset", 0xAABBCCDDu32);
        assert_eq!(buf.offset_for("offset"), 2);
        assert_eq!(&*buf, &[0, 1, 0xAA, 0xBB, 0xCC, 0xDD, 0, 3]);
    }
}
