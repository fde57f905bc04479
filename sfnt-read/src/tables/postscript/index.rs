//! Parsing for PostScript INDEX objects.
//!
//! See "INDEX Data" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=12>

use super::Error;
use crate::{FontData, ReadError};

/// An array of variable sized objects.
///
/// This is the CFF (version 1) format with a 16-bit count.
#[derive(Clone, Default)]
pub struct Index<'a> {
    count: u16,
    off_size: u8,
    offsets: FontData<'a>,
    objects: FontData<'a>,
}

impl<'a> Index<'a> {
    /// Creates a new index from the given data.
    pub fn new(data: &'a [u8]) -> Result<Self, Error> {
        Self::read(FontData::new(data))
    }

    /// Reads an index from the start of the given data.
    pub fn read(data: FontData<'a>) -> Result<Self, Error> {
        let count = data.read_at::<u16>(0)?;
        if count == 0 {
            // An empty index contains only the count field.
            return Ok(Self::default());
        }
        let off_size = data.read_at::<u8>(2)?;
        if !(1..=4).contains(&off_size) {
            return Err(Error::InvalidIndexOffsetSize(off_size));
        }
        let offsets_len = (count as usize + 1) * off_size as usize;
        let offsets = data
            .slice(3..3 + offsets_len)
            .ok_or(ReadError::OutOfBounds)?;
        let objects = data
            .split_off(3 + offsets_len)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Self {
            count,
            off_size,
            offsets,
            objects,
        })
    }

    /// Returns the number of objects in the index.
    pub fn count(&self) -> u32 {
        self.count as u32
    }

    /// Returns the size of each offset in bytes.
    pub fn off_size(&self) -> u8 {
        self.off_size
    }

    /// Computes a bias that is added to a subroutine operator in a
    /// charstring.
    ///
    /// See "Local/Global Subrs INDEXes" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=25>
    pub fn subr_bias(&self) -> i32 {
        let count = self.count();
        if count < 1240 {
            107
        } else if count < 33900 {
            1131
        } else {
            32768
        }
    }

    /// Returns the total size in bytes of the index table.
    pub fn size_in_bytes(&self) -> Result<usize, Error> {
        // 2 byte count + 1 byte off_size
        const HEADER_SIZE: usize = 3;
        // An empty index contains only a 2 byte count field
        const EMPTY_SIZE: usize = 2;
        let count = self.count as usize;
        Ok(match count {
            0 => EMPTY_SIZE,
            _ => HEADER_SIZE + self.offsets.len() + self.get_offset(count)?,
        })
    }

    /// Returns the offset of the object at the given index.
    pub fn get_offset(&self, index: usize) -> Result<usize, Error> {
        // There are count + 1 entries in the offset array and offsets
        // are relative to the byte preceding the object data, so the
        // first one is always 1.
        if index > self.count as usize {
            return Err(ReadError::OutOfBounds.into());
        }
        let pos = index * self.off_size as usize;
        let offset = match self.off_size {
            1 => self.offsets.read_at::<u8>(pos)? as usize,
            2 => self.offsets.read_at::<u16>(pos)? as usize,
            3 => {
                let [a, b, c] = *self.offsets.read_ref_at::<[u8; 3]>(pos)?;
                u32::from_be_bytes([0, a, b, c]) as usize
            }
            4 => self.offsets.read_at::<u32>(pos)? as usize,
            size => return Err(Error::InvalidIndexOffsetSize(size)),
        };
        offset.checked_sub(1).ok_or(Error::ZeroOffsetInIndex)
    }

    /// Returns the data for the object at the given index.
    pub fn get(&self, index: usize) -> Result<&'a [u8], Error> {
        let start = self.get_offset(index)?;
        let end = self.get_offset(index + 1)?;
        self.objects
            .as_bytes()
            .get(start..end)
            .ok_or(ReadError::OutOfBounds.into())
    }

    /// Returns an iterator over the objects in the index.
    pub fn iter(&self) -> impl Iterator<Item = Result<&'a [u8], Error>> + '_ {
        (0..self.count as usize).map(|ix| self.get(ix))
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::{cff, BeBuffer};

    use super::*;

    #[test]
    fn offsize1_count4() {
        test_index(1, 4);
    }

    #[test]
    fn offsize2_count64() {
        test_index(2, 64);
    }

    #[test]
    fn offsize3_count128() {
        test_index(3, 128);
    }

    #[test]
    fn offsize4_count256() {
        test_index(4, 256);
    }

    #[test]
    fn empty_index() {
        let index = Index::new(&[0, 0]).unwrap();
        assert_eq!(index.count(), 0);
        assert_eq!(index.size_in_bytes().unwrap(), 2);
        assert!(index.get(0).is_err());
    }

    #[test]
    fn invalid_offsets() {
        assert_eq!(
            Index::new(&[0, 1, 5, 0, 0]).err(),
            Some(Error::InvalidIndexOffsetSize(5))
        );
        let index = Index::new(&[0, 1, 1, 0, 1]).unwrap();
        assert_eq!(index.get(0).err(), Some(Error::ZeroOffsetInIndex));
        // the last offset points past the object data
        let index = Index::new(&[0, 1, 1, 1, 4, b'a']).unwrap();
        assert!(index.get(0).is_err());
    }

    #[test]
    fn fixture_builder_index() {
        let data = cff::index(&[b"ab".to_vec(), b"c".to_vec()]);
        let index = Index::new(&data).unwrap();
        assert_eq!(index.count(), 2);
        assert_eq!(index.get(0).unwrap(), b"ab");
        assert_eq!(index.get(1).unwrap(), b"c");
        assert_eq!(index.size_in_bytes().unwrap(), data.len());
        assert_eq!(index.subr_bias(), 107);
    }

    fn test_index(off_size: u8, count: usize) {
        let buf = make_index(off_size, count);
        let index = Index::new(buf.as_slice()).unwrap();
        assert_eq!(index.off_size(), off_size);
        assert_eq!(index.count(), count as u32);
        assert_eq!(index.size_in_bytes().unwrap(), buf.len());
        for (i, object) in index.iter().enumerate() {
            let expected_len = (i + 1) * 10;
            let expected_bytes = vec![i as u8; expected_len];
            assert_eq!(object.unwrap(), expected_bytes);
        }
    }

    fn make_index(off_size: u8, count: usize) -> BeBuffer {
        // `count` objects, each containing `(i + 1) * 10` bytes of the
        // value `i`.
        let mut buf = BeBuffer::new().push(count as u16).push(off_size);
        // Offsets start at 1.
        let mut offset = 1usize;
        for i in 0..count + 1 {
            buf = match off_size {
                1 => buf.push(offset as u8),
                2 => buf.push(offset as u16),
                3 => buf.extend_bytes(&(offset as u32).to_be_bytes()[1..]),
                4 => buf.push(offset as u32),
                _ => panic!("off_size should be 1-4"),
            };
            offset += (i + 1) * 10;
        }
        for i in 0..count {
            buf = buf.extend_bytes(&vec![i as u8; (i + 1) * 10]);
        }
        buf
    }
}
