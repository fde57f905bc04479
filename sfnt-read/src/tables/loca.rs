//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use types::{BigEndian, GlyphId, Tag};

use super::glyf::{Glyf, Glyph};
use crate::{FontData, FontRead, FontReadWithArgs, ReadArgs, ReadError};

/// 'loca'
pub const TAG: Tag = Tag::new(b"loca");

/// The [loca] table.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone, Copy)]
pub enum Loca<'a> {
    Short(&'a [BigEndian<u16>]),
    Long(&'a [BigEndian<u32>]),
}

impl<'a> Loca<'a> {
    pub fn read(data: FontData<'a>, is_long: bool) -> Result<Self, ReadError> {
        Self::read_with_args(data, &is_long)
    }

    /// The number of glyphs covered; one less than the number of offsets.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(data) => data.len().saturating_sub(1),
            Loca::Long(data) => data.len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempt to return the offset for a given glyph id.
    ///
    /// Short offsets are stored divided by two.
    pub fn get_raw(&self, idx: usize) -> Option<u32> {
        match self {
            Loca::Short(data) => data.get(idx).map(|x| x.get() as u32 * 2),
            Loca::Long(data) => data.get(idx).map(|x| x.get()),
        }
    }

    /// The byte range of the glyph in the `glyf` table.
    ///
    /// An empty range is a glyph without an outline.
    pub fn glyph_range(&self, gid: GlyphId) -> Result<core::ops::Range<usize>, ReadError> {
        let idx = gid.to_u32() as usize;
        let start = self.get_raw(idx).ok_or(ReadError::OutOfBounds)?;
        let end = self.get_raw(idx + 1).ok_or(ReadError::OutOfBounds)?;
        if end < start {
            return Err(ReadError::MalformedData("loca offsets are not ascending"));
        }
        Ok(start as usize..end as usize)
    }

    /// Returns the glyph, or `None` for a glyph without an outline.
    pub fn get_glyf(&self, gid: GlyphId, glyf: &Glyf<'a>) -> Result<Option<Glyph<'a>>, ReadError> {
        let range = self.glyph_range(gid)?;
        if range.is_empty() {
            return Ok(None);
        }
        let data = glyf
            .offset_data()
            .slice(range)
            .ok_or(ReadError::OutOfBounds)?;
        Glyph::read(data).map(Some)
    }
}

impl ReadArgs for Loca<'_> {
    type Args = bool;
}

impl<'a> FontReadWithArgs<'a> for Loca<'a> {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        let is_long = *args;
        if is_long {
            data.read_array(0..data.len() / 4 * 4).map(Loca::Long)
        } else {
            data.read_array(0..data.len() / 2 * 2).map(Loca::Short)
        }
    }
}

impl core::fmt::Debug for Loca<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let kind = match self {
            Loca::Short(_) => "Short",
            Loca::Long(_) => "Long",
        };
        f.debug_struct("Loca")
            .field("format", &kind)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::be_buffer;

    use super::*;

    #[test]
    fn short_offsets_are_doubled() {
        let data = be_buffer! { [0u16, 10, 10, 24] };
        let loca = Loca::read(FontData::new(&data), false).unwrap();
        assert_eq!(loca.len(), 3);
        assert_eq!(loca.glyph_range(GlyphId::new(0)).unwrap(), 0..20);
        assert!(loca.glyph_range(GlyphId::new(1)).unwrap().is_empty());
        assert_eq!(loca.glyph_range(GlyphId::new(2)).unwrap(), 20..48);
        assert!(loca.glyph_range(GlyphId::new(3)).is_err());
    }

    #[test]
    fn long_offsets() {
        let data = be_buffer! { [0u32, 100, 50] };
        let loca = Loca::read(FontData::new(&data), true).unwrap();
        assert_eq!(loca.glyph_range(GlyphId::new(0)).unwrap(), 0..100);
        assert!(matches!(
            loca.glyph_range(GlyphId::new(1)),
            Err(ReadError::MalformedData(_))
        ));
    }
}
