//! CFF charset support.

use types::{BigEndian, GlyphId};

use super::StringId;
use crate::{font_data::Cursor, FontData, ReadError};

/// Character set for mapping from glyph to string identifiers.
///
/// In CID-keyed fonts the same structure maps glyphs to CIDs.
///
/// See "Charsets" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=21>
#[derive(Clone)]
pub struct Charset<'a> {
    kind: CharsetKind<'a>,
    num_glyphs: u32,
}

/// The encodings of a charset.
///
/// The glyph at index 0 is always `.notdef` and is not stored.
#[derive(Clone)]
pub enum CharsetKind<'a> {
    /// The predefined identity mapping for the first 229 glyphs.
    IsoAdobe,
    /// One string identifier per glyph.
    Format0(&'a [BigEndian<u16>]),
    /// Ranges with an 8-bit count.
    Format1(FontData<'a>),
    /// Ranges with a 16-bit count.
    Format2(FontData<'a>),
}

impl<'a> Charset<'a> {
    /// Reads the charset at `charset_offset` from the start of the CFF table.
    ///
    /// Offsets 1 and 2 select the predefined expert charsets which are not
    /// used by OpenType fonts and are reported as an invalid format.
    pub fn new(
        cff_data: FontData<'a>,
        charset_offset: usize,
        num_glyphs: u32,
    ) -> Result<Self, ReadError> {
        let kind = match charset_offset {
            0 => CharsetKind::IsoAdobe,
            1 | 2 => return Err(ReadError::InvalidFormat(charset_offset as _)),
            _ => {
                let data = cff_data
                    .split_off(charset_offset)
                    .ok_or(ReadError::OutOfBounds)?;
                let stored = num_glyphs.saturating_sub(1) as usize;
                match data.read_at::<u8>(0)? {
                    0 => CharsetKind::Format0(data.read_array(1..1 + stored * 2)?),
                    1 => CharsetKind::Format1(data.split_off(1).unwrap_or_default()),
                    2 => CharsetKind::Format2(data.split_off(1).unwrap_or_default()),
                    format => return Err(ReadError::InvalidFormat(format as _)),
                }
            }
        };
        Ok(Self { kind, num_glyphs })
    }

    pub fn kind(&self) -> &CharsetKind<'a> {
        &self.kind
    }

    pub fn num_glyphs(&self) -> u32 {
        self.num_glyphs
    }

    /// Returns the string identifier for the given glyph identifier.
    pub fn string_id(&self, glyph_id: GlyphId) -> Result<StringId, ReadError> {
        let gid = glyph_id.to_u32();
        if gid >= self.num_glyphs {
            return Err(ReadError::OutOfBounds);
        }
        if gid == 0 {
            return Ok(StringId::new(0));
        }
        match &self.kind {
            // identity up to 228
            CharsetKind::IsoAdobe if gid <= 228 => Ok(StringId::new(gid as u16)),
            CharsetKind::IsoAdobe => Err(ReadError::OutOfBounds),
            CharsetKind::Format0(sids) => sids
                .get(gid as usize - 1)
                .map(|sid| StringId::new(sid.get()))
                .ok_or(ReadError::OutOfBounds),
            CharsetKind::Format1(_) | CharsetKind::Format2(_) => {
                // each range covers `n_left + 1` glyphs starting at glyph 1
                let mut start = 1u32;
                for (first, n_left) in self.ranges() {
                    let end = start + n_left + 1;
                    if gid < end {
                        return u16::try_from(first + (gid - start))
                            .map(StringId::new)
                            .map_err(|_| ReadError::OutOfBounds);
                    }
                    start = end;
                }
                Err(ReadError::OutOfBounds)
            }
        }
    }

    /// Returns the glyph identifier for the given string identifier.
    pub fn glyph_id(&self, string_id: StringId) -> Result<GlyphId, ReadError> {
        let sid = string_id.to_u16();
        if sid == 0 {
            return Ok(GlyphId::NOTDEF);
        }
        let gid = match &self.kind {
            CharsetKind::IsoAdobe => (sid <= 228).then_some(sid as u32),
            CharsetKind::Format0(sids) => sids
                .iter()
                .position(|s| s.get() == sid)
                .map(|pos| pos as u32 + 1),
            CharsetKind::Format1(_) | CharsetKind::Format2(_) => {
                let sid = sid as u32;
                let mut start = 1u32;
                let mut found = None;
                for (first, n_left) in self.ranges() {
                    if (first..=first + n_left).contains(&sid) {
                        found = Some(start + (sid - first));
                        break;
                    }
                    start += n_left + 1;
                }
                found
            }
        };
        gid.filter(|gid| *gid < self.num_glyphs)
            .and_then(|gid| u16::try_from(gid).ok())
            .map(GlyphId::new)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Returns an iterator over all of the glyph and string identifier
    /// mappings.
    pub fn iter(&self) -> CharsetIter<'a> {
        CharsetIter {
            charset: self.clone(),
            ranges: self.ranges(),
            gid: 0,
            next_sid: 0,
            remaining: 0,
        }
    }

    /// Ranges of `(first, n_left)` for the range based formats, limited to
    /// the ranges needed to cover every glyph.
    fn ranges(&self) -> RangeIter<'a> {
        let (data, wide) = match &self.kind {
            CharsetKind::Format1(data) => (*data, false),
            CharsetKind::Format2(data) => (*data, true),
            _ => (FontData::EMPTY, false),
        };
        RangeIter {
            cursor: data.cursor(),
            wide,
            glyphs_left: self.num_glyphs.saturating_sub(1),
        }
    }
}

#[derive(Clone)]
struct RangeIter<'a> {
    cursor: Cursor<'a>,
    wide: bool,
    glyphs_left: u32,
}

impl Iterator for RangeIter<'_> {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.glyphs_left == 0 {
            return None;
        }
        let first = self.cursor.read::<u16>().ok()? as u32;
        let n_left = if self.wide {
            self.cursor.read::<u16>().ok()? as u32
        } else {
            self.cursor.read::<u8>().ok()? as u32
        };
        self.glyphs_left = self.glyphs_left.saturating_sub(n_left + 1);
        Some((first, n_left))
    }
}

/// Iterator over the glyph and string identifier mappings in a character set.
#[derive(Clone)]
pub struct CharsetIter<'a> {
    charset: Charset<'a>,
    ranges: RangeIter<'a>,
    gid: u32,
    next_sid: u32,
    remaining: u32,
}

impl Iterator for CharsetIter<'_> {
    type Item = (GlyphId, StringId);

    fn next(&mut self) -> Option<Self::Item> {
        if self.gid >= self.charset.num_glyphs {
            return None;
        }
        let gid = GlyphId::new(u16::try_from(self.gid).ok()?);
        let sid = match self.charset.kind {
            CharsetKind::Format1(_) | CharsetKind::Format2(_) if self.gid != 0 => {
                // walk the ranges instead of searching them for every glyph
                if self.remaining == 0 {
                    let (first, n_left) = self.ranges.next()?;
                    self.next_sid = first;
                    self.remaining = n_left + 1;
                }
                let sid = u16::try_from(self.next_sid).ok()?;
                self.next_sid += 1;
                self.remaining -= 1;
                StringId::new(sid)
            }
            _ => self.charset.string_id(gid).ok()?,
        };
        self.gid += 1;
        Some((gid, sid))
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::BeBuffer;

    use super::*;

    fn charset_data(format: u8, ranges: &[(u16, u16)]) -> Vec<u8> {
        let mut buf = BeBuffer::new().push(format);
        for (first, n_left) in ranges {
            buf = buf.push(*first);
            buf = if format == 1 {
                buf.push(*n_left as u8)
            } else {
                buf.push(*n_left)
            };
        }
        buf.into_vec()
    }

    #[test]
    fn format0() {
        let data = BeBuffer::new()
            .push(0u8)
            .extend([34u16, 35, 391])
            .into_vec();
        let charset = Charset::new(FontData::new(&data), 0, 4);
        // offset 0 is the predefined set
        assert!(matches!(charset.unwrap().kind(), CharsetKind::IsoAdobe));
        let mut padded = vec![0u8; 4];
        padded.extend(&data);
        let charset = Charset::new(FontData::new(&padded), 4, 4).unwrap();
        assert_eq!(charset.string_id(GlyphId::new(0)).unwrap(), StringId::new(0));
        assert_eq!(charset.string_id(GlyphId::new(3)).unwrap(), StringId::new(391));
        assert!(charset.string_id(GlyphId::new(4)).is_err());
        assert_eq!(charset.glyph_id(StringId::new(35)).unwrap(), GlyphId::new(2));
        assert!(charset.glyph_id(StringId::new(36)).is_err());
    }

    #[test]
    fn range_formats() {
        for format in [1, 2] {
            let mut data = vec![0u8; 4];
            data.extend(charset_data(format, &[(10, 2), (100, 0), (200, 5)]));
            let charset = Charset::new(FontData::new(&data), 4, 8).unwrap();
            let sids: Vec<_> = (0..8)
                .map(|gid| charset.string_id(GlyphId::new(gid)).unwrap().to_u16())
                .collect();
            assert_eq!(sids, [0, 10, 11, 12, 100, 200, 201, 202]);
            let iterated: Vec<_> = charset.iter().map(|(_, sid)| sid.to_u16()).collect();
            assert_eq!(iterated, sids);
            assert_eq!(charset.glyph_id(StringId::new(201)).unwrap(), GlyphId::new(6));
            // beyond the glyph count
            assert!(charset.glyph_id(StringId::new(204)).is_err());
        }
    }

    #[test]
    fn iso_adobe() {
        let charset = Charset::new(FontData::EMPTY, 0, 300).unwrap();
        assert_eq!(charset.string_id(GlyphId::new(228)).unwrap(), StringId::new(228));
        assert!(charset.string_id(GlyphId::new(229)).is_err());
        assert_eq!(charset.iter().count(), 229);
    }

    #[test]
    fn truncated_ranges() {
        let mut data = vec![0u8; 4];
        data.extend(charset_data(2, &[(10, 1)]));
        let charset = Charset::new(FontData::new(&data), 4, 10).unwrap();
        assert_eq!(charset.string_id(GlyphId::new(2)).unwrap(), StringId::new(11));
        assert!(charset.string_id(GlyphId::new(3)).is_err());
        assert_eq!(charset.iter().count(), 3);
    }
}
