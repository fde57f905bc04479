//! Parsing for CFF FDSelect tables.

use types::{BigEndian, GlyphId};

use crate::{FontData, FontRead, ReadError};

/// Range record of an FDSelect format 3 table.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct FdRange3 {
    first: BigEndian<u16>,
    fd: u8,
}

impl FdRange3 {
    pub fn first(&self) -> u16 {
        self.first.get()
    }

    pub fn fd(&self) -> u8 {
        self.fd
    }
}

/// Maps glyphs to the font DICT of a CID-keyed font.
///
/// See "FDSelect" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=28>
#[derive(Clone)]
pub enum FdSelect<'a> {
    /// One font DICT index per glyph.
    Format0(&'a [u8]),
    /// Ranges of glyphs sharing a font DICT, followed by a sentinel glyph.
    Format3 {
        ranges: &'a [FdRange3],
        sentinel: u16,
    },
}

impl<'a> FontRead<'a> for FdSelect<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        match data.read_at::<u8>(0)? {
            0 => Ok(Self::Format0(data.as_bytes().get(1..).unwrap_or_default())),
            3 => {
                let n_ranges = data.read_at::<u16>(1)? as usize;
                let ranges_end = 3 + n_ranges * std::mem::size_of::<FdRange3>();
                let ranges = data.read_array(3..ranges_end)?;
                let sentinel = data.read_at::<u16>(ranges_end)?;
                Ok(Self::Format3 { ranges, sentinel })
            }
            format => Err(ReadError::InvalidFormat(format as _)),
        }
    }
}

impl FdSelect<'_> {
    /// Returns the associated font DICT index for the given glyph identifier.
    pub fn font_index(&self, glyph_id: GlyphId) -> Option<u16> {
        match self {
            Self::Format0(fds) => fds.get(glyph_id.to_u32() as usize).map(|fd| *fd as u16),
            Self::Format3 { ranges, sentinel } => {
                let gid = glyph_id.to_u16();
                if gid >= *sentinel {
                    return None;
                }
                let ix = match ranges.binary_search_by(|range| range.first().cmp(&gid)) {
                    Ok(ix) => ix,
                    Err(0) => return None,
                    Err(ix) => ix - 1,
                };
                Some(ranges.get(ix)?.fd() as u16)
            }
        }
    }
}
