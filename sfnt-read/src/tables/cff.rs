//! The [CFF](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) table

use std::ops::Range;

use types::{Fixed, GlyphId, Tag};

use super::postscript::{
    charstring::{self, CommandSink},
    dict, Charset, Error, FdSelect, Index, Latin1String, StringId,
};
use crate::{FontData, FontRead, ReadError};

/// 'CFF '
pub const TAG: Tag = Tag::new(b"CFF ");

/// The [Compact Font Format](https://learn.microsoft.com/en-us/typography/opentype/spec/cff) table.
///
/// OpenType fonts contain a single font in the font set, so only the first
/// top DICT is consulted.
#[derive(Clone)]
pub struct Cff<'a> {
    data: FontData<'a>,
    major: u8,
    minor: u8,
    names: Index<'a>,
    top_dicts: Index<'a>,
    strings: Index<'a>,
    global_subrs: Index<'a>,
    top_dict: TopDict,
}

/// The entries of a top DICT that are needed for outlines and glyph names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopDict {
    pub charstrings_offset: Option<usize>,
    pub charset_offset: usize,
    pub private_dict_range: Option<Range<usize>>,
    pub fd_array_offset: Option<usize>,
    pub fd_select_offset: Option<usize>,
    /// Registry, ordering and supplement of a CID-keyed font.
    pub ros: Option<(StringId, StringId, Fixed)>,
    pub font_matrix: Option<[Fixed; 6]>,
    pub font_bbox: Option<[Fixed; 4]>,
    pub full_name: Option<StringId>,
    pub family_name: Option<StringId>,
}

impl TopDict {
    /// Collects the entries of the given DICT data.
    pub fn new(dict_data: &[u8]) -> Result<Self, Error> {
        let mut top = Self::default();
        for entry in dict::entries(dict_data) {
            match entry? {
                dict::Entry::CharstringsOffset(offset) => top.charstrings_offset = Some(offset),
                dict::Entry::Charset(offset) => top.charset_offset = offset,
                dict::Entry::PrivateDictRange(range) => top.private_dict_range = Some(range),
                dict::Entry::FdArrayOffset(offset) => top.fd_array_offset = Some(offset),
                dict::Entry::FdSelectOffset(offset) => top.fd_select_offset = Some(offset),
                dict::Entry::Ros {
                    registry,
                    ordering,
                    supplement,
                } => top.ros = Some((registry, ordering, supplement)),
                dict::Entry::FontMatrix(matrix) => top.font_matrix = Some(matrix),
                dict::Entry::FontBbox(bbox) => top.font_bbox = Some(bbox),
                dict::Entry::FullName(sid) => top.full_name = Some(sid),
                dict::Entry::FamilyName(sid) => top.family_name = Some(sid),
                _ => {}
            }
        }
        Ok(top)
    }

    /// Returns true if this is the top DICT of a CID-keyed font.
    pub fn is_cid(&self) -> bool {
        self.ros.is_some()
    }
}

/// The entries of a private DICT used for charstring evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrivateDict {
    pub default_width_x: Fixed,
    pub nominal_width_x: Fixed,
    /// Offset of the local subroutines from the start of the CFF table.
    pub subrs_offset: Option<usize>,
}

impl<'a> Cff<'a> {
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    pub fn major(&self) -> u8 {
        self.major
    }

    pub fn minor(&self) -> u8 {
        self.minor
    }

    /// Returns the name index.
    ///
    /// This contains the PostScript names of all fonts in the font set.
    ///
    /// See "Name INDEX" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=13>
    pub fn names(&self) -> Index<'a> {
        self.names.clone()
    }

    /// Returns the PostScript name of the font in the font set at the
    /// given index.
    pub fn name(&self, index: usize) -> Option<Latin1String<'a>> {
        Some(Latin1String::new(self.names.get(index).ok()?))
    }

    /// Returns the top dict index.
    ///
    /// See "Top DICT INDEX" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=14>
    pub fn top_dicts(&self) -> Index<'a> {
        self.top_dicts.clone()
    }

    /// Returns the parsed entries of the first top DICT.
    pub fn top_dict(&self) -> &TopDict {
        &self.top_dict
    }

    /// Returns the string index.
    ///
    /// This contains the strings used by fonts within the font set that are
    /// not among the standard strings.
    ///
    /// See "String INDEX" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=17>
    pub fn strings(&self) -> Index<'a> {
        self.strings.clone()
    }

    /// Returns the associated string for the given identifier.
    ///
    /// If the identifier does not represent a standard string, the result is
    /// looked up in the string index.
    pub fn string(&self, id: StringId) -> Option<Latin1String<'a>> {
        match id.standard_string() {
            Ok(name) => Some(name),
            Err(ix) => self.strings.get(ix).ok().map(Latin1String::new),
        }
    }

    /// Returns the global subroutine index.
    ///
    /// See "Local/Global Subrs INDEXes" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=25>
    pub fn global_subrs(&self) -> Index<'a> {
        self.global_subrs.clone()
    }

    /// Returns the index containing a charstring for each glyph.
    pub fn charstrings(&self) -> Result<Index<'a>, Error> {
        let offset = self
            .top_dict
            .charstrings_offset
            .ok_or(Error::MissingCharstrings)?;
        Index::read(self.data.split_off(offset).ok_or(ReadError::OutOfBounds)?)
    }

    /// Returns the number of glyphs in the font.
    pub fn num_glyphs(&self) -> Result<u32, Error> {
        Ok(self.charstrings()?.count())
    }

    /// Returns the character set.
    ///
    /// CID-keyed fonts map glyphs to CIDs rather than to names and return
    /// `None`.
    ///
    /// See "Charsets" at <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=21>
    pub fn charset(&self) -> Result<Option<Charset<'a>>, Error> {
        if self.top_dict.is_cid() {
            return Ok(None);
        }
        let num_glyphs = self.num_glyphs()?;
        Ok(Some(Charset::new(
            self.data,
            self.top_dict.charset_offset,
            num_glyphs,
        )?))
    }

    /// Returns the name of the given glyph from the charset and string
    /// tables.
    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<Latin1String<'a>> {
        let charset = self.charset().ok()??;
        self.string(charset.string_id(glyph_id).ok()?)
    }

    /// Returns the font DICT index of each glyph for CID-keyed fonts.
    pub fn fd_select(&self) -> Result<Option<FdSelect<'a>>, Error> {
        let Some(offset) = self.top_dict.fd_select_offset else {
            return Ok(None);
        };
        let data = self.data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        Ok(Some(FdSelect::read(data)?))
    }

    /// Returns the index of font DICTs for CID-keyed fonts.
    pub fn fd_array(&self) -> Result<Option<Index<'a>>, Error> {
        let Some(offset) = self.top_dict.fd_array_offset else {
            return Ok(None);
        };
        let data = self.data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        Ok(Some(Index::read(data)?))
    }

    /// Returns the range of the private DICT that applies to the given
    /// glyph.
    ///
    /// For CID-keyed fonts, the range comes from the font DICT selected by
    /// FDSelect. Otherwise the top DICT holds it.
    pub fn private_dict_range(&self, glyph_id: GlyphId) -> Result<Range<usize>, Error> {
        let fd_array = self.fd_array()?;
        let Some(fd_array) = fd_array else {
            return self
                .top_dict
                .private_dict_range
                .clone()
                .ok_or(Error::MissingPrivateDict);
        };
        let fd_index = match self.fd_select()? {
            Some(fd_select) => fd_select
                .font_index(glyph_id)
                .ok_or(Error::InvalidGlyphIndex(glyph_id.to_u32()))?,
            // a single font DICT needs no selector
            None => 0,
        };
        let font_dict = fd_array.get(fd_index as usize)?;
        for entry in dict::entries(font_dict) {
            if let dict::Entry::PrivateDictRange(range) = entry? {
                return Ok(range);
            }
        }
        Err(Error::MissingPrivateDict)
    }

    /// Parses the private DICT at the given range.
    ///
    /// The local subroutine offset is resolved from the start of the
    /// private DICT to the start of the table.
    pub fn private_dict(&self, range: Range<usize>) -> Result<PrivateDict, Error> {
        let data = self
            .data
            .slice(range.clone())
            .ok_or(ReadError::OutOfBounds)?;
        let mut private = PrivateDict::default();
        for entry in dict::entries(data.as_bytes()) {
            match entry? {
                dict::Entry::DefaultWidthX(width) => private.default_width_x = width,
                dict::Entry::NominalWidthX(width) => private.nominal_width_x = width,
                dict::Entry::SubrsOffset(offset) => {
                    private.subrs_offset = Some(
                        range
                            .start
                            .checked_add(offset)
                            .ok_or(ReadError::OutOfBounds)?,
                    )
                }
                _ => {}
            }
        }
        Ok(private)
    }

    /// Returns the local subroutines of the given private DICT.
    pub fn subrs(&self, private: &PrivateDict) -> Result<Option<Index<'a>>, Error> {
        let Some(offset) = private.subrs_offset else {
            return Ok(None);
        };
        let data = self.data.split_off(offset).ok_or(ReadError::OutOfBounds)?;
        Ok(Some(Index::read(data)?))
    }

    /// Evaluates the charstring of the given glyph, sending the outline to
    /// `sink`.
    ///
    /// Returns the advance width recorded in the charstring.
    pub fn evaluate(&self, glyph_id: GlyphId, sink: &mut impl CommandSink) -> Result<Fixed, Error> {
        let charstrings = self.charstrings()?;
        let gid = glyph_id.to_u32();
        if gid >= charstrings.count() {
            return Err(Error::InvalidGlyphIndex(gid));
        }
        let charstring_data = charstrings.get(gid as usize)?;
        let private = self.private_dict(self.private_dict_range(glyph_id)?)?;
        let subrs = self.subrs(&private)?;
        let width = charstring::evaluate(charstring_data, self.global_subrs(), subrs, sink)?;
        Ok(match width {
            Some(width) => private.nominal_width_x.saturating_add(width),
            None => private.default_width_x,
        })
    }
}

impl<'a> FontRead<'a> for Cff<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let major = data.read_at::<u8>(0)?;
        if major != 1 {
            return Err(ReadError::InvalidFormat(major as _));
        }
        let minor = data.read_at::<u8>(1)?;
        let hdr_size = data.read_at::<u8>(2)? as usize;
        let mut pos = hdr_size;
        let mut next_index = || -> Result<Index<'a>, ReadError> {
            let index_data = data.split_off(pos).ok_or(ReadError::OutOfBounds)?;
            let index = Index::read(index_data).map_err(to_read_error)?;
            pos += index.size_in_bytes().map_err(to_read_error)?;
            Ok(index)
        };
        let names = next_index()?;
        let top_dicts = next_index()?;
        let strings = next_index()?;
        let global_subrs = next_index()?;
        let top_dict = top_dicts
            .get(0)
            .and_then(TopDict::new)
            .map_err(to_read_error)?;
        Ok(Self {
            data,
            major,
            minor,
            names,
            top_dicts,
            strings,
            global_subrs,
            top_dict,
        })
    }
}

fn to_read_error(e: Error) -> ReadError {
    match e {
        Error::Read(e) => e,
        _ => ReadError::MalformedData("invalid CFF index or top DICT"),
    }
}

impl std::fmt::Debug for Cff<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cff")
            .field("major", &self.major)
            .field("minor", &self.minor)
            .field("top_dict", &self.top_dict)
            .finish()
    }
}
