//! The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap) table

use core::ops::Range;

use types::{BigEndian, GlyphId, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'cmap'
pub const TAG: Tag = Tag::new(b"cmap");

/// Platform identifiers used in encoding records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlatformId {
    Unicode,
    Macintosh,
    Iso,
    Windows,
    Custom,
    Unknown(u16),
}

impl PlatformId {
    pub fn new(raw: u16) -> Self {
        match raw {
            0 => Self::Unicode,
            1 => Self::Macintosh,
            2 => Self::Iso,
            3 => Self::Windows,
            4 => Self::Custom,
            other => Self::Unknown(other),
        }
    }
}

/// The [cmap](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap)
/// (character to glyph index mapping) table.
#[derive(Clone, Copy)]
pub struct Cmap<'a> {
    data: FontData<'a>,
    encoding_records: &'a [EncodingRecord],
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let _version: u16 = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        let encoding_records = cursor.read_array(num_tables as usize)?;
        Ok(Self {
            data,
            encoding_records,
        })
    }
}

impl<'a> Cmap<'a> {
    pub fn version(&self) -> u16 {
        self.data.read_at(0).unwrap_or_default()
    }

    pub fn encoding_records(&self) -> &'a [EncodingRecord] {
        self.encoding_records
    }

    /// The data that subtable offsets are relative to.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// Map a codepoint to a nominal glyph identifier
    ///
    /// This uses the first available subtable that provides a valid mapping.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        for record in self.encoding_records() {
            if let Ok(subtable) = record.subtable(self.offset_data()) {
                if let Some(gid) = subtable.map_codepoint(codepoint) {
                    return Some(gid);
                }
            }
        }
        None
    }
}

impl core::fmt::Debug for Cmap<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cmap")
            .field("encoding_records", &self.encoding_records)
            .finish()
    }
}

/// Identifies a subtable by platform and encoding.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct EncodingRecord {
    pub platform_id: BigEndian<u16>,
    pub encoding_id: BigEndian<u16>,
    pub subtable_offset: BigEndian<u32>,
}

impl EncodingRecord {
    pub fn platform_id(&self) -> PlatformId {
        PlatformId::new(self.platform_id.get())
    }

    pub fn encoding_id(&self) -> u16 {
        self.encoding_id.get()
    }

    /// Offset from the start of the cmap table.
    pub fn subtable_offset(&self) -> u32 {
        self.subtable_offset.get()
    }

    /// Resolve the subtable for this record.
    pub fn subtable<'a>(&self, data: FontData<'a>) -> Result<CmapSubtable<'a>, ReadError> {
        let data = data
            .split_off(self.subtable_offset() as usize)
            .ok_or(ReadError::OutOfBounds)?;
        CmapSubtable::read(data)
    }
}

/// A cmap subtable in one of the supported formats.
#[derive(Clone, Copy, Debug)]
pub enum CmapSubtable<'a> {
    Format0(Cmap0<'a>),
    Format4(Cmap4<'a>),
    Format6(Cmap6<'a>),
    Format12(Cmap12<'a>),
    Format14(Cmap14<'a>),
}

impl<'a> FontRead<'a> for CmapSubtable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u16 = data.read_at(0)?;
        match format {
            0 => Cmap0::read(data).map(Self::Format0),
            4 => Cmap4::read(data).map(Self::Format4),
            6 => Cmap6::read(data).map(Self::Format6),
            12 => Cmap12::read(data).map(Self::Format12),
            14 => Cmap14::read(data).map(Self::Format14),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

impl<'a> CmapSubtable<'a> {
    pub fn format(&self) -> u16 {
        match self {
            Self::Format0(_) => 0,
            Self::Format4(_) => 4,
            Self::Format6(_) => 6,
            Self::Format12(_) => 12,
            Self::Format14(_) => 14,
        }
    }

    /// Maps a codepoint through this subtable.
    ///
    /// Format 14 maps variation sequences only and always returns `None`.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        match self {
            Self::Format0(cmap0) => cmap0.map_codepoint(codepoint),
            Self::Format4(cmap4) => cmap4.map_codepoint(codepoint),
            Self::Format6(cmap6) => cmap6.map_codepoint(codepoint),
            Self::Format12(cmap12) => cmap12.map_codepoint(codepoint),
            Self::Format14(_) => None,
        }
    }
}

/// Format 0: byte encoding table.
#[derive(Clone, Copy, Debug)]
pub struct Cmap0<'a> {
    glyph_id_array: &'a [u8],
}

impl<'a> FontRead<'a> for Cmap0<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self {
            glyph_id_array: data.read_array(6..262)?,
        })
    }
}

impl<'a> Cmap0<'a> {
    pub fn glyph_id_array(&self) -> &'a [u8] {
        self.glyph_id_array
    }

    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let gid = *self.glyph_id_array.get(codepoint.into() as usize)?;
        (gid != 0).then_some(GlyphId::new(gid as u16))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, GlyphId)> + 'a {
        self.glyph_id_array
            .iter()
            .enumerate()
            .filter(|(_, gid)| **gid != 0)
            .map(|(cp, gid)| (cp as u32, GlyphId::new(*gid as u16)))
    }
}

/// Format 4: segment mapping to delta values.
#[derive(Clone, Copy)]
pub struct Cmap4<'a> {
    end_code: &'a [BigEndian<u16>],
    start_code: &'a [BigEndian<u16>],
    id_delta: &'a [BigEndian<i16>],
    id_range_offsets: &'a [BigEndian<u16>],
    glyph_id_array: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let length: u16 = data.read_at(2)?;
        let data = data.slice(..length as usize).unwrap_or(data);
        let mut cursor = data.cursor();
        cursor.advance_by(6);
        let seg_count_x2: u16 = cursor.read()?;
        let seg_count = seg_count_x2 as usize / 2;
        cursor.advance_by(6);
        let end_code = cursor.read_array(seg_count)?;
        cursor.advance::<u16>();
        let start_code = cursor.read_array(seg_count)?;
        let id_delta = cursor.read_array(seg_count)?;
        let id_range_offsets = cursor.read_array(seg_count)?;
        let remaining = cursor.remaining_bytes() / 2;
        let glyph_id_array = cursor.read_array(remaining)?;
        Ok(Self {
            end_code,
            start_code,
            id_delta,
            id_range_offsets,
            glyph_id_array,
        })
    }
}

impl<'a> Cmap4<'a> {
    pub fn seg_count_x2(&self) -> u16 {
        (self.end_code.len() * 2) as u16
    }

    pub fn end_code(&self) -> &'a [BigEndian<u16>] {
        self.end_code
    }

    pub fn start_code(&self) -> &'a [BigEndian<u16>] {
        self.start_code
    }

    pub fn id_delta(&self) -> &'a [BigEndian<i16>] {
        self.id_delta
    }

    pub fn id_range_offsets(&self) -> &'a [BigEndian<u16>] {
        self.id_range_offsets
    }

    pub fn glyph_id_array(&self) -> &'a [BigEndian<u16>] {
        self.glyph_id_array
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        if codepoint > 0xFFFF {
            return None;
        }
        let codepoint = codepoint as u16;
        let mut lo = 0;
        let mut hi = self.seg_count_x2() as usize / 2;
        let start_codes = self.start_code();
        let end_codes = self.end_code();
        while lo < hi {
            let i = (lo + hi) / 2;
            let start_code = start_codes.get(i)?.get();
            if codepoint < start_code {
                hi = i;
            } else if codepoint > end_codes.get(i)?.get() {
                lo = i + 1;
            } else {
                return self.lookup_glyph_id(codepoint, i, start_code);
            }
        }
        None
    }

    /// Returns an iterator over all (codepoint, glyph identifier) pairs
    /// in the subtable.
    pub fn iter(&self) -> Cmap4Iter<'a> {
        Cmap4Iter::new(*self)
    }

    /// Does the final phase of glyph id lookup.
    ///
    /// Shared between Self::map and Cmap4Iter.
    fn lookup_glyph_id(&self, codepoint: u16, index: usize, start_code: u16) -> Option<GlyphId> {
        let deltas = self.id_delta();
        let range_offsets = self.id_range_offsets();
        let delta = deltas.get(index)?.get() as i32;
        let range_offset = range_offsets.get(index)?.get() as usize;
        if range_offset == 0 {
            return Some(GlyphId::new((codepoint as i32 + delta) as u16));
        }
        // the offset is relative to the range offset entry itself
        let offset = (range_offset / 2 + codepoint.checked_sub(start_code)? as usize)
            .checked_sub(range_offsets.len() - index)?;
        let gid = self.glyph_id_array().get(offset)?.get();
        (gid != 0).then_some(GlyphId::new((gid as i32 + delta) as u16))
    }

    /// Returns the [start_code, end_code] range at the given index.
    fn code_range(&self, index: usize) -> Option<Range<u32>> {
        // Extend to u32 to ensure we don't overflow on the end + 1 bound
        // below.
        let start = self.start_code().get(index)?.get() as u32;
        let end = self.end_code().get(index)?.get() as u32;
        // Use end + 1 here because the range in the table is inclusive
        Some(start..end + 1)
    }
}

impl core::fmt::Debug for Cmap4<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cmap4")
            .field("seg_count", &self.end_code.len())
            .finish()
    }
}

/// Iterator over all (codepoint, glyph identifier) pairs in
/// the subtable.
#[derive(Clone)]
pub struct Cmap4Iter<'a> {
    subtable: Cmap4<'a>,
    cur_range: Range<u32>,
    cur_start_code: u16,
    cur_range_ix: usize,
}

impl<'a> Cmap4Iter<'a> {
    fn new(subtable: Cmap4<'a>) -> Self {
        let cur_range = subtable.code_range(0).unwrap_or_default();
        let cur_start_code = cur_range.start as u16;
        Self {
            subtable,
            cur_range,
            cur_start_code,
            cur_range_ix: 0,
        }
    }
}

impl<'a> Iterator for Cmap4Iter<'a> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(codepoint) = self.cur_range.next() {
                // The table might explicitly map some codepoints to 0. Avoid
                // returning those here.
                let Some(glyph_id) = self.subtable.lookup_glyph_id(
                    codepoint as u16,
                    self.cur_range_ix,
                    self.cur_start_code,
                ) else {
                    continue;
                };
                if glyph_id == GlyphId::NOTDEF {
                    continue;
                }
                return Some((codepoint, glyph_id));
            } else {
                self.cur_range_ix += 1;
                self.cur_range = self.subtable.code_range(self.cur_range_ix)?;
                self.cur_start_code = self.cur_range.start as u16;
            }
        }
    }
}

/// Format 6: trimmed table mapping.
#[derive(Clone, Copy)]
pub struct Cmap6<'a> {
    first_code: u16,
    glyph_id_array: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Cmap6<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let first_code = data.read_at(6)?;
        let entry_count: u16 = data.read_at(8)?;
        let glyph_id_array = data.read_array(10..10 + entry_count as usize * 2)?;
        Ok(Self {
            first_code,
            glyph_id_array,
        })
    }
}

impl<'a> Cmap6<'a> {
    pub fn first_code(&self) -> u16 {
        self.first_code
    }

    pub fn glyph_id_array(&self) -> &'a [BigEndian<u16>] {
        self.glyph_id_array
    }

    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let ix = codepoint.into().checked_sub(self.first_code as u32)?;
        let gid = self.glyph_id_array.get(ix as usize)?.get();
        (gid != 0).then_some(GlyphId::new(gid))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, GlyphId)> + 'a {
        let first_code = self.first_code as u32;
        self.glyph_id_array
            .iter()
            .enumerate()
            .filter(|(_, gid)| gid.get() != 0)
            .map(move |(ix, gid)| (first_code + ix as u32, GlyphId::new(gid.get())))
    }
}

impl core::fmt::Debug for Cmap6<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cmap6")
            .field("first_code", &self.first_code)
            .field("entry_count", &self.glyph_id_array.len())
            .finish()
    }
}

/// Part of [Cmap12].
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct SequentialMapGroup {
    pub start_char_code: BigEndian<u32>,
    pub end_char_code: BigEndian<u32>,
    pub start_glyph_id: BigEndian<u32>,
}

impl SequentialMapGroup {
    pub fn start_char_code(&self) -> u32 {
        self.start_char_code.get()
    }

    /// Inclusive.
    pub fn end_char_code(&self) -> u32 {
        self.end_char_code.get()
    }

    pub fn start_glyph_id(&self) -> u32 {
        self.start_glyph_id.get()
    }
}

/// Format 12: segmented coverage.
#[derive(Clone, Copy, Debug)]
pub struct Cmap12<'a> {
    groups: &'a [SequentialMapGroup],
}

impl<'a> FontRead<'a> for Cmap12<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let num_groups: u32 = data.read_at(12)?;
        let len = (num_groups as usize)
            .checked_mul(12)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Self {
            groups: data.read_array(16..16 + len)?,
        })
    }
}

impl<'a> Cmap12<'a> {
    pub fn groups(&self) -> &'a [SequentialMapGroup] {
        self.groups
    }

    /// Maps a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        let groups = self.groups();
        let mut lo = 0;
        let mut hi = groups.len();
        while lo < hi {
            let i = (lo + hi) / 2;
            let group = groups.get(i)?;
            if codepoint < group.start_char_code() {
                hi = i;
            } else if codepoint > group.end_char_code() {
                lo = i + 1;
            } else {
                return Some(self.lookup_glyph_id(
                    codepoint,
                    group.start_char_code(),
                    group.start_glyph_id(),
                ));
            }
        }
        None
    }

    /// Returns an iterator over all (codepoint, glyph identifier) pairs
    /// in the subtable.
    pub fn iter(&self) -> Cmap12Iter<'a> {
        Cmap12Iter::new(*self)
    }

    /// Does the final phase of glyph id lookup.
    ///
    /// Shared between Self::map and Cmap12Iter.
    fn lookup_glyph_id(
        &self,
        codepoint: u32,
        start_char_code: u32,
        start_glyph_id: u32,
    ) -> GlyphId {
        GlyphId::new(start_glyph_id.wrapping_add(codepoint.wrapping_sub(start_char_code)) as u16)
    }

    /// Returns the codepoint range and start glyph id for the group
    /// at the given index.
    fn group(&self, index: usize) -> Option<(Range<u32>, u32)> {
        let group = self.groups().get(index)?;
        Some((
            // Use + 1 here because the group range is inclusive
            group.start_char_code()..group.end_char_code().saturating_add(1),
            group.start_glyph_id(),
        ))
    }
}

/// Iterator over all (codepoint, glyph identifier) pairs in
/// the subtable.
#[derive(Clone)]
pub struct Cmap12Iter<'a> {
    subtable: Cmap12<'a>,
    cur_range: Range<u32>,
    cur_start_code: u32,
    cur_start_glyph_id: u32,
    cur_range_ix: usize,
}

impl<'a> Cmap12Iter<'a> {
    fn new(subtable: Cmap12<'a>) -> Self {
        let (cur_range, cur_start_glyph_id) = subtable.group(0).unwrap_or_default();
        let cur_start_code = cur_range.start;
        Self {
            subtable,
            cur_range,
            cur_start_code,
            cur_start_glyph_id,
            cur_range_ix: 0,
        }
    }
}

impl<'a> Iterator for Cmap12Iter<'a> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(codepoint) = self.cur_range.next() {
                let glyph_id = self.subtable.lookup_glyph_id(
                    codepoint,
                    self.cur_start_code,
                    self.cur_start_glyph_id,
                );
                // The table might explicitly map some codepoints to 0. Avoid
                // returning those here.
                if glyph_id == GlyphId::NOTDEF {
                    continue;
                }
                return Some((codepoint, glyph_id));
            } else {
                self.cur_range_ix += 1;
                (self.cur_range, self.cur_start_glyph_id) =
                    self.subtable.group(self.cur_range_ix)?;
                self.cur_start_code = self.cur_range.start;
            }
        }
    }
}

/// Result of mapping a codepoint with a variation selector.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum MapVariant {
    /// The variation selector should be ignored and the default mapping
    /// of the character should be used.
    UseDefault,
    /// The variant glyph mapped by a codepoint and associated variation
    /// selector.
    Variant(GlyphId),
}

fn u24(bytes: [u8; 3]) -> u32 {
    u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
}

/// Part of [Cmap14].
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct VariationSelector {
    pub var_selector: [u8; 3],
    pub default_uvs_offset: BigEndian<u32>,
    pub non_default_uvs_offset: BigEndian<u32>,
}

impl VariationSelector {
    pub fn var_selector(&self) -> u32 {
        u24(self.var_selector)
    }

    /// The default UVS table, if present. The offset is from the start of
    /// the format 14 subtable.
    pub fn default_uvs<'a>(&self, data: FontData<'a>) -> Option<Result<DefaultUvs<'a>, ReadError>> {
        let offset = self.default_uvs_offset.get() as usize;
        (offset != 0).then(|| {
            data.split_off(offset)
                .ok_or(ReadError::OutOfBounds)
                .and_then(DefaultUvs::read)
        })
    }

    /// The non-default UVS table, if present.
    pub fn non_default_uvs<'a>(
        &self,
        data: FontData<'a>,
    ) -> Option<Result<NonDefaultUvs<'a>, ReadError>> {
        let offset = self.non_default_uvs_offset.get() as usize;
        (offset != 0).then(|| {
            data.split_off(offset)
                .ok_or(ReadError::OutOfBounds)
                .and_then(NonDefaultUvs::read)
        })
    }
}

/// A range of codepoints that use their default glyph with a selector.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct UnicodeRange {
    pub start_unicode_value: [u8; 3],
    pub additional_count: u8,
}

impl UnicodeRange {
    pub fn start_unicode_value(&self) -> u32 {
        u24(self.start_unicode_value)
    }

    pub fn additional_count(&self) -> u8 {
        self.additional_count
    }
}

/// A mapping from a codepoint to a variant glyph.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct UvsMapping {
    pub unicode_value: [u8; 3],
    pub glyph_id: BigEndian<u16>,
}

impl UvsMapping {
    pub fn unicode_value(&self) -> u32 {
        u24(self.unicode_value)
    }

    pub fn glyph_id(&self) -> u16 {
        self.glyph_id.get()
    }
}

/// Default UVS table.
#[derive(Clone, Copy, Debug)]
pub struct DefaultUvs<'a> {
    ranges: &'a [UnicodeRange],
}

impl<'a> FontRead<'a> for DefaultUvs<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count: u32 = data.read_at(0)?;
        Ok(Self {
            ranges: data.read_array(4..4 + count as usize * 4)?,
        })
    }
}

impl<'a> DefaultUvs<'a> {
    pub fn ranges(&self) -> &'a [UnicodeRange] {
        self.ranges
    }
}

/// Non-default UVS table.
#[derive(Clone, Copy, Debug)]
pub struct NonDefaultUvs<'a> {
    uvs_mapping: &'a [UvsMapping],
}

impl<'a> FontRead<'a> for NonDefaultUvs<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count: u32 = data.read_at(0)?;
        Ok(Self {
            uvs_mapping: data.read_array(4..4 + count as usize * 5)?,
        })
    }
}

impl<'a> NonDefaultUvs<'a> {
    pub fn uvs_mapping(&self) -> &'a [UvsMapping] {
        self.uvs_mapping
    }
}

/// Format 14: Unicode variation sequences.
#[derive(Clone, Copy)]
pub struct Cmap14<'a> {
    data: FontData<'a>,
    var_selector: &'a [VariationSelector],
}

impl<'a> FontRead<'a> for Cmap14<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let count: u32 = data.read_at(6)?;
        let len = (count as usize)
            .checked_mul(11)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Self {
            data,
            var_selector: data.read_array(10..10 + len)?,
        })
    }
}

impl core::fmt::Debug for Cmap14<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Cmap14")
            .field("var_selector", &self.var_selector.len())
            .finish()
    }
}

impl<'a> Cmap14<'a> {
    pub fn var_selector(&self) -> &'a [VariationSelector] {
        self.var_selector
    }

    fn offset_data(&self) -> FontData<'a> {
        self.data
    }

    /// Maps a codepoint and variation selector to a nominal glyph identifier.
    pub fn map_variant(
        &self,
        codepoint: impl Into<u32>,
        selector: impl Into<u32>,
    ) -> Option<MapVariant> {
        let codepoint = codepoint.into();
        let selector = selector.into();
        let selector_records = self.var_selector();
        // Variation selector records are sorted in order of var_selector. Binary search to find
        // the appropriate record.
        let selector_record = selector_records
            .binary_search_by(|rec| rec.var_selector().cmp(&selector))
            .ok()
            .and_then(|idx| selector_records.get(idx))?;
        // If a default UVS table is present in this selector record, binary search on the ranges
        // (start_unicode_value, start_unicode_value + additional_count) to find the requested codepoint.
        // If found, ignore the selector and return a value indicating that the default cmap mapping
        // should be used.
        if let Some(Ok(default_uvs)) = selector_record.default_uvs(self.offset_data()) {
            use core::cmp::Ordering;
            let found_default_uvs = default_uvs
                .ranges()
                .binary_search_by(|range| {
                    let start = range.start_unicode_value();
                    if codepoint < start {
                        Ordering::Greater
                    } else if codepoint > (start + range.additional_count() as u32) {
                        Ordering::Less
                    } else {
                        Ordering::Equal
                    }
                })
                .is_ok();
            if found_default_uvs {
                return Some(MapVariant::UseDefault);
            }
        }
        // Binary search the non-default UVS table if present. This maps codepoint+selector to a variant glyph.
        let non_default_uvs = selector_record.non_default_uvs(self.offset_data())?.ok()?;
        let mapping = non_default_uvs.uvs_mapping();
        let ix = mapping
            .binary_search_by(|map| map.unicode_value().cmp(&codepoint))
            .ok()?;
        Some(MapVariant::Variant(GlyphId::new(mapping.get(ix)?.glyph_id())))
    }

    /// Returns an iterator over all (codepoint, selector, mapping variant)
    /// triples in the subtable.
    pub fn iter(&self) -> Cmap14Iter<'a> {
        Cmap14Iter::new(*self)
    }

    fn selector(
        &self,
        index: usize,
    ) -> (
        Option<VariationSelector>,
        Option<DefaultUvs<'a>>,
        Option<NonDefaultUvs<'a>>,
    ) {
        let selector = self.var_selector().get(index).cloned();
        let default_uvs = selector.as_ref().and_then(|selector| {
            selector
                .default_uvs(self.offset_data())
                .transpose()
                .ok()
                .flatten()
        });
        let non_default_uvs = selector.as_ref().and_then(|selector| {
            selector
                .non_default_uvs(self.offset_data())
                .transpose()
                .ok()
                .flatten()
        });
        (selector, default_uvs, non_default_uvs)
    }
}

/// Iterator over all (codepoint, selector, mapping variant) triples
/// in the subtable.
#[derive(Clone)]
pub struct Cmap14Iter<'a> {
    subtable: Cmap14<'a>,
    selector_record: Option<VariationSelector>,
    default_uvs: Option<DefaultUvsIter<'a>>,
    non_default_uvs: Option<NonDefaultUvsIter<'a>>,
    cur_selector_ix: usize,
}

impl<'a> Cmap14Iter<'a> {
    fn new(subtable: Cmap14<'a>) -> Self {
        let (selector_record, default_uvs, non_default_uvs) = subtable.selector(0);
        Self {
            subtable,
            selector_record,
            default_uvs: default_uvs.map(DefaultUvsIter::new),
            non_default_uvs: non_default_uvs.map(NonDefaultUvsIter::new),
            cur_selector_ix: 0,
        }
    }
}

impl<'a> Iterator for Cmap14Iter<'a> {
    type Item = (u32, u32, MapVariant);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let selector_record = self.selector_record.as_ref()?;
            let selector = selector_record.var_selector();
            if let Some(default_uvs) = self.default_uvs.as_mut() {
                if let Some(codepoint) = default_uvs.next() {
                    return Some((codepoint, selector, MapVariant::UseDefault));
                }
            }
            if let Some(non_default_uvs) = self.non_default_uvs.as_mut() {
                if let Some((codepoint, variant)) = non_default_uvs.next() {
                    return Some((codepoint, selector, MapVariant::Variant(variant)));
                }
            }
            self.cur_selector_ix += 1;
            let (selector_record, default_uvs, non_default_uvs) =
                self.subtable.selector(self.cur_selector_ix);
            self.selector_record = selector_record;
            self.default_uvs = default_uvs.map(DefaultUvsIter::new);
            self.non_default_uvs = non_default_uvs.map(NonDefaultUvsIter::new);
        }
    }
}

#[derive(Clone)]
struct DefaultUvsIter<'a> {
    ranges: core::slice::Iter<'a, UnicodeRange>,
    cur_range: Range<u32>,
}

impl<'a> DefaultUvsIter<'a> {
    fn new(ranges: DefaultUvs<'a>) -> Self {
        let mut ranges = ranges.ranges().iter();
        let cur_range = if let Some(range) = ranges.next() {
            let start = range.start_unicode_value();
            let end = start + range.additional_count() as u32 + 1;
            start..end
        } else {
            0..0
        };
        Self { ranges, cur_range }
    }
}

impl<'a> Iterator for DefaultUvsIter<'a> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(codepoint) = self.cur_range.next() {
                return Some(codepoint);
            }
            let range = self.ranges.next()?;
            let start = range.start_unicode_value();
            let end = start + range.additional_count() as u32 + 1;
            self.cur_range = start..end;
        }
    }
}

#[derive(Clone)]
struct NonDefaultUvsIter<'a> {
    iter: core::slice::Iter<'a, UvsMapping>,
}

impl<'a> NonDefaultUvsIter<'a> {
    fn new(uvs: NonDefaultUvs<'a>) -> Self {
        Self {
            iter: uvs.uvs_mapping().iter(),
        }
    }
}

impl<'a> Iterator for NonDefaultUvsIter<'a> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        let mapping = self.iter.next()?;
        let codepoint = mapping.unicode_value();
        let glyph_id = GlyphId::new(mapping.glyph_id());
        Some((codepoint, glyph_id))
    }
}
