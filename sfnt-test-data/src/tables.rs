//! Builders for individual tables.
//!
//! These write just enough structure for fixtures; none of them attempt
//! to optimise the encoding.

use sfnt_types::{Fixed, Tag};

use crate::bebuffer::BeBuffer;

/// A `name` record: `(platform, encoding, language, name id, string)`.
pub type NameEntry<'a> = (u16, u16, u16, u16, &'a str);

/// Build a format 0 `name` table.
///
/// Macintosh strings are written as single bytes (the fixtures only use
/// ASCII); all other platforms are written as UTF-16BE.
pub fn name_table(records: &[NameEntry]) -> Vec<u8> {
    let storage_offset = 6 + records.len() * 12;
    let mut storage = Vec::new();
    let mut buf = be_buffer! { 0u16, (records.len() as u16), (storage_offset as u16) };
    for (platform, encoding, language, name_id, string) in records {
        let encoded: Vec<u8> = if *platform == 1 {
            string.bytes().collect()
        } else {
            string.encode_utf16().flat_map(u16::to_be_bytes).collect()
        };
        buf = buf
            .extend([*platform, *encoding, *language, *name_id])
            .push(encoded.len() as u16)
            .push(storage.len() as u16);
        storage.extend(encoded);
    }
    buf.extend_bytes(&storage).into_vec()
}

/// Build a `cmap` table from `(platform, encoding, subtable)` entries.
pub fn cmap_table(subtables: &[(u16, u16, Vec<u8>)]) -> Vec<u8> {
    let mut offset = 4 + subtables.len() * 8;
    let mut buf = be_buffer! { 0u16, (subtables.len() as u16) };
    for (platform, encoding, data) in subtables {
        buf = buf.extend([*platform, *encoding]).push(offset as u32);
        offset += data.len();
    }
    for (_, _, data) in subtables {
        buf = buf.extend_bytes(data);
    }
    buf.into_vec()
}

/// Format 4 subtable with one segment per `(codepoint, glyph)` pair.
///
/// The pairs must be sorted by codepoint.
pub fn cmap4(mappings: &[(u16, u16)]) -> Vec<u8> {
    let seg_count = mappings.len() as u16 + 1;
    let seg_count_x2 = seg_count * 2;
    let entry_selector = (seg_count as u32).ilog2() as u16;
    let search_range = 2 * (1u16 << entry_selector);
    let range_shift = seg_count_x2 - search_range;
    let length = 16 + seg_count as usize * 8;
    let ends = mappings.iter().map(|(cp, _)| *cp).chain([0xFFFF]);
    let starts = mappings.iter().map(|(cp, _)| *cp).chain([0xFFFF]);
    let deltas = mappings
        .iter()
        .map(|(cp, gid)| gid.wrapping_sub(*cp))
        .chain([1]);
    be_buffer! {
        4u16,
        (length as u16),
        0u16,              // language
        seg_count_x2,
        search_range,
        entry_selector,
        range_shift
    }
    .extend(ends)
    .push(0u16) // reserved pad
    .extend(starts)
    .extend(deltas)
    .extend(std::iter::repeat(0u16).take(seg_count as usize))
    .into_vec()
}

/// Format 12 subtable from `(start, end, start_glyph)` groups.
pub fn cmap12(groups: &[(u32, u32, u32)]) -> Vec<u8> {
    let length = 16 + groups.len() * 12;
    let mut buf = be_buffer! {
        12u16,
        0u16,                  // reserved
        (length as u32),
        0u32,                  // language
        (groups.len() as u32)
    };
    for (start, end, gid) in groups {
        buf = buf.extend([*start, *end, *gid]);
    }
    buf.into_vec()
}

/// A variation selector record for a format 14 subtable.
#[derive(Clone, Debug, Default)]
pub struct VariationSelector {
    pub selector: u32,
    /// `(start, additional_count)` ranges that use the default mapping.
    pub default_uvs: Vec<(u32, u8)>,
    /// `(codepoint, glyph)` pairs with a non default glyph.
    pub non_default_uvs: Vec<(u32, u16)>,
}

/// Format 14 subtable.
pub fn cmap14(selectors: &[VariationSelector]) -> Vec<u8> {
    let header_len = 10 + selectors.len() * 11;
    let mut records = BeBuffer::new();
    let mut tables = Vec::new();
    for selector in selectors {
        records = records.extend_bytes(&selector.selector.to_be_bytes()[1..]);
        let default_offset = if selector.default_uvs.is_empty() {
            0
        } else {
            let offset = header_len + tables.len();
            let mut buf = BeBuffer::new().push(selector.default_uvs.len() as u32);
            for (start, additional) in &selector.default_uvs {
                buf = buf.extend_bytes(&start.to_be_bytes()[1..]).push(*additional);
            }
            tables.extend_from_slice(&buf);
            offset
        };
        let non_default_offset = if selector.non_default_uvs.is_empty() {
            0
        } else {
            let offset = header_len + tables.len();
            let mut buf = BeBuffer::new().push(selector.non_default_uvs.len() as u32);
            for (cp, gid) in &selector.non_default_uvs {
                buf = buf.extend_bytes(&cp.to_be_bytes()[1..]).push(*gid);
            }
            tables.extend_from_slice(&buf);
            offset
        };
        records = records
            .push(default_offset as u32)
            .push(non_default_offset as u32);
    }
    let length = header_len + tables.len();
    be_buffer! { 14u16, (length as u32), (selectors.len() as u32) }
        .extend_bytes(&records)
        .extend_bytes(&tables)
        .into_vec()
}

/// Fields of the `OS/2` table.
#[derive(Clone, Debug)]
pub struct Os2Builder {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub weight_class: u16,
    pub width_class: u16,
    pub fs_type: u16,
    /// `[x_size, y_size, x_offset, y_offset]`
    pub subscript: [i16; 4],
    /// `[x_size, y_size, x_offset, y_offset]`
    pub superscript: [i16; 4],
    pub strikeout_size: i16,
    pub strikeout_position: i16,
    pub vendor_id: Tag,
    pub fs_selection: u16,
    pub first_char_index: u16,
    pub last_char_index: u16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    pub win_descent: u16,
    pub x_height: i16,
    pub cap_height: i16,
}

impl Default for Os2Builder {
    fn default() -> Self {
        Self {
            version: 4,
            x_avg_char_width: 500,
            weight_class: 400,
            width_class: 5,
            fs_type: 0,
            subscript: [650, 600, 0, 75],
            superscript: [650, 600, 0, 350],
            strikeout_size: 50,
            strikeout_position: 250,
            vendor_id: Tag::new(b"NONE"),
            fs_selection: 0x0040,
            first_char_index: 0x20,
            last_char_index: 0x7E,
            typo_ascender: 800,
            typo_descender: -200,
            typo_line_gap: 100,
            win_ascent: 900,
            win_descent: 300,
            x_height: 500,
            cap_height: 700,
        }
    }
}

impl Os2Builder {
    pub fn build(&self) -> Vec<u8> {
        let mut buf = be_buffer! {
            (self.version),
            (self.x_avg_char_width),
            (self.weight_class),
            (self.width_class),
            (self.fs_type)
        }
        .extend(self.subscript)
        .extend(self.superscript)
        .push(self.strikeout_size)
        .push(self.strikeout_position)
        .push(0i16) // family class
        .extend([2u8, 11, 5, 3, 3, 4, 3, 2, 2, 4]) // panose
        .extend([0u32; 4]) // unicode ranges
        .push(self.vendor_id)
        .push(self.fs_selection)
        .push(self.first_char_index)
        .push(self.last_char_index)
        .extend([self.typo_ascender, self.typo_descender, self.typo_line_gap])
        .extend([self.win_ascent, self.win_descent]);
        if self.version >= 1 {
            buf = buf.extend([1u32, 0]); // code page ranges
        }
        if self.version >= 2 {
            buf = buf
                .extend([self.x_height, self.cap_height])
                .extend([0u16, 0x20, 3]); // default char, break char, max context
        }
        if self.version >= 5 {
            buf = buf.extend([0u16, 0xFFFF]); // optical point sizes
        }
        buf.into_vec()
    }
}

/// Build a `post` table.
///
/// With `glyph_names == None` this is a version 3.0 table; otherwise a
/// version 2.0 table with the given indices and custom names.
pub fn post_table(
    italic_angle: Fixed,
    underline_position: i16,
    underline_thickness: i16,
    is_fixed_pitch: bool,
    glyph_names: Option<(&[u16], &[&str])>,
) -> Vec<u8> {
    let version = if glyph_names.is_some() {
        0x0002_0000u32
    } else {
        0x0003_0000
    };
    let mut buf = be_buffer! {
        version,
        italic_angle,
        underline_position,
        underline_thickness,
        (is_fixed_pitch as u32),
        [0u32, 0, 0, 0]           // memory usage
    };
    if let Some((indices, names)) = glyph_names {
        buf = buf
            .push(indices.len() as u16)
            .extend(indices.iter().copied());
        for name in names {
            buf = buf.push(name.len() as u8).extend_bytes(name.as_bytes());
        }
    }
    buf.into_vec()
}

/// A class definition table in format 2, from `(start, end, class)` ranges.
pub fn class_def2(ranges: &[(u16, u16, u16)]) -> Vec<u8> {
    let mut buf = be_buffer! { 2u16, (ranges.len() as u16) };
    for (start, end, class) in ranges {
        buf = buf.extend([*start, *end, *class]);
    }
    buf.into_vec()
}

/// A class definition table in format 1.
pub fn class_def1(start_glyph: u16, classes: &[u16]) -> Vec<u8> {
    be_buffer! { 1u16, start_glyph, (classes.len() as u16) }
        .extend(classes.iter().copied())
        .into_vec()
}

/// A coverage table in format 1 from sorted glyph ids.
pub fn coverage1(glyphs: &[u16]) -> Vec<u8> {
    be_buffer! { 1u16, (glyphs.len() as u16) }
        .extend(glyphs.iter().copied())
        .into_vec()
}

/// A coverage table in format 2 from `(start, end)` ranges.
pub fn coverage2(ranges: &[(u16, u16)]) -> Vec<u8> {
    let mut buf = be_buffer! { 2u16, (ranges.len() as u16) };
    let mut coverage_index = 0u16;
    for (start, end) in ranges {
        buf = buf.extend([*start, *end, coverage_index]);
        coverage_index += end - start + 1;
    }
    buf.into_vec()
}

/// A version 1.2 `GDEF` table with glyph classes, mark attachment
/// classes and mark glyph sets. Attachment and ligature caret lists are
/// left empty.
pub fn gdef_table(
    glyph_class_def: &[u8],
    mark_attach_class_def: &[u8],
    mark_glyph_sets: &[Vec<u8>],
) -> Vec<u8> {
    const HEADER_LEN: usize = 14;
    let glyph_class_offset = HEADER_LEN;
    let mark_attach_offset = glyph_class_offset + glyph_class_def.len();
    let sets_offset = mark_attach_offset + mark_attach_class_def.len();
    let mut coverage_offset = 4 + mark_glyph_sets.len() * 4;
    let mut sets = be_buffer! { 1u16, (mark_glyph_sets.len() as u16) };
    for coverage in mark_glyph_sets {
        sets = sets.push(coverage_offset as u32);
        coverage_offset += coverage.len();
    }
    for coverage in mark_glyph_sets {
        sets = sets.extend_bytes(coverage);
    }
    let non_null = |table: &[u8], offset: usize| if table.is_empty() { 0 } else { offset as u16 };
    be_buffer! {
        1u16, 2u16,
        (non_null(glyph_class_def, glyph_class_offset)),
        0u16,                      // attach list
        0u16,                      // lig caret list
        (non_null(mark_attach_class_def, mark_attach_offset)),
        (sets_offset as u16)
    }
    .extend_bytes(glyph_class_def)
    .extend_bytes(mark_attach_class_def)
    .extend_bytes(&sets)
    .into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_storage_offsets() {
        let data = name_table(&[(1, 0, 0, 1, "Ab"), (3, 1, 0x409, 1, "Ab")]);
        // storage starts after 6 + 2 * 12 bytes
        assert_eq!(&data[30..], &[b'A', b'b', 0, b'A', 0, b'b']);
    }

    #[test]
    fn cmap4_segment_layout() {
        let data = cmap4(&[(0x41, 2)]);
        // length field covers the whole subtable
        assert_eq!(u16::from_be_bytes([data[2], data[3]]) as usize, data.len());
        // two segments: seg_count_x2
        assert_eq!(u16::from_be_bytes([data[6], data[7]]), 4);
    }

    #[test]
    fn os2_lengths_by_version() {
        let len = |version| {
            Os2Builder {
                version,
                ..Default::default()
            }
            .build()
            .len()
        };
        assert_eq!(len(0), 78);
        assert_eq!(len(1), 86);
        assert_eq!(len(3), 96);
        assert_eq!(len(5), 100);
    }
}
