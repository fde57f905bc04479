//! Assembling tables into a font file.

use std::collections::BTreeMap;

use sfnt_types::{Fixed, Tag, TTC_HEADER_TAG, TT_SFNT_VERSION};

use crate::bebuffer::BeBuffer;

const TABLE_RECORD_LEN: usize = 16;
const HEADER_LEN: usize = 12;

/// Build a font from some set of tables.
///
/// Tables are written in tag order, each padded to a four byte boundary,
/// behind a table directory with correct binary search fields.
#[derive(Debug, Clone)]
pub struct FontBuilder {
    sfnt_version: u32,
    tables: BTreeMap<Tag, Vec<u8>>,
}

impl Default for FontBuilder {
    fn default() -> Self {
        Self {
            sfnt_version: TT_SFNT_VERSION,
            tables: Default::default(),
        }
    }
}

impl FontBuilder {
    /// Create a new builder to compile a binary font
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder preloaded with minimal `head`, `hhea` and `maxp` tables.
    pub fn with_required_tables(num_glyphs: u16) -> Self {
        let mut builder = Self::new();
        builder
            .add_raw(Tag::new(b"head"), Self::head_table(1000))
            .add_raw(Tag::new(b"hhea"), Self::hhea_table(1))
            .add_raw(Tag::new(b"maxp"), Self::maxp_table(num_glyphs));
        builder
    }

    /// Set the version written at the start of the table directory.
    pub fn sfnt_version(&mut self, version: u32) -> &mut Self {
        self.sfnt_version = version;
        self
    }

    /// A builder method to add raw data for the provided tag
    pub fn add_raw(&mut self, tag: Tag, data: impl Into<Vec<u8>>) -> &mut Self {
        self.tables.insert(tag, data.into());
        self
    }

    /// Remove the table with this tag, if present.
    pub fn remove(&mut self, tag: Tag) -> &mut Self {
        self.tables.remove(&tag);
        self
    }

    /// Returns `true` if the builder contains a table with this tag.
    pub fn contains(&self, tag: Tag) -> bool {
        self.tables.contains_key(&tag)
    }

    /// Assemble all the tables into a binary font file with a [Table Directory].
    ///
    /// [Table Directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn build(&self) -> Vec<u8> {
        self.build_at(0)
    }

    /// Assemble the font as if it began at `base` within a larger file.
    ///
    /// Table offsets are relative to the start of the file, so fonts inside
    /// a collection are built with the position of their table directory.
    pub fn build_at(&self, base: u32) -> Vec<u8> {
        let header_len = HEADER_LEN + self.tables.len() * TABLE_RECORD_LEN;
        let (search_range, entry_selector, range_shift) = search_range(self.tables.len());
        let mut directory = BeBuffer::new()
            .push(self.sfnt_version)
            .push(self.tables.len() as u16)
            .push(search_range)
            .push(entry_selector)
            .push(range_shift);

        let mut position = base + header_len as u32;
        for (tag, data) in &self.tables {
            let (checksum, padding) = checksum_and_padding(data);
            directory = directory
                .push(*tag)
                .push(checksum)
                .push(position)
                .push(data.len() as u32);
            position += data.len() as u32 + padding;
        }

        let mut data = directory.into_vec();
        for table in self.tables.values() {
            data.extend_from_slice(table);
            let rem = round4(table.len()) - table.len();
            data.extend_from_slice(&[0u8; 4][..rem]);
        }
        data
    }

    /// Minimal [head](https://learn.microsoft.com/en-us/typography/opentype/spec/head) table
    /// with short loca offsets.
    pub fn head_table(units_per_em: u16) -> Vec<u8> {
        HeadBuilder {
            units_per_em,
            ..Default::default()
        }
        .build()
    }

    /// Minimal [hhea](https://learn.microsoft.com/en-us/typography/opentype/spec/hhea) table.
    pub fn hhea_table(number_of_h_metrics: u16) -> Vec<u8> {
        HheaBuilder {
            number_of_long_metrics: number_of_h_metrics,
            ..Default::default()
        }
        .build()
    }

    /// Version 0.5 [maxp](https://learn.microsoft.com/en-us/typography/opentype/spec/maxp) table.
    pub fn maxp_table(num_glyphs: u16) -> Vec<u8> {
        be_buffer! { 0x00005000u32, num_glyphs }.into_vec()
    }
}

/// Fields of the `head` table that fixtures care about.
#[derive(Clone, Debug)]
pub struct HeadBuilder {
    pub font_revision: Fixed,
    pub flags: u16,
    pub units_per_em: u16,
    pub bbox: [i16; 4],
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
    pub index_to_loc_format: i16,
}

impl Default for HeadBuilder {
    fn default() -> Self {
        Self {
            font_revision: Fixed::ONE,
            flags: 0x000B,
            units_per_em: 1000,
            bbox: [0; 4],
            mac_style: 0,
            lowest_rec_ppem: 8,
            index_to_loc_format: 0,
        }
    }
}

impl HeadBuilder {
    pub fn build(&self) -> Vec<u8> {
        let [x_min, y_min, x_max, y_max] = self.bbox;
        be_buffer! {
            1u16, 0u16,               // version
            (self.font_revision),
            0u32,                     // checksum adjustment
            0x5F0F3CF5u32,            // magic
            (self.flags),
            (self.units_per_em),
            [0u32, 0, 0, 0],          // created, modified
            x_min, y_min, x_max, y_max,
            (self.mac_style),
            (self.lowest_rec_ppem),
            2i16,                     // font direction hint
            (self.index_to_loc_format),
            0i16                      // glyph data format
        }
        .into_vec()
    }
}

/// Fields of the `hhea` and `vhea` tables.
#[derive(Clone, Debug, Default)]
pub struct HheaBuilder {
    /// Version 1.0 for hhea; 1.1 for vhea uses the same layout.
    pub minor_version: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_max: u16,
    pub min_leading_bearing: i16,
    pub min_trailing_bearing: i16,
    pub max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub number_of_long_metrics: u16,
}

impl HheaBuilder {
    pub fn build(&self) -> Vec<u8> {
        be_buffer! {
            1u16,
            (self.minor_version),
            (self.ascender),
            (self.descender),
            (self.line_gap),
            (self.advance_max),
            (self.min_leading_bearing),
            (self.min_trailing_bearing),
            (self.max_extent),
            (self.caret_slope_rise),
            (self.caret_slope_run),
            0i16,                 // caret offset
            [0i16, 0, 0, 0],      // reserved
            0i16,                 // metric data format
            (self.number_of_long_metrics)
        }
        .into_vec()
    }
}

/// Build a `hmtx`/`vmtx` table from (advance, side bearing) pairs.
///
/// Trailing glyphs sharing the final advance are written as bare side
/// bearings after the first `num_long` entries.
pub fn metrics_table(metrics: &[(u16, i16)], num_long: usize) -> Vec<u8> {
    let mut buf = BeBuffer::new();
    for (i, (advance, bearing)) in metrics.iter().enumerate() {
        if i < num_long {
            buf = buf.push(*advance);
        }
        buf = buf.push(*bearing);
    }
    buf.into_vec()
}

/// Assemble a font collection from fonts that are still in builder form.
pub fn collection(fonts: &[FontBuilder]) -> Vec<u8> {
    let header = fonts
        .iter()
        .fold(
            be_buffer! { TTC_HEADER_TAG, 1u16, 0u16, (fonts.len() as u32) },
            |buf, _| buf.push(0u32),
        )
        .into_vec();
    let mut data = header;
    for (i, font) in fonts.iter().enumerate() {
        let base = data.len() as u32;
        data[12 + i * 4..16 + i * 4].copy_from_slice(&base.to_be_bytes());
        data.extend(font.build_at(base));
    }
    data
}

fn search_range(num_tables: usize) -> (u16, u16, u16) {
    if num_tables == 0 {
        return (0, 0, 0);
    }
    let entry_selector = num_tables.ilog2();
    let search_range = (1usize << entry_selector) * TABLE_RECORD_LEN;
    let range_shift = num_tables * TABLE_RECORD_LEN - search_range;
    (search_range as u16, entry_selector as u16, range_shift as u16)
}

/// <https://github.com/google/woff2/blob/a0d0ed7da27b708c0a4e96ad7a998bddc933c06e/src/round.h#L19>
fn round4(sz: usize) -> usize {
    (sz + 3) & !3
}

fn checksum_and_padding(table: &[u8]) -> (u32, u32) {
    let checksum = table.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    });
    let padding = round4(table.len()) - table.len();
    (checksum, padding as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_binary_search_assists() {
        // Based on Roboto's num tables
        assert_eq!(search_range(0x16), (256, 4, 96));
        assert_eq!(search_range(3), (32, 1, 16));
    }

    #[test]
    fn survives_no_tables() {
        assert_eq!(FontBuilder::default().build().len(), HEADER_LEN);
    }

    #[test]
    fn pad4() {
        for i in 0..10 {
            let pad = checksum_and_padding(&vec![0; i]).1;
            assert!(pad < 4);
            assert!((i + pad as usize) % 4 == 0, "pad {i} +{pad} bytes");
        }
    }

    #[test]
    fn collection_offsets_are_absolute() {
        let font = FontBuilder::with_required_tables(1);
        let data = collection(&[font.clone(), font]);
        let second = u32::from_be_bytes(data[16..20].try_into().unwrap()) as usize;
        // first table record of the second font points past its own directory
        let first_table_offset =
            u32::from_be_bytes(data[second + 20..second + 24].try_into().unwrap()) as usize;
        assert_eq!(first_table_offset, second + HEADER_LEN + 3 * TABLE_RECORD_LEN);
    }
}
