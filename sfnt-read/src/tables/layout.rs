//! OpenType Layout common table formats
//!
//! Only the glyph classification tables are read here; lookups, features
//! and scripts belong to shaping and are not parsed.

use types::{BigEndian, GlyphId};

use crate::{FontData, FontRead, ReadError};

/// Part of [ClassDef] format 2 and [CoverageTable] format 2.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct RangeRecord {
    pub start_glyph_id: BigEndian<u16>,
    pub end_glyph_id: BigEndian<u16>,
    /// The class for a class definition or the start coverage index for
    /// a coverage table.
    pub value: BigEndian<u16>,
}

impl RangeRecord {
    pub fn start_glyph_id(&self) -> GlyphId {
        GlyphId::new(self.start_glyph_id.get())
    }

    pub fn end_glyph_id(&self) -> GlyphId {
        GlyphId::new(self.end_glyph_id.get())
    }

    pub fn value(&self) -> u16 {
        self.value.get()
    }

    fn contains(&self, gid: u16) -> bool {
        (self.start_glyph_id.get()..=self.end_glyph_id.get()).contains(&gid)
    }

    fn iter(&self) -> impl Iterator<Item = GlyphId> + '_ {
        (self.start_glyph_id.get()..=self.end_glyph_id.get()).map(GlyphId::new)
    }
}

/// Binary search for the range containing `gid` in records sorted by
/// start glyph.
fn find_range(records: &[RangeRecord], gid: u16) -> Option<&RangeRecord> {
    let ix = records
        .binary_search_by(|rec| {
            if rec.end_glyph_id.get() < gid {
                core::cmp::Ordering::Less
            } else if rec.start_glyph_id.get() > gid {
                core::cmp::Ordering::Greater
            } else {
                core::cmp::Ordering::Equal
            }
        })
        .ok()?;
    records.get(ix).filter(|rec| rec.contains(gid))
}

/// A [class definition](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#class-definition-table) table.
#[derive(Clone, Copy, Debug)]
pub enum ClassDef<'a> {
    Format1 {
        start_glyph_id: u16,
        class_values: &'a [BigEndian<u16>],
    },
    Format2 {
        class_range_records: &'a [RangeRecord],
    },
}

impl<'a> FontRead<'a> for ClassDef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        match format {
            1 => {
                let start_glyph_id = cursor.read()?;
                let count: u16 = cursor.read()?;
                Ok(Self::Format1 {
                    start_glyph_id,
                    class_values: cursor.read_array(count as usize)?,
                })
            }
            2 => {
                let count: u16 = cursor.read()?;
                Ok(Self::Format2 {
                    class_range_records: cursor.read_array(count as usize)?,
                })
            }
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

impl ClassDef<'_> {
    /// Get the class for this glyph id. Glyphs not covered are class 0.
    pub fn get(&self, gid: GlyphId) -> u16 {
        let gid = gid.to_u16();
        match self {
            Self::Format1 {
                start_glyph_id,
                class_values,
            } => gid
                .checked_sub(*start_glyph_id)
                .and_then(|ix| class_values.get(ix as usize))
                .map(|class| class.get())
                .unwrap_or(0),
            Self::Format2 {
                class_range_records,
            } => find_range(class_range_records, gid)
                .map(RangeRecord::value)
                .unwrap_or(0),
        }
    }

    /// Iterate over each glyph with an explicitly assigned class.
    pub fn iter(&self) -> impl Iterator<Item = (GlyphId, u16)> + '_ {
        let (iter1, iter2) = match self {
            Self::Format1 {
                start_glyph_id,
                class_values,
            } => {
                let start = *start_glyph_id as u32;
                let iter = class_values.iter().enumerate().filter_map(move |(i, class)| {
                    let gid = u16::try_from(start + i as u32).ok()?;
                    Some((GlyphId::new(gid), class.get()))
                });
                (Some(iter), None)
            }
            Self::Format2 {
                class_range_records,
            } => {
                let iter = class_range_records
                    .iter()
                    .flat_map(|rec| rec.iter().map(|gid| (gid, rec.value())));
                (None, Some(iter))
            }
        };
        iter1
            .into_iter()
            .flatten()
            .chain(iter2.into_iter().flatten())
    }
}

/// A [coverage](https://learn.microsoft.com/en-us/typography/opentype/spec/chapter2#coverage-table) table.
#[derive(Clone, Copy, Debug)]
pub enum CoverageTable<'a> {
    Format1 {
        glyph_array: &'a [BigEndian<u16>],
    },
    Format2 {
        range_records: &'a [RangeRecord],
    },
}

impl<'a> FontRead<'a> for CoverageTable<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        let count: u16 = cursor.read()?;
        match format {
            1 => Ok(Self::Format1 {
                glyph_array: cursor.read_array(count as usize)?,
            }),
            2 => Ok(Self::Format2 {
                range_records: cursor.read_array(count as usize)?,
            }),
            other => Err(ReadError::InvalidFormat(other as i64)),
        }
    }
}

impl CoverageTable<'_> {
    /// If this glyph is in the coverage table, returns its index
    pub fn get(&self, gid: GlyphId) -> Option<u16> {
        let gid = gid.to_u16();
        match self {
            Self::Format1 { glyph_array } => glyph_array
                .binary_search_by(|entry| entry.get().cmp(&gid))
                .ok()
                .map(|ix| ix as u16),
            Self::Format2 { range_records } => {
                let record = find_range(range_records, gid)?;
                Some(record.value().wrapping_add(gid - record.start_glyph_id.get()))
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = GlyphId> + '_ {
        // all one expression so that we have a single return type
        let (iter1, iter2) = match self {
            Self::Format1 { glyph_array } => {
                (Some(glyph_array.iter().map(|g| GlyphId::new(g.get()))), None)
            }
            Self::Format2 { range_records } => {
                let iter = range_records.iter().flat_map(RangeRecord::iter);
                (None, Some(iter))
            }
        };

        iter1
            .into_iter()
            .flatten()
            .chain(iter2.into_iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::tables::{class_def1, class_def2, coverage1, coverage2};

    use super::*;

    #[test]
    fn class_def_format_1() {
        let data = class_def1(10, &[1, 0, 3]);
        let class_def = ClassDef::read(FontData::new(&data)).unwrap();
        assert_eq!(class_def.get(GlyphId::new(9)), 0);
        assert_eq!(class_def.get(GlyphId::new(10)), 1);
        assert_eq!(class_def.get(GlyphId::new(12)), 3);
        assert_eq!(class_def.get(GlyphId::new(13)), 0);
        assert_eq!(class_def.iter().count(), 3);
    }

    #[test]
    fn class_def_format_2() {
        let data = class_def2(&[(2, 4, 1), (8, 8, 3), (20, 30, 2)]);
        let class_def = ClassDef::read(FontData::new(&data)).unwrap();
        for (gid, class) in [(1, 0), (2, 1), (4, 1), (5, 0), (8, 3), (25, 2), (31, 0)] {
            assert_eq!(class_def.get(GlyphId::new(gid)), class, "glyph {gid}");
        }
        assert_eq!(class_def.iter().count(), 3 + 1 + 11);
    }

    #[test]
    fn coverage() {
        let data = coverage1(&[3, 7, 9]);
        let coverage = CoverageTable::read(FontData::new(&data)).unwrap();
        assert_eq!(coverage.get(GlyphId::new(7)), Some(1));
        assert_eq!(coverage.get(GlyphId::new(8)), None);

        let data = coverage2(&[(5, 7), (10, 11)]);
        let coverage = CoverageTable::read(FontData::new(&data)).unwrap();
        assert_eq!(coverage.get(GlyphId::new(6)), Some(1));
        assert_eq!(coverage.get(GlyphId::new(11)), Some(4));
        assert_eq!(coverage.get(GlyphId::new(9)), None);
        let glyphs: Vec<_> = coverage.iter().map(|gid| gid.to_u16()).collect();
        assert_eq!(glyphs, [5, 6, 7, 10, 11]);
    }

    #[test]
    fn unknown_format() {
        let data = [0u8, 3, 0, 0];
        assert!(matches!(
            ClassDef::read(FontData::new(&data)),
            Err(ReadError::InvalidFormat(3))
        ));
    }
}
