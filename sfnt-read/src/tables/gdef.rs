//! the [GDEF] table
//!
//! [GDEF]: https://docs.microsoft.com/en-us/typography/opentype/spec/gdef

use types::{BigEndian, GlyphId, MajorMinor, Tag};

pub use super::layout::{ClassDef, CoverageTable};
use crate::{FontData, FontRead, ReadError};

/// 'GDEF'
pub const TAG: Tag = Tag::new(b"GDEF");

/// Glyph classes assigned by the glyph class definition table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlyphClass {
    Base,
    Ligature,
    Mark,
    Component,
}

impl GlyphClass {
    /// Class values outside `1..=4` are unassigned.
    pub fn new(raw: u16) -> Option<Self> {
        match raw {
            1 => Some(Self::Base),
            2 => Some(Self::Ligature),
            3 => Some(Self::Mark),
            4 => Some(Self::Component),
            _ => None,
        }
    }
}

/// The [Glyph Definition Table](https://docs.microsoft.com/en-us/typography/opentype/spec/gdef#gdef-header)
#[derive(Clone, Copy)]
pub struct Gdef<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Gdef<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: MajorMinor = data.read_at(0)?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major as i64));
        }
        // attach list and ligature caret list are not read, but the
        // header must be present
        data.read_at::<u16>(10)?;
        Ok(Self { data })
    }
}

impl<'a> Gdef<'a> {
    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    fn resolve<T: FontRead<'a>>(&self, offset: usize) -> Option<Result<T, ReadError>> {
        match offset {
            0 => None,
            offset => Some(
                self.data
                    .split_off(offset)
                    .ok_or(ReadError::OutOfBounds)
                    .and_then(T::read),
            ),
        }
    }

    pub fn glyph_class_def_offset(&self) -> u16 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// Glyph class definitions, if present.
    pub fn glyph_class_def(&self) -> Option<Result<ClassDef<'a>, ReadError>> {
        self.resolve(self.glyph_class_def_offset() as usize)
    }

    pub fn mark_attach_class_def_offset(&self) -> u16 {
        self.data.read_at(10).unwrap_or_default()
    }

    /// Mark attachment class definitions, if present.
    pub fn mark_attach_class_def(&self) -> Option<Result<ClassDef<'a>, ReadError>> {
        self.resolve(self.mark_attach_class_def_offset() as usize)
    }

    /// Offset to the mark glyph sets definition; version 1.2 and later.
    pub fn mark_glyph_sets_def_offset(&self) -> Option<u16> {
        (self.version() >= MajorMinor::VERSION_1_2)
            .then(|| self.data.read_at(12).ok())
            .flatten()
    }

    pub fn mark_glyph_sets_def(&self) -> Option<Result<MarkGlyphSets<'a>, ReadError>> {
        self.resolve(self.mark_glyph_sets_def_offset()? as usize)
    }

    /// The class of the glyph, or `None` if unassigned or the class
    /// definition is missing.
    pub fn glyph_class(&self, gid: GlyphId) -> Option<GlyphClass> {
        let class_def = self.glyph_class_def()?.ok()?;
        GlyphClass::new(class_def.get(gid))
    }

    /// The mark attachment class of the glyph; 0 when not assigned.
    pub fn mark_attachment_class(&self, gid: GlyphId) -> u16 {
        match self.mark_attach_class_def() {
            Some(Ok(class_def)) => class_def.get(gid),
            _ => 0,
        }
    }

    /// Returns true if the glyph is in the mark glyph set at `set_index`.
    pub fn is_mark_glyph(&self, gid: GlyphId, set_index: u16) -> bool {
        let Some(Ok(sets)) = self.mark_glyph_sets_def() else {
            return false;
        };
        sets.coverage(set_index)
            .and_then(|coverage| coverage.ok())
            .is_some_and(|coverage| coverage.get(gid).is_some())
    }
}

impl core::fmt::Debug for Gdef<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Gdef")
            .field("version", &self.version())
            .field("glyph_class_def_offset", &self.glyph_class_def_offset())
            .field(
                "mark_attach_class_def_offset",
                &self.mark_attach_class_def_offset(),
            )
            .field(
                "mark_glyph_sets_def_offset",
                &self.mark_glyph_sets_def_offset(),
            )
            .finish()
    }
}

/// Mark glyph sets: one coverage table per set.
#[derive(Clone, Copy, Debug)]
pub struct MarkGlyphSets<'a> {
    data: FontData<'a>,
    coverage_offsets: &'a [BigEndian<u32>],
}

impl<'a> FontRead<'a> for MarkGlyphSets<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        let count: u16 = cursor.read()?;
        Ok(Self {
            data,
            coverage_offsets: cursor.read_array(count as usize)?,
        })
    }
}

impl<'a> MarkGlyphSets<'a> {
    pub fn mark_glyph_set_count(&self) -> u16 {
        self.coverage_offsets.len() as u16
    }

    pub fn coverage(&self, index: u16) -> Option<Result<CoverageTable<'a>, ReadError>> {
        let offset = self.coverage_offsets.get(index as usize)?.get();
        Some(
            self.data
                .split_off(offset as usize)
                .ok_or(ReadError::OutOfBounds)
                .and_then(CoverageTable::read),
        )
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::tables::{class_def1, class_def2, coverage1, coverage2, gdef_table};

    use super::*;

    #[test]
    fn glyph_classes() {
        let data = gdef_table(
            &class_def2(&[(1, 3, 1), (4, 4, 3), (5, 5, 9)]),
            &class_def1(4, &[2]),
            &[coverage1(&[4, 6]), coverage2(&[(10, 12)])],
        );
        let gdef = Gdef::read(FontData::new(&data)).unwrap();
        assert_eq!(gdef.version(), MajorMinor::VERSION_1_2);
        assert_eq!(gdef.glyph_class(GlyphId::new(0)), None);
        assert_eq!(gdef.glyph_class(GlyphId::new(2)), Some(GlyphClass::Base));
        assert_eq!(gdef.glyph_class(GlyphId::new(4)), Some(GlyphClass::Mark));
        // out of range class values are unassigned
        assert_eq!(gdef.glyph_class(GlyphId::new(5)), None);
        assert_eq!(gdef.mark_attachment_class(GlyphId::new(4)), 2);
        assert_eq!(gdef.mark_attachment_class(GlyphId::new(3)), 0);
        assert!(gdef.is_mark_glyph(GlyphId::new(6), 0));
        assert!(!gdef.is_mark_glyph(GlyphId::new(5), 0));
        assert!(gdef.is_mark_glyph(GlyphId::new(11), 1));
        assert!(!gdef.is_mark_glyph(GlyphId::new(11), 2));
    }

    #[test]
    fn missing_subtables() {
        let data = gdef_table(&[], &[], &[]);
        let gdef = Gdef::read(FontData::new(&data)).unwrap();
        assert!(gdef.glyph_class_def().is_none());
        assert!(gdef.mark_attach_class_def().is_none());
        assert_eq!(gdef.glyph_class(GlyphId::new(1)), None);
        assert_eq!(gdef.mark_attachment_class(GlyphId::new(1)), 0);
        assert!(!gdef.is_mark_glyph(GlyphId::new(1), 0));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serde_glyph_class() {
        let json = serde_json::to_string(&GlyphClass::Mark).unwrap();
        assert_eq!(json, "\"Mark\"");
        let class: GlyphClass = serde_json::from_str(&json).unwrap();
        assert_eq!(class, GlyphClass::Mark);
    }
}
