//! The [OS/2](https://docs.microsoft.com/en-us/typography/opentype/spec/os2) table

use types::Tag;

use crate::{FontData, FontRead, ReadError};

/// 'OS/2'
pub const TAG: Tag = Tag::new(b"OS/2");

/// The `fsSelection` field of the OS/2 table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SelectionFlags(u16);

impl SelectionFlags {
    pub const ITALIC: Self = Self(0x0001);
    pub const UNDERSCORE: Self = Self(0x0002);
    pub const NEGATIVE: Self = Self(0x0004);
    pub const OUTLINED: Self = Self(0x0008);
    pub const STRIKEOUT: Self = Self(0x0010);
    pub const BOLD: Self = Self(0x0020);
    pub const REGULAR: Self = Self(0x0040);
    /// Use the typographic metrics for line layout (version 4+).
    pub const USE_TYPO_METRICS: Self = Self(0x0080);
    pub const WWS: Self = Self(0x0100);
    /// The font is an oblique rather than italic design (version 4+).
    pub const OBLIQUE: Self = Self(0x0200);

    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & 0x03FF)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl core::ops::BitOr for SelectionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The [OS/2](https://docs.microsoft.com/en-us/typography/opentype/spec/os2)
/// (OS/2 and Windows Metrics) table.
///
/// Fields added after version 0 return `None` for earlier versions.
#[derive(Clone, Copy)]
pub struct Os2<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Os2<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: u16 = data.read_at(0)?;
        let len = match version {
            0 => 78,
            1 => 86,
            2..=4 => 96,
            _ => 100,
        };
        if data.len() < len {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Self { data })
    }
}

impl<'a> Os2<'a> {
    fn field<T: types::Scalar + Default>(&self, offset: usize) -> T {
        self.data.read_at(offset).unwrap_or_default()
    }

    fn versioned<T: types::Scalar>(&self, min_version: u16, offset: usize) -> Option<T> {
        (self.version() >= min_version)
            .then(|| self.data.read_at(offset).ok())
            .flatten()
    }

    pub fn version(&self) -> u16 {
        self.field(0)
    }

    pub fn x_avg_char_width(&self) -> i16 {
        self.field(2)
    }

    /// Visual weight, 1 to 1000.
    pub fn us_weight_class(&self) -> u16 {
        self.field(4)
    }

    /// Relative change from the normal aspect ratio, 1 to 9.
    pub fn us_width_class(&self) -> u16 {
        self.field(6)
    }

    /// Font embedding licensing rights.
    pub fn fs_type(&self) -> u16 {
        self.field(8)
    }

    pub fn y_subscript_x_size(&self) -> i16 {
        self.field(10)
    }

    pub fn y_subscript_y_size(&self) -> i16 {
        self.field(12)
    }

    pub fn y_subscript_x_offset(&self) -> i16 {
        self.field(14)
    }

    pub fn y_subscript_y_offset(&self) -> i16 {
        self.field(16)
    }

    pub fn y_superscript_x_size(&self) -> i16 {
        self.field(18)
    }

    pub fn y_superscript_y_size(&self) -> i16 {
        self.field(20)
    }

    pub fn y_superscript_x_offset(&self) -> i16 {
        self.field(22)
    }

    pub fn y_superscript_y_offset(&self) -> i16 {
        self.field(24)
    }

    pub fn y_strikeout_size(&self) -> i16 {
        self.field(26)
    }

    pub fn y_strikeout_position(&self) -> i16 {
        self.field(28)
    }

    pub fn s_family_class(&self) -> i16 {
        self.field(30)
    }

    pub fn panose_10(&self) -> &'a [u8] {
        self.data.as_bytes().get(32..42).unwrap_or_default()
    }

    pub fn ul_unicode_range_1(&self) -> u32 {
        self.field(42)
    }

    pub fn ul_unicode_range_2(&self) -> u32 {
        self.field(46)
    }

    pub fn ul_unicode_range_3(&self) -> u32 {
        self.field(50)
    }

    pub fn ul_unicode_range_4(&self) -> u32 {
        self.field(54)
    }

    pub fn ach_vend_id(&self) -> Tag {
        self.field(58)
    }

    pub fn fs_selection(&self) -> SelectionFlags {
        SelectionFlags::from_bits_truncate(self.field(62))
    }

    pub fn us_first_char_index(&self) -> u16 {
        self.field(64)
    }

    pub fn us_last_char_index(&self) -> u16 {
        self.field(66)
    }

    pub fn s_typo_ascender(&self) -> i16 {
        self.field(68)
    }

    pub fn s_typo_descender(&self) -> i16 {
        self.field(70)
    }

    pub fn s_typo_line_gap(&self) -> i16 {
        self.field(72)
    }

    pub fn us_win_ascent(&self) -> u16 {
        self.field(74)
    }

    pub fn us_win_descent(&self) -> u16 {
        self.field(76)
    }

    pub fn ul_code_page_range_1(&self) -> Option<u32> {
        self.versioned(1, 78)
    }

    pub fn ul_code_page_range_2(&self) -> Option<u32> {
        self.versioned(1, 82)
    }

    /// Height of lowercase x, version 2 and later.
    pub fn sx_height(&self) -> Option<i16> {
        self.versioned(2, 86)
    }

    /// Height of uppercase H, version 2 and later.
    pub fn s_cap_height(&self) -> Option<i16> {
        self.versioned(2, 88)
    }

    pub fn us_default_char(&self) -> Option<u16> {
        self.versioned(2, 90)
    }

    pub fn us_break_char(&self) -> Option<u16> {
        self.versioned(2, 92)
    }

    pub fn us_max_context(&self) -> Option<u16> {
        self.versioned(2, 94)
    }

    pub fn us_lower_optical_point_size(&self) -> Option<u16> {
        self.versioned(5, 96)
    }

    pub fn us_upper_optical_point_size(&self) -> Option<u16> {
        self.versioned(5, 98)
    }
}

impl core::fmt::Debug for Os2<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Os2")
            .field("version", &self.version())
            .field("us_weight_class", &self.us_weight_class())
            .field("us_width_class", &self.us_width_class())
            .field("fs_selection", &self.fs_selection())
            .field("ach_vend_id", &self.ach_vend_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::tables::Os2Builder;

    use super::*;

    #[test]
    fn version_gated_fields() {
        for (version, has_x_height, has_optical) in [(0, false, false), (1, false, false), (3, true, false), (5, true, true)] {
            let data = Os2Builder {
                version,
                ..Default::default()
            }
            .build();
            let os2 = Os2::read(FontData::new(&data)).unwrap();
            assert_eq!(os2.sx_height().is_some(), has_x_height, "v{version}");
            assert_eq!(os2.us_lower_optical_point_size().is_some(), has_optical);
            assert_eq!(os2.ul_code_page_range_1().is_some(), version > 0);
            // truncated by one byte
            assert!(Os2::read(FontData::new(&data[..data.len() - 1])).is_err());
        }
    }

    #[test]
    fn fields() {
        let data = Os2Builder {
            version: 4,
            weight_class: 700,
            fs_selection: 0x0221,
            x_height: 486,
            ..Default::default()
        }
        .build();
        let os2 = Os2::read(FontData::new(&data)).unwrap();
        assert_eq!(os2.us_weight_class(), 700);
        assert_eq!(os2.us_width_class(), 5);
        assert_eq!(os2.y_subscript_y_offset(), 75);
        assert_eq!(os2.y_superscript_y_offset(), 350);
        assert_eq!(os2.ach_vend_id(), Tag::new(b"NONE"));
        assert_eq!(os2.panose_10().len(), 10);
        assert!(os2
            .fs_selection()
            .contains(SelectionFlags::ITALIC | SelectionFlags::BOLD | SelectionFlags::OBLIQUE));
        assert!(!os2.fs_selection().intersects(SelectionFlags::REGULAR));
        assert_eq!(os2.sx_height(), Some(486));
        assert_eq!(os2.s_cap_height(), Some(700));
    }
}
