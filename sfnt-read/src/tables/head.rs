//! The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head) table

use types::{BoundingBox, Fixed, MajorMinor, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'head'
pub const TAG: Tag = Tag::new(b"head");

/// The smallest and largest units per em accepted in a font.
pub const UNITS_PER_EM_RANGE: core::ops::RangeInclusive<u16> = 16..=16384;

/// The `macStyle` field of the [head] table.
///
/// [head]: https://docs.microsoft.com/en-us/typography/opentype/spec/head
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MacStyle(u16);

impl MacStyle {
    pub const BOLD: Self = Self(0x0001);
    pub const ITALIC: Self = Self(0x0002);
    pub const UNDERLINE: Self = Self(0x0004);
    pub const OUTLINE: Self = Self(0x0008);
    pub const SHADOW: Self = Self(0x0010);
    pub const CONDENSED: Self = Self(0x0020);
    pub const EXTENDED: Self = Self(0x0040);

    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & 0x7F)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for MacStyle {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// The [head](https://docs.microsoft.com/en-us/typography/opentype/spec/head)
/// (font header) table.
#[derive(Clone, Copy)]
pub struct Head<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Head<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < Self::LEN {
            return Err(ReadError::OutOfBounds);
        }
        let head = Self { data };
        if !UNITS_PER_EM_RANGE.contains(&head.units_per_em()) {
            return Err(ReadError::MalformedData("units per em out of range"));
        }
        Ok(head)
    }
}

impl<'a> Head<'a> {
    const LEN: usize = 54;

    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    /// Set by font manufacturer.
    pub fn font_revision(&self) -> Fixed {
        self.data.read_at(4).unwrap_or_default()
    }

    pub fn checksum_adjustment(&self) -> u32 {
        self.data.read_at(8).unwrap_or_default()
    }

    pub fn magic_number(&self) -> u32 {
        self.data.read_at(12).unwrap_or_default()
    }

    pub fn flags(&self) -> u16 {
        self.data.read_at(16).unwrap_or_default()
    }

    /// Between 16 and 16384; validated when the table is read.
    pub fn units_per_em(&self) -> u16 {
        self.data.read_at(18).unwrap_or_default()
    }

    pub fn x_min(&self) -> i16 {
        self.data.read_at(36).unwrap_or_default()
    }

    pub fn y_min(&self) -> i16 {
        self.data.read_at(38).unwrap_or_default()
    }

    pub fn x_max(&self) -> i16 {
        self.data.read_at(40).unwrap_or_default()
    }

    pub fn y_max(&self) -> i16 {
        self.data.read_at(42).unwrap_or_default()
    }

    /// The bounding box over all glyphs.
    pub fn bounds(&self) -> BoundingBox<i16> {
        BoundingBox {
            x_min: self.x_min(),
            y_min: self.y_min(),
            x_max: self.x_max(),
            y_max: self.y_max(),
        }
    }

    pub fn mac_style(&self) -> MacStyle {
        MacStyle::from_bits_truncate(self.data.read_at(44).unwrap_or_default())
    }

    /// Smallest readable size in pixels.
    pub fn lowest_rec_ppem(&self) -> u16 {
        self.data.read_at(46).unwrap_or_default()
    }

    pub fn font_direction_hint(&self) -> i16 {
        self.data.read_at(48).unwrap_or_default()
    }

    /// 0 for short offsets (Offset16), 1 for long (Offset32).
    pub fn index_to_loc_format(&self) -> i16 {
        self.data.read_at(50).unwrap_or_default()
    }

    pub fn glyph_data_format(&self) -> i16 {
        self.data.read_at(52).unwrap_or_default()
    }
}

impl core::fmt::Debug for Head<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Head")
            .field("version", &self.version())
            .field("font_revision", &self.font_revision())
            .field("units_per_em", &self.units_per_em())
            .field("bounds", &self.bounds())
            .field("mac_style", &self.mac_style())
            .field("index_to_loc_format", &self.index_to_loc_format())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::builder::HeadBuilder;

    use super::*;

    #[test]
    fn smoke_test() {
        let data = HeadBuilder {
            font_revision: Fixed::from_f64(2.8),
            units_per_em: 4096,
            bbox: [-100, -50, 400, 711],
            mac_style: 3,
            index_to_loc_format: 1,
            ..Default::default()
        }
        .build();
        let head = Head::read(FontData::new(&data)).unwrap();
        assert_eq!(head.version(), MajorMinor::VERSION_1_0);
        assert_eq!(head.font_revision(), Fixed::from_f64(2.8));
        assert_eq!(head.units_per_em(), 4096);
        assert_eq!(head.magic_number(), 0x5F0F3CF5);
        assert_eq!(head.y_min(), -50);
        assert_eq!(head.bounds().x_max, 400);
        assert!(head.mac_style().contains(MacStyle::BOLD | MacStyle::ITALIC));
        assert_eq!(head.index_to_loc_format(), 1);
    }

    #[test]
    fn units_per_em_is_range_checked() {
        for (upem, ok) in [(15, false), (16, true), (16384, true), (16385, false), (0, false)] {
            let data = HeadBuilder {
                units_per_em: upem,
                ..Default::default()
            }
            .build();
            assert_eq!(Head::read(FontData::new(&data)).is_ok(), ok, "{upem}");
        }
    }

    #[test]
    fn truncated() {
        let data = HeadBuilder::default().build();
        assert!(Head::read(FontData::new(&data[..53])).is_err());
    }
}
