//! The [maxp](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) table

use types::{Tag, Version16Dot16};

use crate::{FontData, FontRead, ReadError};

/// 'maxp'
pub const TAG: Tag = Tag::new(b"maxp");

/// The maximum profile table.
///
/// Version 0.5 holds only the glyph count; version 1.0 adds limits used by
/// TrueType hinting.
#[derive(Clone, Copy)]
pub struct Maxp<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Maxp<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: Version16Dot16 = data.read_at(0)?;
        let len = match version {
            Version16Dot16::VERSION_0_5 => 6,
            Version16Dot16::VERSION_1_0 => 32,
            other => return Err(ReadError::InvalidFormat(other.to_bits() as i64)),
        };
        if data.len() < len {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Self { data })
    }
}

impl<'a> Maxp<'a> {
    pub fn version(&self) -> Version16Dot16 {
        self.data
            .read_at(0)
            .unwrap_or(Version16Dot16::VERSION_0_5)
    }

    /// The number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.data.read_at(4).unwrap_or_default()
    }

    fn v1_field(&self, offset: usize) -> Option<u16> {
        (self.version() == Version16Dot16::VERSION_1_0)
            .then(|| self.data.read_at(offset).ok())
            .flatten()
    }

    /// Maximum points in a non-composite glyph.
    pub fn max_points(&self) -> Option<u16> {
        self.v1_field(6)
    }

    /// Maximum contours in a non-composite glyph.
    pub fn max_contours(&self) -> Option<u16> {
        self.v1_field(8)
    }

    pub fn max_composite_points(&self) -> Option<u16> {
        self.v1_field(10)
    }

    pub fn max_composite_contours(&self) -> Option<u16> {
        self.v1_field(12)
    }

    pub fn max_zones(&self) -> Option<u16> {
        self.v1_field(14)
    }

    pub fn max_twilight_points(&self) -> Option<u16> {
        self.v1_field(16)
    }

    pub fn max_storage(&self) -> Option<u16> {
        self.v1_field(18)
    }

    pub fn max_function_defs(&self) -> Option<u16> {
        self.v1_field(20)
    }

    pub fn max_instruction_defs(&self) -> Option<u16> {
        self.v1_field(22)
    }

    pub fn max_stack_elements(&self) -> Option<u16> {
        self.v1_field(24)
    }

    pub fn max_size_of_instructions(&self) -> Option<u16> {
        self.v1_field(26)
    }

    /// Maximum number of components referenced at the top level of a
    /// composite glyph.
    pub fn max_component_elements(&self) -> Option<u16> {
        self.v1_field(28)
    }

    /// Maximum levels of recursion in composite glyphs.
    pub fn max_component_depth(&self) -> Option<u16> {
        self.v1_field(30)
    }
}

impl core::fmt::Debug for Maxp<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Maxp")
            .field("version", &self.version())
            .field("num_glyphs", &self.num_glyphs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::{be_buffer, builder::FontBuilder};

    use super::*;

    #[test]
    fn version_0_5() {
        let data = FontBuilder::maxp_table(7);
        let maxp = Maxp::read(FontData::new(&data)).unwrap();
        assert_eq!(maxp.version(), Version16Dot16::VERSION_0_5);
        assert_eq!(maxp.num_glyphs(), 7);
        assert_eq!(maxp.max_points(), None);
    }

    #[test]
    fn version_1_0() {
        let data = be_buffer! {
            0x00010000u32, 3u16,
            [40u16, 2, 0, 0, 2, 0, 0, 0, 0, 0, 0, 4, 1]
        };
        let maxp = Maxp::read(FontData::new(&data)).unwrap();
        assert_eq!(maxp.num_glyphs(), 3);
        assert_eq!(maxp.max_points(), Some(40));
        assert_eq!(maxp.max_contours(), Some(2));
        assert_eq!(maxp.max_component_elements(), Some(4));
        assert_eq!(maxp.max_component_depth(), Some(1));
        assert!(Maxp::read(FontData::new(&data[..30])).is_err());
    }

    #[test]
    fn unknown_version() {
        let data = be_buffer! { 0x00020000u32, 3u16 };
        assert_eq!(
            Maxp::read(FontData::new(&data)).err(),
            Some(ReadError::InvalidFormat(0x00020000))
        );
    }
}
