//! The shared layout of the `hhea` and `vhea` tables.

use crate::{FontData, FontRead, ReadError};

/// The [hhea](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea)
/// and [vhea](https://docs.microsoft.com/en-us/typography/opentype/spec/vhea)
/// tables.
///
/// In `vhea` the ascender and descender are the distances from the vertical
/// centerline, and the bearings are top and bottom bearings.
#[derive(Clone, Copy)]
pub struct HVhea<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for HVhea<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        if data.len() < Self::LEN {
            return Err(ReadError::OutOfBounds);
        }
        Ok(Self { data })
    }
}

impl<'a> HVhea<'a> {
    const LEN: usize = 36;

    pub fn major_version(&self) -> u16 {
        self.data.read_at(0).unwrap_or_default()
    }

    pub fn minor_version(&self) -> u16 {
        self.data.read_at(2).unwrap_or_default()
    }

    /// Typographic ascent.
    pub fn ascender(&self) -> i16 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// Typographic descent.
    pub fn descender(&self) -> i16 {
        self.data.read_at(6).unwrap_or_default()
    }

    /// Typographic line gap.
    pub fn line_gap(&self) -> i16 {
        self.data.read_at(8).unwrap_or_default()
    }

    /// Maximum advance in the metrics table.
    pub fn advance_max(&self) -> u16 {
        self.data.read_at(10).unwrap_or_default()
    }

    pub fn min_leading_bearing(&self) -> i16 {
        self.data.read_at(12).unwrap_or_default()
    }

    pub fn min_trailing_bearing(&self) -> i16 {
        self.data.read_at(14).unwrap_or_default()
    }

    pub fn max_extent(&self) -> i16 {
        self.data.read_at(16).unwrap_or_default()
    }

    pub fn caret_slope_rise(&self) -> i16 {
        self.data.read_at(18).unwrap_or_default()
    }

    pub fn caret_slope_run(&self) -> i16 {
        self.data.read_at(20).unwrap_or_default()
    }

    pub fn caret_offset(&self) -> i16 {
        self.data.read_at(22).unwrap_or_default()
    }

    pub fn metric_data_format(&self) -> i16 {
        self.data.read_at(32).unwrap_or_default()
    }

    /// Number of entries with an advance in the `hmtx`/`vmtx` table.
    pub fn number_of_long_metrics(&self) -> u16 {
        self.data.read_at(34).unwrap_or_default()
    }
}

impl core::fmt::Debug for HVhea<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HVhea")
            .field("ascender", &self.ascender())
            .field("descender", &self.descender())
            .field("line_gap", &self.line_gap())
            .field("advance_max", &self.advance_max())
            .field("number_of_long_metrics", &self.number_of_long_metrics())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::builder::HheaBuilder;

    use super::*;

    #[test]
    fn fields() {
        let data = HheaBuilder {
            ascender: 984,
            descender: -273,
            line_gap: 12,
            advance_max: 2000,
            caret_slope_rise: 1,
            number_of_long_metrics: 3,
            ..Default::default()
        }
        .build();
        let hhea = HVhea::read(FontData::new(&data)).unwrap();
        assert_eq!(hhea.major_version(), 1);
        assert_eq!(hhea.ascender(), 984);
        assert_eq!(hhea.descender(), -273);
        assert_eq!(hhea.line_gap(), 12);
        assert_eq!(hhea.advance_max(), 2000);
        assert_eq!(hhea.caret_slope_rise(), 1);
        assert_eq!(hhea.number_of_long_metrics(), 3);
        assert!(HVhea::read(FontData::new(&data[..35])).is_err());
    }
}
