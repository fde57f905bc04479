//! The [VORG (Vertical Origin)](https://docs.microsoft.com/en-us/typography/opentype/spec/vorg) table.

use types::{BigEndian, GlyphId, MajorMinor, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'VORG'
pub const TAG: Tag = Tag::new(b"VORG");

/// A vertical origin for a single glyph.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct VertOriginYMetrics {
    pub glyph_index: BigEndian<GlyphId>,
    pub vert_origin_y: BigEndian<i16>,
}

impl VertOriginYMetrics {
    pub fn glyph_index(&self) -> GlyphId {
        self.glyph_index.get()
    }

    pub fn vert_origin_y(&self) -> i16 {
        self.vert_origin_y.get()
    }
}

/// The vertical origin table, used by CFF fonts set vertically.
#[derive(Clone, Copy)]
pub struct Vorg<'a> {
    data: FontData<'a>,
    vert_origin_y_metrics: &'a [VertOriginYMetrics],
}

impl<'a> FontRead<'a> for Vorg<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: MajorMinor = data.read_at(0)?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major as i64));
        }
        let count: u16 = data.read_at(6)?;
        let vert_origin_y_metrics = data.read_array(8..8 + count as usize * 4)?;
        Ok(Self {
            data,
            vert_origin_y_metrics,
        })
    }
}

impl<'a> Vorg<'a> {
    pub fn default_vert_origin_y(&self) -> i16 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// Records sorted by glyph id.
    pub fn vert_origin_y_metrics(&self) -> &'a [VertOriginYMetrics] {
        self.vert_origin_y_metrics
    }

    /// Returns the y coordinate of the of the glyph's vertical origin.
    pub fn vertical_origin_y(&self, glyph_id: GlyphId) -> i16 {
        let metrics = self.vert_origin_y_metrics;
        match metrics.binary_search_by(|rec| rec.glyph_index().cmp(&glyph_id)) {
            Ok(ix) => metrics
                .get(ix)
                .map(|metric| metric.vert_origin_y())
                .unwrap_or_default(),
            _ => self.default_vert_origin_y(),
        }
    }
}

impl core::fmt::Debug for Vorg<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Vorg")
            .field("default_vert_origin_y", &self.default_vert_origin_y())
            .field("vert_origin_y_metrics", &self.vert_origin_y_metrics.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::be_buffer;

    use super::*;

    #[test]
    fn vertical_origins() {
        let data = be_buffer! { 1u16, 0u16, 880i16, 2u16, 1u16, 867i16, 3u16, 824i16 };
        let vorg = Vorg::read(FontData::new(&data)).unwrap();
        // Glyphs 1 and 3 have entries while 0 and 2 use the default value
        // of 880
        assert_eq!(vorg.vertical_origin_y(GlyphId::new(0)), 880);
        assert_eq!(vorg.vertical_origin_y(GlyphId::new(1)), 867);
        assert_eq!(vorg.vertical_origin_y(GlyphId::new(2)), 880);
        assert_eq!(vorg.vertical_origin_y(GlyphId::new(3)), 824);
        assert!(Vorg::read(FontData::new(&data[..14])).is_err());
    }
}
