//! The Horizontal/Vertical Metrics tables.
//!
//! The [hmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx)
//! and [vmtx](https://docs.microsoft.com/en-us/typography/opentype/spec/vmtx)
//! tables have the same structure and so we define them in the same module.

use types::{BigEndian, GlyphId};

use crate::{FontData, FontReadWithArgs, ReadArgs, ReadError};

/// An advance paired with a side bearing.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct LongMetric {
    pub advance: BigEndian<u16>,
    pub side_bearing: BigEndian<i16>,
}

impl LongMetric {
    pub fn advance(&self) -> u16 {
        self.advance.get()
    }

    pub fn side_bearing(&self) -> i16 {
        self.side_bearing.get()
    }
}

/// The `hmtx` or `vmtx` table.
///
/// Glyphs past the last long metric share its advance and take their side
/// bearing from the trailing array.
#[derive(Clone, Copy)]
pub struct HVmtx<'a> {
    long_metrics: &'a [LongMetric],
    bearings: &'a [BigEndian<i16>],
}

impl ReadArgs for HVmtx<'_> {
    /// `numberOfLongMetrics` from the header table.
    type Args = u16;
}

impl<'a> FontReadWithArgs<'a> for HVmtx<'a> {
    fn read_with_args(data: FontData<'a>, number_of_long_metrics: &u16) -> Result<Self, ReadError> {
        let long_len = *number_of_long_metrics as usize * 4;
        let long_metrics = data.read_array(0..long_len)?;
        // a stray trailing byte is ignored
        let bearings_end = long_len + (data.len().saturating_sub(long_len) & !1);
        let bearings = data.read_array(long_len..bearings_end)?;
        Ok(Self {
            long_metrics,
            bearings,
        })
    }
}

impl<'a> HVmtx<'a> {
    pub fn long_metrics(&self) -> &'a [LongMetric] {
        self.long_metrics
    }

    /// Side bearings of the glyphs without a long metric.
    pub fn bearings(&self) -> &'a [BigEndian<i16>] {
        self.bearings
    }

    /// Returns the advance for the given glyph.
    ///
    /// Glyphs past the long metrics use the final advance. The caller is
    /// responsible for checking the glyph id against the glyph count.
    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        let ix = glyph_id.to_u16() as usize;
        self.long_metrics
            .get(ix)
            .or_else(|| self.long_metrics.last())
            .map(LongMetric::advance)
    }

    /// Returns the side bearing for the given glyph.
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        let ix = glyph_id.to_u16() as usize;
        match self.long_metrics.get(ix) {
            Some(metric) => Some(metric.side_bearing()),
            None => self
                .bearings
                .get(ix - self.long_metrics.len())
                .map(BigEndian::get),
        }
    }
}

impl core::fmt::Debug for HVmtx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HVmtx")
            .field("long_metrics", &self.long_metrics.len())
            .field("bearings", &self.bearings.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::builder::metrics_table;

    use super::*;

    #[test]
    fn trailing_glyphs_repeat_last_advance() {
        let data = metrics_table(&[(500, 50), (200, 0), (544, 3), (544, -7), (544, 9)], 3);
        let hmtx = HVmtx::read_with_args(FontData::new(&data), &3).unwrap();
        assert_eq!(hmtx.long_metrics().len(), 3);
        assert_eq!(hmtx.bearings().len(), 2);
        let gid = GlyphId::new;
        assert_eq!(hmtx.advance(gid(0)), Some(500));
        assert_eq!(hmtx.side_bearing(gid(2)), Some(3));
        assert_eq!(hmtx.advance(gid(4)), Some(544));
        assert_eq!(hmtx.side_bearing(gid(3)), Some(-7));
        assert_eq!(hmtx.side_bearing(gid(4)), Some(9));
        assert_eq!(hmtx.side_bearing(gid(5)), None);
    }

    #[test]
    fn no_long_metrics() {
        let data = metrics_table(&[(0, 4)], 0);
        let hmtx = HVmtx::read_with_args(FontData::new(&data), &0).unwrap();
        assert_eq!(hmtx.advance(GlyphId::new(0)), None);
        assert_eq!(hmtx.side_bearing(GlyphId::new(0)), Some(4));
    }

    #[test]
    fn long_metrics_must_fit() {
        let data = metrics_table(&[(10, 1), (20, 2)], 2);
        assert!(HVmtx::read_with_args(FontData::new(&data), &3).is_err());
        let odd = [0u8, 10, 0, 1, 0];
        let hmtx = HVmtx::read_with_args(FontData::new(&odd), &1).unwrap();
        assert!(hmtx.bearings().is_empty());
    }
}
