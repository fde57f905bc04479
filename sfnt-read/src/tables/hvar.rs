//! The [HVAR (Horizontal Metrics Variation)](https://docs.microsoft.com/en-us/typography/opentype/spec/hvar) table

use types::{F2Dot14, Fixed, GlyphId, MajorMinor, Tag};

use super::variations::{self, DeltaSetIndexMap, ItemVariationStore};
use crate::{FontData, FontRead, ReadError};

/// 'HVAR'
pub const TAG: Tag = Tag::new(b"HVAR");

/// The [HVAR](https://docs.microsoft.com/en-us/typography/opentype/spec/hvar) table.
#[derive(Clone, Copy)]
pub struct Hvar<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Hvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: MajorMinor = data.read_at(0)?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major as i64));
        }
        // rsb mapping offset is the last header field
        data.read_at::<u32>(16)?;
        Ok(Self { data })
    }
}

impl<'a> Hvar<'a> {
    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    pub fn item_variation_store(&self) -> Result<ItemVariationStore<'a>, ReadError> {
        variations::resolve_offset(self.data, 4).ok_or(ReadError::NullOffset)?
    }

    pub fn advance_width_mapping(&self) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        variations::resolve_offset(self.data, 8)
    }

    pub fn lsb_mapping(&self) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        variations::resolve_offset(self.data, 12)
    }

    pub fn rsb_mapping(&self) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        variations::resolve_offset(self.data, 16)
    }

    /// Returns the advance width delta for the specified glyph identifier and
    /// normalized variation coordinates.
    pub fn advance_width_delta(
        &self,
        glyph_id: GlyphId,
        coords: &[F2Dot14],
    ) -> Result<Fixed, ReadError> {
        variations::advance_delta(
            self.advance_width_mapping(),
            self.item_variation_store(),
            glyph_id,
            coords,
        )
    }

    /// Returns the left side bearing delta for the specified glyph identifier and
    /// normalized variation coordinates.
    pub fn lsb_delta(&self, glyph_id: GlyphId, coords: &[F2Dot14]) -> Result<Fixed, ReadError> {
        variations::item_delta(
            self.lsb_mapping(),
            self.item_variation_store(),
            glyph_id,
            coords,
        )
    }

    /// Returns the right side bearing delta for the specified glyph identifier and
    /// normalized variation coordinates.
    pub fn rsb_delta(&self, glyph_id: GlyphId, coords: &[F2Dot14]) -> Result<Fixed, ReadError> {
        variations::item_delta(
            self.rsb_mapping(),
            self.item_variation_store(),
            glyph_id,
            coords,
        )
    }
}

impl core::fmt::Debug for Hvar<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hvar")
            .field("version", &self.version())
            .field("item_variation_store", &self.item_variation_store())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::variable;
    use types::{F2Dot14, Fixed, GlyphId};

    use super::*;

    #[test]
    fn advance_deltas() {
        let data = variable::hvar_table();
        let hvar = Hvar::read(FontData::new(&data)).unwrap();
        let gid = GlyphId::new(variable::GLYPH_SQUARE);
        let delta = |coord: f32| {
            hvar.advance_width_delta(gid, &[F2Dot14::from_f32(coord), F2Dot14::ZERO])
                .unwrap()
        };
        assert_eq!(delta(1.0), Fixed::from_i32(variable::ADVANCE_DELTA as i32));
        assert_eq!(delta(0.5), Fixed::from_i32(25));
        assert_eq!(delta(0.0), Fixed::ZERO);
        assert_eq!(delta(-1.0), Fixed::ZERO);
        // glyph 0 maps to the zero delta set
        assert_eq!(
            hvar.advance_width_delta(GlyphId::NOTDEF, &[F2Dot14::ONE])
                .unwrap(),
            Fixed::ZERO
        );
    }

    #[test]
    fn side_bearings_need_a_mapping() {
        let data = variable::hvar_table();
        let hvar = Hvar::read(FontData::new(&data)).unwrap();
        assert!(hvar.lsb_mapping().is_none());
        assert_eq!(
            hvar.lsb_delta(GlyphId::new(1), &[F2Dot14::ONE]),
            Err(ReadError::NullOffset)
        );
        assert!(hvar.rsb_delta(GlyphId::new(1), &[F2Dot14::ONE]).is_err());
    }
}
