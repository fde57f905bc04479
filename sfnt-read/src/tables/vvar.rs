//! The [VVAR (Vertical Metrics Variation)](https://docs.microsoft.com/en-us/typography/opentype/spec/vvar) table

use types::{F2Dot14, Fixed, GlyphId, MajorMinor, Tag};

use super::variations::{self, DeltaSetIndexMap, ItemVariationStore};
use crate::{FontData, FontRead, ReadError};

/// 'VVAR'
pub const TAG: Tag = Tag::new(b"VVAR");

/// The [VVAR](https://docs.microsoft.com/en-us/typography/opentype/spec/vvar) table.
#[derive(Clone, Copy)]
pub struct Vvar<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Vvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: MajorMinor = data.read_at(0)?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major as i64));
        }
        data.read_at::<u32>(20)?;
        Ok(Self { data })
    }
}

impl<'a> Vvar<'a> {
    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    pub fn item_variation_store(&self) -> Result<ItemVariationStore<'a>, ReadError> {
        variations::resolve_offset(self.data, 4).ok_or(ReadError::NullOffset)?
    }

    pub fn advance_height_mapping(&self) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        variations::resolve_offset(self.data, 8)
    }

    pub fn tsb_mapping(&self) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        variations::resolve_offset(self.data, 12)
    }

    pub fn bsb_mapping(&self) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        variations::resolve_offset(self.data, 16)
    }

    pub fn v_org_mapping(&self) -> Option<Result<DeltaSetIndexMap<'a>, ReadError>> {
        variations::resolve_offset(self.data, 20)
    }

    /// Returns the advance height delta for the specified glyph identifier and
    /// normalized variation coordinates.
    pub fn advance_height_delta(
        &self,
        glyph_id: GlyphId,
        coords: &[F2Dot14],
    ) -> Result<Fixed, ReadError> {
        variations::advance_delta(
            self.advance_height_mapping(),
            self.item_variation_store(),
            glyph_id,
            coords,
        )
    }

    /// Returns the top side bearing delta for the specified glyph identifier and
    /// normalized variation coordinates.
    pub fn tsb_delta(&self, glyph_id: GlyphId, coords: &[F2Dot14]) -> Result<Fixed, ReadError> {
        variations::item_delta(
            self.tsb_mapping(),
            self.item_variation_store(),
            glyph_id,
            coords,
        )
    }

    /// Returns the bottom side bearing delta for the specified glyph identifier and
    /// normalized variation coordinates.
    pub fn bsb_delta(&self, glyph_id: GlyphId, coords: &[F2Dot14]) -> Result<Fixed, ReadError> {
        variations::item_delta(
            self.bsb_mapping(),
            self.item_variation_store(),
            glyph_id,
            coords,
        )
    }

    /// Returns the vertical origin delta for the specified glyph identifier and
    /// normalized variation coordinates.
    pub fn v_org_delta(&self, glyph_id: GlyphId, coords: &[F2Dot14]) -> Result<Fixed, ReadError> {
        variations::item_delta(
            self.v_org_mapping(),
            self.item_variation_store(),
            glyph_id,
            coords,
        )
    }
}

impl core::fmt::Debug for Vvar<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Vvar")
            .field("version", &self.version())
            .field("item_variation_store", &self.item_variation_store())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::{be_buffer, variable};

    use super::*;

    #[test]
    fn mapped_deltas() {
        let store = variable::item_variation_store(&[-20, 40]);
        let store_offset = 24u32;
        let map_offset = store_offset + store.len() as u32;
        // every glyph uses item 1; four inner index bits
        let map = be_buffer! { 0u8, 0x03u8, 1u16, 1u8 };
        let data = be_buffer! {
            1u16, 0u16,
            store_offset,
            0u32,
            map_offset,
            0u32,
            map_offset
        }
        .extend_bytes(&store)
        .extend_bytes(&map);
        let vvar = Vvar::read(FontData::new(&data)).unwrap();
        let max = [F2Dot14::ONE];
        let gid = GlyphId::new(3);
        // no advance mapping: the glyph id is the inner index
        assert_eq!(
            vvar.advance_height_delta(GlyphId::new(1), &max).unwrap(),
            Fixed::from_i32(40)
        );
        assert_eq!(vvar.tsb_delta(gid, &max).unwrap(), Fixed::from_i32(40));
        assert_eq!(vvar.v_org_delta(gid, &max).unwrap(), Fixed::from_i32(40));
        assert!(vvar.bsb_delta(gid, &max).is_err());
    }
}
