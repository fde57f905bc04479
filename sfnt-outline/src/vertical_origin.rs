//! Vertical origins of glyphs for vertical layout.

use raw::{
    tables::{mvar::tags, vorg::Vorg},
    types::GlyphId,
    TableProvider,
};

use crate::instance::{LocationRef, Size};

/// The y coordinate of the vertical origin of each glyph.
///
/// Origins listed in `VORG` take priority. Every other glyph has its origin
/// on the ascender: the one in `vhea` when present, otherwise the one in
/// `hhea`, with any `MVAR` delta for the location applied.
#[derive(Clone)]
pub struct VerticalOrigins<'a> {
    vorg: Option<Vorg<'a>>,
    glyph_count: u32,
    ascender: Option<f32>,
    scale: f32,
}

impl<'a> VerticalOrigins<'a> {
    pub fn new(
        font: &impl TableProvider<'a>,
        size: Size,
        location: impl Into<LocationRef<'a>>,
    ) -> Self {
        let upem = font
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or_default();
        let scale = size.linear_scale(upem);
        let coords = location.into().coords();
        let ascender = match font.vhea() {
            Ok(vhea) => Some((vhea.ascender(), tags::VASC)),
            Err(_) => font.hhea().ok().map(|hhea| (hhea.ascender(), tags::HASC)),
        }
        .map(|(ascender, tag)| {
            let delta = match font.mvar() {
                Ok(mvar) if !coords.is_empty() => mvar
                    .metric_delta(tag, coords)
                    .unwrap_or_default()
                    .to_f32(),
                _ => 0.0,
            };
            (ascender as f32 + delta) * scale
        });
        Self {
            vorg: font.vorg().ok(),
            glyph_count: font
                .maxp()
                .map(|maxp| maxp.num_glyphs() as u32)
                .unwrap_or_default(),
            ascender,
            scale,
        }
    }

    /// Returns true if the origins come from a `VORG` table.
    pub fn has_vorg(&self) -> bool {
        self.vorg.is_some()
    }

    /// Returns `None` when the glyph is out of range or the font has neither
    /// `VORG` nor a header table with an ascender.
    pub fn y_origin(&self, glyph_id: GlyphId) -> Option<f32> {
        if glyph_id.to_u32() >= self.glyph_count {
            return None;
        }
        match &self.vorg {
            Some(vorg) => Some(vorg.vertical_origin_y(glyph_id) as f32 * self.scale),
            None => self.ascender,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataProvider;
    use raw::FontRef;
    use sfnt_test_data::{cff, composite, glyf_a, variable};

    #[test]
    fn origins_from_vorg() {
        let data = cff::font();
        let font = FontRef::new(&data).unwrap();
        let origins = font.vertical_origins(Size::unscaled(), LocationRef::default());
        assert!(origins.has_vorg());
        assert_eq!(
            origins.y_origin(GlyphId::new(cff::GLYPH_A)),
            Some(cff::VORG_A as f32)
        );
        assert_eq!(
            origins.y_origin(GlyphId::new(cff::GLYPH_CURVE)),
            Some(cff::VORG_DEFAULT as f32)
        );
        assert_eq!(origins.y_origin(GlyphId::new(cff::NUM_GLYPHS)), None);
        let scaled = font.vertical_origins(Size::new(2000.0), LocationRef::default());
        assert_eq!(
            scaled.y_origin(GlyphId::new(cff::GLYPH_A)),
            Some(cff::VORG_A as f32 * 2.0)
        );
    }

    #[test]
    fn origins_from_vertical_ascender() {
        let data = composite::font();
        let font = FontRef::new(&data).unwrap();
        let origins = font.vertical_origins(Size::unscaled(), LocationRef::default());
        assert!(!origins.has_vorg());
        // the vhea ascender, shared by every glyph
        for gid in [composite::GLYPH_SQUARE, composite::GLYPH_OFFSET] {
            assert_eq!(origins.y_origin(GlyphId::new(gid)), Some(500.0));
        }
        let scaled = font.vertical_origins(Size::new(2000.0), LocationRef::default());
        assert_eq!(
            scaled.y_origin(GlyphId::new(composite::GLYPH_SQUARE)),
            Some(1000.0)
        );
    }

    #[test]
    fn origins_from_horizontal_ascender() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let origins = font.vertical_origins(Size::unscaled(), LocationRef::default());
        assert_eq!(origins.y_origin(GlyphId::new(glyf_a::GLYPH_A)), Some(984.0));
        assert_eq!(origins.y_origin(GlyphId::new(glyf_a::NUM_GLYPHS)), None);
    }

    #[test]
    fn ascender_follows_mvar() {
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        let location = font.axes().location([("wght", 900.0)]);
        let origins = font.vertical_origins(Size::unscaled(), &location);
        assert_eq!(
            origins.y_origin(GlyphId::new(variable::GLYPH_SQUARE)),
            Some((variable::ASCENDER + variable::ASCENDER_DELTA) as f32)
        );
    }
}
