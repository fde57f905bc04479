//! Loading PostScript outlines from the `CFF` table.

use raw::{
    tables::{cff::Cff, hvmtx::HVmtx, postscript::charstring::CommandSink},
    types::{Fixed, GlyphId, Pen},
    TableProvider,
};

use super::{pen::ControlBoxPen, AdjustedMetrics, CffError, DrawError};
use crate::instance::Size;

/// Source of CFF outlines.
///
/// Charstrings are evaluated in font units and scaled by `unitsPerEm`; the
/// `FontMatrix` of the top DICT is not applied.
#[derive(Clone)]
pub(crate) struct Outlines<'a> {
    cff: Cff<'a>,
    hmtx: Option<HVmtx<'a>>,
    glyph_count: u32,
    units_per_em: u16,
}

impl<'a> Outlines<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Option<Self> {
        let cff = font.cff().ok()?;
        let glyph_count = match cff.num_glyphs() {
            Ok(count) => count,
            Err(e) => {
                log::warn!("CFF table without usable charstrings: {e}");
                return None;
            }
        };
        Some(Self {
            cff,
            hmtx: font.hmtx().ok(),
            glyph_count,
            units_per_em: font
                .head()
                .map(|head| head.units_per_em())
                .unwrap_or_default(),
        })
    }

    pub fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    /// The advance comes from `hmtx` when present, otherwise from the
    /// width encoded in the charstring.
    pub fn draw(
        &self,
        glyph_id: GlyphId,
        size: Size,
        pen: &mut impl Pen,
    ) -> Result<AdjustedMetrics, DrawError> {
        if glyph_id.to_u32() >= self.glyph_count {
            return Err(DrawError::GlyphNotFound(glyph_id));
        }
        let scale = size.linear_scale(self.units_per_em);
        let mut sink = PenSink {
            pen: ControlBoxPen::new(pen),
            scale,
        };
        let width = self
            .cff
            .evaluate(glyph_id, &mut sink)
            .map_err(|e| match e {
                CffError::CharstringNestingDepthLimitExceeded => {
                    DrawError::RecursionLimitExceeded(glyph_id)
                }
                e => e.into(),
            })?;
        let advance = self
            .hmtx
            .as_ref()
            .and_then(|hmtx| hmtx.advance(glyph_id))
            .map(|advance| advance as f32)
            .unwrap_or_else(|| width.to_f32());
        Ok(AdjustedMetrics {
            bounds: sink.pen.bounds(),
            advance_width: Some(advance * scale),
        })
    }
}

/// Receives charstring commands and forwards them, scaled, to a pen.
struct PenSink<P> {
    pen: P,
    scale: f32,
}

impl<P> PenSink<P> {
    fn scaled(&self, value: Fixed) -> f32 {
        value.to_f32() * self.scale
    }
}

impl<P: Pen> CommandSink for PenSink<P> {
    fn move_to(&mut self, x: Fixed, y: Fixed) {
        let (x, y) = (self.scaled(x), self.scaled(y));
        self.pen.move_to(x, y);
    }

    fn line_to(&mut self, x: Fixed, y: Fixed) {
        let (x, y) = (self.scaled(x), self.scaled(y));
        self.pen.line_to(x, y);
    }

    fn curve_to(&mut self, cx0: Fixed, cy0: Fixed, cx1: Fixed, cy1: Fixed, x: Fixed, y: Fixed) {
        self.pen.curve_to(
            self.scaled(cx0),
            self.scaled(cy0),
            self.scaled(cx1),
            self.scaled(cy1),
            self.scaled(x),
            self.scaled(y),
        );
    }

    fn close(&mut self) {
        self.pen.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{instance::LocationRef, MetadataProvider};
    use pretty_assertions::assert_eq;
    use raw::{
        types::{OutlineEvent, Tag},
        FontRef,
    };
    use sfnt_test_data::cff;

    fn draw(data: &[u8], gid: u16, size: Size) -> Result<(Vec<OutlineEvent>, AdjustedMetrics), DrawError> {
        let font = FontRef::new(data).unwrap();
        let mut events = vec![];
        let metrics = font.outline_glyphs().draw(
            GlyphId::new(gid),
            size,
            LocationRef::default(),
            &mut events,
        )?;
        Ok((events, metrics))
    }

    #[test]
    fn closed_polygon() {
        let data = cff::font();
        let (events, metrics) = draw(&data, cff::GLYPH_A, Size::unscaled()).unwrap();
        assert_eq!(
            events,
            [
                OutlineEvent::MoveTo { x: 3.0, y: 0.0 },
                OutlineEvent::LineTo { x: 541.0, y: 0.0 },
                OutlineEvent::LineTo { x: 318.0, y: 656.0 },
                OutlineEvent::LineTo { x: 226.0, y: 656.0 },
                OutlineEvent::ClosePath,
            ]
        );
        let bounds = metrics.bounds.unwrap();
        assert_eq!(
            [bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max],
            [3.0, 0.0, 541.0, 656.0]
        );
        assert_eq!(metrics.advance_width, Some(544.0));
    }

    #[test]
    fn curves_and_subroutines() {
        let data = cff::font();
        let (events, metrics) = draw(&data, cff::GLYPH_CURVE, Size::unscaled()).unwrap();
        assert_eq!(
            events[1],
            OutlineEvent::CurveTo {
                cx0: 100.0,
                cy0: 0.0,
                cx1: 150.0,
                cy1: 50.0,
                x: 150.0,
                y: 150.0
            }
        );
        assert_eq!(metrics.bounds.unwrap().x_max, 150.0);
        let (events, _) = draw(&data, cff::GLYPH_SUBRS, Size::unscaled()).unwrap();
        assert_eq!(events[1], OutlineEvent::LineTo { x: 100.0, y: 0.0 });
        assert_eq!(events[2], OutlineEvent::LineTo { x: 100.0, y: 100.0 });
    }

    #[test]
    fn moveto_closes_open_contour() {
        let data = cff::font();
        let (events, _) = draw(&data, cff::GLYPH_TWO_CONTOURS, Size::unscaled()).unwrap();
        let closes = events
            .iter()
            .filter(|event| **event == OutlineEvent::ClosePath)
            .count();
        assert_eq!(closes, 2);
        assert_eq!(events[4], OutlineEvent::MoveTo { x: 60.0, y: 60.0 });
    }

    #[test]
    fn scaled_outline() {
        let data = cff::font();
        let (events, metrics) = draw(&data, cff::GLYPH_A, Size::new(500.0)).unwrap();
        assert_eq!(events[1], OutlineEvent::LineTo { x: 270.5, y: 0.0 });
        assert_eq!(metrics.advance_width, Some(272.0));
    }

    #[test]
    fn advance_from_charstring_without_hmtx() {
        let mut builder = cff::builder();
        builder.remove(Tag::new(b"hmtx"));
        let data = builder.build();
        let (_, metrics) = draw(&data, cff::GLYPH_A, Size::unscaled()).unwrap();
        assert_eq!(metrics.advance_width, Some(544.0));
        let (_, metrics) = draw(&data, cff::GLYPH_CURVE, Size::unscaled()).unwrap();
        assert_eq!(metrics.advance_width, Some(cff::DEFAULT_WIDTH as f32));
    }

    #[test]
    fn errors() {
        let data = cff::font();
        assert_eq!(
            draw(&data, cff::GLYPH_RECURSIVE_SUBR, Size::unscaled()).unwrap_err(),
            DrawError::RecursionLimitExceeded(GlyphId::new(cff::GLYPH_RECURSIVE_SUBR))
        );
        assert_eq!(
            draw(&data, cff::NUM_GLYPHS, Size::unscaled()).unwrap_err(),
            DrawError::GlyphNotFound(GlyphId::new(cff::NUM_GLYPHS))
        );
    }
}
