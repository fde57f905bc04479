//! Loading and decomposition of glyph outlines.
//!
//! Outlines come from either the `glyf` table (quadratic curves, possibly
//! composed from other glyphs and varied by `gvar`) or the `CFF` table
//! (cubic curves built by Type 2 charstrings). Both are exposed through a
//! single [`OutlineGlyphCollection`], which delivers path commands to a
//! [`Pen`].
//!
//! # Example
//!
//! ```rust
//! # use sfnt_outline::{instance::{LocationRef, Size}, raw::FontRef, GlyphId, MetadataProvider};
//! # fn wrapper(font: &FontRef) {
//! let outlines = font.outline_glyphs();
//! let mut events = vec![];
//! if let Some(glyph) = outlines.get(GlyphId::new(2)) {
//!     let metrics = glyph
//!         .draw(Size::unscaled(), LocationRef::default(), &mut events)
//!         .unwrap();
//!     println!("{} commands in {:?}", events.len(), metrics.bounds);
//! }
//! # }
//! ```

mod cff;
mod error;
mod glyf;
mod path;
mod pen;

use raw::{types::GlyphId, TableProvider};

pub use error::{CffError, DrawError, ReadError, ToPathError};
pub use pen::{NullPen, SvgPen};
pub use raw::types::{OutlineEvent, Pen};

use crate::{
    instance::{LocationRef, Size},
    metrics::BoundingBox,
};

/// Format of the outlines of a font.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OutlineGlyphFormat {
    /// Quadratic outlines from `glyf`.
    Glyf,
    /// Cubic outlines from `CFF`.
    Cff,
}

/// Metrics computed while drawing a glyph.
///
/// Both values reflect the requested size and location.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct AdjustedMetrics {
    /// Control box of the emitted path, or `None` for an empty glyph.
    pub bounds: Option<BoundingBox>,
    /// Advance width, or `None` if the font has no horizontal metrics.
    pub advance_width: Option<f32>,
}

/// The outline of a single glyph.
#[derive(Clone)]
pub struct OutlineGlyph<'a> {
    collection: OutlineGlyphCollection<'a>,
    glyph_id: GlyphId,
}

impl<'a> OutlineGlyph<'a> {
    pub fn glyph_id(&self) -> GlyphId {
        self.glyph_id
    }

    pub fn format(&self) -> Option<OutlineGlyphFormat> {
        self.collection.format()
    }

    /// Sends the outline to `pen` and returns the resulting metrics.
    ///
    /// Each contour begins with a move, ends with a close and, for `glyf`
    /// outlines, includes an explicit segment back to its start.
    pub fn draw(
        &self,
        size: Size,
        location: impl Into<LocationRef<'a>>,
        pen: &mut impl Pen,
    ) -> Result<AdjustedMetrics, DrawError> {
        self.collection.draw(self.glyph_id, size, location, pen)
    }
}

#[derive(Clone)]
enum OutlineSource<'a> {
    None,
    Glyf(glyf::Outlines<'a>),
    Cff(cff::Outlines<'a>),
}

/// Collection of the glyph outlines of a font.
///
/// `glyf` is preferred when a font has both `glyf` and `CFF` tables.
#[derive(Clone)]
pub struct OutlineGlyphCollection<'a> {
    source: OutlineSource<'a>,
}

impl<'a> OutlineGlyphCollection<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        let source = if let Some(glyf) = glyf::Outlines::new(font) {
            OutlineSource::Glyf(glyf)
        } else if let Some(cff) = cff::Outlines::new(font) {
            OutlineSource::Cff(cff)
        } else {
            OutlineSource::None
        };
        Self { source }
    }

    /// Returns `None` if the font has no outlines.
    pub fn format(&self) -> Option<OutlineGlyphFormat> {
        match &self.source {
            OutlineSource::None => None,
            OutlineSource::Glyf(_) => Some(OutlineGlyphFormat::Glyf),
            OutlineSource::Cff(_) => Some(OutlineGlyphFormat::Cff),
        }
    }

    /// Number of glyphs with outlines.
    pub fn glyph_count(&self) -> u32 {
        match &self.source {
            OutlineSource::None => 0,
            OutlineSource::Glyf(glyf) => glyf.glyph_count(),
            OutlineSource::Cff(cff) => cff.glyph_count(),
        }
    }

    /// Returns the outline of the glyph, or `None` if the identifier is out
    /// of range.
    pub fn get(&self, glyph_id: GlyphId) -> Option<OutlineGlyph<'a>> {
        (glyph_id.to_u32() < self.glyph_count()).then(|| OutlineGlyph {
            collection: self.clone(),
            glyph_id,
        })
    }

    /// Iterates over every glyph in order.
    pub fn iter(&self) -> impl Iterator<Item = OutlineGlyph<'a>> + 'a + Clone {
        let collection = self.clone();
        (0..self.glyph_count().min(u16::MAX as u32 + 1)).filter_map(move |gid| {
            collection.get(GlyphId::new(gid as u16))
        })
    }

    /// Sends the outline of the glyph to `pen`.
    ///
    /// The location is ignored by `CFF` outlines.
    pub fn draw(
        &self,
        glyph_id: GlyphId,
        size: Size,
        location: impl Into<LocationRef<'a>>,
        pen: &mut impl Pen,
    ) -> Result<AdjustedMetrics, DrawError> {
        let location = location.into();
        match &self.source {
            OutlineSource::None => Err(DrawError::NoSources),
            OutlineSource::Glyf(glyf) => glyf.draw(glyph_id, size, location.coords(), pen),
            OutlineSource::Cff(cff) => cff.draw(glyph_id, size, pen),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataProvider;
    use kurbo::{BezPath, Shape};
    use pretty_assertions::assert_eq;
    use raw::{types::Tag, FontRef};
    use sfnt_test_data::{cff as cff_data, glyf_a, variable};

    /// Collects commands into a kurbo path.
    struct BezPen(BezPath);

    impl Pen for BezPen {
        fn move_to(&mut self, x: f32, y: f32) {
            self.0.move_to((x as f64, y as f64));
        }

        fn line_to(&mut self, x: f32, y: f32) {
            self.0.line_to((x as f64, y as f64));
        }

        fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
            self.0.quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
        }

        fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
            self.0.curve_to(
                (cx0 as f64, cy0 as f64),
                (cx1 as f64, cy1 as f64),
                (x as f64, y as f64),
            );
        }

        fn close(&mut self) {
            self.0.close_path();
        }
    }

    fn glyph_a_events() -> (Vec<OutlineEvent>, AdjustedMetrics) {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let mut events = vec![];
        let metrics = font
            .outline_glyphs()
            .draw(
                GlyphId::new(glyf_a::GLYPH_A),
                Size::unscaled(),
                LocationRef::default(),
                &mut events,
            )
            .unwrap();
        (events, metrics)
    }

    #[test]
    fn glyph_a() {
        let (events, metrics) = glyph_a_events();
        assert_eq!(events.len(), 20);
        let bounds = metrics.bounds.unwrap();
        assert_eq!(
            [bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max],
            [3.0, 0.0, 541.0, 656.0]
        );
        assert_eq!(metrics.advance_width, Some(544.0));
        // outer contour: lines only, closed back to its start
        assert_eq!(events[0], OutlineEvent::MoveTo { x: 3.0, y: 0.0 });
        assert_eq!(events[8], OutlineEvent::LineTo { x: 3.0, y: 0.0 });
        assert_eq!(events[9], OutlineEvent::ClosePath);
        // inner contour: the off curve run implies a midpoint
        assert_eq!(
            events[13],
            OutlineEvent::QuadTo {
                cx0: 350.0,
                cy0: 350.0,
                x: 335.0,
                y: 415.0
            }
        );
        assert_eq!(events[19], OutlineEvent::ClosePath);
    }

    #[test]
    fn svg_of_glyph_a() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let glyph = font.outline_glyphs().get(GlyphId::new(glyf_a::GLYPH_A)).unwrap();
        let mut pen = SvgPen::new();
        glyph
            .draw(Size::unscaled(), LocationRef::default(), &mut pen)
            .unwrap();
        assert!(pen
            .as_str()
            .starts_with("M3,0 L88,0 L143,185 L399,185 L453,0 L541,0 L318,656 L226,656 L3,0 Z"));
        assert!(pen
            .as_str()
            .ends_with("Q200,350 180,300 L172,276 L164,253 Z"));
    }

    #[test]
    fn bounds_agree_with_kurbo() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let outlines = font.outline_glyphs();
        let mut pen = BezPen(BezPath::new());
        let metrics = outlines
            .draw(
                GlyphId::new(glyf_a::GLYPH_A),
                Size::unscaled(),
                LocationRef::default(),
                &mut pen,
            )
            .unwrap();
        let control = pen.0.control_box();
        let bounds = metrics.bounds.unwrap();
        assert_eq!(
            [control.x0, control.y0, control.x1, control.y1],
            [
                bounds.x_min as f64,
                bounds.y_min as f64,
                bounds.x_max as f64,
                bounds.y_max as f64
            ]
        );
        // the exact bounds of the curves are inside the control box
        let exact = pen.0.bounding_box();
        assert!(exact.x0 >= control.x0 && exact.y1 <= control.y1);
    }

    #[test]
    fn scaled_glyph_a() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let metrics = font
            .outline_glyphs()
            .draw(
                GlyphId::new(glyf_a::GLYPH_A),
                Size::new(2000.0),
                LocationRef::default(),
                &mut NullPen,
            )
            .unwrap();
        let bounds = metrics.bounds.unwrap();
        assert_eq!(
            [bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max],
            [6.0, 0.0, 1082.0, 1312.0]
        );
        assert_eq!(metrics.advance_width, Some(1088.0));
    }

    #[test]
    fn repeated_draws_are_identical() {
        assert_eq!(glyph_a_events(), glyph_a_events());
    }

    #[test]
    fn collection_queries() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let outlines = font.outline_glyphs();
        assert_eq!(outlines.format(), Some(OutlineGlyphFormat::Glyf));
        assert_eq!(outlines.glyph_count(), glyf_a::NUM_GLYPHS as u32);
        assert!(outlines.get(GlyphId::new(glyf_a::NUM_GLYPHS)).is_none());
        assert_eq!(outlines.iter().count(), glyf_a::NUM_GLYPHS as usize);
        assert_eq!(
            outlines
                .draw(
                    GlyphId::new(glyf_a::NUM_GLYPHS),
                    Size::unscaled(),
                    LocationRef::default(),
                    &mut NullPen
                )
                .unwrap_err(),
            DrawError::GlyphNotFound(GlyphId::new(glyf_a::NUM_GLYPHS))
        );
        let space = outlines.get(GlyphId::new(glyf_a::GLYPH_SPACE)).unwrap();
        let mut events = vec![];
        let metrics = space
            .draw(Size::unscaled(), LocationRef::default(), &mut events)
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(metrics.bounds, None);
        assert_eq!(metrics.advance_width, Some(200.0));
    }

    #[test]
    fn format_selection() {
        let data = cff_data::font();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.outline_glyphs().format(), Some(OutlineGlyphFormat::Cff));
        assert_eq!(font.outline_glyphs().glyph_count(), cff_data::NUM_GLYPHS as u32);
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.outline_glyphs().format(), Some(OutlineGlyphFormat::Glyf));
    }

    #[test]
    fn no_outlines() {
        let mut builder = glyf_a::builder();
        builder.remove(Tag::new(b"glyf"));
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        let outlines = font.outline_glyphs();
        assert_eq!(outlines.format(), None);
        assert!(outlines.get(GlyphId::new(1)).is_none());
        assert_eq!(
            outlines
                .draw(
                    GlyphId::new(1),
                    Size::unscaled(),
                    LocationRef::default(),
                    &mut NullPen
                )
                .unwrap_err(),
            DrawError::NoSources
        );
    }

    #[test]
    fn every_glyph_has_valid_bounds() {
        for data in [glyf_a::font(), cff_data::font(), variable::font()] {
            let font = FontRef::new(&data).unwrap();
            for glyph in font.outline_glyphs().iter() {
                let Ok(metrics) = glyph.draw(Size::unscaled(), LocationRef::default(), &mut NullPen)
                else {
                    continue;
                };
                if let Some(bounds) = metrics.bounds {
                    assert!(bounds.x_min <= bounds.x_max && bounds.y_min <= bounds.y_max);
                }
            }
        }
    }
}
