//! Global font and glyph specific metrics.
//!
//! Global metrics apply to every glyph: units per em, the line metrics that
//! position the baseline, decoration and script offsets. Glyph metrics
//! (advances, side bearings and bounds) apply to a single glyph.
//!
//! Both take a [`Size`], which sets the scale factor applied to every value,
//! and a [`LocationRef`] selecting a position in the design space of a
//! variable font. Static fonts ignore the location, so
//! `LocationRef::default()` is the usual argument there.

use raw::{
    tables::{
        glyf::Glyf,
        gvar::Gvar,
        hvar::Hvar,
        hvmtx::HVmtx,
        loca::Loca,
        os2::{Os2, SelectionFlags},
        vvar::Vvar,
    },
    types::{Fixed, GlyphId, Point},
    TableProvider,
};

use crate::{
    instance::{LocationRef, Size},
    NormalizedCoord,
};

/// Bounding box with single precision coordinates.
pub type BoundingBox = raw::types::BoundingBox<f32>;

/// Position and thickness of an underline or strikeout.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct LineMetrics {
    /// Offset of the top of the line from the baseline.
    pub position: f32,
    pub thickness: f32,
}

/// Size and offset of subscript or superscript glyphs.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct ScriptMetrics {
    pub x_size: f32,
    pub y_size: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

/// Metrics that apply to all glyphs in a font.
///
/// Sources:
/// * `head`: `units_per_em`, `bounds`
/// * `maxp`: `glyph_count`
/// * `post`: `is_monospace`, `italic_angle`, `underline`
/// * `OS/2`: `average_width`, `cap_height`, `x_height`, `strikeout`,
///   `subscript`, `superscript`, plus the line metrics when the
///   `USE_TYPO_METRICS` flag is set or `hhea` has none
/// * `hhea`: `max_width` and the line metrics otherwise
///
/// Variable fonts apply `MVAR` deltas at the requested location.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Metrics {
    pub units_per_em: u16,
    pub glyph_count: u16,
    /// True if the `post` table marks the font as monospaced.
    pub is_monospace: bool,
    /// Counter-clockwise degrees from the vertical; negative for text that
    /// leans right.
    pub italic_angle: f32,
    /// Distance from the baseline to the top of the line.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line. Usually
    /// negative.
    pub descent: f32,
    /// Additional spacing between lines.
    pub leading: f32,
    pub cap_height: Option<f32>,
    pub x_height: Option<f32>,
    /// Average advance of the non-zero width glyphs.
    pub average_width: Option<f32>,
    pub max_width: Option<f32>,
    pub underline: Option<LineMetrics>,
    pub strikeout: Option<LineMetrics>,
    pub subscript: Option<ScriptMetrics>,
    pub superscript: Option<ScriptMetrics>,
    /// Union of the extents of all glyphs.
    pub bounds: Option<BoundingBox>,
}

impl Metrics {
    pub fn new<'a>(
        font: &impl TableProvider<'a>,
        size: Size,
        location: impl Into<LocationRef<'a>>,
    ) -> Self {
        let head = font.head();
        let mut metrics = Metrics {
            units_per_em: head.as_ref().map(|head| head.units_per_em()).unwrap_or_default(),
            ..Default::default()
        };
        let coords = location.into().coords();
        let scale = size.linear_scale(metrics.units_per_em);
        let scaled = |value: i32| value as f32 * scale;
        if let Ok(head) = &head {
            metrics.bounds = Some(to_f32_bounds(head.bounds()).scale(scale));
        }
        if let Ok(maxp) = font.maxp() {
            metrics.glyph_count = maxp.num_glyphs();
        }
        if let Ok(post) = font.post() {
            metrics.is_monospace = post.is_fixed_pitch() != 0;
            metrics.italic_angle = post.italic_angle().to_f32();
            metrics.underline = Some(LineMetrics {
                position: scaled(post.underline_position() as i32),
                thickness: scaled(post.underline_thickness() as i32),
            });
        }
        if let Ok(hhea) = font.hhea() {
            metrics.max_width = Some(scaled(hhea.advance_max() as i32));
        }
        let os2 = font.os2().ok();
        if let Some(os2) = &os2 {
            metrics.average_width = Some(scaled(os2.x_avg_char_width() as i32));
            metrics.cap_height = os2.s_cap_height().map(|v| scaled(v as i32));
            metrics.x_height = os2.sx_height().map(|v| scaled(v as i32));
            metrics.strikeout = Some(LineMetrics {
                position: scaled(os2.y_strikeout_position() as i32),
                thickness: scaled(os2.y_strikeout_size() as i32),
            });
            metrics.subscript = Some(ScriptMetrics {
                x_size: scaled(os2.y_subscript_x_size() as i32),
                y_size: scaled(os2.y_subscript_y_size() as i32),
                x_offset: scaled(os2.y_subscript_x_offset() as i32),
                y_offset: scaled(os2.y_subscript_y_offset() as i32),
            });
            metrics.superscript = Some(ScriptMetrics {
                x_size: scaled(os2.y_superscript_x_size() as i32),
                y_size: scaled(os2.y_superscript_y_size() as i32),
                x_offset: scaled(os2.y_superscript_x_offset() as i32),
                y_offset: scaled(os2.y_superscript_y_offset() as i32),
            });
        }
        let [ascent, descent, leading] = line_metrics(font, os2.as_ref());
        metrics.ascent = scaled(ascent);
        metrics.descent = scaled(descent);
        metrics.leading = scaled(leading);
        if let (Ok(mvar), false) = (font.mvar(), coords.is_empty()) {
            use raw::tables::mvar::tags::*;
            let delta = |tag| {
                mvar.metric_delta(tag, coords)
                    .unwrap_or_default()
                    .to_f32()
                    * scale
            };
            metrics.ascent += delta(HASC);
            metrics.descent += delta(HDSC);
            metrics.leading += delta(HLGP);
            if let Some(cap_height) = &mut metrics.cap_height {
                *cap_height += delta(CPHT);
            }
            if let Some(x_height) = &mut metrics.x_height {
                *x_height += delta(XHGT);
            }
            if let Some(underline) = &mut metrics.underline {
                underline.position += delta(UNDO);
                underline.thickness += delta(UNDS);
            }
            if let Some(strikeout) = &mut metrics.strikeout {
                strikeout.position += delta(STRO);
                strikeout.thickness += delta(STRS);
            }
        }
        metrics
    }

    /// Distance between the ascent and descent lines, excluding leading.
    pub fn height(&self) -> f32 {
        self.ascent - self.descent
    }
}

/// Chooses ascent, descent and leading in design units.
///
/// Follows FreeType: the typographic metrics when `USE_TYPO_METRICS` is
/// set, otherwise `hhea`, and when those are zero the typographic metrics
/// followed by the Windows metrics.
fn line_metrics<'a>(font: &impl TableProvider<'a>, os2: Option<&Os2>) -> [i32; 3] {
    let typo = |os2: &Os2| {
        [
            os2.s_typo_ascender() as i32,
            os2.s_typo_descender() as i32,
            os2.s_typo_line_gap() as i32,
        ]
    };
    if let Some(os2) = os2 {
        if os2
            .fs_selection()
            .contains(SelectionFlags::USE_TYPO_METRICS)
        {
            return typo(os2);
        }
    }
    let hhea = font
        .hhea()
        .map(|hhea| {
            [
                hhea.ascender() as i32,
                hhea.descender() as i32,
                hhea.line_gap() as i32,
            ]
        })
        .unwrap_or_default();
    if hhea[0] != 0 || hhea[1] != 0 {
        return hhea;
    }
    match os2 {
        Some(os2) if os2.s_typo_ascender() != 0 || os2.s_typo_descender() != 0 => typo(os2),
        // win descent is positive below the baseline
        Some(os2) => [
            os2.us_win_ascent() as i32,
            -(os2.us_win_descent() as i32),
            0,
        ],
        None => hhea,
    }
}

/// Glyph specific metrics.
///
/// Horizontal metrics come from `hmtx` (with `HVAR` deltas) and vertical
/// metrics from `vmtx` (with `VVAR` deltas). Fonts with `gvar` but without
/// the metric variation tables take their deltas from the phantom points.
#[derive(Clone)]
pub struct GlyphMetrics<'a> {
    glyph_count: u32,
    scale: f32,
    hmtx: Option<HVmtx<'a>>,
    vmtx: Option<HVmtx<'a>>,
    hvar: Option<Hvar<'a>>,
    vvar: Option<Vvar<'a>>,
    gvar: Option<Gvar<'a>>,
    loca_glyf: Option<(Loca<'a>, Glyf<'a>)>,
    coords: &'a [NormalizedCoord],
}

impl<'a> GlyphMetrics<'a> {
    pub fn new(
        font: &impl TableProvider<'a>,
        size: Size,
        location: impl Into<LocationRef<'a>>,
    ) -> Self {
        let glyph_count = font
            .maxp()
            .map(|maxp| maxp.num_glyphs() as u32)
            .unwrap_or_default();
        let upem = font
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or_default();
        let coords = location.into().coords();
        let has_coords = !coords.is_empty();
        let loca_glyf = match (font.loca(None), font.glyf()) {
            (Ok(loca), Ok(glyf)) => Some((loca, glyf)),
            _ => None,
        };
        Self {
            glyph_count,
            scale: size.linear_scale(upem),
            hmtx: font.hmtx().ok(),
            vmtx: font.vmtx().ok(),
            hvar: font.hvar().ok().filter(|_| has_coords),
            vvar: font.vvar().ok().filter(|_| has_coords),
            gvar: font.gvar().ok().filter(|_| has_coords),
            loca_glyf,
            coords,
        }
    }

    pub fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    /// Advance width of the glyph.
    ///
    /// Returns `None` if the glyph id is out of range or the font has no
    /// horizontal metrics.
    pub fn advance_width(&self, glyph_id: GlyphId) -> Option<f32> {
        self.check_glyph(glyph_id)?;
        let mut advance = self.hmtx.as_ref()?.advance(glyph_id)? as i32;
        if let Some(hvar) = &self.hvar {
            advance += truncate(hvar.advance_width_delta(glyph_id, self.coords));
        } else if let Some(deltas) = self.phantom_deltas(glyph_id) {
            advance += (deltas[1].x - deltas[0].x).to_i32();
        }
        Some(self.scaled(advance))
    }

    /// Left side bearing of the glyph.
    pub fn left_side_bearing(&self, glyph_id: GlyphId) -> Option<f32> {
        self.check_glyph(glyph_id)?;
        let mut lsb = self.hmtx.as_ref()?.side_bearing(glyph_id)? as i32;
        if let Some(hvar) = &self.hvar {
            lsb += truncate(hvar.lsb_delta(glyph_id, self.coords));
        } else if let Some(deltas) = self.phantom_deltas(glyph_id) {
            lsb += deltas[0].x.to_i32();
        }
        Some(self.scaled(lsb))
    }

    /// Advance height of the glyph.
    ///
    /// `None` when the font has no vertical metrics, which is distinct from
    /// a zero advance.
    pub fn advance_height(&self, glyph_id: GlyphId) -> Option<f32> {
        self.check_glyph(glyph_id)?;
        let mut advance = self.vmtx.as_ref()?.advance(glyph_id)? as i32;
        if let Some(vvar) = &self.vvar {
            advance += truncate(vvar.advance_height_delta(glyph_id, self.coords));
        } else if let Some(deltas) = self.phantom_deltas(glyph_id) {
            advance += (deltas[2].y - deltas[3].y).to_i32();
        }
        Some(self.scaled(advance))
    }

    /// Top side bearing of the glyph, or `None` without vertical metrics.
    pub fn top_side_bearing(&self, glyph_id: GlyphId) -> Option<f32> {
        self.check_glyph(glyph_id)?;
        let mut tsb = self.vmtx.as_ref()?.side_bearing(glyph_id)? as i32;
        if let Some(vvar) = &self.vvar {
            tsb += truncate(vvar.tsb_delta(glyph_id, self.coords));
        } else if let Some(deltas) = self.phantom_deltas(glyph_id) {
            tsb += deltas[2].y.to_i32();
        }
        Some(self.scaled(tsb))
    }

    /// Bounding box stored in the `glyf` header of the glyph.
    ///
    /// Variations are not reflected. Empty glyphs have an empty box.
    /// Returns `None` for out of range glyphs and fonts without TrueType
    /// outlines; use the outline query for exact bounds in those cases.
    pub fn bounds(&self, glyph_id: GlyphId) -> Option<BoundingBox> {
        self.check_glyph(glyph_id)?;
        let (loca, glyf) = self.loca_glyf.as_ref()?;
        match loca.get_glyf(glyph_id, glyf) {
            Ok(Some(glyph)) => Some(to_f32_bounds(glyph.bounds()).scale(self.scale)),
            Ok(None) => Some(BoundingBox::default()),
            Err(e) => {
                log::debug!("failed to read bounds of {glyph_id}: {e}");
                None
            }
        }
    }

    fn check_glyph(&self, glyph_id: GlyphId) -> Option<()> {
        (glyph_id.to_u32() < self.glyph_count).then_some(())
    }

    fn scaled(&self, value: i32) -> f32 {
        value as f32 * self.scale
    }

    fn phantom_deltas(&self, glyph_id: GlyphId) -> Option<[Point<Fixed>; 4]> {
        let (loca, glyf) = self.loca_glyf.as_ref()?;
        self.gvar
            .as_ref()?
            .phantom_point_deltas(glyf, loca, self.coords, glyph_id)
            .ok()
    }
}

fn to_f32_bounds(bounds: raw::types::BoundingBox<i16>) -> BoundingBox {
    BoundingBox {
        x_min: bounds.x_min as f32,
        y_min: bounds.y_min as f32,
        x_max: bounds.x_max as f32,
        y_max: bounds.y_max as f32,
    }
}

/// Metric deltas are truncated toward zero, as FreeType does.
pub(crate) fn truncate(delta: Result<Fixed, raw::ReadError>) -> i32 {
    delta.map(|delta| delta.to_f64() as i32).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataProvider as _;
    use pretty_assertions::assert_eq;
    use raw::{types::Tag, FontRef};
    use sfnt_test_data::{cff, composite, glyf_a, variable};

    #[test]
    fn font_metrics() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let metrics = font.metrics(Size::unscaled(), LocationRef::default());
        let expected = Metrics {
            units_per_em: 1000,
            glyph_count: 1974,
            is_monospace: false,
            italic_angle: 0.0,
            ascent: 984.0,
            descent: -273.0,
            leading: 0.0,
            cap_height: Some(660.0),
            x_height: Some(486.0),
            average_width: Some(495.0),
            max_width: Some(2200.0),
            underline: Some(LineMetrics {
                position: -50.0,
                thickness: 50.0,
            }),
            strikeout: Some(LineMetrics {
                position: 291.0,
                thickness: 50.0,
            }),
            subscript: Some(ScriptMetrics {
                x_size: 650.0,
                y_size: 600.0,
                x_offset: 0.0,
                y_offset: 75.0,
            }),
            superscript: Some(ScriptMetrics {
                x_size: 650.0,
                y_size: 600.0,
                x_offset: 0.0,
                y_offset: 350.0,
            }),
            bounds: Some(BoundingBox {
                x_min: -454.0,
                y_min: -293.0,
                x_max: 2159.0,
                y_max: 968.0,
            }),
        };
        assert_eq!(metrics, expected);
        assert_eq!(metrics.height(), 1257.0);
    }

    #[test]
    fn scaled_metrics() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let metrics = font.metrics(Size::new(2000.0), LocationRef::default());
        assert_eq!(metrics.ascent, 1968.0);
        assert_eq!(metrics.descent, -546.0);
        assert_eq!(metrics.underline.unwrap().position, -100.0);
        assert_eq!(metrics.units_per_em, 1000);
        assert_eq!(metrics.glyph_count, 1974);
    }

    #[test]
    fn use_typo_metrics() {
        let mut builder = glyf_a::builder();
        builder.add_raw(
            Tag::new(b"OS/2"),
            sfnt_test_data::tables::Os2Builder {
                fs_selection: 0x0080,
                typo_ascender: 750,
                typo_descender: -250,
                typo_line_gap: 200,
                ..Default::default()
            }
            .build(),
        );
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        let metrics = font.metrics(Size::unscaled(), LocationRef::default());
        assert_eq!(
            [metrics.ascent, metrics.descent, metrics.leading],
            [750.0, -250.0, 200.0]
        );
    }

    #[test]
    fn missing_optional_tables() {
        let mut builder = glyf_a::builder();
        builder.remove(Tag::new(b"post")).remove(Tag::new(b"OS/2"));
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        let metrics = font.metrics(Size::unscaled(), LocationRef::default());
        assert_eq!(metrics.underline, None);
        assert_eq!(metrics.strikeout, None);
        assert_eq!(metrics.subscript, None);
        assert_eq!(metrics.x_height, None);
        assert_eq!(metrics.ascent, 984.0);
    }

    #[test]
    fn mvar_deltas() {
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        let location = font.axes().location([("wght", 900.0)]);
        let metrics = font.metrics(Size::unscaled(), &location);
        assert_eq!(
            metrics.ascent,
            (variable::ASCENDER + variable::ASCENDER_DELTA) as f32
        );
        let default = font.metrics(Size::unscaled(), LocationRef::default());
        assert_eq!(default.ascent, variable::ASCENDER as f32);
        assert_eq!(default.descent, -200.0);
    }

    #[test]
    fn glyph_metrics() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());
        let a = GlyphId::new(glyf_a::GLYPH_A);
        assert_eq!(metrics.glyph_count(), 1974);
        assert_eq!(metrics.advance_width(a), Some(544.0));
        assert_eq!(metrics.left_side_bearing(a), Some(3.0));
        // no vmtx: unavailable rather than zero
        assert_eq!(metrics.advance_height(a), None);
        assert_eq!(metrics.top_side_bearing(a), None);
        assert_eq!(
            metrics.bounds(a),
            Some(BoundingBox {
                x_min: 3.0,
                y_min: 0.0,
                x_max: 541.0,
                y_max: 656.0,
            })
        );
        // empty glyph
        assert_eq!(
            metrics.bounds(GlyphId::new(glyf_a::GLYPH_SPACE)),
            Some(BoundingBox::default())
        );
        // trailing glyphs repeat the last long advance
        let last = GlyphId::new(glyf_a::NUM_GLYPHS - 1);
        assert_eq!(metrics.advance_width(last), Some(544.0));
        assert_eq!(metrics.left_side_bearing(last), Some(0.0));
        let past_end = GlyphId::new(glyf_a::NUM_GLYPHS);
        assert_eq!(metrics.advance_width(past_end), None);
        assert_eq!(metrics.bounds(past_end), None);
    }

    #[test]
    fn vertical_metrics() {
        let data = composite::font();
        let font = FontRef::new(&data).unwrap();
        let metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());
        let gid = GlyphId::new(composite::GLYPH_OFFSET);
        assert_eq!(metrics.advance_height(gid), Some(1000.0));
        assert_eq!(metrics.top_side_bearing(gid), Some(880.0));
        // a single long metric covers every glyph
        assert_eq!(metrics.advance_width(gid), Some(100.0));
    }

    #[test]
    fn cff_glyphs_have_no_header_bounds() {
        let data = cff::font();
        let font = FontRef::new(&data).unwrap();
        let metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());
        let a = GlyphId::new(cff::GLYPH_A);
        assert_eq!(metrics.advance_width(a), Some(544.0));
        assert_eq!(metrics.bounds(a), None);
    }

    #[test]
    fn hvar_deltas() {
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        let location = font.axes().location([("wght", 900.0)]);
        let metrics = font.glyph_metrics(Size::unscaled(), &location);
        let square = GlyphId::new(variable::GLYPH_SQUARE);
        let expected = (variable::ADVANCE as i16 + variable::ADVANCE_DELTA) as f32;
        assert_eq!(metrics.advance_width(square), Some(expected));
        // glyph 0 maps to the zero delta item
        assert_eq!(metrics.advance_width(GlyphId::NOTDEF), Some(100.0));
    }

    #[test]
    fn gvar_phantom_deltas_without_hvar() {
        let mut builder = variable::builder();
        builder.remove(Tag::new(b"HVAR"));
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        let location = font.axes().location([("wght", 900.0)]);
        let metrics = font.glyph_metrics(Size::unscaled(), &location);
        let square = GlyphId::new(variable::GLYPH_SQUARE);
        assert_eq!(metrics.advance_width(square), Some(150.0));
        assert_eq!(metrics.left_side_bearing(square), Some(0.0));
        let default = font.glyph_metrics(Size::unscaled(), LocationRef::default());
        assert_eq!(default.advance_width(square), Some(100.0));
    }
}
