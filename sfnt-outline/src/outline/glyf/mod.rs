//! Loading TrueType outlines from the `glyf` table.

mod deltas;

use alloc::vec::Vec;

use raw::{
    tables::{
        glyf::{Anchor, CompositeGlyph, CompositeGlyphFlags, Glyf, Glyph, SimpleGlyph, Transform},
        gvar::{GlyphVariationData, Gvar, PHANTOM_POINT_COUNT},
        hvar::Hvar,
        hvmtx::HVmtx,
        loca::Loca,
    },
    types::{Fixed, GlyphId, Pen, Point},
    TableProvider,
};

use self::deltas::DeltaScratch;
use super::{path, pen::ControlBoxPen, AdjustedMetrics, DrawError};
use crate::{
    instance::Size, metrics, NormalizedCoord, GLYF_COMPONENT_LOAD_LIMIT,
    GLYF_COMPOSITE_RECURSION_LIMIT,
};

/// Most points an assembled glyph may have.
const MAX_POINTS: usize = u16::MAX as usize;

/// Source of TrueType outlines.
#[derive(Clone)]
pub(crate) struct Outlines<'a> {
    loca: Loca<'a>,
    glyf: Glyf<'a>,
    gvar: Option<Gvar<'a>>,
    hmtx: Option<HVmtx<'a>>,
    vmtx: Option<HVmtx<'a>>,
    hvar: Option<Hvar<'a>>,
    glyph_count: u32,
    units_per_em: u16,
}

impl<'a> Outlines<'a> {
    /// Returns `None` unless the font has both `loca` and `glyf`.
    pub fn new(font: &impl TableProvider<'a>) -> Option<Self> {
        let loca = font.loca(None).ok()?;
        let glyf = font.glyf().ok()?;
        let glyph_count = match font.maxp() {
            Ok(maxp) => maxp.num_glyphs() as u32,
            Err(_) => loca.len().saturating_sub(1) as u32,
        };
        Some(Self {
            loca,
            glyf,
            gvar: font.gvar().ok(),
            hmtx: font.hmtx().ok(),
            vmtx: font.vmtx().ok(),
            hvar: font.hvar().ok(),
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

    pub fn draw(
        &self,
        glyph_id: GlyphId,
        size: Size,
        coords: &[NormalizedCoord],
        pen: &mut impl Pen,
    ) -> Result<AdjustedMetrics, DrawError> {
        // the default location needs no deltas
        let coords = if coords.iter().all(|c| *c == NormalizedCoord::ZERO) {
            &[]
        } else {
            coords
        };
        let mut loader = Loader::new(self, coords);
        loader.load(glyph_id, 0)?;
        let scale = size.linear_scale(self.units_per_em);
        let points: Vec<Point<f32>> = loader
            .points
            .iter()
            .map(|point| point.map(|coord| coord.to_f32() * scale))
            .collect();
        let mut pen = ControlBoxPen::new(pen);
        path::to_path(&points, &loader.flags, &loader.contours, &mut pen)?;
        Ok(AdjustedMetrics {
            bounds: pen.bounds(),
            advance_width: self
                .advance_width(glyph_id, coords, &loader.phantom)
                .map(|advance| advance as f32 * scale),
        })
    }

    /// `HVAR` deltas take priority; otherwise the phantom points carry both
    /// the `gvar` deltas and any component metrics.
    fn advance_width(
        &self,
        glyph_id: GlyphId,
        coords: &[NormalizedCoord],
        phantom: &[Point<Fixed>; PHANTOM_POINT_COUNT],
    ) -> Option<i32> {
        let advance = self.hmtx.as_ref()?.advance(glyph_id)? as i32;
        match &self.hvar {
            Some(hvar) if !coords.is_empty() => {
                Some(advance + metrics::truncate(hvar.advance_width_delta(glyph_id, coords)))
            }
            _ => Some((phantom[1].x - phantom[0].x).to_i32()),
        }
    }
}

/// State for assembling a single glyph in font units.
struct Loader<'a, 'b> {
    outlines: &'b Outlines<'a>,
    coords: &'b [NormalizedCoord],
    /// Glyphs loaded so far, including the root.
    load_count: usize,
    points: Vec<Point<Fixed>>,
    flags: Vec<u8>,
    contours: Vec<usize>,
    phantom: [Point<Fixed>; PHANTOM_POINT_COUNT],
    raw_points: Vec<Point<i32>>,
    unvaried: Vec<Point<Fixed>>,
    glyph_contours: Vec<usize>,
    deltas: Vec<Point<Fixed>>,
    delta_scratch: DeltaScratch,
}

impl<'a, 'b> Loader<'a, 'b> {
    fn new(outlines: &'b Outlines<'a>, coords: &'b [NormalizedCoord]) -> Self {
        Self {
            outlines,
            coords,
            load_count: 0,
            points: Vec::new(),
            flags: Vec::new(),
            contours: Vec::new(),
            phantom: Default::default(),
            raw_points: Vec::new(),
            unvaried: Vec::new(),
            glyph_contours: Vec::new(),
            deltas: Vec::new(),
            delta_scratch: DeltaScratch::default(),
        }
    }

    fn load(&mut self, glyph_id: GlyphId, depth: usize) -> Result<(), DrawError> {
        self.load_count += 1;
        if depth > GLYF_COMPOSITE_RECURSION_LIMIT || self.load_count > GLYF_COMPONENT_LOAD_LIMIT {
            return Err(DrawError::RecursionLimitExceeded(glyph_id));
        }
        if glyph_id.to_u32() >= self.outlines.glyph_count {
            return Err(DrawError::GlyphNotFound(glyph_id));
        }
        let glyph = self
            .outlines
            .loca
            .get_glyf(glyph_id, &self.outlines.glyf)?;
        self.phantom = self.phantom_points(glyph_id, glyph.as_ref());
        match glyph {
            None => {
                if let Some(var_data) = self.variation_data(glyph_id) {
                    let mut deltas = [Point::default(); PHANTOM_POINT_COUNT];
                    deltas::composite_glyph(&var_data, self.coords, &mut deltas);
                    for (point, delta) in self.phantom.iter_mut().zip(deltas) {
                        *point += delta;
                    }
                }
                Ok(())
            }
            Some(Glyph::Simple(simple)) => self.load_simple(glyph_id, &simple),
            Some(Glyph::Composite(composite)) => self.load_composite(glyph_id, &composite, depth),
        }
    }

    fn load_simple(&mut self, glyph_id: GlyphId, glyph: &SimpleGlyph) -> Result<(), DrawError> {
        let count = glyph.num_points();
        let base = self.points.len();
        if base + count > MAX_POINTS {
            return Err(DrawError::TooManyPoints(glyph_id));
        }
        self.raw_points.clear();
        self.raw_points.resize(count, Point::default());
        self.flags.resize(base + count, 0);
        glyph.read_points_fast(&mut self.raw_points, &mut self.flags[base..])?;
        self.points
            .extend(self.raw_points.iter().map(|point| point.map(Fixed::from_i32)));
        let end_points = glyph.end_pts_of_contours();
        self.contours
            .extend(end_points.iter().map(|end| base + end.get() as usize));
        let Some(var_data) = self.variation_data(glyph_id) else {
            return Ok(());
        };
        self.unvaried.clear();
        self.unvaried.extend_from_slice(&self.points[base..]);
        self.unvaried.extend_from_slice(&self.phantom);
        self.glyph_contours.clear();
        self.glyph_contours
            .extend(end_points.iter().map(|end| end.get() as usize));
        self.deltas.clear();
        self.deltas.resize(self.unvaried.len(), Point::default());
        deltas::simple_glyph(
            &var_data,
            self.coords,
            &self.unvaried,
            &self.glyph_contours,
            &mut self.delta_scratch,
            &mut self.deltas,
        )?;
        for (point, delta) in self.points[base..]
            .iter_mut()
            .chain(self.phantom.iter_mut())
            .zip(&self.deltas)
        {
            *point += *delta;
        }
        Ok(())
    }

    fn load_composite(
        &mut self,
        glyph_id: GlyphId,
        glyph: &CompositeGlyph,
        depth: usize,
    ) -> Result<(), DrawError> {
        let component_count = glyph.components().count();
        // one delta per component offset, then the phantom points
        let mut deltas = alloc::vec![Point::default(); component_count + PHANTOM_POINT_COUNT];
        if let Some(var_data) = self.variation_data(glyph_id) {
            deltas::composite_glyph(&var_data, self.coords, &mut deltas);
        }
        for (point, delta) in self.phantom.iter_mut().zip(&deltas[component_count..]) {
            *point += *delta;
        }
        let mut phantom = self.phantom;
        let glyph_start = self.points.len();
        for (component, delta) in glyph.components().zip(&deltas) {
            let start = self.points.len();
            self.load(component.glyph, depth + 1)?;
            if component.flags.contains(CompositeGlyphFlags::USE_MY_METRICS) {
                phantom = self.phantom;
            }
            let transform = component.transform;
            let has_transform = transform != Transform::default();
            if has_transform {
                for point in &mut self.points[start..] {
                    *point = transform_point(&transform, *point);
                }
            }
            let offset = match component.anchor {
                Anchor::Offset { x, y } => {
                    let offset =
                        Point::new(Fixed::from_i32(x as i32), Fixed::from_i32(y as i32)) + *delta;
                    let scaled = component
                        .flags
                        .contains(CompositeGlyphFlags::SCALED_COMPONENT_OFFSET)
                        && !component
                            .flags
                            .contains(CompositeGlyphFlags::UNSCALED_COMPONENT_OFFSET);
                    if has_transform && scaled {
                        transform_point(&transform, offset)
                    } else {
                        offset
                    }
                }
                Anchor::Point { base, component } => {
                    let base_point = self.points[glyph_start..start]
                        .get(base as usize)
                        .ok_or(DrawError::InvalidAnchorPoint(glyph_id, base))?;
                    let component_point = self.points[start..]
                        .get(component as usize)
                        .ok_or(DrawError::InvalidAnchorPoint(glyph_id, component))?;
                    *base_point - *component_point
                }
            };
            if offset != Point::default() {
                for point in &mut self.points[start..] {
                    *point += offset;
                }
            }
        }
        self.phantom = phantom;
        Ok(())
    }

    /// Horizontal and vertical origin and advance points of a glyph, as
    /// positioned by `hmtx` and `vmtx` relative to the outline.
    fn phantom_points(
        &self,
        glyph_id: GlyphId,
        glyph: Option<&Glyph>,
    ) -> [Point<Fixed>; PHANTOM_POINT_COUNT] {
        let bounds = glyph.map(|glyph| glyph.bounds()).unwrap_or_default();
        let metric = |table: Option<&HVmtx>| {
            table
                .map(|table| {
                    (
                        table.advance(glyph_id).unwrap_or_default() as i32,
                        table.side_bearing(glyph_id).unwrap_or_default() as i32,
                    )
                })
                .unwrap_or_default()
        };
        let (advance, lsb) = metric(self.outlines.hmtx.as_ref());
        let (vertical_advance, tsb) = metric(self.outlines.vmtx.as_ref());
        let left = bounds.x_min as i32 - lsb;
        let top = bounds.y_max as i32 + tsb;
        [
            (left, 0),
            (left + advance, 0),
            (0, top),
            (0, top - vertical_advance),
        ]
        .map(|(x, y)| Point::new(Fixed::from_i32(x), Fixed::from_i32(y)))
    }

    fn variation_data(&self, glyph_id: GlyphId) -> Option<GlyphVariationData<'a>> {
        if self.coords.is_empty() {
            return None;
        }
        match self.outlines.gvar.as_ref()?.glyph_variation_data(glyph_id) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("ignoring variations of {glyph_id}: {e}");
                None
            }
        }
    }
}

/// Applies the 2x2 matrix of a component to a point.
fn transform_point(transform: &Transform, point: Point<Fixed>) -> Point<Fixed> {
    let xx = transform.xx.to_fixed();
    let yx = transform.yx.to_fixed();
    let xy = transform.xy.to_fixed();
    let yy = transform.yy.to_fixed();
    Point::new(
        point.x * xx + point.y * xy,
        point.x * yx + point.y * yy,
    )
}
