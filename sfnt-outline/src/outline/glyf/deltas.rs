//! Accumulation of `gvar` deltas for a glyph.

use alloc::vec::Vec;

use raw::{
    tables::gvar::GlyphVariationData,
    types::{Fixed, Point},
    ReadError,
};

use crate::NormalizedCoord;

/// Buffers reused across glyphs while computing deltas.
#[derive(Default)]
pub(super) struct DeltaScratch {
    tuple_deltas: Vec<Point<Fixed>>,
    touched: Vec<bool>,
}

/// Sums the deltas of the active tuples for the points of a simple glyph.
///
/// `points` holds the unvaried outline points followed by the four phantom
/// points and `contours` the inclusive end point of each contour. Tuples
/// that only name some of the points get deltas for the remaining outline
/// points by interpolation. Phantom points only receive explicit deltas.
pub(super) fn simple_glyph(
    var_data: &GlyphVariationData,
    coords: &[NormalizedCoord],
    points: &[Point<Fixed>],
    contours: &[usize],
    scratch: &mut DeltaScratch,
    deltas: &mut [Point<Fixed>],
) -> Result<(), ReadError> {
    if deltas.len() != points.len() {
        return Err(ReadError::InvalidArrayLen);
    }
    deltas.fill(Point::default());
    let DeltaScratch {
        tuple_deltas,
        touched,
    } = scratch;
    for (tuple, scalar) in var_data.active_tuples_at(coords) {
        if tuple.has_deltas_for_all_points() {
            for delta in tuple.deltas() {
                if let Some(accum) = deltas.get_mut(delta.position as usize) {
                    *accum += delta.apply_scalar(scalar);
                }
            }
            continue;
        }
        tuple_deltas.clear();
        tuple_deltas.resize(points.len(), Point::default());
        touched.clear();
        touched.resize(points.len(), false);
        for delta in tuple.deltas() {
            let ix = delta.position as usize;
            if let Some(target) = tuple_deltas.get_mut(ix) {
                *target = delta.apply_scalar(scalar);
                touched[ix] = true;
            }
        }
        infer_deltas(points, touched, contours, tuple_deltas);
        for (accum, delta) in deltas.iter_mut().zip(tuple_deltas.iter()) {
            *accum += *delta;
        }
    }
    Ok(())
}

/// Sums the explicit deltas of the active tuples for the components of a
/// composite glyph.
///
/// Each component offset is a single point; the four phantom points
/// follow the components. Nothing is inferred.
pub(super) fn composite_glyph(
    var_data: &GlyphVariationData,
    coords: &[NormalizedCoord],
    deltas: &mut [Point<Fixed>],
) {
    deltas.fill(Point::default());
    for (tuple, scalar) in var_data.active_tuples_at(coords) {
        for delta in tuple.deltas() {
            if let Some(accum) = deltas.get_mut(delta.position as usize) {
                *accum += delta.apply_scalar(scalar);
            }
        }
    }
}

/// Fills in the deltas of untouched points, contour by contour.
///
/// A contour with a single touched point is shifted by its delta. Otherwise
/// each run of untouched points takes its delta from the touched points on
/// either side of it. See
/// <https://learn.microsoft.com/en-us/typography/opentype/spec/gvar#inferred-deltas-for-un-referenced-point-numbers>
fn infer_deltas(
    points: &[Point<Fixed>],
    touched: &[bool],
    contours: &[usize],
    deltas: &mut [Point<Fixed>],
) {
    let mut start = 0;
    for &end in contours {
        if end < start || end >= points.len() {
            // malformed contours are reported when the path is built
            return;
        }
        let Some(first) = (start..=end).find(|&ix| touched[ix]) else {
            start = end + 1;
            continue;
        };
        let mut prev = first;
        for ix in first + 1..=end {
            if touched[ix] {
                infer_run(points, deltas, prev + 1..ix, prev, ix);
                prev = ix;
            }
        }
        if prev == first {
            let shift = deltas[first];
            for (ix, delta) in deltas.iter_mut().enumerate().take(end + 1).skip(start) {
                if ix != first {
                    *delta = shift;
                }
            }
        } else {
            // the run that wraps around the end of the contour
            infer_run(points, deltas, prev + 1..end + 1, prev, first);
            infer_run(points, deltas, start..first, prev, first);
        }
        start = end + 1;
    }
}

fn infer_run(
    points: &[Point<Fixed>],
    deltas: &mut [Point<Fixed>],
    run: core::ops::Range<usize>,
    ref1: usize,
    ref2: usize,
) {
    let (p1, p2) = (points[ref1], points[ref2]);
    let (d1, d2) = (deltas[ref1], deltas[ref2]);
    for ix in run {
        let point = points[ix];
        deltas[ix] = Point::new(
            infer_coord(point.x, p1.x, p2.x, d1.x, d2.x),
            infer_coord(point.y, p1.y, p2.y, d1.y, d2.y),
        );
    }
}

fn infer_coord(coord: Fixed, c1: Fixed, c2: Fixed, d1: Fixed, d2: Fixed) -> Fixed {
    let (c1, c2, d1, d2) = if c1 > c2 {
        (c2, c1, d2, d1)
    } else {
        (c1, c2, d1, d2)
    };
    if c1 == c2 {
        if d1 == d2 {
            d1
        } else {
            Fixed::ZERO
        }
    } else if coord <= c1 {
        d1
    } else if coord >= c2 {
        d2
    } else {
        d1 + (coord - c1).mul_div(d2 - d1, c2 - c1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_points(coords: &[(i32, i32)]) -> Vec<Point<Fixed>> {
        coords
            .iter()
            .map(|&(x, y)| Point::new(Fixed::from_i32(x), Fixed::from_i32(y)))
            .collect()
    }

    fn infer(points: &[(i32, i32)], deltas: &[(i32, i32)], contours: &[usize]) -> Vec<Point<Fixed>> {
        let points = fixed_points(points);
        let mut deltas = fixed_points(deltas);
        let touched: Vec<_> = deltas.iter().map(|d| *d != Point::default()).collect();
        infer_deltas(&points, &touched, contours, &mut deltas);
        deltas
    }

    #[test]
    fn single_touched_point_shifts_contour() {
        let deltas = infer(
            &[(245, 630), (260, 700), (305, 680)],
            &[(20, -10), (0, 0), (0, 0)],
            &[2],
        );
        assert_eq!(deltas, fixed_points(&[(20, -10), (20, -10), (20, -10)]));
    }

    #[test]
    fn interpolate_between_touched_points() {
        // worked example from the gvar documentation
        let deltas = infer(
            &[(245, 630), (260, 700), (305, 680)],
            &[(28, -62), (0, 0), (-42, -57)],
            &[2],
        );
        assert_eq!(
            deltas[1],
            Point::new(Fixed::from_f64(10.5), Fixed::from_i32(-57))
        );
    }

    #[test]
    fn runs_wrap_around_the_contour() {
        let deltas = infer(
            &[(0, 0), (50, 0), (100, 0), (100, 100), (0, 100)],
            &[(0, 0), (10, 10), (0, 0), (30, 30), (0, 0)],
            &[4],
        );
        // point 2 lies between 1 and 3 on x and is clamped to 3 on y
        assert_eq!(deltas[2], Point::new(Fixed::from_i32(30), Fixed::from_i32(10)));
        // points 4 and 0 are between 3 and 1 on x
        assert_eq!(deltas[4].x, Fixed::from_i32(10));
        assert_eq!(deltas[0].x, Fixed::from_i32(10));
    }

    #[test]
    fn untouched_contours_are_left_alone() {
        let deltas = infer(
            &[(0, 0), (10, 0), (10, 10), (20, 20), (30, 20), (30, 30)],
            &[(5, 5), (0, 0), (0, 0), (0, 0), (0, 0), (0, 0)],
            &[2, 5],
        );
        assert_eq!(deltas[2], Point::new(Fixed::from_i32(5), Fixed::from_i32(5)));
        assert!(deltas[3..].iter().all(|d| *d == Point::default()));
    }

    #[test]
    fn equal_coordinates_with_different_deltas() {
        assert_eq!(
            infer_coord(
                Fixed::from_i32(5),
                Fixed::from_i32(10),
                Fixed::from_i32(10),
                Fixed::from_i32(1),
                Fixed::from_i32(2)
            ),
            Fixed::ZERO
        );
    }
}
