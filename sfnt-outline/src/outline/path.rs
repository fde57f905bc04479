//! Conversion of TrueType point streams to path commands.

use core::fmt;

use raw::types::{Pen, Point};

/// Bit of a point flag marking the point as on curve.
pub(crate) const ON_CURVE: u8 = 0x01;

/// Error produced when the contour end points don't describe the point
/// buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToPathError {
    /// End point of the contour is before the end of the previous one.
    ContourOrder(usize),
    /// End point of the contour is past the last point.
    EndPointOutOfRange(usize),
    /// Point and flag buffers have different lengths.
    PointFlagMismatch { points: usize, flags: usize },
}

impl fmt::Display for ToPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContourOrder(ix) => write!(f, "contour {ix} ends before the previous one"),
            Self::EndPointOutOfRange(ix) => {
                write!(f, "end point of contour {ix} is out of range")
            }
            Self::PointFlagMismatch { points, flags } => {
                write!(f, "{points} points but {flags} flags")
            }
        }
    }
}

/// Emits the quadratic contours described by `points`, `flags` and the
/// inclusive `contours` end points to `pen`.
///
/// Follows FreeType: a contour starting with an off curve point begins at
/// the last point if that is on curve and at the midpoint of the first and
/// last points otherwise. Consecutive off curve points imply an on curve
/// point halfway between them. Every contour ends with an explicit segment
/// back to its start followed by a close command.
pub(crate) fn to_path(
    points: &[Point<f32>],
    flags: &[u8],
    contours: &[usize],
    pen: &mut impl Pen,
) -> Result<(), ToPathError> {
    if points.len() != flags.len() {
        return Err(ToPathError::PointFlagMismatch {
            points: points.len(),
            flags: flags.len(),
        });
    }
    let mut start = 0;
    for (contour_ix, &end) in contours.iter().enumerate() {
        if end >= points.len() {
            return Err(ToPathError::EndPointOutOfRange(contour_ix));
        }
        // an empty range here means a repeated or decreasing end point
        let range = start..end + 1;
        if range.is_empty() {
            return Err(ToPathError::ContourOrder(contour_ix));
        }
        contour_to_path(&points[range.clone()], &flags[range], pen);
        start = end + 1;
    }
    Ok(())
}

fn contour_to_path(points: &[Point<f32>], flags: &[u8], pen: &mut impl Pen) {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return;
    };
    let is_on = |ix: usize| flags[ix] & ON_CURVE != 0;
    let last_ix = points.len() - 1;
    let (start, rest) = if is_on(0) {
        (first, 1..points.len())
    } else if is_on(last_ix) {
        (last, 0..last_ix)
    } else {
        (first.midpoint(last), 0..points.len())
    };
    pen.move_to(start.x, start.y);
    let mut control: Option<Point<f32>> = None;
    for ix in rest {
        let point = points[ix];
        if is_on(ix) {
            match control.take() {
                Some(c) => pen.quad_to(c.x, c.y, point.x, point.y),
                None => pen.line_to(point.x, point.y),
            }
        } else {
            if let Some(c) = control {
                let mid = c.midpoint(point);
                pen.quad_to(c.x, c.y, mid.x, mid.y);
            }
            control = Some(point);
        }
    }
    match control {
        Some(c) => pen.quad_to(c.x, c.y, start.x, start.y),
        None => pen.line_to(start.x, start.y),
    }
    pen.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::SvgPen;

    fn svg(points: &[(f32, f32, bool)], contours: &[usize]) -> Result<String, ToPathError> {
        let (points, flags): (Vec<_>, Vec<_>) = points
            .iter()
            .map(|&(x, y, on)| (Point::new(x, y), on as u8))
            .unzip();
        let mut pen = SvgPen::new();
        to_path(&points, &flags, contours, &mut pen)?;
        Ok(pen.to_string())
    }

    #[test]
    fn lines_close_back_to_start() {
        let square = [
            (0.0, 0.0, true),
            (10.0, 0.0, true),
            (10.0, 10.0, true),
            (0.0, 10.0, true),
        ];
        assert_eq!(
            svg(&square, &[3]).unwrap(),
            "M0,0 L10,0 L10,10 L0,10 L0,0 Z"
        );
    }

    #[test]
    fn implied_on_curve_points() {
        let points = [
            (0.0, 0.0, true),
            (10.0, 10.0, false),
            (20.0, 10.0, false),
            (30.0, 0.0, true),
        ];
        assert_eq!(
            svg(&points, &[3]).unwrap(),
            "M0,0 Q10,10 15,10 Q20,10 30,0 L0,0 Z"
        );
    }

    #[test]
    fn starts_at_last_point_when_first_is_off_curve() {
        let points = [(10.0, 10.0, false), (20.0, 0.0, true), (0.0, 0.0, true)];
        assert_eq!(
            svg(&points, &[2]).unwrap(),
            "M0,0 Q10,10 20,0 L0,0 Z"
        );
    }

    #[test]
    fn all_off_curve() {
        let points = [
            (0.0, 10.0, false),
            (10.0, 0.0, false),
            (0.0, -10.0, false),
            (-10.0, 0.0, false),
        ];
        assert_eq!(
            svg(&points, &[3]).unwrap(),
            "M-5,5 Q0,10 5,5 Q10,0 5,-5 Q0,-10 -5,-5 Q-10,0 -5,5 Z"
        );
    }

    #[test]
    fn trailing_off_curve_closes_with_quad() {
        let points = [(0.0, 0.0, true), (10.0, 0.0, true), (10.0, 10.0, false)];
        assert_eq!(svg(&points, &[2]).unwrap(), "M0,0 L10,0 Q10,10 0,0 Z");
    }

    #[test]
    fn multiple_contours() {
        let points = [
            (0.0, 0.0, true),
            (1.0, 0.0, true),
            (1.0, 1.0, true),
            (5.0, 5.0, true),
            (6.0, 5.0, true),
            (6.0, 6.0, true),
        ];
        assert_eq!(
            svg(&points, &[2, 5]).unwrap(),
            "M0,0 L1,0 L1,1 L0,0 Z M5,5 L6,5 L6,6 L5,5 Z"
        );
    }

    #[test]
    fn bad_contours() {
        let points = [(0.0, 0.0, true), (1.0, 0.0, true), (1.0, 1.0, true)];
        assert_eq!(svg(&points, &[3]), Err(ToPathError::EndPointOutOfRange(0)));
        assert_eq!(svg(&points, &[1, 1]), Err(ToPathError::ContourOrder(1)));
        let mut pen = SvgPen::new();
        assert_eq!(
            to_path(&[Point::new(0.0, 0.0)], &[], &[0], &mut pen),
            Err(ToPathError::PointFlagMismatch {
                points: 1,
                flags: 0
            })
        );
    }
}
