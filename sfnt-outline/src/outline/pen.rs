//! Pens for collecting the output of an outline.

use alloc::string::String;
use core::fmt::{self, Write};

use raw::types::Pen;

use crate::metrics::BoundingBox;

/// Pen that ignores all commands.
///
/// Useful for measuring or validating glyphs without keeping the path.
#[derive(Copy, Clone, Default, Debug)]
pub struct NullPen;

impl Pen for NullPen {
    fn move_to(&mut self, _x: f32, _y: f32) {}
    fn line_to(&mut self, _x: f32, _y: f32) {}
    fn quad_to(&mut self, _cx0: f32, _cy0: f32, _x: f32, _y: f32) {}
    fn curve_to(&mut self, _cx0: f32, _cy0: f32, _cx1: f32, _cy1: f32, _x: f32, _y: f32) {}
    fn close(&mut self) {}
}

/// Pen that writes SVG path data.
///
/// Commands are separated by a single space and coordinates are written
/// as `x,y` pairs, e.g. `M0,0 L10,0 Q15,5 10,10 Z`.
#[derive(Clone, Default, Debug)]
pub struct SvgPen {
    path: String,
    precision: Option<usize>,
}

impl SvgPen {
    /// Creates a pen that writes the shortest representation of each value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pen that writes `precision` digits after the decimal point.
    pub fn with_precision(precision: usize) -> Self {
        Self {
            path: String::new(),
            precision: Some(precision),
        }
    }

    pub fn clear(&mut self) {
        self.path.clear();
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    fn command(&mut self, verb: char, coords: &[f32]) {
        if !self.path.is_empty() {
            self.path.push(' ');
        }
        self.path.push(verb);
        for (i, pair) in coords.chunks_exact(2).enumerate() {
            if i != 0 {
                self.path.push(' ');
            }
            let _ = match self.precision {
                Some(prec) => write!(self.path, "{:.2$},{:.2$}", pair[0], pair[1], prec),
                None => write!(self.path, "{},{}", pair[0], pair[1]),
            };
        }
    }
}

impl Pen for SvgPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.command('M', &[x, y]);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.command('L', &[x, y]);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.command('Q', &[cx0, cy0, x, y]);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.command('C', &[cx0, cy0, cx1, cy1, x, y]);
    }

    fn close(&mut self) {
        self.command('Z', &[]);
    }
}

impl AsRef<str> for SvgPen {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl From<SvgPen> for String {
    fn from(value: SvgPen) -> Self {
        value.path
    }
}

impl fmt::Display for SvgPen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Forwards commands to another pen while accumulating the control box of
/// every coordinate seen, off curve points included.
pub(crate) struct ControlBoxPen<P> {
    inner: P,
    bounds: Option<BoundingBox>,
}

impl<P: Pen> ControlBoxPen<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            bounds: None,
        }
    }

    /// The control box, or `None` if nothing was drawn.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    fn add(&mut self, x: f32, y: f32) {
        match self.bounds.as_mut() {
            Some(bounds) => bounds.extend(x, y),
            None => self.bounds = Some(BoundingBox::from_point(x, y)),
        }
    }
}

impl<P: Pen> Pen for ControlBoxPen<P> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.add(x, y);
        self.inner.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.add(x, y);
        self.inner.line_to(x, y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.add(cx0, cy0);
        self.add(x, y);
        self.inner.quad_to(cx0, cy0, x, y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.add(cx0, cy0);
        self.add(cx1, cy1);
        self.add(x, y);
        self.inner.curve_to(cx0, cy0, cx1, cy1, x, y);
    }

    fn close(&mut self) {
        self.inner.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raw::types::OutlineEvent;

    fn draw(pen: &mut impl Pen) {
        pen.move_to(1.0, 2.5);
        pen.line_to(1.25, 4.0);
        pen.quad_to(2.0, 3.5, -0.5, -425.0);
        pen.curve_to(-37.0, 4.5, 2.0, 1.0, -0.5, -0.75);
        pen.close();
    }

    #[test]
    fn svg_path_data() {
        let mut pen = SvgPen::new();
        draw(&mut pen);
        assert_eq!(
            pen.as_str(),
            "M1,2.5 L1.25,4 Q2,3.5 -0.5,-425 C-37,4.5 2,1 -0.5,-0.75 Z"
        );
        let mut pen = SvgPen::with_precision(2);
        draw(&mut pen);
        assert_eq!(
            pen.to_string(),
            "M1.00,2.50 L1.25,4.00 Q2.00,3.50 -0.50,-425.00 C-37.00,4.50 2.00,1.00 -0.50,-0.75 Z"
        );
        pen.clear();
        assert!(pen.as_str().is_empty());
    }

    #[test]
    fn control_box_includes_off_curve_points() {
        let mut events = vec![];
        let mut pen = ControlBoxPen::new(&mut events);
        assert!(pen.bounds().is_none());
        draw(&mut pen);
        let bounds = pen.bounds().unwrap();
        assert_eq!(
            (bounds.x_min, bounds.y_min, bounds.x_max, bounds.y_max),
            (-37.0, -425.0, 2.0, 4.5)
        );
        assert_eq!(events.len(), 5);
        assert_eq!(events[4], OutlineEvent::ClosePath);
    }
}
