//! Receiving glyph outlines.

/// Interface for accepting a sequence of path commands.
///
/// Coordinates are in font units unless the outline was requested at a
/// specific size.
pub trait Pen {
    /// Emit a command to begin a new subpath at (x, y).
    fn move_to(&mut self, x: f32, y: f32);

    /// Emit a line segment from the current point to (x, y).
    fn line_to(&mut self, x: f32, y: f32);

    /// Emit a quadratic bezier segment from the current point with a control
    /// point at (cx0, cy0) and ending at (x, y).
    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32);

    /// Emit a cubic bezier segment from the current point with control
    /// points at (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32);

    /// Emit a command to close the current subpath.
    fn close(&mut self);
}

/// A single element of a glyph outline.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutlineEvent {
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    QuadTo {
        cx0: f32,
        cy0: f32,
        x: f32,
        y: f32,
    },
    CurveTo {
        cx0: f32,
        cy0: f32,
        cx1: f32,
        cy1: f32,
        x: f32,
        y: f32,
    },
    ClosePath,
}

impl OutlineEvent {
    /// Forward this event to the given pen.
    pub fn apply_to(&self, pen: &mut impl Pen) {
        match *self {
            OutlineEvent::MoveTo { x, y } => pen.move_to(x, y),
            OutlineEvent::LineTo { x, y } => pen.line_to(x, y),
            OutlineEvent::QuadTo { cx0, cy0, x, y } => pen.quad_to(cx0, cy0, x, y),
            OutlineEvent::CurveTo {
                cx0,
                cy0,
                cx1,
                cy1,
                x,
                y,
            } => pen.curve_to(cx0, cy0, cx1, cy1, x, y),
            OutlineEvent::ClosePath => pen.close(),
        }
    }

    /// The end point of the segment, if any.
    pub fn end_point(&self) -> Option<(f32, f32)> {
        match *self {
            OutlineEvent::MoveTo { x, y }
            | OutlineEvent::LineTo { x, y }
            | OutlineEvent::QuadTo { x, y, .. }
            | OutlineEvent::CurveTo { x, y, .. } => Some((x, y)),
            OutlineEvent::ClosePath => None,
        }
    }
}

/// Collects events, mostly useful for tests and for replaying an outline.
#[cfg(feature = "std")]
impl Pen for Vec<OutlineEvent> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.push(OutlineEvent::MoveTo { x, y })
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.push(OutlineEvent::LineTo { x, y })
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.push(OutlineEvent::QuadTo { cx0, cy0, x, y })
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.push(OutlineEvent::CurveTo {
            cx0,
            cy0,
            cx1,
            cy1,
            x,
            y,
        })
    }

    fn close(&mut self) {
        self.push(OutlineEvent::ClosePath)
    }
}

impl<T: Pen + ?Sized> Pen for &mut T {
    fn move_to(&mut self, x: f32, y: f32) {
        T::move_to(*self, x, y)
    }

    fn line_to(&mut self, x: f32, y: f32) {
        T::line_to(*self, x, y)
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        T::quad_to(*self, cx0, cy0, x, y)
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        T::curve_to(*self, cx0, cy0, cx1, cy1, x, y)
    }

    fn close(&mut self) {
        T::close(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_events() {
        let mut events = Vec::new();
        events.move_to(1.0, 2.0);
        events.quad_to(3.0, 4.0, 5.0, 6.0);
        events.close();
        let mut copy: Vec<OutlineEvent> = Vec::new();
        for event in &events {
            event.apply_to(&mut copy);
        }
        assert_eq!(events, copy);
        assert_eq!(events[1].end_point(), Some((5.0, 6.0)));
        assert_eq!(events[2].end_point(), None);
    }
}
