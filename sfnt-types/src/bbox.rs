use core::ops::Mul;

/// Minimum and maximum extents of a rectangular region.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    /// Minimum extent in the x direction-- the left side of a region.
    pub x_min: T,
    /// Minimum extent in the y direction. In a Y-up coordinate system,
    /// which is used by fonts, this represents the bottom of a region.
    pub y_min: T,
    /// Maximum extent in the x direction-- the right side of a region.
    pub x_max: T,
    /// Maximum extend in the y direction. In a Y-up coordinate system,
    /// which is used by fonts, this represents the top of the
    /// region.
    pub y_max: T,
}

impl<T> BoundingBox<T>
where
    T: Mul<Output = T> + Copy,
{
    /// Return a `BoundingBox` scaled by a scale factor of the same type
    /// as the stored bounds.
    pub fn scale(&self, factor: T) -> Self {
        Self {
            x_min: self.x_min * factor,
            y_min: self.y_min * factor,
            x_max: self.x_max * factor,
            y_max: self.y_max * factor,
        }
    }
}

impl<T> BoundingBox<T>
where
    T: PartialOrd + Copy,
{
    /// A box that covers only the given point.
    pub fn from_point(x: T, y: T) -> Self {
        Self {
            x_min: x,
            y_min: y,
            x_max: x,
            y_max: y,
        }
    }

    /// Grow the box so that it covers the given point.
    pub fn extend(&mut self, x: T, y: T) {
        if x < self.x_min {
            self.x_min = x;
        }
        if x > self.x_max {
            self.x_max = x;
        }
        if y < self.y_min {
            self.y_min = y;
        }
        if y > self.y_max {
            self.y_max = y;
        }
    }

    /// Returns `true` if the minimum extents do not exceed the maximum ones.
    pub fn is_valid(&self) -> bool {
        self.x_min <= self.x_max && self.y_min <= self.y_max
    }
}

impl BoundingBox<f32> {
    /// Round the extents outward to the enclosing integer box.
    pub fn to_i16_bounds(self) -> BoundingBox<i16> {
        fn clamp(v: f32) -> i16 {
            v.clamp(i16::MIN as f32, i16::MAX as f32) as i16
        }
        BoundingBox {
            x_min: clamp(floor(self.x_min)),
            y_min: clamp(floor(self.y_min)),
            x_max: clamp(-floor(-self.x_max)),
            y_max: clamp(-floor(-self.y_max)),
        }
    }
}

// no_std friendly floor
fn floor(v: f32) -> f32 {
    let t = v as i32 as f32;
    if t > v {
        t - 1.0
    } else {
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_covers_points() {
        let mut bbox = BoundingBox::from_point(10, -5);
        bbox.extend(3, 0);
        bbox.extend(541, 656);
        assert_eq!(
            bbox,
            BoundingBox {
                x_min: 3,
                y_min: -5,
                x_max: 541,
                y_max: 656
            }
        );
        assert!(bbox.is_valid());
    }

    #[test]
    fn integer_bounds_round_outward() {
        let bbox = BoundingBox {
            x_min: -0.5f32,
            y_min: 1.25,
            x_max: 10.1,
            y_max: -2.5,
        };
        let int = bbox.to_i16_bounds();
        assert_eq!((int.x_min, int.y_min, int.x_max, int.y_max), (-1, 1, 11, -2));
    }
}
