//! Selection of a size and a position in variation space.

use alloc::vec::Vec;

use super::NormalizedCoord;

/// Font size in pixels per em.
///
/// Metrics and outlines are multiplied by `ppem / units_per_em`. Use
/// [`unscaled`](Self::unscaled) to keep values in design units.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug)]
pub struct Size(f32);

impl Size {
    /// Creates a size from pixels per em.
    ///
    /// Values `<= 0.0` (and NaN) behave like [`unscaled`](Self::unscaled).
    pub fn new(ppem: f32) -> Self {
        Self(ppem)
    }

    /// A size that leaves everything in design units.
    pub fn unscaled() -> Self {
        Self(0.0)
    }

    /// Pixels per em, or `None` when unscaled.
    pub fn ppem(self) -> Option<f32> {
        (self.0 > 0.0).then_some(self.0)
    }

    /// Factor that converts design units to pixels.
    ///
    /// Returns 1.0 for an unscaled size or a zero `units_per_em`.
    pub fn linear_scale(self, units_per_em: u16) -> f32 {
        match self.ppem() {
            Some(ppem) if units_per_em != 0 => ppem / units_per_em as f32,
            _ => 1.0,
        }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::unscaled()
    }
}

/// Borrowed sequence of normalized variation coordinates.
///
/// One coordinate per axis in `fvar` order, each in `[-1, 1]`. Missing
/// trailing coordinates are at the default (0) and extra ones are ignored.
/// The default value is the default location of every axis, and is the
/// only location of a font without variations.
#[derive(Copy, Clone, Default, Debug, PartialEq)]
pub struct LocationRef<'a>(&'a [NormalizedCoord]);

impl<'a> LocationRef<'a> {
    pub fn new(coords: &'a [NormalizedCoord]) -> Self {
        Self(coords)
    }

    pub fn coords(&self) -> &'a [NormalizedCoord] {
        self.0
    }

    /// True when every coordinate is at the default position.
    pub fn is_default(&self) -> bool {
        self.0.iter().all(|coord| *coord == NormalizedCoord::ZERO)
    }
}

impl<'a> From<&'a [NormalizedCoord]> for LocationRef<'a> {
    fn from(value: &'a [NormalizedCoord]) -> Self {
        Self(value)
    }
}

impl<'a> From<&'a Location> for LocationRef<'a> {
    fn from(value: &'a Location) -> Self {
        Self(&value.coords)
    }
}

impl<'a> IntoIterator for LocationRef<'a> {
    type IntoIter = core::slice::Iter<'a, NormalizedCoord>;
    type Item = &'a NormalizedCoord;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Owned position in variation space.
///
/// Usually produced by [`AxisCollection::location`](crate::AxisCollection::location)
/// from user space settings.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Location {
    coords: Vec<NormalizedCoord>,
}

impl Location {
    /// Creates the default location for a font with `len` axes.
    pub fn new(len: usize) -> Self {
        Self {
            coords: alloc::vec![NormalizedCoord::ZERO; len],
        }
    }

    pub fn coords(&self) -> &[NormalizedCoord] {
        &self.coords
    }

    pub fn coords_mut(&mut self) -> &mut [NormalizedCoord] {
        &mut self.coords
    }
}

impl From<Vec<NormalizedCoord>> for Location {
    fn from(coords: Vec<NormalizedCoord>) -> Self {
        Self { coords }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_scale() {
        assert_eq!(Size::unscaled().linear_scale(1000), 1.0);
        assert_eq!(Size::new(-4.0).linear_scale(1000), 1.0);
        assert_eq!(Size::new(16.0).linear_scale(0), 1.0);
        assert_eq!(Size::new(16.0).linear_scale(1000), 0.016);
        assert_eq!(Size::new(f32::NAN).ppem(), None);
    }

    #[test]
    fn default_location() {
        let location = Location::new(2);
        let loc_ref = LocationRef::from(&location);
        assert_eq!(loc_ref.coords().len(), 2);
        assert!(loc_ref.is_default());
        assert!(LocationRef::default().is_default());
        let moved = Location::from(vec![NormalizedCoord::ZERO, NormalizedCoord::ONE]);
        assert!(!LocationRef::from(&moved).is_default());
    }
}
