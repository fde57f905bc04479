//! Axes and named instances of a variable font.

use raw::{
    tables::avar::Avar,
    tables::fvar::{self, Fvar},
    types::{Fixed, NameId, Tag},
    TableProvider,
};

use crate::{instance::Location, setting::VariationSetting, NormalizedCoord};

/// A single axis of variation.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/fvar#variationaxisrecord>
#[derive(Clone)]
pub struct Axis {
    index: usize,
    record: fvar::VariationAxisRecord,
}

impl Axis {
    pub fn tag(&self) -> Tag {
        self.record.axis_tag()
    }

    /// Position of the axis in `fvar` order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Name table identifier for the display name of the axis.
    pub fn name_id(&self) -> NameId {
        self.record.axis_name_id()
    }

    /// True if the axis should not be exposed in user interfaces.
    pub fn is_hidden(&self) -> bool {
        self.record.is_hidden()
    }

    pub fn min_value(&self) -> f32 {
        self.record.min_value().to_f32()
    }

    pub fn default_value(&self) -> f32 {
        self.record.default_value().to_f32()
    }

    pub fn max_value(&self) -> f32 {
        self.record.max_value().to_f32()
    }

    /// Maps a user space value to `[-1, 1]`, clamping to the axis range.
    ///
    /// The `avar` remapping is not applied here; see
    /// [`AxisCollection::location`].
    pub fn normalize(&self, value: f32) -> NormalizedCoord {
        self.record.normalize(Fixed::from_f32(value)).to_f2dot14()
    }
}

/// The variation axes of a font.
///
/// Empty for fonts without an `fvar` table.
#[derive(Clone)]
pub struct AxisCollection<'a> {
    fvar: Option<Fvar<'a>>,
    avar: Option<Avar<'a>>,
}

impl<'a> AxisCollection<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        let fvar = font.fvar().ok();
        // avar without fvar has nothing to remap
        let avar = fvar.as_ref().and_then(|_| font.avar().ok());
        Self { fvar, avar }
    }

    pub fn len(&self) -> usize {
        self.fvar
            .as_ref()
            .map(|fvar| fvar.axes().len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Axis> {
        let record = *self.fvar.as_ref()?.axes().get(index)?;
        Some(Axis { index, record })
    }

    pub fn get_by_tag(&self, tag: Tag) -> Option<Axis> {
        self.iter().find(|axis| axis.tag() == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = Axis> + 'a + Clone {
        let copy = self.clone();
        (0..self.len()).filter_map(move |i| copy.get(i))
    }

    /// Converts user space settings to a normalized location.
    ///
    /// Settings for tags that name no axis are ignored, values are clamped
    /// to their axis range and the last setting for an axis wins. Axes
    /// without a setting stay at the default position. The `avar` segment
    /// maps are applied after default normalization.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use sfnt_outline::{raw::FontRef, MetadataProvider};
    /// # fn wrapper(font: &FontRef) {
    /// let location = font.axes().location([("wght", 250.0), ("wdth", 75.0)]);
    /// # }
    /// ```
    pub fn location<I>(&self, settings: I) -> Location
    where
        I: IntoIterator,
        I::Item: Into<VariationSetting>,
    {
        let mut location = Location::new(self.len());
        self.location_to_slice(settings, location.coords_mut());
        location
    }

    /// Same as [`location`](Self::location) but writes into `coords`.
    ///
    /// Coordinates past the axis count are set to zero.
    pub fn location_to_slice<I>(&self, settings: I, coords: &mut [NormalizedCoord])
    where
        I: IntoIterator,
        I::Item: Into<VariationSetting>,
    {
        coords.fill(NormalizedCoord::ZERO);
        let Some(fvar) = self.fvar.as_ref() else {
            return;
        };
        let axes = fvar.axes();
        let mut user = [None; 64];
        for setting in settings {
            let setting = setting.into();
            if let Some(index) = axes
                .iter()
                .position(|axis| axis.axis_tag() == setting.selector)
            {
                if let Some(slot) = user.get_mut(index) {
                    *slot = Some(setting.value);
                }
            }
        }
        for (index, (axis, coord)) in axes.iter().zip(coords.iter_mut()).enumerate() {
            let Some(value) = user.get(index).copied().flatten() else {
                continue;
            };
            *coord = axis.normalize(Fixed::from_f32(value)).to_f2dot14();
        }
        self.apply_avar(coords);
    }

    fn apply_avar(&self, coords: &mut [NormalizedCoord]) {
        let Some(avar) = self.avar.as_ref() else {
            return;
        };
        for (maps, coord) in avar.axis_segment_maps().zip(coords.iter_mut()) {
            match maps {
                Ok(maps) => *coord = maps.apply(coord.to_fixed()).to_f2dot14(),
                Err(e) => {
                    log::warn!("ignoring malformed avar segment map: {e}");
                    return;
                }
            }
        }
    }
}

/// A location in design space chosen and named by the designer.
///
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/fvar#instancerecord>
#[derive(Clone)]
pub struct NamedInstance<'a> {
    axes: AxisCollection<'a>,
    record: fvar::InstanceRecord<'a>,
}

impl<'a> NamedInstance<'a> {
    pub fn subfamily_name_id(&self) -> NameId {
        self.record.subfamily_name_id
    }

    pub fn postscript_name_id(&self) -> Option<NameId> {
        self.record.post_script_name_id
    }

    /// User space coordinates of the instance, one per axis.
    pub fn user_coords(&self) -> impl Iterator<Item = f32> + 'a + Clone {
        self.record
            .coordinates
            .iter()
            .map(|coord| coord.get().to_f32())
    }

    /// The normalized location of the instance.
    pub fn location(&self) -> Location {
        let settings = self
            .axes
            .iter()
            .zip(self.user_coords())
            .map(|(axis, value)| VariationSetting::new(axis.tag(), value));
        self.axes.location(settings)
    }
}

/// The named instances of a font.
#[derive(Clone)]
pub struct NamedInstanceCollection<'a> {
    axes: AxisCollection<'a>,
}

impl<'a> NamedInstanceCollection<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        Self {
            axes: AxisCollection::new(font),
        }
    }

    pub fn len(&self) -> usize {
        self.axes
            .fvar
            .as_ref()
            .map(|fvar| fvar.instance_count() as usize)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<NamedInstance<'a>> {
        let index = u16::try_from(index).ok()?;
        let record = self.axes.fvar.as_ref()?.instance(index).ok()?;
        Some(NamedInstance {
            axes: self.axes.clone(),
            record,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = NamedInstance<'a>> + 'a + Clone {
        let copy = self.clone();
        (0..self.len()).filter_map(move |i| copy.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataProvider as _;
    use raw::FontRef;
    use sfnt_test_data::{glyf_a, variable};

    fn coords(location: &Location) -> Vec<f32> {
        location.coords().iter().map(|c| c.to_f32()).collect()
    }

    #[test]
    fn axes() {
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        let axes = font.axes();
        assert_eq!(axes.len(), 2);
        let wght = axes.get_by_tag(Tag::new(b"wght")).unwrap();
        assert_eq!(wght.index(), 0);
        assert_eq!(
            (wght.min_value(), wght.default_value(), wght.max_value()),
            (100.0, 400.0, 900.0)
        );
        assert_eq!(wght.name_id(), NameId::new(variable::WEIGHT_NAME_ID));
        assert!(!wght.is_hidden());
        let wdth = axes.get(1).unwrap();
        assert_eq!(wdth.tag(), Tag::new(b"wdth"));
        assert!(wdth.is_hidden());
        assert!(axes.get(2).is_none());
        assert_eq!(wght.normalize(650.0).to_f32(), 0.5);
        assert_eq!(wght.normalize(2000.0).to_f32(), 1.0);
    }

    #[test]
    fn location_applies_avar() {
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        let axes = font.axes();
        // 650 normalizes to 0.5, which avar maps to 0.25
        let location = axes.location([("wght", 650.0), ("wdth", 50.0)]);
        assert_eq!(coords(&location), [0.25, -1.0]);
        // last setting wins, unknown tags are ignored
        let location = axes.location([("wght", 100.0), ("opsz", 12.0), ("wght", 900.0)]);
        assert_eq!(coords(&location), [1.0, 0.0]);
        let location = axes.location(core::iter::empty::<VariationSetting>());
        assert_eq!(coords(&location), [0.0, 0.0]);
    }

    #[test]
    fn named_instances() {
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        let instances = font.named_instances();
        assert_eq!(instances.len(), 2);
        let black = instances.get(1).unwrap();
        assert_eq!(black.subfamily_name_id(), NameId::new(variable::BLACK_NAME_ID));
        assert_eq!(black.postscript_name_id(), Some(NameId::new(261)));
        assert_eq!(black.user_coords().collect::<Vec<_>>(), [900.0, 100.0]);
        assert_eq!(coords(&black.location()), [1.0, 0.0]);
        let thin = instances.iter().next().unwrap();
        assert_eq!(coords(&thin.location()), [-1.0, 0.0]);
        assert!(instances.get(2).is_none());
    }

    #[test]
    fn static_font_has_no_axes() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        assert!(font.axes().is_empty());
        assert!(font.named_instances().is_empty());
        let location = font.axes().location([("wght", 700.0)]);
        assert!(location.coords().is_empty());
    }
}
