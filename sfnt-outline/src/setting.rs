//! Axis settings for selecting a location in a variable font.

use super::Tag;
use core::str::FromStr;

/// A tag paired with a value.
///
/// Used to request a position on a variation axis, where the tag names the
/// axis and the value is in user space (the units of the `fvar` table, such
/// as 700 for a bold weight). Mirrors the pairs accepted by the CSS
/// [font-variation-settings](https://developer.mozilla.org/en-US/docs/Web/CSS/font-variation-settings)
/// property.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Setting<T> {
    /// Tag of the target axis.
    pub selector: Tag,
    /// Requested value.
    pub value: T,
}

impl<T> Setting<T> {
    pub fn new(selector: Tag, value: T) -> Self {
        Self { selector, value }
    }
}

impl<T: Copy> From<&'_ Setting<T>> for Setting<T> {
    fn from(value: &'_ Setting<T>) -> Self {
        *value
    }
}

impl<T> From<(Tag, T)> for Setting<T> {
    fn from((selector, value): (Tag, T)) -> Self {
        Self { selector, value }
    }
}

impl<T: Copy> From<&(Tag, T)> for Setting<T> {
    fn from(&(selector, value): &(Tag, T)) -> Self {
        Self { selector, value }
    }
}

/// Invalid tags become the default (all spaces) tag, which never matches
/// an axis.
impl<T> From<(&str, T)> for Setting<T> {
    fn from((tag, value): (&str, T)) -> Self {
        Self {
            selector: Tag::from_str(tag).unwrap_or_default(),
            value,
        }
    }
}

impl<T: Copy> From<&(&str, T)> for Setting<T> {
    fn from(&(tag, value): &(&str, T)) -> Self {
        (tag, value).into()
    }
}

/// A variation axis setting in user space coordinates.
pub type VariationSetting = Setting<f32>;

/// Error produced when parsing a [`VariationSetting`] from text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseSettingError;

impl core::fmt::Display for ParseSettingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("expected a setting of the form 'tag=value'")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseSettingError {}

/// Parses `tag=value`, for example `wght=700`.
impl FromStr for VariationSetting {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (tag, value) = s.split_once('=').ok_or(ParseSettingError)?;
        let selector = Tag::from_str(tag.trim()).map_err(|_| ParseSettingError)?;
        let value = value.trim().parse().map_err(|_| ParseSettingError)?;
        Ok(Self { selector, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_setting() {
        let setting: VariationSetting = "wght=700".parse().unwrap();
        assert_eq!(setting, Setting::new(Tag::new(b"wght"), 700.0));
        let setting: VariationSetting = " wdth = 75.5 ".parse().unwrap();
        assert_eq!(setting.selector, Tag::new(b"wdth"));
        assert_eq!(setting.value, 75.5);
        assert!("wght".parse::<VariationSetting>().is_err());
        assert!("wght=bold".parse::<VariationSetting>().is_err());
    }

    #[test]
    fn from_str_pair() {
        let setting = VariationSetting::from(("wght", 300.0));
        assert_eq!(setting.selector, Tag::new(b"wght"));
        let bad = VariationSetting::from(("too long", 1.0));
        assert_eq!(bad.selector, Tag::default());
    }
}
