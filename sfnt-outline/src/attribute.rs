//! Style, weight and width attributes used for font selection.

use raw::{
    tables::{
        head::{Head, MacStyle},
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    TableProvider,
};

/// Visual weight, usually in the range 1 to 1000.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Weight(u16);

impl Weight {
    pub const THIN: Self = Self(100);
    pub const EXTRA_LIGHT: Self = Self(200);
    pub const LIGHT: Self = Self(300);
    pub const NORMAL: Self = Self(400);
    pub const MEDIUM: Self = Self(500);
    pub const SEMI_BOLD: Self = Self(600);
    pub const BOLD: Self = Self(700);
    pub const EXTRA_BOLD: Self = Self(800);
    pub const BLACK: Self = Self(900);

    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u16 {
        self.0
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Relative width of the glyphs, from the OS/2 `usWidthClass` field.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub enum Width {
    UltraCondensed = 1,
    ExtraCondensed = 2,
    Condensed = 3,
    SemiCondensed = 4,
    #[default]
    Normal = 5,
    SemiExpanded = 6,
    Expanded = 7,
    ExtraExpanded = 8,
    UltraExpanded = 9,
}

impl Width {
    /// Values outside `1..=9` are [`Width::Normal`].
    pub fn from_width_class(class: u16) -> Self {
        match class {
            1 => Self::UltraCondensed,
            2 => Self::ExtraCondensed,
            3 => Self::Condensed,
            4 => Self::SemiCondensed,
            6 => Self::SemiExpanded,
            7 => Self::Expanded,
            8 => Self::ExtraExpanded,
            9 => Self::UltraExpanded,
            _ => Self::Normal,
        }
    }

    /// The width class in `1..=9`.
    pub fn class(self) -> u16 {
        self as u16
    }

    /// Width as a percentage of normal, as used by CSS `font-stretch`.
    pub fn to_percentage(self) -> f32 {
        [50.0, 62.5, 75.0, 87.5, 100.0, 112.5, 125.0, 150.0, 200.0][self as usize - 1]
    }
}

/// Slant of the glyphs.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub enum Style {
    #[default]
    Normal,
    Italic,
    /// Slanted without cursive forms, with the `post` italic angle in
    /// degrees when available.
    Oblique(Option<f32>),
}

/// Classification attributes of the default instance of a font.
///
/// Read from `OS/2` when present, with the `head` mac style as the
/// fallback.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Attributes {
    pub width: Width,
    pub style: Style,
    pub weight: Weight,
    is_regular: bool,
    is_bold: bool,
}

impl Attributes {
    pub fn new<'a>(font: &impl TableProvider<'a>) -> Self {
        if let Ok(os2) = font.os2() {
            Self::from_os2_post(os2, font.post().ok())
        } else if let Ok(head) = font.head() {
            Self::from_head(head)
        } else {
            Self::default()
        }
    }

    /// True if the font is the regular face of its family.
    pub fn is_regular(&self) -> bool {
        self.is_regular
    }

    pub fn is_bold(&self) -> bool {
        self.is_bold
    }

    pub fn is_italic(&self) -> bool {
        self.style == Style::Italic
    }

    pub fn is_oblique(&self) -> bool {
        matches!(self.style, Style::Oblique(_))
    }

    fn from_os2_post(os2: Os2, post: Option<Post>) -> Self {
        let selection = os2.fs_selection();
        let style = if selection.contains(SelectionFlags::ITALIC) {
            Style::Italic
        } else if selection.contains(SelectionFlags::OBLIQUE) {
            Style::Oblique(post.map(|post| post.italic_angle().to_f32()))
        } else {
            Style::Normal
        };
        Self {
            width: Width::from_width_class(os2.us_width_class()),
            style,
            // not clamped: variable fonts may exceed 1..=1000
            weight: Weight::new(os2.us_weight_class()),
            is_regular: selection.contains(SelectionFlags::REGULAR),
            is_bold: selection.contains(SelectionFlags::BOLD),
        }
    }

    fn from_head(head: Head) -> Self {
        let mac_style = head.mac_style();
        let is_bold = mac_style.contains(MacStyle::BOLD);
        let is_italic = mac_style.contains(MacStyle::ITALIC);
        Self {
            width: Width::Normal,
            style: if is_italic {
                Style::Italic
            } else {
                Style::Normal
            },
            weight: if is_bold {
                Weight::BOLD
            } else {
                Weight::NORMAL
            },
            is_regular: !is_bold && !is_italic,
            is_bold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataProvider;
    use raw::{types::Tag, FontRef};
    use sfnt_test_data::{glyf_a, tables::Os2Builder, variable};

    #[test]
    fn regular_from_os2() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let attrs = font.attributes();
        assert_eq!(attrs.weight.value(), 400);
        assert_eq!(attrs.width, Width::Normal);
        assert_eq!(attrs.width.class(), 5);
        assert_eq!(attrs.style, Style::Normal);
        assert!(attrs.is_regular());
        assert!(!attrs.is_bold());
        assert!(!attrs.is_italic());
        assert!(!attrs.is_oblique());
    }

    #[test]
    fn bold_oblique() {
        let mut builder = glyf_a::builder();
        let os2 = Os2Builder {
            version: 4,
            weight_class: 700,
            width_class: 3,
            fs_selection: 0x0020 | 0x0200,
            ..Default::default()
        };
        builder.add_raw(Tag::new(b"OS/2"), os2.build());
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        let attrs = font.attributes();
        assert_eq!(attrs.weight, Weight::BOLD);
        assert_eq!(attrs.width, Width::Condensed);
        assert_eq!(attrs.style, Style::Oblique(Some(0.0)));
        assert!(attrs.is_bold());
        assert!(attrs.is_oblique());
        assert!(!attrs.is_regular());
    }

    #[test]
    fn fallback_to_head() {
        // the variable fixture has no OS/2 table
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        let attrs = font.attributes();
        assert_eq!(attrs.weight, Weight::NORMAL);
        assert_eq!(attrs.width, Width::Normal);
        assert!(attrs.is_regular());
    }

    #[test]
    fn width_classes() {
        assert_eq!(Width::from_width_class(0), Width::Normal);
        assert_eq!(Width::from_width_class(12), Width::Normal);
        assert_eq!(Width::from_width_class(9).to_percentage(), 200.0);
        assert_eq!(Width::UltraCondensed.to_percentage(), 50.0);
    }
}
