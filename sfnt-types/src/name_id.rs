//! Name Identifiers

use core::fmt;

/// Identifier for an informational string in the `name` table.
///
/// The predefined identifiers are provided as associated constants. IDs 26
/// to 255 are reserved, and IDs 256 to 32767 are font specific (for example
/// the names of variation axes and named instances).
///
/// For more detail, see <https://learn.microsoft.com/en-us/typography/opentype/spec/name#name-ids>
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NameId(u16);

impl NameId {
    /// Copyright notice.
    pub const COPYRIGHT_NOTICE: Self = Self(0);
    /// Font family name.
    pub const FAMILY_NAME: Self = Self(1);
    /// Font subfamily name, such as "Bold Italic".
    pub const SUBFAMILY_NAME: Self = Self(2);
    /// Unique font identifier.
    pub const UNIQUE_ID: Self = Self(3);
    /// Full font name.
    pub const FULL_NAME: Self = Self(4);
    /// Version string.
    pub const VERSION_STRING: Self = Self(5);
    /// PostScript name for the font.
    pub const POSTSCRIPT_NAME: Self = Self(6);
    /// Trademark notice.
    pub const TRADEMARK: Self = Self(7);
    /// Manufacturer name.
    pub const MANUFACTURER: Self = Self(8);
    /// Name of the designer of the typeface.
    pub const DESIGNER: Self = Self(9);
    /// Description of the typeface.
    pub const DESCRIPTION: Self = Self(10);
    /// URL of the font vendor.
    pub const VENDOR_URL: Self = Self(11);
    /// URL of the typeface designer.
    pub const DESIGNER_URL: Self = Self(12);
    /// License description.
    pub const LICENSE_DESCRIPTION: Self = Self(13);
    /// URL where additional licensing information can be found.
    pub const LICENSE_URL: Self = Self(14);
    /// Typographic family name.
    pub const TYPOGRAPHIC_FAMILY_NAME: Self = Self(16);
    /// Typographic subfamily name.
    pub const TYPOGRAPHIC_SUBFAMILY_NAME: Self = Self(17);
    /// Compatible full name (Macintosh only).
    pub const COMPATIBLE_FULL_NAME: Self = Self(18);
    /// Sample text.
    pub const SAMPLE_TEXT: Self = Self(19);
    /// PostScript CID findfont name.
    pub const POSTSCRIPT_CID_NAME: Self = Self(20);
    /// WWS family name.
    pub const WWS_FAMILY_NAME: Self = Self(21);
    /// WWS subfamily name.
    pub const WWS_SUBFAMILY_NAME: Self = Self(22);
    /// Light background palette.
    pub const LIGHT_BACKGROUND_PALETTE: Self = Self(23);
    /// Dark background palette.
    pub const DARK_BACKGROUND_PALETTE: Self = Self(24);
    /// Variations PostScript name prefix.
    pub const VARIATIONS_POSTSCRIPT_NAME_PREFIX: Self = Self(25);

    /// Create a new identifier from a raw u16 value.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns an iterator over the set of predefined identifiers.
    pub fn predefined() -> impl Iterator<Item = Self> + Clone {
        // Poor name id 15 got lost...
        (0..15).chain(16..=25).map(Self)
    }

    /// Return the identifier as a u16.
    pub const fn to_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for NameId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Debug for NameId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

crate::newtype_scalar!(NameId, [u8; 2]);
