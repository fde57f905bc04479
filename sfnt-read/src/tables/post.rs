//! the [post (PostScript)](https://docs.microsoft.com/en-us/typography/opentype/spec/post#header) table

use types::{BigEndian, Fixed, GlyphId, Tag, Version16Dot16};

use crate::{FontData, FontRead, ReadError};

/// 'post'
pub const TAG: Tag = Tag::new(b"post");

/// Apple's composite font version; it carries no names.
const VERSION_4_0: Version16Dot16 = Version16Dot16::new(4, 0);

/// The [post](https://docs.microsoft.com/en-us/typography/opentype/spec/post)
/// (PostScript) table.
#[derive(Clone, Copy)]
pub struct Post<'a> {
    data: FontData<'a>,
    glyph_name_index: &'a [BigEndian<u16>],
    string_data: FontData<'a>,
}

impl<'a> FontRead<'a> for Post<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: Version16Dot16 = data.read_at(0)?;
        if data.len() < Self::HEADER_LEN {
            return Err(ReadError::OutOfBounds);
        }
        let (glyph_name_index, string_data) = match version {
            Version16Dot16::VERSION_2_0 => {
                let num_glyphs: u16 = data.read_at(Self::HEADER_LEN)?;
                let start = Self::HEADER_LEN + 2;
                let end = start + num_glyphs as usize * 2;
                let index = data.read_array(start..end)?;
                (index, data.split_off(end).unwrap_or_default())
            }
            Version16Dot16::VERSION_1_0
            | Version16Dot16::VERSION_2_5
            | Version16Dot16::VERSION_3_0
            | VERSION_4_0 => (Default::default(), FontData::EMPTY),
            other => return Err(ReadError::InvalidFormat(other.to_bits() as i64)),
        };
        Ok(Self {
            data,
            glyph_name_index,
            string_data,
        })
    }
}

impl<'a> Post<'a> {
    const HEADER_LEN: usize = 32;

    pub fn version(&self) -> Version16Dot16 {
        self.data.read_at(0).unwrap_or(Version16Dot16::VERSION_3_0)
    }

    /// Italic angle in counter-clockwise degrees from the vertical.
    pub fn italic_angle(&self) -> Fixed {
        self.data.read_at(4).unwrap_or_default()
    }

    /// Suggested distance of the top of the underline from the baseline
    /// (negative values indicate below baseline).
    pub fn underline_position(&self) -> i16 {
        self.data.read_at(8).unwrap_or_default()
    }

    /// Suggested values for the underline thickness.
    pub fn underline_thickness(&self) -> i16 {
        self.data.read_at(10).unwrap_or_default()
    }

    /// Nonzero if the font is monospaced.
    pub fn is_fixed_pitch(&self) -> u32 {
        self.data.read_at(12).unwrap_or_default()
    }

    pub fn min_mem_type42(&self) -> u32 {
        self.data.read_at(16).unwrap_or_default()
    }

    pub fn max_mem_type42(&self) -> u32 {
        self.data.read_at(20).unwrap_or_default()
    }

    pub fn min_mem_type1(&self) -> u32 {
        self.data.read_at(24).unwrap_or_default()
    }

    pub fn max_mem_type1(&self) -> u32 {
        self.data.read_at(28).unwrap_or_default()
    }

    /// Version 2.0: the number of glyphs with a name index.
    pub fn num_glyphs(&self) -> Option<u16> {
        (self.version() == Version16Dot16::VERSION_2_0).then_some(self.glyph_name_index.len() as u16)
    }

    /// Version 2.0: indices into the standard names, or into the custom
    /// names when 258 or greater.
    pub fn glyph_name_index(&self) -> Option<&'a [BigEndian<u16>]> {
        (self.version() == Version16Dot16::VERSION_2_0).then_some(self.glyph_name_index)
    }

    /// The custom glyph names of a version 2.0 table, in storage order.
    pub fn string_data(&self) -> PStrings<'a> {
        PStrings {
            data: self.string_data,
        }
    }

    /// The number of glyph names covered by this table
    pub fn num_names(&self) -> usize {
        match self.version() {
            Version16Dot16::VERSION_1_0 => DEFAULT_GLYPH_NAMES.len(),
            Version16Dot16::VERSION_2_0 => self.glyph_name_index.len(),
            _ => 0,
        }
    }

    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<&'a str> {
        let glyph_id = glyph_id.to_u16() as usize;
        match self.version() {
            Version16Dot16::VERSION_1_0 => DEFAULT_GLYPH_NAMES.get(glyph_id).copied(),
            Version16Dot16::VERSION_2_0 => {
                let idx = self.glyph_name_index.get(glyph_id)?.get() as usize;
                if idx < DEFAULT_GLYPH_NAMES.len() {
                    return DEFAULT_GLYPH_NAMES.get(idx).copied();
                }
                let idx = idx - DEFAULT_GLYPH_NAMES.len();
                match self.string_data().nth(idx) {
                    Some(Ok(s)) => Some(s.as_str()),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Returns the first glyph with the given name.
    pub fn glyph_id_for_name(&self, name: &str) -> Option<GlyphId> {
        (0..self.num_names())
            .map(|gid| GlyphId::new(gid as u16))
            .find(|gid| self.glyph_name(*gid) == Some(name))
    }
}

impl core::fmt::Debug for Post<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Post")
            .field("version", &self.version())
            .field("italic_angle", &self.italic_angle())
            .field("underline_position", &self.underline_position())
            .field("underline_thickness", &self.underline_thickness())
            .field("num_names", &self.num_names())
            .finish()
    }
}

/// A string in the post table.
///
/// This is basically just a newtype that knows how to parse from a Pascal-style
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PString<'a>(&'a str);

impl<'a> PString<'a> {
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}

impl std::ops::Deref for PString<'_> {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl PartialEq<&str> for PString<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<'a> FontRead<'a> for PString<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let len: u8 = data.read_at(0)?;
        let pstring = data
            .as_bytes()
            .get(1..len as usize + 1)
            .ok_or(ReadError::OutOfBounds)?;
        if !pstring.is_ascii() {
            return Err(ReadError::MalformedData("Must be valid ascii"));
        }
        core::str::from_utf8(pstring)
            .map(PString)
            .map_err(|_| ReadError::MalformedData("Must be valid ascii"))
    }
}

/// An iterator over the Pascal strings of a version 2.0 table.
#[derive(Clone)]
pub struct PStrings<'a> {
    data: FontData<'a>,
}

impl<'a> Iterator for PStrings<'a> {
    type Item = Result<PString<'a>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }
        let len = self.data.read_at::<u8>(0).unwrap_or_default() as usize;
        let item = PString::read(self.data);
        // a bad string still has a length, so we can move past it
        self.data = self.data.split_off(len + 1).unwrap_or_default();
        Some(item)
    }
}

/// The 258 glyph names defined for Macintosh TrueType fonts
#[rustfmt::skip]
pub static DEFAULT_GLYPH_NAMES: [&str; 258] = [
    ".notdef", ".null", "nonmarkingreturn", "space", "exclam", "quotedbl", "numbersign", "dollar",
    "percent", "ampersand", "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma",
    "hyphen", "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at", "A", "B",
    "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R", "S", "T", "U",
    "V", "W", "X", "Y", "Z", "bracketleft", "backslash", "bracketright", "asciicircum",
    "underscore", "grave", "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n",
    "o", "p", "q", "r", "s", "t", "u", "v", "w", "x", "y", "z", "braceleft", "bar", "braceright",
    "asciitilde", "Adieresis", "Aring", "Ccedilla", "Eacute", "Ntilde", "Odieresis", "Udieresis",
    "aacute", "agrave", "acircumflex", "adieresis", "atilde", "aring", "ccedilla", "eacute",
    "egrave", "ecircumflex", "edieresis", "iacute", "igrave", "icircumflex", "idieresis", "ntilde",
    "oacute", "ograve", "ocircumflex", "odieresis", "otilde", "uacute", "ugrave", "ucircumflex",
    "udieresis", "dagger", "degree", "cent", "sterling", "section", "bullet", "paragraph",
    "germandbls", "registered", "copyright", "trademark", "acute", "dieresis", "notequal", "AE",
    "Oslash", "infinity", "plusminus", "lessequal", "greaterequal", "yen", "mu", "partialdiff",
    "summation", "product", "pi", "integral", "ordfeminine", "ordmasculine", "Omega", "ae",
    "oslash", "questiondown", "exclamdown", "logicalnot", "radical", "florin", "approxequal",
    "Delta", "guillemotleft", "guillemotright", "ellipsis", "nonbreakingspace", "Agrave", "Atilde",
    "Otilde", "OE", "oe", "endash", "emdash", "quotedblleft", "quotedblright", "quoteleft",
    "quoteright", "divide", "lozenge", "ydieresis", "Ydieresis", "fraction", "currency",
    "guilsinglleft", "guilsinglright", "fi", "fl", "daggerdbl", "periodcentered", "quotesinglbase",
    "quotedblbase", "perthousand", "Acircumflex", "Ecircumflex", "Aacute", "Edieresis", "Egrave",
    "Iacute", "Icircumflex", "Idieresis", "Igrave", "Oacute", "Ocircumflex", "apple", "Ograve",
    "Uacute", "Ucircumflex", "Ugrave", "dotlessi", "circumflex", "tilde", "macron", "breve",
    "dotaccent", "ring", "cedilla", "hungarumlaut", "ogonek", "caron", "Lslash", "lslash",
    "Scaron", "scaron", "Zcaron", "zcaron", "brokenbar", "Eth", "eth", "Yacute", "yacute", "Thorn",
    "thorn", "minus", "multiply", "onesuperior", "twosuperior", "threesuperior", "onehalf",
    "onequarter", "threequarters", "franc", "Gbreve", "gbreve", "Idotaccent", "Scedilla",
    "scedilla", "Cacute", "cacute", "Ccaron", "ccaron", "dcroat",
];

#[cfg(test)]
mod tests {
    use sfnt_test_data::tables::post_table;

    use super::*;

    #[test]
    fn version_2() {
        let data = post_table(
            Fixed::from_f64(-12.5),
            -75,
            50,
            true,
            Some((&[0, 3, 258, 259, 260, 36][..], &["hello", "hi", "hola"][..])),
        );
        let post = Post::read(FontData::new(&data)).unwrap();
        assert_eq!(post.version(), Version16Dot16::VERSION_2_0);
        assert_eq!(post.italic_angle(), Fixed::from_f64(-12.5));
        assert_eq!(post.underline_position(), -75);
        assert_eq!(post.underline_thickness(), 50);
        assert_eq!(post.is_fixed_pitch(), 1);
        assert_eq!(post.num_names(), 6);
        let name = |gid| post.glyph_name(GlyphId::new(gid));
        assert_eq!(name(0), Some(".notdef"));
        assert_eq!(name(1), Some("space"));
        assert_eq!(name(2), Some("hello"));
        assert_eq!(name(3), Some("hi"));
        assert_eq!(name(4), Some("hola"));
        assert_eq!(name(5), Some("A"));
        assert_eq!(name(6), None);
        assert_eq!(post.glyph_id_for_name("hola"), Some(GlyphId::new(4)));
        assert_eq!(post.glyph_id_for_name("nope"), None);
        assert_eq!(post.string_data().count(), 3);
    }

    #[test]
    fn version_1_and_3() {
        let mut data = post_table(Fixed::ZERO, -100, 40, false, None);
        let post = Post::read(FontData::new(&data)).unwrap();
        assert_eq!(post.version(), Version16Dot16::VERSION_3_0);
        assert_eq!(post.num_names(), 0);
        assert_eq!(post.glyph_name(GlyphId::new(3)), None);
        assert!(post.glyph_name_index().is_none());

        data[..4].copy_from_slice(&0x00010000u32.to_be_bytes());
        let post = Post::read(FontData::new(&data)).unwrap();
        assert_eq!(post.num_names(), 258);
        assert_eq!(post.glyph_name(GlyphId::new(36)), Some("A"));
        assert_eq!(post.glyph_id_for_name("space"), Some(GlyphId::new(3)));
    }

    #[test]
    fn unknown_version() {
        let mut data = post_table(Fixed::ZERO, 0, 0, false, None);
        data[..4].copy_from_slice(&0x00070000u32.to_be_bytes());
        assert_eq!(
            Post::read(FontData::new(&data)).err(),
            Some(ReadError::InvalidFormat(0x00070000))
        );
    }

    #[test]
    fn truncated_names() {
        let data = post_table(Fixed::ZERO, 0, 0, false, Some((&[258][..], &["long_name"][..])));
        let post = Post::read(FontData::new(&data[..data.len() - 2])).unwrap();
        assert_eq!(post.glyph_name(GlyphId::new(0)), None);
        assert!(Post::read(FontData::new(&data[..34])).is_err());
    }
}
