//! Localized strings from the `name` table.
//!
//! # Example
//! Print every predefined string of a font:
//! ```
//! use sfnt_outline::{string::StringId, MetadataProvider};
//!
//! fn print_well_known_strings<'a>(font: &impl MetadataProvider<'a>) {
//!     for id in StringId::predefined() {
//!         for string in font.localized_strings(id) {
//!             println!("[{id}] {:?} {}", string.language(), string);
//!         }
//!     }
//! }
//! ```

use core::fmt;

use raw::{
    tables::name::{CharIter, Name, NameRecord, NameString},
    TableProvider,
};

#[doc(inline)]
pub use raw::types::NameId as StringId;

/// Iterator over the strings of a `name` table, in storage order.
///
/// Either every record or only the records for a single identifier.
#[derive(Clone)]
pub struct LocalizedStrings<'a> {
    name: Option<Name<'a>>,
    records: core::slice::Iter<'a, NameRecord>,
    id: Option<StringId>,
}

impl<'a> LocalizedStrings<'a> {
    /// Strings for the given identifier.
    pub fn new(font: &impl TableProvider<'a>, id: StringId) -> Self {
        Self::with_filter(font, Some(id))
    }

    /// Every string in the font.
    pub fn all(font: &impl TableProvider<'a>) -> Self {
        Self::with_filter(font, None)
    }

    fn with_filter(font: &impl TableProvider<'a>, id: Option<StringId>) -> Self {
        let name = match font.name() {
            Ok(name) => Some(name),
            Err(e) => {
                log::debug!("no usable name table: {e}");
                None
            }
        };
        let records = name
            .as_ref()
            .map(|name| name.name_record().iter())
            .unwrap_or([].iter());
        Self { name, records, id }
    }

    /// The identifier being filtered on, if any.
    pub fn id(&self) -> Option<StringId> {
        self.id
    }

    /// Prefers "en-US", then "en", then a string without a language, and
    /// finally the first string.
    pub fn english_or_first(self) -> Option<LocalizedString<'a>> {
        let mut best: Option<(u8, LocalizedString<'a>)> = None;
        for (i, string) in self.enumerate() {
            let rank = match (i, string.language()) {
                (_, Some("en-US")) => return Some(string),
                (_, Some("en")) => 3,
                (_, None) => 2,
                (0, _) => 1,
                _ => continue,
            };
            if best.as_ref().map_or(true, |(best_rank, _)| rank > *best_rank) {
                best = Some((rank, string));
            }
        }
        best.map(|(_, string)| string)
    }
}

impl<'a> Iterator for LocalizedStrings<'a> {
    type Item = LocalizedString<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.name.as_ref()?;
        let id = self.id;
        let record = self
            .records
            .find(|record| id.map_or(true, |id| record.name_id() == id))?;
        Some(LocalizedString::new(name, record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.records.len()))
    }
}

impl Default for LocalizedStrings<'_> {
    fn default() -> Self {
        Self {
            name: None,
            records: [].iter(),
            id: None,
        }
    }
}

/// Error produced when decoding a string into a caller provided buffer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DecodeError {
    /// The UTF-8 encoding of the string needs `required` bytes.
    BufferTooSmall { required: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { required } => {
                write!(f, "buffer too small, {required} bytes required")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// A single name record with its decoded language.
#[derive(Clone, Debug)]
pub struct LocalizedString<'a> {
    record: NameRecord,
    language: Option<Language>,
    value: Option<NameString<'a>>,
}

impl<'a> LocalizedString<'a> {
    fn new(name: &Name<'a>, record: &NameRecord) -> Self {
        let language = Language::new(name, record);
        let value = match record.string(name.string_data()) {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("name record {} is out of bounds: {e}", record.name_id());
                None
            }
        };
        Self {
            record: *record,
            language,
            value,
        }
    }

    pub fn id(&self) -> StringId {
        self.record.name_id()
    }

    pub fn platform_id(&self) -> u16 {
        self.record.platform_id()
    }

    pub fn encoding_id(&self) -> u16 {
        self.record.encoding_id()
    }

    /// The raw platform specific language identifier.
    pub fn language_id(&self) -> u16 {
        self.record.language_id()
    }

    /// BCP-47 tag for the language of the string, when known.
    pub fn language(&self) -> Option<&str> {
        self.language.as_ref().map(Language::as_str)
    }

    /// The characters of the string.
    ///
    /// UTF-16BE for the Unicode and Windows platforms and Mac Roman for the
    /// Macintosh platform. Strings in other encodings are empty.
    pub fn chars(&self) -> Chars<'a> {
        Chars {
            inner: self.value.map(|value| value.chars()),
        }
    }

    /// Writes the string as UTF-8 into `buf` and returns the number of
    /// bytes written.
    ///
    /// Nothing is written when the buffer is too small.
    pub fn decode_into(&self, buf: &mut [u8]) -> Result<usize, DecodeError> {
        let required = self.chars().map(char::len_utf8).sum();
        if required > buf.len() {
            return Err(DecodeError::BufferTooSmall { required });
        }
        let mut pos = 0;
        for ch in self.chars() {
            pos += ch.encode_utf8(&mut buf[pos..]).len();
        }
        Ok(pos)
    }
}

impl fmt::Display for LocalizedString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for ch in self.chars() {
            f.write_char(ch)?;
        }
        Ok(())
    }
}

/// Iterator over the characters of a [`LocalizedString`].
#[derive(Clone)]
pub struct Chars<'a> {
    inner: Option<CharIter<'a>>,
}

impl Iterator for Chars<'_> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.as_mut()?.next()
    }
}

/// Longest language tag stored inline.
const MAX_LANGUAGE_TAG_LEN: usize = 30;

#[derive(Copy, Clone, Debug)]
enum Language {
    Tag {
        buf: [u8; MAX_LANGUAGE_TAG_LEN],
        len: u8,
    },
    Static(&'static str),
}

impl Language {
    fn new(name: &Name, record: &NameRecord) -> Option<Self> {
        const FIRST_LANG_TAG_ID: u16 = 0x8000;
        let language_id = record.language_id();
        if name.version() == 1 && language_id >= FIRST_LANG_TAG_ID {
            let index = (language_id - FIRST_LANG_TAG_ID) as usize;
            let tag = name
                .lang_tag_record()
                .get(index)?
                .lang_tag(name.string_data())
                .ok()?;
            return Self::from_tag(&tag);
        }
        // only Macintosh and Windows ids are defined
        match record.platform_id() {
            1 | 3 => LANGUAGE_IDS
                .binary_search_by_key(&language_id, |(id, _)| *id)
                .ok()
                .and_then(|ix| LANGUAGE_IDS.get(ix))
                .map(|(_, tag)| Self::Static(tag)),
            _ => None,
        }
    }

    /// Language tags are ASCII; anything else is rejected.
    fn from_tag(tag: &NameString) -> Option<Self> {
        let mut buf = [0u8; MAX_LANGUAGE_TAG_LEN];
        let mut len = 0;
        for ch in tag.chars() {
            if !ch.is_ascii() {
                return None;
            }
            *buf.get_mut(len)? = ch as u8;
            len += 1;
        }
        Some(Self::Tag {
            buf,
            len: len as u8,
        })
    }

    fn as_str(&self) -> &str {
        match self {
            Self::Tag { buf, len } => core::str::from_utf8(&buf[..*len as usize]).unwrap_or_default(),
            Self::Static(tag) => tag,
        }
    }
}

/// Macintosh language codes (below 0x100) and common Windows LCIDs mapped
/// to BCP-47 tags, sorted by identifier.
const LANGUAGE_IDS: &[(u16, &str)] = &[
    (0, "en"),
    (1, "fr"),
    (2, "de"),
    (3, "it"),
    (4, "nl"),
    (5, "sv"),
    (6, "es"),
    (7, "da"),
    (8, "pt"),
    (9, "nb"),
    (10, "he"),
    (11, "ja"),
    (12, "ar"),
    (13, "fi"),
    (14, "el"),
    (15, "is"),
    (16, "mt"),
    (17, "tr"),
    (18, "hr"),
    (19, "zh-Hant"),
    (20, "ur"),
    (21, "hi"),
    (22, "th"),
    (23, "ko"),
    (24, "lt"),
    (25, "pl"),
    (26, "hu"),
    (27, "et"),
    (28, "lv"),
    (32, "ru"),
    (33, "zh-Hans"),
    (37, "ro"),
    (38, "cs"),
    (39, "sk"),
    (45, "uk"),
    (80, "vi"),
    (81, "id"),
    (0x0401, "ar-SA"),
    (0x0402, "bg-BG"),
    (0x0403, "ca-ES"),
    (0x0404, "zh-TW"),
    (0x0405, "cs-CZ"),
    (0x0406, "da-DK"),
    (0x0407, "de-DE"),
    (0x0408, "el-GR"),
    (0x0409, "en-US"),
    (0x040B, "fi-FI"),
    (0x040C, "fr-FR"),
    (0x040D, "he-IL"),
    (0x040E, "hu-HU"),
    (0x040F, "is-IS"),
    (0x0410, "it-IT"),
    (0x0411, "ja-JP"),
    (0x0412, "ko-KR"),
    (0x0413, "nl-NL"),
    (0x0414, "nb-NO"),
    (0x0415, "pl-PL"),
    (0x0416, "pt-BR"),
    (0x0418, "ro-RO"),
    (0x0419, "ru-RU"),
    (0x041A, "hr-HR"),
    (0x041B, "sk-SK"),
    (0x041D, "sv-SE"),
    (0x041E, "th-TH"),
    (0x041F, "tr-TR"),
    (0x0421, "id-ID"),
    (0x0422, "uk-UA"),
    (0x0424, "sl-SI"),
    (0x0425, "et-EE"),
    (0x0426, "lv-LV"),
    (0x0427, "lt-LT"),
    (0x042A, "vi-VN"),
    (0x0439, "hi-IN"),
    (0x0804, "zh-CN"),
    (0x0807, "de-CH"),
    (0x0809, "en-GB"),
    (0x080A, "es-MX"),
    (0x080C, "fr-BE"),
    (0x0813, "nl-BE"),
    (0x0816, "pt-PT"),
    (0x0C04, "zh-HK"),
    (0x0C07, "de-AT"),
    (0x0C09, "en-AU"),
    (0x0C0A, "es-ES"),
    (0x0C0C, "fr-CA"),
    (0x1004, "zh-SG"),
    (0x1009, "en-CA"),
    (0x100C, "fr-CH"),
    (0x1409, "en-NZ"),
    (0x1809, "en-IE"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataProvider as _;
    use raw::FontRef;
    use sfnt_test_data::{glyf_a, tables::name_table};

    #[test]
    fn language_ids_are_sorted() {
        assert!(LANGUAGE_IDS.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }

    #[test]
    fn record_count() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.name_records().count(), 20);
    }

    #[test]
    fn lookup_by_id() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        assert!(font.localized_strings(StringId::new(100)).next().is_none());
        // the first record in storage order is the Macintosh one
        let family = font
            .localized_strings(StringId::FAMILY_NAME)
            .next()
            .unwrap();
        assert_eq!(family.id(), StringId::FAMILY_NAME);
        assert_eq!(family.platform_id(), 1);
        assert_eq!(family.language(), Some("en"));
        assert_eq!(family.to_string(), glyf_a::FAMILY_NAME);
        let english = font
            .localized_strings(StringId::FAMILY_NAME)
            .english_or_first()
            .unwrap();
        assert_eq!(english.platform_id(), 3);
        assert_eq!(english.language(), Some("en-US"));
        assert_eq!(english.to_string(), glyf_a::FAMILY_NAME);
    }

    #[test]
    fn decode_into_buffer() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let family = font
            .localized_strings(StringId::FAMILY_NAME)
            .next()
            .unwrap();
        let mut buf = [0u8; 30];
        let len = family.decode_into(&mut buf).unwrap();
        assert_eq!(&buf[..len], glyf_a::FAMILY_NAME.as_bytes());
        let mut small = [0u8; 8];
        assert_eq!(
            family.decode_into(&mut small),
            Err(DecodeError::BufferTooSmall {
                required: glyf_a::FAMILY_NAME.len()
            })
        );
        assert_eq!(small, [0u8; 8]);
    }

    #[test]
    fn utf16_and_unknown_encodings() {
        let mut builder = glyf_a::builder();
        builder.add_raw(
            raw::types::Tag::new(b"name"),
            name_table(&[(3, 1, 0x40C, 1, "Caf\u{e9}"), (4, 0, 0, 2, "Custom")]),
        );
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        let strings: Vec<_> = font.name_records().collect();
        assert_eq!(strings.len(), 2);
        assert_eq!(strings[0].to_string(), "Caf\u{e9}");
        assert_eq!(strings[0].language(), Some("fr-FR"));
        // four characters, five bytes of UTF-8
        let mut buf = [0u8; 4];
        assert_eq!(
            strings[0].decode_into(&mut buf),
            Err(DecodeError::BufferTooSmall { required: 5 })
        );
        let mut buf = [0u8; 5];
        assert_eq!(strings[0].decode_into(&mut buf), Ok(5));
        // custom platform strings have no known encoding
        assert_eq!(strings[1].chars().count(), 0);
        assert_eq!(strings[1].language(), None);
    }

    #[test]
    fn missing_name_table() {
        let mut builder = glyf_a::builder();
        builder.remove(raw::types::Tag::new(b"name"));
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.name_records().count(), 0);
        assert!(font
            .localized_strings(StringId::FAMILY_NAME)
            .english_or_first()
            .is_none());
    }
}
