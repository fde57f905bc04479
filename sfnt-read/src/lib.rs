//! Reading TrueType and OpenType font files
//!
//! This crate provides memory safe zero-allocation parsing of font files.
//! It is unopinionated, and attempts to provide raw access to the underlying
//! font data as it is described in the [OpenType specification][spec].
//!
//! In addition to raw data access, this crate also provides reference
//! implementations of algorithms for interpreting that data, where such an
//! implementation is required for the data to be useful. For instance, we
//! provide functions for [mapping codepoints to glyph identifiers][cmap-impl],
//! for [decoding entries in the `name` table][NameString] and for
//! [evaluating CFF charstrings][charstring].
//!
//! For higher level access to glyph outlines and metrics, see the
//! `sfnt-outline` crate.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use sfnt_read::{FontRef, TableProvider};
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! // Single fonts only. for font collections (.ttc) use FontRef::from_index
//! let font = FontRef::new(&font_bytes).expect("failed to read font data");
//! let head = font.head().expect("missing 'head' table");
//! let maxp = font.maxp().expect("missing 'maxp' table");
//!
//! println!("font version {} containing {} glyphs", head.font_revision(), maxp.num_glyphs());
//! ```
//!
//! [spec]: https://learn.microsoft.com/en-us/typography/opentype/spec/
//! [cmap-impl]: tables::cmap::Cmap::map_codepoint
//! [NameString]: tables::name::NameString
//! [charstring]: tables::postscript::charstring::evaluate

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

extern crate alloc;

mod directory;
mod font_data;
mod read;
mod table_provider;
pub mod tables;

/// Public re-export of the sfnt-types crate.
pub extern crate sfnt_types as types;

pub use directory::{TTCHeader, TableDirectory, TableRecord};
pub use font_data::FontData;
pub use read::{FontRead, FontReadWithArgs, ReadArgs, ReadError};
pub use table_provider::TableProvider;

use types::{Tag, CFF_SFNT_VERSION, TRUE_SFNT_VERSION, TT_SFNT_VERSION};

/// Tables that must be present, and in bounds, for a font to be usable.
const REQUIRED_TABLES: [Tag; 3] = [
    tables::head::TAG,
    tables::maxp::TAG,
    tables::hhea::TAG,
];

#[derive(Clone)]
/// Reference to the content of a font or font collection file.
pub enum FileRef<'a> {
    /// A single font.
    Font(FontRef<'a>),
    /// A collection of fonts.
    Collection(CollectionRef<'a>),
}

impl<'a> FileRef<'a> {
    /// Creates a new reference to a file representing a font or font collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        Ok(if let Ok(collection) = CollectionRef::new(data) {
            Self::Collection(collection)
        } else {
            Self::Font(FontRef::new(data)?)
        })
    }

    /// Returns an iterator over the fonts contained in the file.
    pub fn fonts(&self) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + 'a + Clone {
        let (iter_one, iter_two) = match self {
            Self::Font(font) => (Some(Ok(font.clone())), None),
            Self::Collection(collection) => (None, Some(collection.iter())),
        };
        iter_two.into_iter().flatten().chain(iter_one)
    }
}

/// Returns the number of fonts in a collection file, or `None` if the
/// data does not begin with a collection header.
pub fn collection_len(data: &[u8]) -> Option<u32> {
    CollectionRef::new(data).ok().map(|ttc| ttc.len())
}

/// Reference to the content of a font collection file.
#[derive(Clone)]
pub struct CollectionRef<'a> {
    data: FontData<'a>,
    header: TTCHeader<'a>,
}

impl<'a> CollectionRef<'a> {
    /// Creates a new reference to a font collection.
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        let header = TTCHeader::read(data)?;
        Ok(Self { data, header })
    }

    /// Returns the number of fonts in the collection.
    pub fn len(&self) -> u32 {
        self.header.num_fonts()
    }

    /// Returns true if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the font in the collection at the specified index.
    pub fn get(&self, index: u32) -> Result<FontRef<'a>, ReadError> {
        let offset = self
            .header
            .table_directory_offsets()
            .get(index as usize)
            .ok_or(ReadError::InvalidCollectionIndex(index))?
            .get() as usize;
        let table_dir_data = self.data.slice(offset..).ok_or(ReadError::OutOfBounds)?;
        FontRef::with_table_directory(
            self.data,
            TableDirectory::read(table_dir_data)?,
            Some(index),
        )
    }

    /// Returns an iterator over the fonts in the collection.
    pub fn iter(&self) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + 'a + Clone {
        let copy = self.clone();
        (0..self.len()).map(move |ix| copy.get(ix))
    }
}

/// Reference to an in-memory font.
///
/// This is a simple implementation of the [`TableProvider`] trait backed
/// by a borrowed slice containing font data.
///
/// Construction validates the table directory and the required `head`,
/// `maxp` and `hhea` tables. Every other table is parsed on demand, and a
/// missing or damaged optional table only affects queries that use it.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    pub table_directory: TableDirectory<'a>,
    /// The index of this font in a TrueType collection
    ttc_index: u32,
    /// Whether this font is a member of a TrueType collection.
    ///
    /// We use a bool rather than an Option to avoid bloating the struct
    /// size.
    in_ttc: bool,
    // Whether the table directory is sorted and thus we can use binary search for
    // finding table records. In principle, fonts are required to have a sorted
    // table directory, but certain fonts don't seem to follow that requirement.
    table_directory_sorted: bool,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must be a single font (not a font collection) and must begin with a
    /// [table directory] to be considered valid.
    ///
    /// To load a font from a font collection, use [`FontRef::from_index`] instead.
    ///
    /// [table directory]: https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        Self::with_table_directory(data, TableDirectory::read(data)?, None)
    }

    /// Creates a new reference to an in-memory font at the specified index
    /// backed by the given data.
    ///
    /// The data slice must begin with either a
    /// [table directory](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory)
    /// or a [ttc header](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#ttc-header)
    /// to be considered valid.
    ///
    /// In other words, this accepts either font collection (ttc) or single
    /// font (ttf/otf) files. If a single font file is provided, the index
    /// parameter must be 0.
    pub fn from_index(data: &'a [u8], index: u32) -> Result<Self, ReadError> {
        let file = FileRef::new(data)?;
        match file {
            FileRef::Font(font) => {
                if index == 0 {
                    Ok(font)
                } else {
                    Err(ReadError::InvalidCollectionIndex(index))
                }
            }
            FileRef::Collection(collection) => collection.get(index),
        }
    }

    /// Returns the underlying font data.
    ///
    /// This is the base from which tables are loaded, meaning that for
    /// TrueType collection files, this will be the entire font file data.
    pub fn data(&self) -> FontData<'a> {
        self.data
    }

    /// If the font is in a TrueType collection (ttc) file, returns the index
    /// of the font in that collection.
    pub fn ttc_index(&self) -> Option<u32> {
        self.in_ttc.then_some(self.ttc_index)
    }

    /// Returns the associated table directory.
    pub fn table_directory(&self) -> &TableDirectory<'a> {
        &self.table_directory
    }

    /// Returns the data for the table with the specified tag, if present.
    ///
    /// A record whose range lies outside of the font data is reported as
    /// absent.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        let record = self.find_record(tag)?;
        let data = record
            .data_range()
            .and_then(|range| self.data.slice(range));
        if data.is_none() {
            log::warn!("table '{tag}' extends past the end of the font data");
        }
        data
    }

    fn find_record(&self, tag: Tag) -> Option<&'a TableRecord> {
        let records = self.table_directory.table_records();
        let entry = if self.table_directory_sorted {
            records.binary_search_by(|rec| rec.tag().cmp(&tag)).ok()
        } else {
            records.iter().position(|rec| rec.tag() == tag)
        };
        entry.and_then(|idx| records.get(idx))
    }

    /// Returns an iterator over all of the available fonts in
    /// the given font data.
    pub fn fonts(
        data: &'a [u8],
    ) -> impl Iterator<Item = Result<FontRef<'a>, ReadError>> + 'a + Clone {
        let count = match FileRef::new(data) {
            Ok(FileRef::Font(_)) => 1,
            Ok(FileRef::Collection(ttc)) => ttc.len(),
            _ => 0,
        };
        (0..count).map(|idx| FontRef::from_index(data, idx))
    }

    fn with_table_directory(
        data: FontData<'a>,
        table_directory: TableDirectory<'a>,
        ttc_index: Option<u32>,
    ) -> Result<Self, ReadError> {
        if ![TT_SFNT_VERSION, CFF_SFNT_VERSION, TRUE_SFNT_VERSION]
            .contains(&table_directory.sfnt_version())
        {
            return Err(ReadError::InvalidSfnt(table_directory.sfnt_version()));
        }
        let table_directory_sorted = table_directory.is_sorted();
        let font = FontRef {
            data,
            table_directory,
            ttc_index: ttc_index.unwrap_or_default(),
            in_ttc: ttc_index.is_some(),
            table_directory_sorted,
        };
        font.validate_required_tables()?;
        Ok(font)
    }

    fn validate_required_tables(&self) -> Result<(), ReadError> {
        for tag in REQUIRED_TABLES {
            let record = self.find_record(tag).ok_or(ReadError::TableIsMissing(tag))?;
            record
                .data_range()
                .and_then(|range| self.data.slice(range))
                .ok_or(ReadError::TableOutOfBounds(tag))?;
        }
        // units per em is range checked when reading the table
        self.head()?;
        self.hhea()?;
        if self.maxp()?.num_glyphs() == 0 {
            return Err(ReadError::MalformedData("font contains no glyphs"));
        }
        Ok(())
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::{be_buffer, builder::FontBuilder, collection, glyf_a};
    use types::{Tag, TT_SFNT_VERSION};

    use super::*;

    fn minimal_font() -> Vec<u8> {
        FontBuilder::with_required_tables(3).build()
    }

    #[test]
    fn file_ref_non_collection() {
        let data = glyf_a::font();
        assert!(matches!(FileRef::new(&data), Ok(FileRef::Font(_))));
        assert_eq!(collection_len(&data), None);
    }

    #[test]
    fn file_ref_collection() {
        let data = collection::font();
        let Ok(FileRef::Collection(collection)) = FileRef::new(&data) else {
            panic!("Expected a collection");
        };
        assert_eq!(2, collection.len());
        assert!(!collection.is_empty());
        assert_eq!(collection_len(&data), Some(2));
    }

    #[test]
    fn font_ref_fonts_iter() {
        let single = glyf_a::font();
        let ttc = collection::font();
        assert_eq!(FontRef::fonts(&single).count(), 1);
        assert_eq!(FontRef::fonts(&ttc).count(), 2);
        assert_eq!(FontRef::fonts(b"NOT_A_FONT").count(), 0);
    }

    #[test]
    fn ttc_index() {
        let ttc = collection::font();
        for (idx, font) in FontRef::fonts(&ttc).map(|font| font.unwrap()).enumerate() {
            assert_eq!(font.ttc_index(), Some(idx as u32));
        }
        let single = glyf_a::font();
        assert!(FontRef::new(&single).unwrap().ttc_index().is_none());
    }

    #[test]
    fn face_index_out_of_range() {
        let ttc = collection::font();
        assert!(matches!(
            FontRef::from_index(&ttc, 2),
            Err(ReadError::InvalidCollectionIndex(2))
        ));
        let single = glyf_a::font();
        assert!(matches!(
            FontRef::from_index(&single, 1),
            Err(ReadError::InvalidCollectionIndex(1))
        ));
    }

    #[test]
    fn not_a_font() {
        let data = be_buffer! { 0xDEADBEEFu32, 0u16, 0u16, 0u16, 0u16 };
        assert!(matches!(
            FontRef::new(&data),
            Err(ReadError::InvalidSfnt(0xDEADBEEF))
        ));
        assert!(FontRef::new(&[0, 1]).is_err());
    }

    #[test]
    fn accepts_all_sfnt_versions() {
        for version in [TT_SFNT_VERSION, TRUE_SFNT_VERSION, CFF_SFNT_VERSION] {
            let data = FontBuilder::with_required_tables(3)
                .sfnt_version(version)
                .build();
            assert!(FontRef::new(&data).is_ok(), "{version:08X}");
        }
    }

    #[test]
    fn missing_required_table() {
        let mut builder = FontBuilder::with_required_tables(3);
        builder.remove(Tag::new(b"hhea"));
        let data = builder.build();
        assert_eq!(
            FontRef::new(&data).err(),
            Some(ReadError::TableIsMissing(Tag::new(b"hhea")))
        );
    }

    #[test]
    fn truncated_required_table() {
        let mut data = minimal_font();
        // the last table in a sorted directory built from the required set is maxp
        data.truncate(data.len() - 4);
        assert_eq!(
            FontRef::new(&data).err(),
            Some(ReadError::TableOutOfBounds(Tag::new(b"maxp")))
        );
    }

    #[test]
    fn truncated_optional_table_is_absent() {
        let mut builder = FontBuilder::with_required_tables(3);
        builder.add_raw(Tag::new(b"zzzz"), vec![1u8; 16]);
        let mut data = builder.build();
        data.truncate(data.len() - 8);
        let font = FontRef::new(&data).unwrap();
        assert!(font.table_data(Tag::new(b"zzzz")).is_none());
        assert!(font.table_data(Tag::new(b"head")).is_some());
    }

    #[test]
    fn zero_glyphs_is_malformed() {
        let data = FontBuilder::with_required_tables(0).build();
        assert!(matches!(
            FontRef::new(&data),
            Err(ReadError::MalformedData(_))
        ));
    }

    #[test]
    fn unsorted_table_directory() {
        let head = FontBuilder::head_table(1000);
        let hhea = FontBuilder::hhea_table(1);
        let maxp = FontBuilder::maxp_table(1);
        let header_len = 12 + 16 * 3;
        let maxp_offset = header_len;
        let head_offset = maxp_offset + maxp.len();
        let hhea_offset = head_offset + head.len();

        let font_data = be_buffer! {
            TT_SFNT_VERSION,
            3u16,    // num tables
            32u16,   // search range
            1u16,    // entry selector
            16u16,   // range shift

            (Tag::new(b"maxp")),
            0u32,    // checksum
            (maxp_offset as u32),
            (maxp.len() as u32),

            (Tag::new(b"head")),
            0u32,    // checksum
            (head_offset as u32),
            (head.len() as u32),

            (Tag::new(b"hhea")),
            0u32,    // checksum
            (hhea_offset as u32),
            (hhea.len() as u32)
        };

        let mut full_font = font_data.to_vec();
        full_font.extend_from_slice(&maxp);
        full_font.extend_from_slice(&head);
        full_font.extend_from_slice(&hhea);

        let font = FontRef::new(&full_font).unwrap();
        assert!(!font.table_directory_sorted);
        assert!(font.table_data(Tag::new(b"maxp")).is_some());
        assert!(font.table_data(Tag::new(b"head")).is_some());
        assert!(font.table_data(Tag::new(b"hhea")).is_some());
        assert!(font.table_data(Tag::new(b"glyf")).is_none());
        assert_eq!(font.maxp().unwrap().num_glyphs(), 1);
    }
}
