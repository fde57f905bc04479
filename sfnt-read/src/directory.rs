//! The sfnt table directory and the collection header.
//!
//! See <https://learn.microsoft.com/en-us/typography/opentype/spec/otff#organization-of-an-opentype-font>

use types::{BigEndian, MajorMinor, Tag};

use crate::{FontData, FontRead, ReadError};

/// The [table directory](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#table-directory)
#[derive(Clone)]
pub struct TableDirectory<'a> {
    sfnt_version: u32,
    table_records: &'a [TableRecord],
}

impl<'a> TableDirectory<'a> {
    /// 0x00010000 or 0x4F54544F
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    /// Number of tables.
    pub fn num_tables(&self) -> u16 {
        self.table_records.len() as u16
    }

    /// Table records array: one for each top-level table in the font
    pub fn table_records(&self) -> &'a [TableRecord] {
        self.table_records
    }

    pub(crate) fn is_sorted(&self) -> bool {
        self.table_records
            .windows(2)
            .all(|pair| pair[0].tag() < pair[1].tag())
    }
}

impl<'a> FontRead<'a> for TableDirectory<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version = cursor.read::<u32>()?;
        let num_tables = cursor.read::<u16>()?;
        // search_range, entry_selector and range_shift are not trusted
        cursor.advance_by(6);
        let table_records = cursor.read_array(num_tables as usize)?;
        Ok(Self {
            sfnt_version,
            table_records,
        })
    }
}

impl std::fmt::Debug for TableDirectory<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableDirectory")
            .field("sfnt_version", &format_args!("0x{:08X}", self.sfnt_version))
            .field("table_records", &self.table_records)
            .finish()
    }
}

/// Record for a table in a font.
#[derive(Clone, Debug, Copy, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct TableRecord {
    /// Table identifier.
    pub tag: BigEndian<Tag>,
    /// Checksum for the table.
    pub checksum: BigEndian<u32>,
    /// Offset from the beginning of the font data.
    pub offset: BigEndian<u32>,
    /// Length of the table.
    pub length: BigEndian<u32>,
}

impl TableRecord {
    /// Table identifier.
    pub fn tag(&self) -> Tag {
        self.tag.get()
    }

    /// Checksum for the table.
    pub fn checksum(&self) -> u32 {
        self.checksum.get()
    }

    /// Offset from the beginning of the font data.
    pub fn offset(&self) -> u32 {
        self.offset.get()
    }

    /// Length of the table.
    pub fn length(&self) -> u32 {
        self.length.get()
    }

    /// The byte range of the table within the font data, if it does not
    /// overflow.
    pub fn data_range(&self) -> Option<std::ops::Range<usize>> {
        let start = self.offset() as usize;
        let end = start.checked_add(self.length() as usize)?;
        Some(start..end)
    }
}

/// [TTC Header](https://learn.microsoft.com/en-us/typography/opentype/spec/otff#ttc-header)
#[derive(Clone)]
pub struct TTCHeader<'a> {
    ttc_tag: Tag,
    version: MajorMinor,
    table_directory_offsets: &'a [BigEndian<u32>],
}

impl<'a> TTCHeader<'a> {
    /// Font Collection ID string: "ttcf"
    pub fn ttc_tag(&self) -> Tag {
        self.ttc_tag
    }

    /// Major/minor version of the TTC Header
    pub fn version(&self) -> MajorMinor {
        self.version
    }

    /// Number of fonts in TTC
    pub fn num_fonts(&self) -> u32 {
        self.table_directory_offsets.len() as u32
    }

    /// Array of offsets to the TableDirectory for each font from the beginning of the file
    pub fn table_directory_offsets(&self) -> &'a [BigEndian<u32>] {
        self.table_directory_offsets
    }
}

impl<'a> FontRead<'a> for TTCHeader<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let ttc_tag = cursor.read::<Tag>()?;
        if ttc_tag != types::TTC_HEADER_TAG {
            return Err(ReadError::InvalidTtc(ttc_tag));
        }
        let version = cursor.read::<MajorMinor>()?;
        let num_fonts = cursor.read::<u32>()?;
        let table_directory_offsets = cursor.read_array(num_fonts as usize)?;
        Ok(Self {
            ttc_tag,
            version,
            table_directory_offsets,
        })
    }
}
