//! The [MVAR (Metrics Variation)](https://docs.microsoft.com/en-us/typography/opentype/spec/mvar) table

use types::{BigEndian, F2Dot14, Fixed, MajorMinor, Tag};

use super::variations::{DeltaSetIndex, ItemVariationStore};
use crate::{FontData, FontRead, ReadError};

/// 'MVAR'
pub const TAG: Tag = Tag::new(b"MVAR");

/// Four-byte tags used to represent particular metric or other values.
pub mod tags {
    use types::Tag;

    /// Horizontal ascender.
    pub const HASC: Tag = Tag::new(b"hasc");
    /// Horizontal descender.
    pub const HDSC: Tag = Tag::new(b"hdsc");
    /// Horizontal line gap.
    pub const HLGP: Tag = Tag::new(b"hlgp");
    /// Vertical ascender.
    pub const VASC: Tag = Tag::new(b"vasc");
    /// Vertical descender.
    pub const VDSC: Tag = Tag::new(b"vdsc");
    /// Vertical line gap.
    pub const VLGP: Tag = Tag::new(b"vlgp");
    /// X-height.
    pub const XHGT: Tag = Tag::new(b"xhgt");
    /// Cap height.
    pub const CPHT: Tag = Tag::new(b"cpht");
    /// Strikeout size.
    pub const STRS: Tag = Tag::new(b"strs");
    /// Strikeout offset.
    pub const STRO: Tag = Tag::new(b"stro");
    /// Underline size.
    pub const UNDS: Tag = Tag::new(b"unds");
    /// Underline offset.
    pub const UNDO: Tag = Tag::new(b"undo");
}

/// A metric tag and the delta set that varies it.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct ValueRecord {
    pub value_tag: BigEndian<Tag>,
    pub delta_set_outer_index: BigEndian<u16>,
    pub delta_set_inner_index: BigEndian<u16>,
}

impl ValueRecord {
    pub fn value_tag(&self) -> Tag {
        self.value_tag.get()
    }

    pub fn delta_set_outer_index(&self) -> u16 {
        self.delta_set_outer_index.get()
    }

    pub fn delta_set_inner_index(&self) -> u16 {
        self.delta_set_inner_index.get()
    }
}

/// The [MVAR](https://docs.microsoft.com/en-us/typography/opentype/spec/mvar) table.
#[derive(Clone, Copy)]
pub struct Mvar<'a> {
    data: FontData<'a>,
    value_records: &'a [ValueRecord],
}

impl<'a> FontRead<'a> for Mvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: MajorMinor = data.read_at(0)?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major as i64));
        }
        let record_size = data.read_at::<u16>(6)? as usize;
        let count = data.read_at::<u16>(8)? as usize;
        let value_records = if count == 0 {
            &[]
        } else if record_size != core::mem::size_of::<ValueRecord>() {
            return Err(ReadError::MalformedData("unexpected MVAR value record size"));
        } else {
            data.read_array(12..12 + count * record_size)?
        };
        Ok(Self {
            data,
            value_records,
        })
    }
}

impl<'a> Mvar<'a> {
    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    /// Records sorted by tag.
    pub fn value_records(&self) -> &'a [ValueRecord] {
        self.value_records
    }

    pub fn item_variation_store(&self) -> Option<Result<ItemVariationStore<'a>, ReadError>> {
        let offset = self.data.read_at::<u16>(10).ok()?;
        (offset != 0).then(|| {
            self.data
                .split_off(offset as usize)
                .ok_or(ReadError::OutOfBounds)
                .and_then(ItemVariationStore::read)
        })
    }

    /// Returns the metric delta for the specified tag and normalized
    /// variation coordinates. Possible tags are found in the [tags]
    /// module.
    pub fn metric_delta(&self, tag: Tag, coords: &[F2Dot14]) -> Result<Fixed, ReadError> {
        let record = self
            .value_records
            .binary_search_by(|record| record.value_tag().cmp(&tag))
            .ok()
            .and_then(|ix| self.value_records.get(ix))
            .ok_or(ReadError::MetricIsMissing(tag))?;
        let ivs = self.item_variation_store().ok_or(ReadError::NullOffset)??;
        Ok(Fixed::from_i32(ivs.compute_delta(
            DeltaSetIndex {
                outer: record.delta_set_outer_index(),
                inner: record.delta_set_inner_index(),
            },
            coords,
        )?))
    }
}

impl core::fmt::Debug for Mvar<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mvar")
            .field("version", &self.version())
            .field("value_records", &self.value_records)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::variable;

    use super::*;

    #[test]
    fn metric_deltas() {
        let data = variable::mvar_table();
        let mvar = Mvar::read(FontData::new(&data)).unwrap();
        assert_eq!(mvar.value_records().len(), 1);
        let delta = |coord: f32| {
            mvar.metric_delta(tags::HASC, &[F2Dot14::from_f32(coord)])
                .unwrap()
        };
        assert_eq!(delta(1.0), Fixed::from_i32(variable::ASCENDER_DELTA as i32));
        assert_eq!(delta(0.5), Fixed::from_i32(50));
        assert_eq!(delta(0.0), Fixed::ZERO);
        assert_eq!(
            mvar.metric_delta(tags::XHGT, &[F2Dot14::ONE]),
            Err(ReadError::MetricIsMissing(tags::XHGT))
        );
    }
}
