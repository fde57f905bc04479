//! The [Font Variations](https://docs.microsoft.com/en-us/typography/opentype/spec/fvar) table

use types::{BigEndian, Fixed, MajorMinor, NameId, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'fvar'
pub const TAG: Tag = Tag::new(b"fvar");

/// The [fvar](https://learn.microsoft.com/en-us/typography/opentype/spec/fvar) table.
#[derive(Clone, Copy)]
pub struct Fvar<'a> {
    data: FontData<'a>,
    axes: &'a [VariationAxisRecord],
}

impl<'a> FontRead<'a> for Fvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: MajorMinor = data.read_at(0)?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major as i64));
        }
        let axes_offset = data.read_at::<u16>(4)? as usize;
        let axis_count = data.read_at::<u16>(8)? as usize;
        let axis_size = data.read_at::<u16>(10)? as usize;
        if axis_size != core::mem::size_of::<VariationAxisRecord>() {
            return Err(ReadError::MalformedData("unexpected fvar axis record size"));
        }
        let axes = data.read_array(axes_offset..axes_offset + axis_count * axis_size)?;
        Ok(Self { data, axes })
    }
}

impl<'a> Fvar<'a> {
    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    pub fn axis_count(&self) -> u16 {
        self.axes.len() as u16
    }

    pub fn instance_count(&self) -> u16 {
        self.data.read_at(12).unwrap_or_default()
    }

    /// The size in bytes of each instance record.
    pub fn instance_size(&self) -> u16 {
        self.data.read_at(14).unwrap_or_default()
    }

    /// Returns the array of variation axis records.
    pub fn axes(&self) -> &'a [VariationAxisRecord] {
        self.axes
    }

    /// Returns the named instance at `index`.
    pub fn instance(&self, index: u16) -> Result<InstanceRecord<'a>, ReadError> {
        if index >= self.instance_count() {
            return Err(ReadError::OutOfBounds);
        }
        let size = self.instance_size() as usize;
        let axes_offset = self.data.read_at::<u16>(4)? as usize;
        let start = axes_offset
            + core::mem::size_of_val(self.axes)
            + index as usize * size;
        let data = self
            .data
            .slice(start..start + size)
            .ok_or(ReadError::OutOfBounds)?;
        InstanceRecord::read(data, self.axis_count())
    }

    /// Iterates over the named instances, stopping at the first one that
    /// can't be read.
    pub fn instances(&self) -> impl Iterator<Item = InstanceRecord<'a>> + 'a + Clone {
        let fvar = *self;
        (0..self.instance_count()).map_while(move |ix| fvar.instance(ix).ok())
    }
}

impl core::fmt::Debug for Fvar<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fvar")
            .field("version", &self.version())
            .field("axes", &self.axes)
            .field("instance_count", &self.instance_count())
            .finish()
    }
}

/// Variation axis record.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct VariationAxisRecord {
    pub axis_tag: BigEndian<Tag>,
    pub min_value: BigEndian<Fixed>,
    pub default_value: BigEndian<Fixed>,
    pub max_value: BigEndian<Fixed>,
    pub flags: BigEndian<u16>,
    pub axis_name_id: BigEndian<NameId>,
}

impl VariationAxisRecord {
    /// Flag indicating the axis should not be exposed in user interfaces.
    pub const HIDDEN_AXIS: u16 = 0x0001;

    pub fn axis_tag(&self) -> Tag {
        self.axis_tag.get()
    }

    pub fn min_value(&self) -> Fixed {
        self.min_value.get()
    }

    pub fn default_value(&self) -> Fixed {
        self.default_value.get()
    }

    pub fn max_value(&self) -> Fixed {
        self.max_value.get()
    }

    pub fn flags(&self) -> u16 {
        self.flags.get()
    }

    pub fn axis_name_id(&self) -> NameId {
        self.axis_name_id.get()
    }

    pub fn is_hidden(&self) -> bool {
        self.flags() & Self::HIDDEN_AXIS != 0
    }

    /// Returns a normalized coordinate for the given value.
    pub fn normalize(&self, mut value: Fixed) -> Fixed {
        use core::cmp::Ordering::*;
        let min_value = self.min_value();
        let default_value = self.default_value();
        // Make sure max is >= min to avoid potential panic in clamp.
        let max_value = self.max_value().max(min_value);
        value = value.clamp(min_value, max_value);
        value = match value.cmp(&default_value) {
            Less => -(default_value
                .saturating_sub(value)
                .div(default_value.saturating_sub(min_value))),
            Greater => value
                .saturating_sub(default_value)
                .div(max_value.saturating_sub(default_value)),
            Equal => Fixed::ZERO,
        };
        value.clamp(-Fixed::ONE, Fixed::ONE)
    }
}

/// A named instance: a location in the design space with a name.
#[derive(Clone, Copy, Debug)]
pub struct InstanceRecord<'a> {
    /// The name ID for entries in the 'name' table that provide subfamily names for this instance.
    pub subfamily_name_id: NameId,
    /// Reserved for future use — set to 0.
    pub flags: u16,
    /// The coordinates array for this instance.
    pub coordinates: &'a [BigEndian<Fixed>],
    /// Optional. The name ID for entries in the 'name' table that provide PostScript names for this instance.
    pub post_script_name_id: Option<NameId>,
}

impl<'a> InstanceRecord<'a> {
    fn read(data: FontData<'a>, axis_count: u16) -> Result<Self, ReadError> {
        let coords_len = axis_count as usize * 4;
        let subfamily_name_id = data.read_at(0)?;
        let flags = data.read_at(2)?;
        let coordinates = data.read_array(4..4 + coords_len)?;
        // the PostScript name id is present when the record has room for it
        let post_script_name_id = data
            .read_at::<NameId>(4 + coords_len)
            .ok()
            .filter(|id| id.to_u16() != 0xFFFF);
        Ok(Self {
            subfamily_name_id,
            flags,
            coordinates,
            post_script_name_id,
        })
    }
}
