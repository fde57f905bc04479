//! OpenType font variations common tables.

use types::{BigEndian, F2Dot14, FixedSize, Fixed, GlyphId};

use crate::{font_data::Cursor, FontData, FontRead, ReadError};

/// Outer and inner indices for reading from an [ItemVariationStore].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DeltaSetIndex {
    /// Outer delta set index.
    pub outer: u16,
    /// Inner delta set index.
    pub inner: u16,
}

/// The 'tupleIndex' field of a [TupleVariationHeader].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TupleIndex(u16);

impl TupleIndex {
    /// Flag indicating that this tuple variation header includes an embedded
    /// peak tuple record, immediately after the tupleIndex field.
    ///
    /// If set, the low 12 bits of the tupleIndex value are ignored.
    pub const EMBEDDED_PEAK_TUPLE: u16 = 0x8000;

    /// Flag indicating that this tuple variation table applies to an
    /// intermediate region within the variation space.
    ///
    /// If set, the header includes the two intermediate-region, start and end
    /// tuple records, immediately after the peak tuple record (if present).
    pub const INTERMEDIATE_REGION: u16 = 0x4000;
    /// Flag indicating that the serialized data for this tuple variation table
    /// includes packed “point” number data.
    ///
    /// If set, this tuple variation table uses that number data; if clear,
    /// this tuple variation table uses shared number data found at the start
    /// of the serialized data for this glyph variation data.
    pub const PRIVATE_POINT_NUMBERS: u16 = 0x2000;
    /// Mask for the low 12 bits to give the shared tuple records index.
    pub const TUPLE_INDEX_MASK: u16 = 0x0FFF;

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn from_bits(bits: u16) -> Self {
        TupleIndex(bits)
    }

    /// `true` if the header includes an embedded peak tuple.
    pub fn embedded_peak_tuple(self) -> bool {
        (self.0 & Self::EMBEDDED_PEAK_TUPLE) != 0
    }

    /// `true` if the header includes the two intermediate region tuple records.
    pub fn intermediate_region(self) -> bool {
        (self.0 & Self::INTERMEDIATE_REGION) != 0
    }

    /// `true` if the data for this table includes packed point number data.
    pub fn private_point_numbers(self) -> bool {
        (self.0 & Self::PRIVATE_POINT_NUMBERS) != 0
    }

    pub fn tuple_records_index(self) -> Option<u16> {
        (!self.embedded_peak_tuple()).then_some(self.0 & Self::TUPLE_INDEX_MASK)
    }
}

/// The 'tupleVariationCount' field of the [Tuple Variation Store Header][header]
///
/// The high 4 bits are flags, and the low 12 bits are the number of tuple
/// variation tables for this glyph. The count can be any number between 1 and 4095.
///
/// [header]: https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#tuple-variation-store-header
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TupleVariationCount(u16);

impl TupleVariationCount {
    /// Flag indicating that some or all tuple variation tables reference a
    /// shared set of “point” numbers.
    ///
    /// These shared numbers are represented as packed point number data at the
    /// start of the serialized data.
    pub const SHARED_POINT_NUMBERS: u16 = 0x8000;

    /// Mask for the low 12 bits to give the tuple count.
    pub const COUNT_MASK: u16 = 0x0FFF;

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// `true` if any tables reference a shared set of point numbers
    pub fn shared_point_numbers(self) -> bool {
        (self.0 & Self::SHARED_POINT_NUMBERS) != 0
    }

    pub fn count(self) -> u16 {
        self.0 & Self::COUNT_MASK
    }
}

/// A tuple of normalized coordinates, one per axis.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tuple<'a> {
    values: &'a [BigEndian<F2Dot14>],
}

impl<'a> Tuple<'a> {
    pub fn new(values: &'a [BigEndian<F2Dot14>]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &'a [BigEndian<F2Dot14>] {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<F2Dot14> {
        self.values.get(idx).map(BigEndian::get)
    }
}

/// [Tuple Variation Header](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#tuplevariationheader)
#[derive(Clone, Copy, Debug)]
pub struct TupleVariationHeader<'a> {
    data: FontData<'a>,
    axis_count: u16,
}

impl<'a> TupleVariationHeader<'a> {
    pub fn read(data: FontData<'a>, axis_count: u16) -> Result<Self, ReadError> {
        let header = Self { data, axis_count };
        // make sure every tuple record the flags promise is present
        if data.len() < header.byte_len() {
            return Err(ReadError::OutOfBounds);
        }
        Ok(header)
    }

    /// The size in bytes of the serialized data for this tuple variation
    /// table.
    pub fn variation_data_size(&self) -> u16 {
        self.data.read_at(0).unwrap_or_default()
    }

    pub fn tuple_index(&self) -> TupleIndex {
        TupleIndex(self.data.read_at(2).unwrap_or_default())
    }

    fn tuple_byte_len(&self) -> usize {
        F2Dot14::RAW_BYTE_LEN * self.axis_count as usize
    }

    fn tuple_at(&self, start: usize) -> Tuple<'a> {
        Tuple {
            values: self
                .data
                .read_array(start..start + self.tuple_byte_len())
                .unwrap_or_default(),
        }
    }

    /// Peak tuple record for this tuple variation table — optional,
    /// determined by flags in the tupleIndex value.
    pub fn peak_tuple(&self) -> Option<Tuple<'a>> {
        self.tuple_index()
            .embedded_peak_tuple()
            .then(|| self.tuple_at(4))
    }

    fn intermediate_start(&self) -> usize {
        4 + self
            .tuple_index()
            .embedded_peak_tuple()
            .then_some(self.tuple_byte_len())
            .unwrap_or_default()
    }

    /// Intermediate start tuple record for this tuple variation table
    /// — optional, determined by flags in the tupleIndex value.
    pub fn intermediate_start_tuple(&self) -> Option<Tuple<'a>> {
        self.tuple_index()
            .intermediate_region()
            .then(|| self.tuple_at(self.intermediate_start()))
    }

    /// Intermediate end tuple record for this tuple variation table
    /// — optional, determined by flags in the tupleIndex value.
    pub fn intermediate_end_tuple(&self) -> Option<Tuple<'a>> {
        self.tuple_index()
            .intermediate_region()
            .then(|| self.tuple_at(self.intermediate_start() + self.tuple_byte_len()))
    }

    /// Compute the actual length of this table in bytes
    fn byte_len(&self) -> usize {
        const FIXED_LEN: usize = u16::RAW_BYTE_LEN * 2;
        let index = self.tuple_index();
        FIXED_LEN
            + index
                .embedded_peak_tuple()
                .then_some(self.tuple_byte_len())
                .unwrap_or_default()
            + index
                .intermediate_region()
                .then_some(self.tuple_byte_len() * 2)
                .unwrap_or_default()
    }
}

/// Computes the scalar of a tuple variation for the given normalized
/// coordinates.
///
/// Returns `None` when the tuple does not apply at this location.
/// See <https://learn.microsoft.com/en-us/typography/opentype/spec/otvaroverview#algorithm-for-interpolation-of-instance-values>
pub fn compute_tuple_scalar(
    peak: Tuple,
    intermediate: Option<(Tuple, Tuple)>,
    coords: &[F2Dot14],
) -> Option<Fixed> {
    let mut scalar = Fixed::ONE;
    for (i, peak) in peak.values().iter().enumerate() {
        let peak = peak.get().to_fixed();
        if peak == Fixed::ZERO {
            continue;
        }
        let coord = coords
            .get(i)
            .map(|coord| coord.to_fixed())
            .unwrap_or_default();
        if coord == peak {
            continue;
        }
        if coord == Fixed::ZERO {
            return None;
        }
        if let Some((start, end)) = intermediate.as_ref() {
            let start = start.get(i).unwrap_or_default().to_fixed();
            let end = end.get(i).unwrap_or_default().to_fixed();
            if coord < start || coord > end {
                return None;
            }
            scalar = if coord < peak {
                scalar.mul_div(coord - start, peak - start)
            } else {
                scalar.mul_div(end - coord, end - peak)
            };
        } else {
            if coord < peak.min(Fixed::ZERO) || coord > peak.max(Fixed::ZERO) {
                return None;
            }
            scalar = scalar.mul_div(coord, peak);
        }
    }
    (scalar != Fixed::ZERO).then_some(scalar)
}

/// [Packed "Point" Numbers](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#packed-point-numbers)
#[derive(Clone, Copy, Debug)]
pub struct PackedPointNumbers<'a> {
    data: FontData<'a>,
}

impl<'a> PackedPointNumbers<'a> {
    /// read point numbers off the front of this data, returning the remaining data
    pub fn split_off_front(data: FontData<'a>) -> (Self, FontData<'a>) {
        let this = PackedPointNumbers { data };
        let total_len = this.total_len();
        let remainder = data.split_off(total_len).unwrap_or_default();
        (this, remainder)
    }

    /// The number of points in this set; zero means all points.
    pub fn count(&self) -> u16 {
        self.count_and_count_bytes().0
    }

    /// compute the count, and the number of bytes used to store it
    fn count_and_count_bytes(&self) -> (u16, usize) {
        match self.data.read_at::<u8>(0).unwrap_or(0) {
            0 => (0, 1),
            count @ 1..=127 => (count as u16, 1),
            _ => {
                // "If the high bit of the first byte is set, then a second byte is used.
                // The count is read from interpreting the two bytes as a big-endian
                // uint16 value with the high-order bit masked out."
                let count = self.data.read_at::<u16>(0).unwrap_or_default() & 0x7FFF;
                (count, 2)
            }
        }
    }

    /// the number of bytes to encode the packed point numbers
    fn total_len(&self) -> usize {
        let (n_points, mut n_bytes) = self.count_and_count_bytes();
        if n_points == 0 {
            return n_bytes;
        }
        let mut cursor = self.data.cursor();
        cursor.advance_by(n_bytes);

        let mut n_seen = 0;
        while n_seen < n_points {
            let Some((count, two_bytes)) = read_control_byte(&mut cursor) else {
                return n_bytes;
            };
            let word_size = 1 + usize::from(two_bytes);
            let run_size = word_size * count as usize;
            n_bytes += run_size + 1; // plus the control byte;
            cursor.advance_by(run_size);
            n_seen = n_seen.saturating_add(count as u16);
        }

        n_bytes
    }

    /// Iterate over the packed points
    pub fn iter(&self) -> PackedPointNumbersIter<'a> {
        let (count, n_bytes) = self.count_and_count_bytes();
        let mut cursor = self.data.cursor();
        cursor.advance_by(n_bytes);
        PackedPointNumbersIter::new(count, cursor)
    }
}

/// An iterator over the packed point numbers data.
#[derive(Clone, Debug)]
pub struct PackedPointNumbersIter<'a> {
    count: u16,
    seen: u16,
    last_val: u16,
    current_run: PointRunIter<'a>,
}

impl<'a> PackedPointNumbersIter<'a> {
    fn new(count: u16, cursor: Cursor<'a>) -> Self {
        PackedPointNumbersIter {
            count,
            seen: 0,
            last_val: 0,
            current_run: PointRunIter {
                remaining: 0,
                two_bytes: false,
                cursor,
            },
        }
    }
}

/// Implements the logic for iterating over the individual runs
#[derive(Clone, Debug)]
struct PointRunIter<'a> {
    remaining: u8,
    two_bytes: bool,
    cursor: Cursor<'a>,
}

impl Iterator for PointRunIter<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<Self::Item> {
        // if no items remain in this run, start the next one.
        while self.remaining == 0 {
            (self.remaining, self.two_bytes) = read_control_byte(&mut self.cursor)?;
        }

        self.remaining -= 1;
        if self.two_bytes {
            self.cursor.read().ok()
        } else {
            self.cursor.read::<u8>().ok().map(|v| v as u16)
        }
    }
}

/// returns the count and the 'uses_two_bytes' flag from the control byte
fn read_control_byte(cursor: &mut Cursor) -> Option<(u8, bool)> {
    let control: u8 = cursor.read().ok()?;
    let two_bytes = (control & 0x80) != 0;
    let count = (control & 0x7F) + 1;
    Some((count, two_bytes))
}

impl Iterator for PackedPointNumbersIter<'_> {
    type Item = u16;

    fn next(&mut self) -> Option<Self::Item> {
        // if our count is zero, we keep incrementing forever
        if self.count == 0 {
            let result = self.last_val;
            self.last_val = self.last_val.checked_add(1)?;
            return Some(result);
        }

        if self.count == self.seen {
            return None;
        }
        self.seen += 1;
        self.last_val = self.last_val.wrapping_add(self.current_run.next()?);
        Some(self.last_val)
    }
}

/// [Packed Deltas](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#packed-deltas)
#[derive(Clone, Copy, Debug)]
pub struct PackedDeltas<'a> {
    data: FontData<'a>,
    count: usize,
}

impl<'a> PackedDeltas<'a> {
    /// This is unbounded, and assumes all of data is deltas.
    pub fn new(data: FontData<'a>) -> Self {
        let count = DeltaRunIter::new(data.cursor()).count();
        Self { data, count }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn iter(&self) -> DeltaRunIter<'a> {
        DeltaRunIter::new(self.data.cursor())
    }
}

/// Implements the logic for iterating over the individual runs
#[derive(Clone, Debug)]
pub struct DeltaRunIter<'a> {
    remaining: u8,
    two_bytes: bool,
    are_zero: bool,
    cursor: Cursor<'a>,
}

impl<'a> DeltaRunIter<'a> {
    fn new(cursor: Cursor<'a>) -> Self {
        DeltaRunIter {
            remaining: 0,
            two_bytes: false,
            are_zero: false,
            cursor,
        }
    }
}

impl Iterator for DeltaRunIter<'_> {
    type Item = i16;

    fn next(&mut self) -> Option<Self::Item> {
        /// Flag indicating that this run contains no data,
        /// and that the deltas for this run are all zero.
        const DELTAS_ARE_ZERO: u8 = 0x80;
        /// Flag indicating the data type for delta values in the run.
        const DELTAS_ARE_WORDS: u8 = 0x40;
        /// Mask for the low 6 bits to provide the number of delta values in the run, minus one.
        const DELTA_RUN_COUNT_MASK: u8 = 0x3F;

        // if no items remain in this run, start the next one.
        while self.remaining == 0 {
            let control: u8 = self.cursor.read().ok()?;
            self.are_zero = (control & DELTAS_ARE_ZERO) != 0;
            self.two_bytes = (control & DELTAS_ARE_WORDS) != 0;
            self.remaining = (control & DELTA_RUN_COUNT_MASK) + 1;
        }

        self.remaining -= 1;
        if self.are_zero {
            Some(0)
        } else if self.two_bytes {
            self.cursor.read().ok()
        } else {
            self.cursor.read::<i8>().ok().map(|v| v as i16)
        }
    }
}

/// A helper type for iterating over [`TupleVariationHeader`]s.
#[derive(Clone, Debug)]
pub struct TupleVariationHeaderIter<'a> {
    data: FontData<'a>,
    n_headers: usize,
    current: usize,
    axis_count: u16,
}

impl<'a> TupleVariationHeaderIter<'a> {
    pub(crate) fn new(data: FontData<'a>, n_headers: usize, axis_count: u16) -> Self {
        Self {
            data,
            n_headers,
            current: 0,
            axis_count,
        }
    }
}

impl<'a> Iterator for TupleVariationHeaderIter<'a> {
    type Item = Result<TupleVariationHeader<'a>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.n_headers {
            return None;
        }
        self.current += 1;
        let next = TupleVariationHeader::read(self.data, self.axis_count);
        let next_len = next.as_ref().map(|table| table.byte_len()).unwrap_or(0);
        self.data = self.data.split_off(next_len)?;
        Some(next)
    }
}

/// The 'entryFormat' field of a [DeltaSetIndexMap].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryFormat(u8);

impl EntryFormat {
    /// Mask for the low 4 bits, which give the count of bits minus one
    /// that are used in each entry for the inner-level index.
    pub const INNER_INDEX_BIT_COUNT_MASK: u8 = 0x0F;
    /// Mask for bits that indicate the size in bytes minus one of each
    /// entry.
    pub const MAP_ENTRY_SIZE_MASK: u8 = 0x30;

    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn entry_size(self) -> u8 {
        ((self.0 & Self::MAP_ENTRY_SIZE_MASK) >> 4) + 1
    }

    pub fn bit_count(self) -> u8 {
        (self.0 & Self::INNER_INDEX_BIT_COUNT_MASK) + 1
    }
}

/// [Delta set index map](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#associating-target-items-to-variation-data),
/// format 0 or 1.
#[derive(Clone, Copy, Debug)]
pub struct DeltaSetIndexMap<'a> {
    format: u8,
    entry_format: EntryFormat,
    map_count: u32,
    map_data: FontData<'a>,
}

impl<'a> FontRead<'a> for DeltaSetIndexMap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let format: u8 = data.read_at(0)?;
        let entry_format = EntryFormat(data.read_at(1)?);
        let (map_count, header_len) = match format {
            0 => (data.read_at::<u16>(2)? as u32, 4),
            1 => (data.read_at::<u32>(2)?, 6),
            other => return Err(ReadError::InvalidFormat(other as i64)),
        };
        let map_len = entry_format.entry_size() as usize * map_count as usize;
        let map_data = data
            .slice(header_len..header_len + map_len)
            .ok_or(ReadError::OutOfBounds)?;
        Ok(Self {
            format,
            entry_format,
            map_count,
            map_data,
        })
    }
}

impl DeltaSetIndexMap<'_> {
    pub fn format(&self) -> u8 {
        self.format
    }

    pub fn entry_format(&self) -> EntryFormat {
        self.entry_format
    }

    pub fn map_count(&self) -> u32 {
        self.map_count
    }

    /// Returns the delta set index for the specified value.
    pub fn get(&self, index: u32) -> Result<DeltaSetIndex, ReadError> {
        let entry_size = self.entry_format.entry_size();
        let data = self.map_data;
        // "if an index into the mapping array is used that is greater than or equal to
        // mapCount, then the last logical entry of the mapping array is used."
        // https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats
        // #associating-target-items-to-variation-data
        let index = index.min(self.map_count.saturating_sub(1));
        let offset = index as usize * entry_size as usize;
        let entry = match entry_size {
            1 => data.read_at::<u8>(offset)? as u32,
            2 => data.read_at::<u16>(offset)? as u32,
            3 => {
                let bytes: [u8; 3] = data.read_ref_at(offset).copied()?;
                u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]])
            }
            4 => data.read_at::<u32>(offset)?,
            _ => {
                return Err(ReadError::MalformedData(
                    "invalid entry size in DeltaSetIndexMap",
                ))
            }
        };
        let bit_count = self.entry_format.bit_count();
        Ok(DeltaSetIndex {
            outer: (entry >> bit_count) as u16,
            inner: (entry & ((1 << bit_count) - 1)) as u16,
        })
    }
}

/// Start, peak and end of a region on one axis.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct RegionAxisCoordinates {
    pub start_coord: BigEndian<F2Dot14>,
    pub peak_coord: BigEndian<F2Dot14>,
    pub end_coord: BigEndian<F2Dot14>,
}

/// A region of the design space, one set of coordinates per axis.
#[derive(Clone, Copy, Debug)]
pub struct VariationRegion<'a> {
    region_axes: &'a [RegionAxisCoordinates],
}

impl<'a> VariationRegion<'a> {
    pub fn region_axes(&self) -> &'a [RegionAxisCoordinates] {
        self.region_axes
    }

    /// Computes a scalar value for this region and the specified
    /// normalized variation coordinates.
    pub fn compute_scalar(&self, coords: &[F2Dot14]) -> Fixed {
        const ZERO: Fixed = Fixed::ZERO;
        let mut scalar = Fixed::ONE;
        for (i, axis_coords) in self.region_axes().iter().enumerate() {
            let coord = coords.get(i).map(|coord| coord.to_fixed()).unwrap_or(ZERO);
            let start = axis_coords.start_coord.get().to_fixed();
            let end = axis_coords.end_coord.get().to_fixed();
            let peak = axis_coords.peak_coord.get().to_fixed();
            if start > peak || peak > end || peak == ZERO || start < ZERO && end > ZERO {
                continue;
            } else if coord < start || coord > end {
                return ZERO;
            } else if coord == peak {
                continue;
            } else if coord < peak {
                scalar = scalar.mul_div(coord - start, peak - start);
            } else {
                scalar = scalar.mul_div(end - coord, end - peak);
            }
        }
        scalar
    }
}

/// The list of regions referenced by an [ItemVariationStore].
#[derive(Clone, Copy, Debug)]
pub struct VariationRegionList<'a> {
    axis_count: u16,
    regions: &'a [RegionAxisCoordinates],
}

impl<'a> FontRead<'a> for VariationRegionList<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let axis_count: u16 = cursor.read()?;
        let region_count: u16 = cursor.read()?;
        let regions = cursor.read_array(axis_count as usize * region_count as usize)?;
        Ok(Self {
            axis_count,
            regions,
        })
    }
}

impl<'a> VariationRegionList<'a> {
    pub fn axis_count(&self) -> u16 {
        self.axis_count
    }

    pub fn region_count(&self) -> usize {
        match self.axis_count {
            0 => 0,
            n => self.regions.len() / n as usize,
        }
    }

    pub fn region(&self, index: usize) -> Result<VariationRegion<'a>, ReadError> {
        let len = self.axis_count as usize;
        let start = index.checked_mul(len).ok_or(ReadError::OutOfBounds)?;
        self.regions
            .get(start..start + len)
            .map(|region_axes| VariationRegion { region_axes })
            .ok_or(ReadError::OutOfBounds)
    }
}

/// [Item Variation Store](https://learn.microsoft.com/en-us/typography/opentype/spec/otvarcommonformats#item-variation-store)
#[derive(Clone, Copy)]
pub struct ItemVariationStore<'a> {
    data: FontData<'a>,
    item_variation_data_offsets: &'a [BigEndian<u32>],
}

impl<'a> FontRead<'a> for ItemVariationStore<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 1 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        cursor.advance::<u32>();
        let count: u16 = cursor.read()?;
        Ok(Self {
            data,
            item_variation_data_offsets: cursor.read_array(count as usize)?,
        })
    }
}

impl<'a> ItemVariationStore<'a> {
    pub fn variation_region_list_offset(&self) -> u32 {
        self.data.read_at(2).unwrap_or_default()
    }

    pub fn variation_region_list(&self) -> Result<VariationRegionList<'a>, ReadError> {
        self.data
            .split_off(self.variation_region_list_offset() as usize)
            .ok_or(ReadError::OutOfBounds)
            .and_then(VariationRegionList::read)
    }

    pub fn item_variation_data_count(&self) -> u16 {
        self.item_variation_data_offsets.len() as u16
    }

    /// The item variation data at the given outer index; `None` for a
    /// missing subtable or null offset.
    pub fn item_variation_data(
        &self,
        index: u16,
    ) -> Option<Result<ItemVariationData<'a>, ReadError>> {
        let offset = self.item_variation_data_offsets.get(index as usize)?.get();
        (offset != 0).then(|| {
            self.data
                .split_off(offset as usize)
                .ok_or(ReadError::OutOfBounds)
                .and_then(ItemVariationData::read)
        })
    }

    /// Computes the delta value for the specified index and set of normalized
    /// variation coordinates.
    pub fn compute_delta(
        &self,
        index: DeltaSetIndex,
        coords: &[F2Dot14],
    ) -> Result<i32, ReadError> {
        let data = match self.item_variation_data(index.outer) {
            Some(data) => data?,
            None => return Ok(0),
        };
        let regions = self.variation_region_list()?;
        let region_indices = data.region_indexes();
        // Compute deltas with 64-bit precision.
        // See <https://gitlab.freedesktop.org/freetype/freetype/-/blob/7ab541a2/src/truetype/ttgxvar.c#L1094>
        let mut accum = 0i64;
        for (i, region_delta) in data.delta_set(index.inner).enumerate() {
            let region_index = region_indices
                .get(i)
                .ok_or(ReadError::MalformedData(
                    "invalid delta sets in ItemVariationStore",
                ))?
                .get() as usize;
            let region = regions.region(region_index)?;
            let scalar = region.compute_scalar(coords);
            accum += region_delta as i64 * scalar.to_bits() as i64;
        }
        Ok(((accum + 0x8000) >> 16) as i32)
    }
}

impl core::fmt::Debug for ItemVariationStore<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ItemVariationStore")
            .field(
                "variation_region_list_offset",
                &self.variation_region_list_offset(),
            )
            .field("item_variation_data_count", &self.item_variation_data_count())
            .finish()
    }
}

/// Delta sets for a group of items, in one subtable of an
/// [ItemVariationStore].
#[derive(Clone, Copy, Debug)]
pub struct ItemVariationData<'a> {
    item_count: u16,
    word_delta_count: u16,
    region_indexes: &'a [BigEndian<u16>],
    delta_sets: &'a [u8],
}

impl<'a> FontRead<'a> for ItemVariationData<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let item_count = cursor.read()?;
        let word_delta_count = cursor.read()?;
        let region_index_count: u16 = cursor.read()?;
        let region_indexes = cursor.read_array(region_index_count as usize)?;
        let delta_sets = cursor
            .remaining()
            .map(|data| data.as_bytes())
            .unwrap_or_default();
        Ok(Self {
            item_count,
            word_delta_count,
            region_indexes,
            delta_sets,
        })
    }
}

impl<'a> ItemVariationData<'a> {
    pub fn item_count(&self) -> u16 {
        self.item_count
    }

    /// The high bit flags 32-bit words.
    pub fn word_delta_count(&self) -> u16 {
        self.word_delta_count
    }

    pub fn region_index_count(&self) -> u16 {
        self.region_indexes.len() as u16
    }

    pub fn region_indexes(&self) -> &'a [BigEndian<u16>] {
        self.region_indexes
    }

    pub fn delta_sets(&self) -> &'a [u8] {
        self.delta_sets
    }

    /// Returns an iterator over the per-region delta values for the specified
    /// inner index.
    pub fn delta_set(&self, inner_index: u16) -> impl Iterator<Item = i32> + 'a + Clone {
        let word_delta_count = self.word_delta_count();
        let long_words = word_delta_count & 0x8000 != 0;
        let (word_size, small_size) = if long_words { (4, 2) } else { (2, 1) };
        let word_delta_count = word_delta_count & 0x7FFF;
        let region_count = self.region_index_count() as usize;
        let row_size = word_delta_count as usize * word_size
            + region_count.saturating_sub(word_delta_count as usize) * small_size;
        let offset = row_size * inner_index as usize;
        ItemDeltas {
            cursor: FontData::new(self.delta_sets())
                .slice(offset..)
                .unwrap_or_default()
                .cursor(),
            word_delta_count,
            long_words,
            len: region_count as u16,
            pos: 0,
        }
    }
}

#[derive(Clone)]
struct ItemDeltas<'a> {
    cursor: Cursor<'a>,
    word_delta_count: u16,
    long_words: bool,
    len: u16,
    pos: u16,
}

impl Iterator for ItemDeltas<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.len {
            return None;
        }
        let pos = self.pos;
        self.pos += 1;
        let value = match (pos >= self.word_delta_count, self.long_words) {
            (true, true) | (false, false) => self.cursor.read::<i16>().ok()? as i32,
            (true, false) => self.cursor.read::<i8>().ok()? as i32,
            (false, true) => self.cursor.read::<i32>().ok()?,
        };
        Some(value)
    }
}

/// Resolves a 32-bit offset stored at `pos`; `None` for a null offset.
pub(crate) fn resolve_offset<'a, T: FontRead<'a>>(
    data: FontData<'a>,
    pos: usize,
) -> Option<Result<T, ReadError>> {
    let offset = data.read_at::<u32>(pos).ok()?;
    (offset != 0).then(|| {
        data.split_off(offset as usize)
            .ok_or(ReadError::OutOfBounds)
            .and_then(T::read)
    })
}

/// Delta for an advance, where a missing mapping means the glyph id is
/// the inner index of the first subtable.
pub(crate) fn advance_delta(
    dsim: Option<Result<DeltaSetIndexMap, ReadError>>,
    ivs: Result<ItemVariationStore, ReadError>,
    glyph_id: GlyphId,
    coords: &[F2Dot14],
) -> Result<Fixed, ReadError> {
    let gid = glyph_id.to_u16();
    let ix = match dsim {
        Some(Ok(dsim)) => dsim.get(gid as u32)?,
        _ => DeltaSetIndex {
            outer: 0,
            inner: gid,
        },
    };
    Ok(Fixed::from_i32(ivs?.compute_delta(ix, coords)?))
}

/// Delta for a side bearing, which requires an explicit mapping.
pub(crate) fn item_delta(
    dsim: Option<Result<DeltaSetIndexMap, ReadError>>,
    ivs: Result<ItemVariationStore, ReadError>,
    glyph_id: GlyphId,
    coords: &[F2Dot14],
) -> Result<Fixed, ReadError> {
    let gid = glyph_id.to_u16();
    let ix = match dsim {
        Some(Ok(dsim)) => dsim.get(gid as u32)?,
        _ => return Err(ReadError::NullOffset),
    };
    Ok(Fixed::from_i32(ivs?.compute_delta(ix, coords)?))
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::{
        be_buffer,
        variable::{self, item_variation_store},
    };

    use super::*;

    fn f2dot14(value: f32) -> F2Dot14 {
        F2Dot14::from_f32(value)
    }

    #[test]
    fn ivs_regions() {
        let data = item_variation_store(&[30, -300]);
        let ivs = ItemVariationStore::read(FontData::new(&data)).unwrap();
        let regions = ivs.variation_region_list().unwrap();
        assert_eq!(regions.axis_count(), 2);
        assert_eq!(regions.region_count(), 1);
        let region = regions.region(0).unwrap();
        assert_eq!(region.compute_scalar(&[f2dot14(1.0)]), Fixed::ONE);
        assert_eq!(
            region.compute_scalar(&[f2dot14(0.5), f2dot14(0.7)]),
            Fixed::from_f64(0.5)
        );
        assert_eq!(region.compute_scalar(&[f2dot14(-0.5)]), Fixed::ZERO);
        assert!(regions.region(1).is_err());

        let at = |inner, coord| {
            ivs.compute_delta(DeltaSetIndex { outer: 0, inner }, &[f2dot14(coord)])
                .unwrap()
        };
        assert_eq!(at(0, 1.0), 30);
        assert_eq!(at(1, 1.0), -300);
        assert_eq!(at(1, 0.5), -150);
        assert_eq!(at(1, 0.0), 0);
        // missing subtables contribute nothing
        assert_eq!(
            ivs.compute_delta(DeltaSetIndex { outer: 3, inner: 0 }, &[f2dot14(1.0)]),
            Ok(0)
        );
    }

    #[test]
    fn delta_set_index_map() {
        // format 1, two byte entries, 8 inner bits
        let data = be_buffer! { 1u8, 0x17u8, 3u32, [0x0001u16, 0x0102, 0x0203] };
        let map = DeltaSetIndexMap::read(FontData::new(&data)).unwrap();
        assert_eq!(map.format(), 1);
        assert_eq!(map.entry_format().entry_size(), 2);
        assert_eq!(map.get(1).unwrap(), DeltaSetIndex { outer: 1, inner: 2 });
        // indices past the end use the last entry
        assert_eq!(map.get(10).unwrap(), DeltaSetIndex { outer: 2, inner: 3 });

        let data = be_buffer! { 0u8, 0x20u8, 1u16, [0u8, 0x01, 0x05] };
        let map = DeltaSetIndexMap::read(FontData::new(&data)).unwrap();
        assert_eq!(map.entry_format().entry_size(), 3);
        assert_eq!(
            map.get(0).unwrap(),
            DeltaSetIndex {
                outer: 0x82,
                inner: 1
            }
        );
    }

    #[test]
    fn packed_points() {
        let data = variable::packed_points(&[2, 5, 300]);
        let points = PackedPointNumbers::split_off_front(FontData::new(&data)).0;
        assert_eq!(points.count(), 3);
        assert_eq!(points.iter().collect::<Vec<_>>(), [2, 5, 300]);

        let all = [0u8, 0xFF];
        let (points, rest) = PackedPointNumbers::split_off_front(FontData::new(&all));
        assert_eq!(points.count(), 0);
        assert_eq!(points.iter().take(3).collect::<Vec<_>>(), [0, 1, 2]);
        assert_eq!(rest.as_bytes(), &[0xFF]);
    }

    #[test]
    fn packed_point_byte_len() {
        // two byte count and a two byte run followed by a one byte run
        let data = [0x80, 0x03, 0x81, 0x00, 0x05, 0x01, 0x00, 0x00, 0x07, 0xAA];
        let (points, rest) = PackedPointNumbers::split_off_front(FontData::new(&data));
        assert_eq!(points.count(), 3);
        assert_eq!(points.iter().collect::<Vec<_>>(), [5, 261, 268]);
        assert_eq!(rest.as_bytes(), &[0xAA]);
    }

    #[test]
    fn packed_points_dont_panic() {
        // a single '0' byte means that there are deltas for all points
        static ALL_POINTS: FontData = FontData::new(&[0, 0xFF, 0xFF, 0xFF, 0xFF]);
        let (all_points, _) = PackedPointNumbers::split_off_front(ALL_POINTS);
        // in which case the iterator just keeps incrementing until u16::MAX
        assert_eq!(all_points.iter().count(), u16::MAX as usize);
        // a truncated run ends early
        let truncated = [5u8, 0x04, 1, 1];
        let (points, _) = PackedPointNumbers::split_off_front(FontData::new(&truncated));
        assert_eq!(points.iter().count(), 2);
    }

    #[test]
    fn packed_deltas() {
        let data = variable::packed_deltas(&[0, 0, 5, -3, 400, -1000]);
        let deltas = PackedDeltas::new(FontData::new(&data));
        assert_eq!(deltas.count(), 6);
        assert_eq!(deltas.iter().collect::<Vec<_>>(), [0, 0, 5, -3, 400, -1000]);
    }

    #[test]
    fn packed_deltas_spec() {
        // example from the OpenType specification
        static INPUT: FontData = FontData::new(&[
            0x03, 0x0A, 0x97, 0x00, 0xC6, 0x87, 0x41, 0x10, 0x22, 0xFB, 0x34,
        ]);
        static EXPECTED: &[i16] = &[10, -105, 0, -58, 0, 0, 0, 0, 0, 0, 0, 0, 4130, -1228];
        let deltas = PackedDeltas::new(INPUT);
        assert_eq!(deltas.count(), EXPECTED.len());
        assert_eq!(deltas.iter().collect::<Vec<_>>(), EXPECTED);
    }

    #[test]
    fn tuple_scalars() {
        let peak = be_buffer! { [f2dot14(1.0), f2dot14(0.0)] };
        let peak = Tuple::new(FontData::new(&peak).read_array(0..4).unwrap());
        let scalar = |coords: &[f32]| {
            let coords: Vec<_> = coords.iter().copied().map(f2dot14).collect();
            compute_tuple_scalar(peak, None, &coords)
        };
        assert_eq!(scalar(&[1.0, 0.0]), Some(Fixed::ONE));
        assert_eq!(scalar(&[0.25, -1.0]), Some(Fixed::from_f64(0.25)));
        assert_eq!(scalar(&[0.0, 1.0]), None);
        assert_eq!(scalar(&[-0.5, 0.0]), None);

        let bounds = be_buffer! { [f2dot14(0.5), f2dot14(0.0), f2dot14(1.0), f2dot14(0.0)] };
        let bounds = FontData::new(&bounds);
        let start = Tuple::new(bounds.read_array(0..4).unwrap());
        let end = Tuple::new(bounds.read_array(4..8).unwrap());
        let peak_data = be_buffer! { [f2dot14(0.75), f2dot14(0.0)] };
        let peak = Tuple::new(FontData::new(&peak_data).read_array(0..4).unwrap());
        let coords = [f2dot14(0.625)];
        assert_eq!(
            compute_tuple_scalar(peak, Some((start, end)), &coords),
            Some(Fixed::from_f64(0.5))
        );
        assert_eq!(
            compute_tuple_scalar(peak, Some((start, end)), &[f2dot14(0.25)]),
            None
        );
    }
}
