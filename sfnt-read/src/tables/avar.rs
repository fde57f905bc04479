//! The [Axis Variations](https://docs.microsoft.com/en-us/typography/opentype/spec/avar) table

use types::{BigEndian, F2Dot14, Fixed, MajorMinor, Tag};

use crate::{FontData, FontRead, ReadError};

/// 'avar'
pub const TAG: Tag = Tag::new(b"avar");

/// The [avar](https://learn.microsoft.com/en-us/typography/opentype/spec/avar) table.
#[derive(Clone, Copy)]
pub struct Avar<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Avar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: MajorMinor = data.read_at(0)?;
        if version.major != 1 && version.major != 2 {
            return Err(ReadError::InvalidFormat(version.major as i64));
        }
        data.read_at::<u16>(6)?;
        Ok(Self { data })
    }
}

impl<'a> Avar<'a> {
    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    /// The number of variation axes for this font.
    pub fn axis_count(&self) -> u16 {
        self.data.read_at(6).unwrap_or_default()
    }

    /// The segment maps, one per axis, in `fvar` axis order.
    pub fn axis_segment_maps(&self) -> SegmentMapsIter<'a> {
        SegmentMapsIter {
            data: self.data.split_off(8).unwrap_or_default(),
            remaining: self.axis_count(),
        }
    }
}

impl core::fmt::Debug for Avar<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Avar")
            .field("version", &self.version())
            .field("axis_count", &self.axis_count())
            .finish()
    }
}

/// Iterator over the [`SegmentMaps`] of an `avar` table.
#[derive(Clone, Debug)]
pub struct SegmentMapsIter<'a> {
    data: FontData<'a>,
    remaining: u16,
}

impl<'a> Iterator for SegmentMapsIter<'a> {
    type Item = Result<SegmentMaps<'a>, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let maps = SegmentMaps::read(self.data);
        let len = maps
            .as_ref()
            .map(|maps| 2 + maps.axis_value_maps.len() * 4)
            .unwrap_or_default();
        match self.data.split_off(len) {
            Some(rest) => self.data = rest,
            None => self.remaining = 0,
        }
        Some(maps)
    }
}

/// A mapping of a single normalized coordinate.
#[derive(Clone, Copy, Debug, bytemuck::AnyBitPattern)]
#[repr(C)]
#[repr(packed)]
pub struct AxisValueMap {
    pub from_coordinate: BigEndian<F2Dot14>,
    pub to_coordinate: BigEndian<F2Dot14>,
}

impl AxisValueMap {
    pub fn from_coordinate(&self) -> F2Dot14 {
        self.from_coordinate.get()
    }

    pub fn to_coordinate(&self) -> F2Dot14 {
        self.to_coordinate.get()
    }
}

/// The piecewise linear mapping for one axis.
#[derive(Clone, Copy, Debug)]
pub struct SegmentMaps<'a> {
    axis_value_maps: &'a [AxisValueMap],
}

impl<'a> FontRead<'a> for SegmentMaps<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let position_map_count: u16 = cursor.read()?;
        let axis_value_maps = cursor.read_array(position_map_count as usize)?;
        Ok(SegmentMaps { axis_value_maps })
    }
}

impl<'a> SegmentMaps<'a> {
    pub fn axis_value_maps(&self) -> &'a [AxisValueMap] {
        self.axis_value_maps
    }

    /// Applies the piecewise linear mapping to the specified coordinate.
    pub fn apply(&self, coord: Fixed) -> Fixed {
        let maps = self.axis_value_maps;
        let from = |m: &AxisValueMap| m.from_coordinate().to_fixed();
        let to = |m: &AxisValueMap| m.to_coordinate().to_fixed();
        let (Some(first), Some(last)) = (maps.first(), maps.last()) else {
            return coord;
        };
        if maps.len() == 1 {
            // shift by the single mapping delta
            return coord - from(first) + to(first);
        }
        if coord <= from(first) {
            return coord - from(first) + to(first);
        }
        if coord >= from(last) {
            return coord - from(last) + to(last);
        }
        // first map whose `from` is not less than the coordinate
        let ix = maps.partition_point(|m| from(m) < coord);
        let (Some(before), Some(after)) = (maps.get(ix.wrapping_sub(1)), maps.get(ix)) else {
            return coord;
        };
        if from(after) == coord {
            return to(after);
        }
        let denom = from(after) - from(before);
        if denom == Fixed::ZERO {
            return to(after);
        }
        to(before) + (to(after) - to(before)).mul_div(coord - from(before), denom)
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::{be_buffer, variable};

    use super::*;

    fn value_map(from: f32, to: f32) -> [F2Dot14; 2] {
        [F2Dot14::from_f32(from), F2Dot14::from_f32(to)]
    }

    #[test]
    fn segment_maps() {
        let data = variable::avar_table();
        let avar = Avar::read(FontData::new(&data)).unwrap();
        assert_eq!(avar.axis_count(), 2);
        let maps: Vec<_> = avar
            .axis_segment_maps()
            .map(|maps| {
                maps.unwrap()
                    .axis_value_maps()
                    .iter()
                    .map(|m| [m.from_coordinate(), m.to_coordinate()])
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(
            maps,
            [
                vec![
                    value_map(-1.0, -1.0),
                    value_map(0.0, 0.0),
                    value_map(0.5, 0.25),
                    value_map(1.0, 1.0)
                ],
                vec![
                    value_map(-1.0, -1.0),
                    value_map(0.0, 0.0),
                    value_map(1.0, 1.0)
                ],
            ]
        );
    }

    #[test]
    fn apply_mapping() {
        let data = variable::avar_table();
        let avar = Avar::read(FontData::new(&data)).unwrap();
        let weight = avar.axis_segment_maps().next().unwrap().unwrap();
        let apply = |value: f64| weight.apply(Fixed::from_f64(value));
        assert_eq!(apply(0.5), Fixed::from_f64(0.25));
        assert_eq!(apply(0.75), Fixed::from_f64(0.625));
        assert_eq!(apply(0.25), Fixed::from_f64(0.125));
        assert_eq!(apply(-0.5), Fixed::from_f64(-0.5));
        assert_eq!(apply(1.0), Fixed::ONE);
        assert_eq!(apply(0.0), Fixed::ZERO);
    }

    #[test]
    fn truncated_maps() {
        // claims two axes but only has data for one
        let data = be_buffer! { 1u16, 0u16, 0u16, 2u16, 1u16, [0i16, 0] };
        let avar = Avar::read(FontData::new(&data)).unwrap();
        let mut maps = avar.axis_segment_maps();
        let first = maps.next().unwrap().unwrap();
        assert_eq!(first.apply(Fixed::from_f64(0.5)), Fixed::from_f64(0.5));
        assert!(maps.next().unwrap().is_err());
        assert!(maps.next().is_none());
    }
}
