//! The [gvar (Glyph Variations)](https://learn.microsoft.com/en-us/typography/opentype/spec/gvar)
//! table

use types::{BigEndian, F2Dot14, Fixed, GlyphId, MajorMinor, Point, Tag};

use super::{
    glyf::{Glyf, Glyph},
    loca::Loca,
    variations::{
        compute_tuple_scalar, DeltaRunIter, PackedDeltas, PackedPointNumbers, PackedPointNumbersIter, Tuple,
        TupleVariationCount, TupleVariationHeader, TupleVariationHeaderIter,
    },
};
use crate::{FontData, FontRead, ReadError};

/// 'gvar'
pub const TAG: Tag = Tag::new(b"gvar");

/// Number of phantom points appended to the points of every glyph.
pub const PHANTOM_POINT_COUNT: usize = 4;

const HEADER_LEN: usize = 20;

/// Flags in the `gvar` header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GvarFlags(u16);

impl GvarFlags {
    /// If set, offsets to GlyphVariationData are 32 bits.
    pub const LONG_OFFSETS: Self = Self(1);

    pub fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::LONG_OFFSETS.0)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// The [gvar (Glyph Variations)](https://learn.microsoft.com/en-us/typography/opentype/spec/gvar)
/// table
#[derive(Clone, Copy)]
pub struct Gvar<'a> {
    data: FontData<'a>,
    flags: GvarFlags,
    glyph_count: u16,
    shared_tuples: &'a [BigEndian<F2Dot14>],
}

impl<'a> FontRead<'a> for Gvar<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let version: MajorMinor = data.read_at(0)?;
        if version.major != 1 {
            return Err(ReadError::InvalidFormat(version.major as i64));
        }
        let axis_count: u16 = data.read_at(4)?;
        let shared_tuple_count: u16 = data.read_at(6)?;
        let shared_tuples_offset: u32 = data.read_at(8)?;
        let glyph_count: u16 = data.read_at(12)?;
        let flags = GvarFlags::from_bits_truncate(data.read_at(14)?);
        let offset_size = if flags.contains(GvarFlags::LONG_OFFSETS) {
            4
        } else {
            2
        };
        let offsets_len = (glyph_count as usize + 1) * offset_size;
        if data.len() < HEADER_LEN + offsets_len {
            return Err(ReadError::OutOfBounds);
        }
        let shared_tuples = if shared_tuple_count == 0 {
            &[]
        } else {
            let start = shared_tuples_offset as usize;
            let len = shared_tuple_count as usize * axis_count as usize * 2;
            data.read_array(start..start + len)?
        };
        Ok(Self {
            data,
            flags,
            glyph_count,
            shared_tuples,
        })
    }
}

impl<'a> Gvar<'a> {
    pub fn version(&self) -> MajorMinor {
        self.data.read_at(0).unwrap_or(MajorMinor::VERSION_1_0)
    }

    /// The number of variation axes for this font. This must be the same
    /// number as axisCount in the 'fvar' table.
    pub fn axis_count(&self) -> u16 {
        self.data.read_at(4).unwrap_or_default()
    }

    /// The number of shared tuple records.
    pub fn shared_tuple_count(&self) -> u16 {
        self.data.read_at(6).unwrap_or_default()
    }

    /// The number of glyphs in this font; must match the glyph count
    /// from `maxp`.
    pub fn glyph_count(&self) -> u16 {
        self.glyph_count
    }

    pub fn flags(&self) -> GvarFlags {
        self.flags
    }

    /// Offset from the start of the table to the glyph variation data array.
    pub fn glyph_variation_data_array_offset(&self) -> u32 {
        self.data.read_at(16).unwrap_or_default()
    }

    /// The shared tuple at `index`.
    pub fn shared_tuple(&self, index: u16) -> Option<Tuple<'a>> {
        let len = self.axis_count() as usize;
        let start = index as usize * len;
        self.shared_tuples.get(start..start + len).map(Tuple::new)
    }

    fn glyph_data_offset(&self, index: usize) -> Result<usize, ReadError> {
        if self.flags.contains(GvarFlags::LONG_OFFSETS) {
            self.data
                .read_at::<u32>(HEADER_LEN + index * 4)
                .map(|offset| offset as usize)
        } else {
            self.data
                .read_at::<u16>(HEADER_LEN + index * 2)
                .map(|offset| offset as usize * 2)
        }
    }

    /// Returns the variation data for the glyph, or `None` if the glyph
    /// has no variations.
    pub fn glyph_variation_data(
        &self,
        glyph_id: GlyphId,
    ) -> Result<Option<GlyphVariationData<'a>>, ReadError> {
        let gid = glyph_id.to_u32() as usize;
        if gid >= self.glyph_count as usize {
            return Err(ReadError::OutOfBounds);
        }
        let start = self.glyph_data_offset(gid)?;
        let end = self.glyph_data_offset(gid + 1)?;
        if end <= start {
            return Ok(None);
        }
        let base = self.glyph_variation_data_array_offset() as usize;
        let data = self
            .data
            .slice(base + start..base + end)
            .ok_or(ReadError::OutOfBounds)?;
        GlyphVariationData::new(data, self.axis_count(), self.shared_tuples).map(Some)
    }

    /// Returns the deltas for the four phantom points of the glyph.
    ///
    /// These adjust the advance and side bearings when the font lacks
    /// `HVAR` or `VVAR`. Phantom points never receive inferred deltas, so
    /// only explicit ones are summed.
    pub fn phantom_point_deltas(
        &self,
        glyf: &Glyf,
        loca: &Loca,
        coords: &[F2Dot14],
        glyph_id: GlyphId,
    ) -> Result<[Point<Fixed>; PHANTOM_POINT_COUNT], ReadError> {
        let mut deltas = [Point::default(); PHANTOM_POINT_COUNT];
        let Some(var_data) = self.glyph_variation_data(glyph_id)? else {
            return Ok(deltas);
        };
        let point_count = match loca.get_glyf(glyph_id, glyf)? {
            Some(Glyph::Simple(simple)) => simple.num_points(),
            Some(Glyph::Composite(composite)) => composite.components().count(),
            None => 0,
        };
        let phantom_range = point_count..point_count + PHANTOM_POINT_COUNT;
        for (tuple, scalar) in var_data.active_tuples_at(coords) {
            for delta in tuple.deltas() {
                let position = delta.position as usize;
                if phantom_range.contains(&position) {
                    deltas[position - point_count] += delta.apply_scalar(scalar);
                }
            }
        }
        Ok(deltas)
    }
}

impl core::fmt::Debug for Gvar<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Gvar")
            .field("version", &self.version())
            .field("axis_count", &self.axis_count())
            .field("shared_tuple_count", &self.shared_tuple_count())
            .field("glyph_count", &self.glyph_count)
            .field("flags", &self.flags)
            .finish()
    }
}

/// The variation data for a single glyph.
#[derive(Clone, Copy, Debug)]
pub struct GlyphVariationData<'a> {
    axis_count: u16,
    shared_tuples: &'a [BigEndian<F2Dot14>],
    tuple_count: TupleVariationCount,
    header_data: FontData<'a>,
    shared_point_numbers: Option<PackedPointNumbers<'a>>,
    serialized_data: FontData<'a>,
}

impl<'a> GlyphVariationData<'a> {
    fn new(
        data: FontData<'a>,
        axis_count: u16,
        shared_tuples: &'a [BigEndian<F2Dot14>],
    ) -> Result<Self, ReadError> {
        let tuple_count = TupleVariationCount::from_bits(data.read_at(0)?);
        let data_offset: u16 = data.read_at(2)?;
        let header_data = data.split_off(4).ok_or(ReadError::OutOfBounds)?;
        let serialized_data = data
            .split_off(data_offset as usize)
            .ok_or(ReadError::OutOfBounds)?;
        let (shared_point_numbers, serialized_data) = if tuple_count.shared_point_numbers() {
            let (points, rest) = PackedPointNumbers::split_off_front(serialized_data);
            (Some(points), rest)
        } else {
            (None, serialized_data)
        };
        Ok(Self {
            axis_count,
            shared_tuples,
            tuple_count,
            header_data,
            shared_point_numbers,
            serialized_data,
        })
    }

    /// The number of tuple variation tables for this glyph.
    pub fn tuple_count(&self) -> u16 {
        self.tuple_count.count()
    }

    /// Iterates over every tuple variation of the glyph.
    pub fn tuples(&self) -> TupleVariationIter<'a> {
        TupleVariationIter {
            headers: TupleVariationHeaderIter::new(
                self.header_data,
                self.tuple_count.count() as usize,
                self.axis_count,
            ),
            serialized_data: self.serialized_data,
            parent: *self,
        }
    }

    /// Returns the tuples that apply at `coords` along with their scalars.
    pub fn active_tuples_at<'b>(
        &self,
        coords: &'b [F2Dot14],
    ) -> impl Iterator<Item = (TupleVariation<'a>, Fixed)> + 'b
    where
        'a: 'b,
    {
        self.tuples().filter_map(move |tuple| {
            let scalar = tuple.compute_scalar(coords)?;
            Some((tuple, scalar))
        })
    }

    fn shared_tuple(&self, index: u16) -> Option<Tuple<'a>> {
        let len = self.axis_count as usize;
        let start = index as usize * len;
        self.shared_tuples.get(start..start + len).map(Tuple::new)
    }
}

/// Iterator over the tuple variations of a glyph.
///
/// Stops at the first malformed header.
#[derive(Clone, Debug)]
pub struct TupleVariationIter<'a> {
    headers: TupleVariationHeaderIter<'a>,
    serialized_data: FontData<'a>,
    parent: GlyphVariationData<'a>,
}

impl<'a> Iterator for TupleVariationIter<'a> {
    type Item = TupleVariation<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = self.headers.next()?.ok()?;
        let data = self
            .serialized_data
            .take_up_to(header.variation_data_size() as usize)?;
        let (point_numbers, deltas) = if header.tuple_index().private_point_numbers() {
            PackedPointNumbers::split_off_front(data)
        } else {
            (self.parent.shared_point_numbers?, data)
        };
        let peak = match header.peak_tuple() {
            Some(peak) => peak,
            None => self
                .parent
                .shared_tuple(header.tuple_index().tuple_records_index()?)?,
        };
        Some(TupleVariation {
            header,
            peak,
            point_numbers,
            deltas,
        })
    }
}

/// A single set of deltas for a glyph, with the region where it applies.
#[derive(Clone, Debug)]
pub struct TupleVariation<'a> {
    header: TupleVariationHeader<'a>,
    peak: Tuple<'a>,
    point_numbers: PackedPointNumbers<'a>,
    deltas: FontData<'a>,
}

impl<'a> TupleVariation<'a> {
    pub fn header(&self) -> &TupleVariationHeader<'a> {
        &self.header
    }

    /// The peak of the region, either embedded or from the shared tuples.
    pub fn peak(&self) -> Tuple<'a> {
        self.peak
    }

    /// Returns `true` if this tuple provides deltas for all points in a glyph.
    pub fn has_deltas_for_all_points(&self) -> bool {
        self.point_numbers.count() == 0
    }

    pub fn point_numbers(&self) -> PackedPointNumbersIter<'a> {
        self.point_numbers.iter()
    }

    /// Computes the scalar of this tuple at `coords`, or `None` if it does
    /// not apply there.
    pub fn compute_scalar(&self, coords: &[F2Dot14]) -> Option<Fixed> {
        let intermediate = self
            .header
            .intermediate_start_tuple()
            .zip(self.header.intermediate_end_tuple());
        compute_tuple_scalar(self.peak, intermediate, coords)
    }

    /// Iterates over the deltas of this tuple.
    ///
    /// When the tuple covers all points, the position of each delta is its
    /// index.
    pub fn deltas(&self) -> GlyphDeltaIter<'a> {
        let packed = PackedDeltas::new(self.deltas);
        let half = packed.count() / 2;
        GlyphDeltaIter {
            points: self.point_numbers.iter(),
            x_deltas: packed.iter().take(half),
            y_deltas: packed.iter().skip(half),
        }
    }
}

/// Iterator over the deltas of a [`TupleVariation`].
#[derive(Clone, Debug)]
pub struct GlyphDeltaIter<'a> {
    points: PackedPointNumbersIter<'a>,
    x_deltas: core::iter::Take<DeltaRunIter<'a>>,
    y_deltas: core::iter::Skip<DeltaRunIter<'a>>,
}

impl Iterator for GlyphDeltaIter<'_> {
    type Item = GlyphDelta;

    fn next(&mut self) -> Option<Self::Item> {
        let position = self.points.next()?;
        let x_delta = self.x_deltas.next()?;
        let y_delta = self.y_deltas.next()?;
        Some(GlyphDelta {
            position,
            x_delta,
            y_delta,
        })
    }
}

/// Delta information for a single point or component in a glyph.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GlyphDelta {
    /// The point or component index.
    pub position: u16,
    /// The x delta.
    pub x_delta: i16,
    /// The y delta.
    pub y_delta: i16,
}

impl GlyphDelta {
    pub fn new(position: u16, x_delta: i16, y_delta: i16) -> Self {
        Self {
            position,
            x_delta,
            y_delta,
        }
    }

    /// Applies a tuple scalar to this delta.
    pub fn apply_scalar(self, scalar: Fixed) -> Point<Fixed> {
        Point::new(
            Fixed::from_i32(self.x_delta as i32) * scalar,
            Fixed::from_i32(self.y_delta as i32) * scalar,
        )
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::variable;

    use super::*;
    use crate::{FontRef, TableProvider};

    fn coords(values: &[f32]) -> Vec<F2Dot14> {
        values.iter().copied().map(F2Dot14::from_f32).collect()
    }

    #[test]
    fn read_header() {
        let data = variable::gvar_table();
        let gvar = Gvar::read(FontData::new(&data)).unwrap();
        assert_eq!(gvar.axis_count(), 2);
        assert_eq!(gvar.glyph_count(), variable::NUM_GLYPHS);
        assert!(gvar.flags().contains(GvarFlags::LONG_OFFSETS));
        let shared = gvar.shared_tuple(0).unwrap();
        assert_eq!(shared.get(0), Some(F2Dot14::ONE));
        assert!(gvar.shared_tuple(1).is_none());
        assert!(gvar
            .glyph_variation_data(GlyphId::new(0))
            .unwrap()
            .is_none());
        assert!(gvar
            .glyph_variation_data(GlyphId::new(variable::NUM_GLYPHS))
            .is_err());
    }

    #[test]
    fn shared_tuple_with_all_points() {
        let data = variable::gvar_table();
        let gvar = Gvar::read(FontData::new(&data)).unwrap();
        let var_data = gvar
            .glyph_variation_data(GlyphId::new(variable::GLYPH_SQUARE))
            .unwrap()
            .unwrap();
        assert_eq!(var_data.tuple_count(), 1);
        let max = coords(&[1.0, 0.0]);
        let (tuple, scalar) = var_data.active_tuples_at(&max).next().unwrap();
        assert_eq!(scalar, Fixed::ONE);
        assert!(tuple.has_deltas_for_all_points());
        let deltas: Vec<_> = tuple.deltas().collect();
        assert_eq!(deltas.len(), 8);
        assert_eq!(deltas[1], GlyphDelta::new(1, 100, 0));
        assert_eq!(deltas[2], GlyphDelta::new(2, 100, 100));
        assert_eq!(deltas[5], GlyphDelta::new(5, variable::ADVANCE_DELTA, 0));

        let half = coords(&[0.5, 0.0]);
        let (tuple, scalar) = var_data.active_tuples_at(&half).next().unwrap();
        assert_eq!(scalar, Fixed::from_f64(0.5));
        assert_eq!(
            tuple.deltas().nth(1).unwrap().apply_scalar(scalar),
            Point::new(Fixed::from_i32(50), Fixed::ZERO)
        );

        let light = coords(&[-1.0, 0.0]);
        assert_eq!(var_data.active_tuples_at(&light).count(), 0);
        assert_eq!(var_data.active_tuples_at(&[]).count(), 0);
    }

    #[test]
    fn embedded_peak_and_private_points() {
        let data = variable::gvar_table();
        let gvar = Gvar::read(FontData::new(&data)).unwrap();
        let max = coords(&[1.0, 0.0]);

        let composite = gvar
            .glyph_variation_data(GlyphId::new(variable::GLYPH_COMPOSITE))
            .unwrap()
            .unwrap();
        let tuple = composite.tuples().next().unwrap();
        assert!(tuple.header().peak_tuple().is_some());
        assert_eq!(tuple.compute_scalar(&max), Some(Fixed::ONE));
        assert_eq!(tuple.deltas().next(), Some(GlyphDelta::new(0, 50, 0)));

        let inferred = gvar
            .glyph_variation_data(GlyphId::new(variable::GLYPH_INFERRED))
            .unwrap()
            .unwrap();
        let tuple = inferred.tuples().next().unwrap();
        assert!(!tuple.has_deltas_for_all_points());
        assert_eq!(tuple.point_numbers().collect::<Vec<_>>(), [2]);
        assert_eq!(
            tuple.deltas().collect::<Vec<_>>(),
            [GlyphDelta::new(2, 50, 50)]
        );
    }

    #[test]
    fn phantom_points() {
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        let gvar = font.gvar().unwrap();
        let glyf = font.glyf().unwrap();
        let loca = font.loca(None).unwrap();
        let max = coords(&[1.0, 0.0]);
        let deltas = gvar
            .phantom_point_deltas(&glyf, &loca, &max, GlyphId::new(variable::GLYPH_SQUARE))
            .unwrap();
        assert_eq!(
            deltas[1],
            Point::new(Fixed::from_i32(variable::ADVANCE_DELTA as i32), Fixed::ZERO)
        );
        assert_eq!(deltas[0], Point::default());
        // no variation data
        let deltas = gvar
            .phantom_point_deltas(&glyf, &loca, &max, GlyphId::new(0))
            .unwrap();
        assert_eq!(deltas, [Point::default(); PHANTOM_POINT_COUNT]);
    }
}
