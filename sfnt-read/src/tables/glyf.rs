//! The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table

use types::{BigEndian, BoundingBox, F2Dot14, GlyphId, Point, Tag};

use crate::{font_data::Cursor, FontData, FontRead, ReadError};

/// 'glyf'
pub const TAG: Tag = Tag::new(b"glyf");

/// The [glyf (Glyph Data)](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) table
///
/// Glyphs are located through the [loca](super::loca) table.
#[derive(Clone, Copy, Debug)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Self { data })
    }
}

impl<'a> Glyf<'a> {
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}

/// Flags used in [SimpleGlyph]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SimpleGlyphFlags(u8);

impl SimpleGlyphFlags {
    /// Bit 0: If set, the point is on the curve; otherwise, it is off
    /// the curve.
    pub const ON_CURVE_POINT: Self = Self(0x01);
    /// Bit 1: If set, the corresponding x-coordinate is 1 byte long;
    /// otherwise it is 2 bytes.
    pub const X_SHORT_VECTOR: Self = Self(0x02);
    /// Bit 2: If set, the corresponding y-coordinate is 1 byte long.
    pub const Y_SHORT_VECTOR: Self = Self(0x04);
    /// Bit 3: If set, the next byte specifies the number of additional
    /// times this flag byte is to be repeated.
    pub const REPEAT_FLAG: Self = Self(0x08);
    /// Bit 4: the sign of a short x delta, or "same as previous" for a
    /// long one.
    pub const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: Self = Self(0x10);
    /// Bit 5: the sign of a short y delta, or "same as previous" for a
    /// long one.
    pub const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: Self = Self(0x20);
    /// Bit 6: contours may overlap.
    pub const OVERLAP_SIMPLE: Self = Self(0x40);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & 0x7F)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for SimpleGlyphFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitAnd for SimpleGlyphFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

/// Flags used in [CompositeGlyph]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CompositeGlyphFlags(u16);

impl CompositeGlyphFlags {
    /// Bit 0: If this is set, the arguments are 16-bit; otherwise, they
    /// are bytes.
    pub const ARG_1_AND_2_ARE_WORDS: Self = Self(0x0001);
    /// Bit 1: If this is set, the arguments are signed xy values;
    /// otherwise, they are unsigned point numbers.
    pub const ARGS_ARE_XY_VALUES: Self = Self(0x0002);
    /// Bit 2: round xy values to the grid.
    pub const ROUND_XY_TO_GRID: Self = Self(0x0004);
    /// Bit 3: there is a simple scale for the component.
    pub const WE_HAVE_A_SCALE: Self = Self(0x0008);
    /// Bit 5: at least one more glyph after this one.
    pub const MORE_COMPONENTS: Self = Self(0x0020);
    /// Bit 6: the x direction will use a different scale from the y
    /// direction.
    pub const WE_HAVE_AN_X_AND_Y_SCALE: Self = Self(0x0040);
    /// Bit 7: there is a two by two transformation.
    pub const WE_HAVE_A_TWO_BY_TWO: Self = Self(0x0080);
    /// Bit 8: instructions follow the last component.
    pub const WE_HAVE_INSTRUCTIONS: Self = Self(0x0100);
    /// Bit 9: use this component's metrics for the composite.
    pub const USE_MY_METRICS: Self = Self(0x0200);
    /// Bit 10: the components of the compound glyph overlap.
    pub const OVERLAP_COMPOUND: Self = Self(0x0400);
    /// Bit 11: the offset is scaled by the component transform.
    pub const SCALED_COMPONENT_OFFSET: Self = Self(0x0800);
    /// Bit 12: the offset is not scaled.
    pub const UNSCALED_COMPONENT_OFFSET: Self = Self(0x1000);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & 0x1FEF)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// A glyph in the `glyf` table.
#[derive(Clone, Copy, Debug)]
pub enum Glyph<'a> {
    Simple(SimpleGlyph<'a>),
    Composite(CompositeGlyph<'a>),
}

const GLYPH_HEADER_LEN: usize = 10;

impl<'a> FontRead<'a> for Glyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let number_of_contours: i16 = data.read_at(0)?;
        if number_of_contours >= 0 {
            SimpleGlyph::read(data).map(Self::Simple)
        } else {
            CompositeGlyph::read(data).map(Self::Composite)
        }
    }
}

macro_rules! header_getter {
    ($field:ident, $offset:literal) => {
        pub fn $field(&self) -> i16 {
            self.header_data().read_at($offset).unwrap_or_default()
        }
    };
}

impl<'a> Glyph<'a> {
    fn header_data(&self) -> FontData<'a> {
        match self {
            Self::Simple(glyph) => glyph.data,
            Self::Composite(glyph) => glyph.data,
        }
    }

    header_getter!(number_of_contours, 0);
    header_getter!(x_min, 2);
    header_getter!(y_min, 4);
    header_getter!(x_max, 6);
    header_getter!(y_max, 8);

    /// The bounding box recorded in the glyph header.
    pub fn bounds(&self) -> BoundingBox<i16> {
        BoundingBox {
            x_min: self.x_min(),
            y_min: self.y_min(),
            x_max: self.x_max(),
            y_max: self.y_max(),
        }
    }
}

/// A glyph made of contours of quadratic points.
#[derive(Clone, Copy)]
pub struct SimpleGlyph<'a> {
    data: FontData<'a>,
    end_pts_of_contours: &'a [BigEndian<u16>],
    instructions: &'a [u8],
    glyph_data: &'a [u8],
}

impl<'a> FontRead<'a> for SimpleGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let number_of_contours: i16 = cursor.read()?;
        cursor.advance_by(GLYPH_HEADER_LEN - 2);
        let end_pts_of_contours = cursor.read_array(number_of_contours.max(0) as usize)?;
        let instruction_length: u16 = cursor.read()?;
        let instructions = cursor.read_array(instruction_length as usize)?;
        let glyph_data = cursor
            .remaining()
            .map(|data| data.as_bytes())
            .unwrap_or_default();
        Ok(Self {
            data,
            end_pts_of_contours,
            instructions,
            glyph_data,
        })
    }
}

impl<'a> SimpleGlyph<'a> {
    header_getter!(number_of_contours, 0);
    header_getter!(x_min, 2);
    header_getter!(y_min, 4);
    header_getter!(x_max, 6);
    header_getter!(y_max, 8);

    fn header_data(&self) -> FontData<'a> {
        self.data
    }

    /// The last point index of each contour.
    pub fn end_pts_of_contours(&self) -> &'a [BigEndian<u16>] {
        self.end_pts_of_contours
    }

    pub fn instructions(&self) -> &'a [u8] {
        self.instructions
    }

    /// Flags and coordinates following the instructions.
    pub fn glyph_data(&self) -> &'a [u8] {
        self.glyph_data
    }

    /// Returns the total number of points.
    pub fn num_points(&self) -> usize {
        self.end_pts_of_contours()
            .last()
            .map(|last| last.get() as usize + 1)
            .unwrap_or(0)
    }

    /// Reads points and flags into the provided buffers.
    ///
    /// Drops all flag bits except on-curve. The lengths of the buffers must be
    /// equal to the value returned by [num_points](Self::num_points).
    ///
    /// ## Performance
    ///
    /// This is faster than using the iterator returned by
    /// [points](Self::points) so should be used when it is possible to
    /// preallocate buffers.
    pub fn read_points_fast(
        &self,
        points: &mut [Point<i32>],
        flags: &mut [u8],
    ) -> Result<(), ReadError> {
        let n_points = self.num_points();
        if points.len() != n_points || flags.len() != n_points {
            return Err(ReadError::InvalidArrayLen);
        }
        let mut cursor = FontData::new(self.glyph_data()).cursor();
        let mut i = 0;
        while i < n_points {
            let flag = SimpleGlyphFlags::from_bits_truncate(cursor.read::<u8>()?);
            let flag_bits = flag.bits();
            if flag.contains(SimpleGlyphFlags::REPEAT_FLAG) {
                let count = (cursor.read::<u8>()? as usize + 1).min(n_points - i);
                for f in &mut flags[i..i + count] {
                    *f = flag_bits;
                }
                i += count;
            } else {
                flags[i] = flag_bits;
                i += 1;
            }
        }
        let mut x = 0i32;
        for (&flag_bits, point) in flags.iter().zip(points.iter_mut()) {
            let flag = SimpleGlyphFlags::from_bits_truncate(flag_bits);
            x = x.wrapping_add(read_delta(
                &mut cursor,
                flag,
                SimpleGlyphFlags::X_SHORT_VECTOR,
                SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
            )?);
            point.x = x;
        }
        let mut y = 0i32;
        for (flag_bits, point) in flags.iter_mut().zip(points.iter_mut()) {
            let flag = SimpleGlyphFlags::from_bits_truncate(*flag_bits);
            y = y.wrapping_add(read_delta(
                &mut cursor,
                flag,
                SimpleGlyphFlags::Y_SHORT_VECTOR,
                SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
            )?);
            point.y = y;
            // Only keep the on-curve bit
            *flag_bits &= 1;
        }
        Ok(())
    }

    /// Returns an iterator over the points in the glyph.
    ///
    /// ## Performance
    ///
    /// This is slower than [read_points_fast](Self::read_points_fast) but
    /// provides access to the points without requiring a preallocated buffer.
    pub fn points(&self) -> impl Iterator<Item = CurvePoint> + 'a + Clone {
        self.points_impl()
            .unwrap_or_else(|| PointIter::new(&[], &[], &[]))
            .take(self.num_points())
    }

    fn points_impl(&self) -> Option<PointIter<'a>> {
        let end_points = self.end_pts_of_contours();
        let n_points = end_points.last()?.get().checked_add(1)?;
        let data = self.glyph_data();
        let lens = resolve_coords_len(data, n_points).ok()?;
        let total_len = lens.flags + lens.x_coords + lens.y_coords;
        if data.len() < total_len as usize {
            return None;
        }

        let (flags, data) = data.split_at(lens.flags as usize);
        let (x_coords, y_coords) = data.split_at(lens.x_coords as usize);

        Some(PointIter::new(flags, x_coords, y_coords))
    }
}

impl core::fmt::Debug for SimpleGlyph<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimpleGlyph")
            .field("number_of_contours", &self.number_of_contours())
            .field("num_points", &self.num_points())
            .field("instruction_length", &self.instructions.len())
            .finish()
    }
}

fn read_delta(
    cursor: &mut Cursor<'_>,
    flag: SimpleGlyphFlags,
    short: SimpleGlyphFlags,
    same_or_positive: SimpleGlyphFlags,
) -> Result<i32, ReadError> {
    Ok(if flag.contains(short) {
        let delta = cursor.read::<u8>()? as i32;
        if flag.contains(same_or_positive) {
            delta
        } else {
            -delta
        }
    } else if flag.contains(same_or_positive) {
        0
    } else {
        cursor.read::<i16>()? as i32
    })
}

/// Point with an associated on-curve flag in a simple glyph.
///
/// This type is a simpler representation of the data in the blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurvePoint {
    /// X cooordinate.
    pub x: i16,
    /// Y cooordinate.
    pub y: i16,
    /// True if this is an on-curve point.
    pub on_curve: bool,
}

impl CurvePoint {
    /// Construct a new `CurvePoint`
    pub fn new(x: i16, y: i16, on_curve: bool) -> Self {
        Self { x, y, on_curve }
    }

    /// Convenience method to construct an on-curve point
    pub fn on_curve(x: i16, y: i16) -> Self {
        Self::new(x, y, true)
    }

    /// Convenience method to construct an off-curve point
    pub fn off_curve(x: i16, y: i16) -> Self {
        Self::new(x, y, false)
    }
}

#[derive(Clone)]
struct PointIter<'a> {
    flags: Cursor<'a>,
    x_coords: Cursor<'a>,
    y_coords: Cursor<'a>,
    flag_repeats: u8,
    cur_flags: SimpleGlyphFlags,
    cur_x: i16,
    cur_y: i16,
}

impl<'a> Iterator for PointIter<'a> {
    type Item = CurvePoint;
    fn next(&mut self) -> Option<Self::Item> {
        self.advance_flags()?;
        self.advance_points();
        let is_on_curve = self.cur_flags.contains(SimpleGlyphFlags::ON_CURVE_POINT);
        Some(CurvePoint::new(self.cur_x, self.cur_y, is_on_curve))
    }
}

impl<'a> PointIter<'a> {
    fn new(flags: &'a [u8], x_coords: &'a [u8], y_coords: &'a [u8]) -> Self {
        Self {
            flags: FontData::new(flags).cursor(),
            x_coords: FontData::new(x_coords).cursor(),
            y_coords: FontData::new(y_coords).cursor(),
            flag_repeats: 0,
            cur_flags: SimpleGlyphFlags::empty(),
            cur_x: 0,
            cur_y: 0,
        }
    }

    fn advance_flags(&mut self) -> Option<()> {
        if self.flag_repeats == 0 {
            self.cur_flags = SimpleGlyphFlags::from_bits_truncate(self.flags.read::<u8>().ok()?);
            self.flag_repeats = self
                .cur_flags
                .contains(SimpleGlyphFlags::REPEAT_FLAG)
                .then(|| self.flags.read::<u8>().ok())
                .flatten()
                .unwrap_or(0)
                + 1;
        }
        self.flag_repeats -= 1;
        Some(())
    }

    fn advance_points(&mut self) {
        let x_short = self.cur_flags.contains(SimpleGlyphFlags::X_SHORT_VECTOR);
        let x_same_or_pos = self
            .cur_flags
            .contains(SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR);
        let y_short = self.cur_flags.contains(SimpleGlyphFlags::Y_SHORT_VECTOR);
        let y_same_or_pos = self
            .cur_flags
            .contains(SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR);

        let delta_x = match (x_short, x_same_or_pos) {
            (true, false) => -(self.x_coords.read::<u8>().unwrap_or(0) as i16),
            (true, true) => self.x_coords.read::<u8>().unwrap_or(0) as i16,
            (false, false) => self.x_coords.read::<i16>().unwrap_or(0),
            _ => 0,
        };

        let delta_y = match (y_short, y_same_or_pos) {
            (true, false) => -(self.y_coords.read::<u8>().unwrap_or(0) as i16),
            (true, true) => self.y_coords.read::<u8>().unwrap_or(0) as i16,
            (false, false) => self.y_coords.read::<i16>().unwrap_or(0),
            _ => 0,
        };

        self.cur_x = self.cur_x.wrapping_add(delta_x);
        self.cur_y = self.cur_y.wrapping_add(delta_y);
    }
}

/// Resolves coordinate arrays length.
///
/// The length depends on *Simple Glyph Flags*, so we have to process them all to find it.
fn resolve_coords_len(data: &[u8], points_total: u16) -> Result<FieldLengths, ReadError> {
    let mut cursor = FontData::new(data).cursor();
    let mut flags_left = u32::from(points_total);
    let mut x_coords_len = 0;
    let mut y_coords_len = 0;
    while flags_left > 0 {
        let flags = SimpleGlyphFlags::from_bits_truncate(cursor.read::<u8>()?);

        // The number of times a glyph point repeats.
        let repeats = if flags.contains(SimpleGlyphFlags::REPEAT_FLAG) {
            let repeats: u8 = cursor.read()?;
            u32::from(repeats) + 1
        } else {
            1
        };

        if repeats > flags_left {
            return Err(ReadError::MalformedData("repeat count too large in glyf"));
        }

        // Branchless: a short coordinate is one byte, a long one is two
        // unless the same-or-positive bit marks a repeat of the previous.
        let x_short = SimpleGlyphFlags::X_SHORT_VECTOR;
        let x_long = SimpleGlyphFlags::X_SHORT_VECTOR
            | SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR;
        let y_short = SimpleGlyphFlags::Y_SHORT_VECTOR;
        let y_long = SimpleGlyphFlags::Y_SHORT_VECTOR
            | SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR;
        x_coords_len += ((flags & x_short).bits() != 0) as u32 * repeats;
        x_coords_len += ((flags & x_long).bits() == 0) as u32 * repeats * 2;

        y_coords_len += ((flags & y_short).bits() != 0) as u32 * repeats;
        y_coords_len += ((flags & y_long).bits() == 0) as u32 * repeats * 2;

        flags_left -= repeats;
    }

    Ok(FieldLengths {
        flags: cursor.position()? as u32,
        x_coords: x_coords_len,
        y_coords: y_coords_len,
    })
}

struct FieldLengths {
    flags: u32,
    x_coords: u32,
    y_coords: u32,
}

/// Transform for a composite component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transform {
    /// X scale factor.
    pub xx: F2Dot14,
    /// YX skew factor.
    pub yx: F2Dot14,
    /// XY skew factor.
    pub xy: F2Dot14,
    /// Y scale factor.
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::ONE,
            yx: F2Dot14::ZERO,
            xy: F2Dot14::ZERO,
            yy: F2Dot14::ONE,
        }
    }
}

/// A reference to another glyph. Part of [CompositeGlyph].
#[derive(Clone, Copy, Debug)]
pub struct Component {
    /// Component flags.
    pub flags: CompositeGlyphFlags,
    /// Glyph identifier.
    pub glyph: GlyphId,
    /// Anchor for component placement.
    pub anchor: Anchor,
    /// Component transformation matrix.
    pub transform: Transform,
}

/// Anchor position for a composite component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Offset { x: i16, y: i16 },
    Point { base: u16, component: u16 },
}

/// A glyph assembled from transformed references to other glyphs.
#[derive(Clone, Copy)]
pub struct CompositeGlyph<'a> {
    data: FontData<'a>,
    component_data: &'a [u8],
}

impl<'a> FontRead<'a> for CompositeGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let component_data = data
            .split_off(GLYPH_HEADER_LEN)
            .ok_or(ReadError::OutOfBounds)?
            .as_bytes();
        Ok(Self {
            data,
            component_data,
        })
    }
}

impl<'a> CompositeGlyph<'a> {
    header_getter!(number_of_contours, 0);
    header_getter!(x_min, 2);
    header_getter!(y_min, 4);
    header_getter!(x_max, 6);
    header_getter!(y_max, 8);

    fn header_data(&self) -> FontData<'a> {
        self.data
    }

    pub fn component_data(&self) -> &'a [u8] {
        self.component_data
    }

    /// Returns an iterator over the components of the composite glyph.
    pub fn components(&self) -> impl Iterator<Item = Component> + 'a + Clone {
        ComponentIter {
            cur_flags: CompositeGlyphFlags::empty(),
            done: false,
            cursor: FontData::new(self.component_data()).cursor(),
        }
    }

    /// Returns the TrueType interpreter instructions.
    pub fn instructions(&self) -> Option<&'a [u8]> {
        ComponentIter {
            cur_flags: CompositeGlyphFlags::empty(),
            done: false,
            cursor: FontData::new(self.component_data()).cursor(),
        }
        .instructions()
    }
}

impl core::fmt::Debug for CompositeGlyph<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.components()).finish()
    }
}

#[derive(Clone)]
struct ComponentIter<'a> {
    cur_flags: CompositeGlyphFlags,
    done: bool,
    cursor: Cursor<'a>,
}

impl<'a> ComponentIter<'a> {
    fn instructions(&mut self) -> Option<&'a [u8]> {
        while self.by_ref().next().is_some() {}
        if self
            .cur_flags
            .contains(CompositeGlyphFlags::WE_HAVE_INSTRUCTIONS)
        {
            let len = self.cursor.read::<u16>().ok()? as usize;
            self.cursor.read_array(len).ok()
        } else {
            None
        }
    }
}

impl Iterator for ComponentIter<'_> {
    type Item = Component;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let flags = CompositeGlyphFlags::from_bits_truncate(self.cursor.read::<u16>().ok()?);
        self.cur_flags = flags;
        let glyph = self.cursor.read::<GlyphId>().ok()?;
        let args_are_words = flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
        let args_are_xy_values = flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES);
        let anchor = match (args_are_xy_values, args_are_words) {
            (true, true) => Anchor::Offset {
                x: self.cursor.read().ok()?,
                y: self.cursor.read().ok()?,
            },
            (true, false) => Anchor::Offset {
                x: self.cursor.read::<i8>().ok()? as _,
                y: self.cursor.read::<i8>().ok()? as _,
            },
            (false, true) => Anchor::Point {
                base: self.cursor.read().ok()?,
                component: self.cursor.read().ok()?,
            },
            (false, false) => Anchor::Point {
                base: self.cursor.read::<u8>().ok()? as _,
                component: self.cursor.read::<u8>().ok()? as _,
            },
        };
        let mut transform = Transform::default();
        if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            transform.xx = self.cursor.read().ok()?;
            transform.yy = transform.xx;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            transform.xx = self.cursor.read().ok()?;
            transform.yy = self.cursor.read().ok()?;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            transform.xx = self.cursor.read().ok()?;
            transform.yx = self.cursor.read().ok()?;
            transform.xy = self.cursor.read().ok()?;
            transform.yy = self.cursor.read().ok()?;
        }
        self.done = !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS);

        Some(Component {
            flags,
            glyph,
            anchor,
            transform,
        })
    }
}

#[cfg(test)]
mod tests {
    use sfnt_test_data::glyf::{
        composite_glyph, simple_glyph, simple_glyph_with_instructions, Component as TestComponent,
    };

    use super::*;

    fn curve_points(points: &[(i16, i16, bool)]) -> Vec<CurvePoint> {
        points
            .iter()
            .map(|(x, y, on_curve)| CurvePoint::new(*x, *y, *on_curve))
            .collect()
    }

    #[test]
    fn simple_glyph_points() {
        let outer = [(0, 0, true), (300, 0, true), (150, 400, false), (-20, 280, true)];
        let inner = [(100, 100, true), (200, 100, true), (150, 200, true)];
        let data = simple_glyph_with_instructions(&[&outer, &inner], &[0xB0, 0x01]);
        let Glyph::Simple(glyph) = Glyph::read(FontData::new(&data)).unwrap() else {
            panic!("expected a simple glyph");
        };
        assert_eq!(glyph.number_of_contours(), 2);
        assert_eq!(glyph.x_min(), -20);
        assert_eq!(glyph.y_max(), 400);
        assert_eq!(glyph.instructions(), &[0xB0, 0x01]);
        assert_eq!(glyph.num_points(), 7);
        let expected: Vec<_> = curve_points(&outer)
            .into_iter()
            .chain(curve_points(&inner))
            .collect();
        assert_eq!(glyph.points().collect::<Vec<_>>(), expected);

        let mut points = vec![Point::default(); 7];
        let mut flags = vec![0u8; 7];
        glyph.read_points_fast(&mut points, &mut flags).unwrap();
        for ((point, flag), expected) in points.iter().zip(&flags).zip(&expected) {
            assert_eq!(point.x, expected.x as i32);
            assert_eq!(point.y, expected.y as i32);
            assert_eq!(*flag == 1, expected.on_curve);
        }
        let mut short = vec![Point::default(); 6];
        assert!(matches!(
            glyph.read_points_fast(&mut short, &mut flags),
            Err(ReadError::InvalidArrayLen)
        ));
    }

    #[test]
    fn truncated_coordinates() {
        let data = simple_glyph(&[&[(0, 0, true), (1000, 0, true), (1000, 1000, true)]]);
        let truncated = &data[..data.len() - 3];
        let Glyph::Simple(glyph) = Glyph::read(FontData::new(truncated)).unwrap() else {
            panic!("expected a simple glyph");
        };
        assert_eq!(glyph.points().count(), 0);
        let mut points = vec![Point::default(); 3];
        let mut flags = vec![0u8; 3];
        assert!(glyph.read_points_fast(&mut points, &mut flags).is_err());
    }

    #[test]
    fn composite_components() {
        let half = 1 << 13;
        let data = composite_glyph(
            [0, 0, 500, 500],
            &[
                TestComponent::offset(3, -400, 20),
                TestComponent::anchored(4, 2, 1).with_transform([half, 0, 0, half]),
                TestComponent::offset(5, 0, 0).with_transform([0, 1 << 14, -(1 << 14), 0]),
            ],
        );
        let Glyph::Composite(glyph) = Glyph::read(FontData::new(&data)).unwrap() else {
            panic!("expected a composite glyph");
        };
        assert_eq!(glyph.number_of_contours(), -1);
        let components: Vec<_> = glyph.components().collect();
        assert_eq!(components.len(), 3);
        assert_eq!(components[0].glyph, GlyphId::new(3));
        assert_eq!(components[0].anchor, Anchor::Offset { x: -400, y: 20 });
        assert_eq!(components[0].transform, Transform::default());
        assert_eq!(
            components[1].anchor,
            Anchor::Point {
                base: 2,
                component: 1
            }
        );
        assert_eq!(components[1].transform.xx, F2Dot14::from_f32(0.5));
        assert_eq!(components[1].transform.yy, F2Dot14::from_f32(0.5));
        assert_eq!(components[2].transform.yx, F2Dot14::ONE);
        assert_eq!(components[2].transform.xy, F2Dot14::from_f32(-1.0));
        assert!(glyph.instructions().is_none());
    }
}
