//! Encoding TrueType glyphs.

use crate::bebuffer::BeBuffer;

const ON_CURVE_POINT: u8 = 0x01;
const X_SHORT_VECTOR: u8 = 0x02;
const Y_SHORT_VECTOR: u8 = 0x04;
const REPEAT_FLAG: u8 = 0x08;
const X_IS_SAME_OR_POSITIVE: u8 = 0x10;
const Y_IS_SAME_OR_POSITIVE: u8 = 0x20;

/// A point in a simple glyph: `(x, y, on_curve)`.
pub type GlyphPoint = (i16, i16, bool);

/// Encode a simple glyph using the most compact representation of each
/// coordinate and run length encoded flags.
pub fn simple_glyph(contours: &[&[GlyphPoint]]) -> Vec<u8> {
    simple_glyph_with_instructions(contours, &[])
}

/// Encode a simple glyph with an instruction stream.
pub fn simple_glyph_with_instructions(contours: &[&[GlyphPoint]], instructions: &[u8]) -> Vec<u8> {
    let points: Vec<GlyphPoint> = contours.iter().flat_map(|c| c.iter().copied()).collect();
    let (x_min, y_min, x_max, y_max) = points.iter().fold(
        (i16::MAX, i16::MAX, i16::MIN, i16::MIN),
        |(x0, y0, x1, y1), (x, y, _)| (x0.min(*x), y0.min(*y), x1.max(*x), y1.max(*y)),
    );
    let mut buf = BeBuffer::new()
        .push(contours.len() as i16)
        .extend([x_min, y_min, x_max, y_max]);
    let mut end_point = 0u16;
    for contour in contours {
        end_point += contour.len() as u16;
        buf = buf.push(end_point - 1);
    }
    buf = buf
        .push(instructions.len() as u16)
        .extend_bytes(instructions);

    let mut flags = Vec::with_capacity(points.len());
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let (mut last_x, mut last_y) = (0i16, 0i16);
    for (x, y, on_curve) in &points {
        let mut flag = if *on_curve { ON_CURVE_POINT } else { 0 };
        flag |= encode_delta(
            x - last_x,
            X_SHORT_VECTOR,
            X_IS_SAME_OR_POSITIVE,
            &mut xs,
        );
        flag |= encode_delta(
            y - last_y,
            Y_SHORT_VECTOR,
            Y_IS_SAME_OR_POSITIVE,
            &mut ys,
        );
        flags.push(flag);
        last_x = *x;
        last_y = *y;
    }

    let mut encoded_flags = Vec::new();
    let mut i = 0;
    while i < flags.len() {
        let flag = flags[i];
        let run = flags[i..]
            .iter()
            .take(256)
            .take_while(|f| **f == flag)
            .count();
        if run > 1 {
            encoded_flags.push(flag | REPEAT_FLAG);
            encoded_flags.push((run - 1) as u8);
        } else {
            encoded_flags.push(flag);
        }
        i += run;
    }
    let mut data = buf
        .extend_bytes(&encoded_flags)
        .extend_bytes(&xs)
        .extend_bytes(&ys)
        .into_vec();
    pad2(&mut data);
    data
}

fn encode_delta(delta: i16, short: u8, same_or_positive: u8, out: &mut Vec<u8>) -> u8 {
    if delta == 0 {
        same_or_positive
    } else if delta.unsigned_abs() <= 255 {
        out.push(delta.unsigned_abs() as u8);
        if delta > 0 {
            short | same_or_positive
        } else {
            short
        }
    } else {
        out.extend(delta.to_be_bytes());
        0
    }
}

/// The placement of a component in a composite glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Offset in font units.
    Offset(i16, i16),
    /// Align point `base` of the composite so far with point `component`.
    Points { base: u16, component: u16 },
}

/// A component of a composite glyph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Component {
    pub glyph: u16,
    pub placement: Placement,
    /// 2x2 transform in 2.14 bits: `[xx, yx, xy, yy]`
    pub transform: [i16; 4],
    pub flags: u16,
}

impl Component {
    pub const ONE: i16 = 1 << 14;

    pub fn offset(glyph: u16, dx: i16, dy: i16) -> Self {
        Self {
            glyph,
            placement: Placement::Offset(dx, dy),
            transform: [Self::ONE, 0, 0, Self::ONE],
            flags: 0,
        }
    }

    pub fn anchored(glyph: u16, base: u16, component: u16) -> Self {
        Self {
            placement: Placement::Points { base, component },
            ..Self::offset(glyph, 0, 0)
        }
    }

    pub fn with_transform(mut self, transform: [i16; 4]) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }
}

const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const ARGS_ARE_XY_VALUES: u16 = 0x0002;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// Encode a composite glyph.
///
/// The bounding box is written as given; it is not derived from the
/// components.
pub fn composite_glyph(bbox: [i16; 4], components: &[Component]) -> Vec<u8> {
    let mut buf = BeBuffer::new().push(-1i16).extend(bbox);
    for (i, component) in components.iter().enumerate() {
        let mut flags = component.flags;
        if i + 1 < components.len() {
            flags |= MORE_COMPONENTS;
        }
        let (arg1, arg2) = match component.placement {
            Placement::Offset(dx, dy) => {
                flags |= ARGS_ARE_XY_VALUES;
                (dx as i32, dy as i32)
            }
            Placement::Points { base, component } => (base as i32, component as i32),
        };
        let fits_in_byte = |v: i32| {
            if flags & ARGS_ARE_XY_VALUES != 0 {
                (-128..=127).contains(&v)
            } else {
                (0..=255).contains(&v)
            }
        };
        if !(fits_in_byte(arg1) && fits_in_byte(arg2)) {
            flags |= ARG_1_AND_2_ARE_WORDS;
        }
        let [xx, yx, xy, yy] = component.transform;
        if yx != 0 || xy != 0 {
            flags |= WE_HAVE_A_TWO_BY_TWO;
        } else if xx != yy {
            flags |= WE_HAVE_AN_X_AND_Y_SCALE;
        } else if xx != Component::ONE {
            flags |= WE_HAVE_A_SCALE;
        }
        buf = buf.push(flags).push(component.glyph);
        buf = if flags & ARG_1_AND_2_ARE_WORDS != 0 {
            buf.extend([arg1 as i16, arg2 as i16])
        } else {
            buf.extend([arg1 as u8, arg2 as u8])
        };
        buf = if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            buf.extend([xx, yx, xy, yy])
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            buf.extend([xx, yy])
        } else if flags & WE_HAVE_A_SCALE != 0 {
            buf.push(xx)
        } else {
            buf
        };
    }
    let mut data = buf.into_vec();
    pad2(&mut data);
    data
}

/// Build `loca` and `glyf` tables from encoded glyphs.
///
/// Returns `(loca, glyf, is_long)`; short offsets are used when possible.
pub fn loca_and_glyf(glyphs: &[Vec<u8>]) -> (Vec<u8>, Vec<u8>, bool) {
    let mut glyf = Vec::new();
    let mut offsets = vec![0u32];
    for glyph in glyphs {
        glyf.extend_from_slice(glyph);
        pad2(&mut glyf);
        offsets.push(glyf.len() as u32);
    }
    let is_long = glyf.len() > 0x1FFFE;
    let loca = if is_long {
        BeBuffer::new().extend(offsets).into_vec()
    } else {
        BeBuffer::new()
            .extend(offsets.iter().map(|off| (off / 2) as u16))
            .into_vec()
    };
    (loca, glyf, is_long)
}

fn pad2(data: &mut Vec<u8>) {
    if data.len() % 2 != 0 {
        data.push(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_run_length_encoded() {
        let square: &[GlyphPoint] = &[(0, 0, true), (0, 0, true), (0, 0, true)];
        let data = simple_glyph(&[square]);
        // header (10) + end points (2) + instruction length (2)
        let flags = &data[14..];
        let same = ON_CURVE_POINT | X_IS_SAME_OR_POSITIVE | Y_IS_SAME_OR_POSITIVE;
        assert_eq!(&flags[..2], &[same | REPEAT_FLAG, 2]);
    }

    #[test]
    fn negative_short_delta_clears_sign_bit() {
        let mut out = Vec::new();
        let flag = encode_delta(-5, X_SHORT_VECTOR, X_IS_SAME_OR_POSITIVE, &mut out);
        assert_eq!(flag, X_SHORT_VECTOR);
        assert_eq!(out, [5]);
        let flag = encode_delta(300, X_SHORT_VECTOR, X_IS_SAME_OR_POSITIVE, &mut out);
        assert_eq!(flag, 0);
        assert_eq!(out, [5, 0x01, 0x2C]);
    }

    #[test]
    fn composite_flags() {
        let data = composite_glyph(
            [0, 0, 10, 10],
            &[
                Component::offset(1, 500, 0),
                Component::offset(2, 1, 2).with_transform([Component::ONE / 2; 4]),
            ],
        );
        let first_flags = u16::from_be_bytes([data[10], data[11]]);
        assert_eq!(
            first_flags,
            ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES | MORE_COMPONENTS
        );
        // 10 header, 2 flags, 2 glyph, 4 words
        let second_flags = u16::from_be_bytes([data[18], data[19]]);
        assert_eq!(second_flags, ARGS_ARE_XY_VALUES | WE_HAVE_A_TWO_BY_TWO);
    }
}
