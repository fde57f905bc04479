//! A small variable font with weight and width axes.
//!
//! Glyph 1 is a square whose right edge moves 100 units and whose advance
//! grows by 50 at the heaviest weight. Glyph 2 is a composite of glyph 1
//! whose component moves 50 units right. Glyph 3 is the square with a
//! single moved point, so the remaining points are inferred.

use sfnt_types::{F2Dot14, Fixed, Tag};

use crate::{
    bebuffer::BeBuffer,
    builder::{metrics_table, FontBuilder, HeadBuilder, HheaBuilder},
    glyf::{composite_glyph, loca_and_glyf, simple_glyph, Component},
    tables::name_table,
};

pub const GLYPH_SQUARE: u16 = 1;
pub const GLYPH_COMPOSITE: u16 = 2;
pub const GLYPH_INFERRED: u16 = 3;
pub const NUM_GLYPHS: u16 = 4;

pub const ADVANCE: u16 = 100;
/// Change of the advance and the `hasc` metric at the heaviest weight.
pub const ADVANCE_DELTA: i16 = 50;
pub const ASCENDER: i16 = 800;
pub const ASCENDER_DELTA: i16 = 100;

pub const WEIGHT_NAME_ID: u16 = 256;
pub const WIDTH_NAME_ID: u16 = 257;
pub const THIN_NAME_ID: u16 = 258;
pub const BLACK_NAME_ID: u16 = 259;

fn f2dot14(value: f32) -> i16 {
    F2Dot14::from_f32(value).to_bits()
}

/// `(tag, min, default, max, flags, name id)`
pub static AXES: &[(Tag, f64, f64, f64, u16, u16)] = &[
    (Tag::new(b"wght"), 100.0, 400.0, 900.0, 0, WEIGHT_NAME_ID),
    (Tag::new(b"wdth"), 50.0, 100.0, 200.0, 0x0001, WIDTH_NAME_ID),
];

/// `(subfamily name id, postscript name id, coordinates)`
pub static INSTANCES: &[(u16, u16, [f64; 2])] = &[
    (THIN_NAME_ID, 260, [100.0, 100.0]),
    (BLACK_NAME_ID, 261, [900.0, 100.0]),
];

pub fn fvar_table() -> Vec<u8> {
    let axis_count = AXES.len() as u16;
    let mut buf = be_buffer! {
        1u16, 0u16,
        16u16,                          // axes array offset
        2u16,                           // reserved
        axis_count,
        20u16,                          // axis size
        (INSTANCES.len() as u16),
        (4 + axis_count * 4 + 2)        // instance size
    };
    for (tag, min, default, max, flags, name_id) in AXES {
        buf = buf
            .push(*tag)
            .extend([min, default, max].map(|v| Fixed::from_f64(*v)))
            .push(*flags)
            .push(*name_id);
    }
    for (subfamily, postscript, coords) in INSTANCES {
        buf = buf
            .push(*subfamily)
            .push(0u16)
            .extend(coords.iter().map(|v| Fixed::from_f64(*v)))
            .push(*postscript);
    }
    buf.into_vec()
}

/// Weight 0.5 maps to 0.25; width is the identity.
pub fn avar_table() -> Vec<u8> {
    let weight = [(-1.0, -1.0), (0.0, 0.0), (0.5, 0.25), (1.0, 1.0)];
    let width = [(-1.0, -1.0), (0.0, 0.0), (1.0, 1.0)];
    let mut buf = be_buffer! { 1u16, 0u16, 0u16, 2u16 };
    for map in [&weight[..], &width[..]] {
        buf = buf.push(map.len() as u16);
        for (from, to) in map {
            buf = buf.push(f2dot14(*from)).push(f2dot14(*to));
        }
    }
    buf.into_vec()
}

/// Encode packed deltas.
pub fn packed_deltas(deltas: &[i16]) -> Vec<u8> {
    let mut buf = BeBuffer::new();
    for run in deltas.chunks(64) {
        let count = (run.len() - 1) as u8;
        if run.iter().all(|d| *d == 0) {
            buf = buf.push(0x80 | count);
        } else if run.iter().all(|d| i8::try_from(*d).is_ok()) {
            buf = buf.push(count).extend(run.iter().map(|d| *d as i8));
        } else {
            buf = buf.push(0x40 | count).extend(run.iter().copied());
        }
    }
    buf.into_vec()
}

/// Encode packed point numbers; an empty slice means all points.
pub fn packed_points(points: &[u16]) -> Vec<u8> {
    if points.is_empty() {
        return vec![0];
    }
    let mut buf = BeBuffer::new().push(points.len() as u8);
    let mut last = 0;
    for run in points.chunks(128) {
        buf = buf.push(0x80 | (run.len() - 1) as u8);
        for point in run {
            buf = buf.push(*point - last);
            last = *point;
        }
    }
    buf.into_vec()
}

const EMBEDDED_PEAK_TUPLE: u16 = 0x8000;
const PRIVATE_POINT_NUMBERS: u16 = 0x2000;

/// A single tuple of glyph variation data using private point numbers.
fn glyph_variation(
    tuple_index: u16,
    peak: Option<[f32; 2]>,
    points: &[u16],
    x: &[i16],
    y: &[i16],
) -> Vec<u8> {
    let mut data = packed_points(points);
    data.extend(packed_deltas(x));
    data.extend(packed_deltas(y));
    let flags = PRIVATE_POINT_NUMBERS | peak.map(|_| EMBEDDED_PEAK_TUPLE).unwrap_or(0);
    let mut header = BeBuffer::new()
        .push(data.len() as u16)
        .push(tuple_index | flags);
    if let Some(peak) = peak {
        header = header.extend(peak.map(f2dot14));
    }
    let data_offset = 4 + header.len();
    be_buffer! { 1u16, (data_offset as u16) }
        .extend_bytes(&header)
        .extend_bytes(&data)
        .into_vec()
}

pub fn gvar_table() -> Vec<u8> {
    let glyphs = [
        Vec::new(),
        glyph_variation(
            0,
            None,
            &[],
            &[0, 100, 100, 0, 0, ADVANCE_DELTA, 0, 0],
            &[0, 0, 100, 100, 0, 0, 0, 0],
        ),
        glyph_variation(0, Some([1.0, 0.0]), &[], &[50, 0, 0, 0, 0], &[0; 5]),
        glyph_variation(0, None, &[2], &[50], &[50]),
    ];
    let axis_count = AXES.len() as u16;
    let shared_tuples_offset = 20 + (glyphs.len() as u32 + 1) * 4;
    let data_offset = shared_tuples_offset + axis_count as u32 * 2;
    let mut buf = be_buffer! {
        1u16, 0u16,
        axis_count,
        1u16,                   // shared tuple count
        shared_tuples_offset,
        (glyphs.len() as u16),
        1u16,                   // long offsets
        data_offset
    };
    let mut offset = 0u32;
    buf = buf.push(offset);
    for glyph in &glyphs {
        offset += glyph.len() as u32;
        buf = buf.push(offset);
    }
    buf = buf.extend([f2dot14(1.0), 0]);
    for glyph in &glyphs {
        buf = buf.extend_bytes(glyph);
    }
    buf.into_vec()
}

/// An item variation store with a single region at maximum weight and one
/// data subtable holding `deltas`.
pub fn item_variation_store(deltas: &[i16]) -> Vec<u8> {
    let region_list_offset = 12u32;
    let region_list = be_buffer! {
        2u16, 1u16,
        // wght: start, peak, end
        0i16, (f2dot14(1.0)), (f2dot14(1.0)),
        // wdth
        0i16, 0i16, 0i16
    };
    let data_offset = region_list_offset + region_list.len() as u32;
    let words = deltas.iter().any(|d| i8::try_from(*d).is_err());
    let mut data = be_buffer! {
        (deltas.len() as u16),
        (words as u16),
        1u16,
        0u16
    };
    for delta in deltas {
        data = if words {
            data.push(*delta)
        } else {
            data.push(*delta as i8)
        };
    }
    be_buffer! { 1u16, region_list_offset, 1u16, data_offset }
        .extend_bytes(&region_list)
        .extend_bytes(&data)
        .into_vec()
}

/// Advance deltas reached through a delta set index map: glyph 0 uses
/// item 0 and every other glyph uses item 1.
pub fn hvar_table() -> Vec<u8> {
    let store = item_variation_store(&[0, ADVANCE_DELTA]);
    let map_offset = 20 + store.len() as u32;
    // format 0, one byte entries with four inner index bits
    let map = be_buffer! { 0u8, 0x03u8, NUM_GLYPHS, 0u8 }.extend((1..NUM_GLYPHS).map(|_| 1u8));
    be_buffer! { 1u16, 0u16, 20u32, map_offset, 0u32, 0u32 }
        .extend_bytes(&store)
        .extend_bytes(&map)
        .into_vec()
}

pub fn mvar_table() -> Vec<u8> {
    let store_offset = 12 + 8u16;
    be_buffer! {
        1u16, 0u16, 0u16,
        8u16,                   // value record size
        1u16,
        store_offset,
        (Tag::new(b"hasc")), 0u16, 0u16
    }
    .extend_bytes(&item_variation_store(&[ASCENDER_DELTA]))
    .into_vec()
}

pub fn builder() -> FontBuilder {
    let square: &[_] = &[(0, 0, true), (100, 0, true), (100, 100, true), (0, 100, true)];
    let glyphs = [
        Vec::new(),
        simple_glyph(&[square]),
        composite_glyph([0, 0, 100, 100], &[Component::offset(GLYPH_SQUARE, 0, 0)]),
        simple_glyph(&[square]),
    ];
    let (loca, glyf, is_long) = loca_and_glyf(&glyphs);
    let metrics: Vec<_> = (0..NUM_GLYPHS).map(|_| (ADVANCE, 0)).collect();
    let mut builder = FontBuilder::new();
    builder
        .add_raw(
            Tag::new(b"head"),
            HeadBuilder {
                bbox: [0, 0, 100, 100],
                index_to_loc_format: is_long as i16,
                ..Default::default()
            }
            .build(),
        )
        .add_raw(
            Tag::new(b"hhea"),
            HheaBuilder {
                ascender: ASCENDER,
                descender: -200,
                number_of_long_metrics: NUM_GLYPHS,
                ..Default::default()
            }
            .build(),
        )
        .add_raw(Tag::new(b"hmtx"), metrics_table(&metrics, metrics.len()))
        .add_raw(Tag::new(b"maxp"), FontBuilder::maxp_table(NUM_GLYPHS))
        .add_raw(Tag::new(b"loca"), loca)
        .add_raw(Tag::new(b"glyf"), glyf)
        .add_raw(Tag::new(b"fvar"), fvar_table())
        .add_raw(Tag::new(b"avar"), avar_table())
        .add_raw(Tag::new(b"gvar"), gvar_table())
        .add_raw(Tag::new(b"HVAR"), hvar_table())
        .add_raw(Tag::new(b"MVAR"), mvar_table())
        .add_raw(
            Tag::new(b"name"),
            name_table(&[
                (3, 1, 0x409, 1, "Sfnt Variable"),
                (3, 1, 0x409, 2, "Regular"),
                (3, 1, 0x409, WEIGHT_NAME_ID, "Weight"),
                (3, 1, 0x409, WIDTH_NAME_ID, "Width"),
                (3, 1, 0x409, THIN_NAME_ID, "Thin"),
                (3, 1, 0x409, BLACK_NAME_ID, "Black"),
                (3, 1, 0x409, 260, "SfntVariable-Thin"),
                (3, 1, 0x409, 261, "SfntVariable-Black"),
            ]),
        );
    builder
}

pub fn font() -> Vec<u8> {
    builder().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_pick_smallest_run() {
        assert_eq!(packed_deltas(&[0, 0, 0]), [0x82]);
        assert_eq!(packed_deltas(&[1, -1]), [0x01, 1, 0xFF]);
        assert_eq!(packed_deltas(&[300]), [0x40, 0x01, 0x2C]);
    }

    #[test]
    fn points_are_delta_encoded() {
        assert_eq!(packed_points(&[]), [0]);
        assert_eq!(packed_points(&[2, 5]), [2, 0x81, 0, 2, 0, 3]);
    }
}
