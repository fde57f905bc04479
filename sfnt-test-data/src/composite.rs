//! A TrueType font of composite glyphs, including broken ones, plus
//! vertical metrics.

use sfnt_types::Tag;

use crate::{
    builder::{metrics_table, FontBuilder, HeadBuilder, HheaBuilder},
    glyf::{composite_glyph, loca_and_glyf, simple_glyph, Component, GlyphPoint},
};

pub const GLYPH_EMPTY: u16 = 0;
/// The square (0, 0) to (100, 100).
pub const GLYPH_SQUARE: u16 = 1;
/// The square offset by (200, 50).
pub const GLYPH_OFFSET: u16 = 2;
/// The square scaled by 0.5.
pub const GLYPH_SCALED: u16 = 3;
/// [`GLYPH_OFFSET`] offset by (10, 10), followed by the square.
pub const GLYPH_NESTED: u16 = 4;
pub const GLYPH_SELF_REFERENCE: u16 = 5;
/// The square, then the square again with its point 0 placed on point 2 of
/// the first.
pub const GLYPH_ANCHORED: u16 = 6;
pub const GLYPH_CYCLE_A: u16 = 7;
pub const GLYPH_CYCLE_B: u16 = 8;
/// References a glyph id past the end of the font.
pub const GLYPH_MISSING_COMPONENT: u16 = 9;
/// Uses an anchor point that does not exist.
pub const GLYPH_BAD_ANCHOR: u16 = 10;
/// The square rotated by 90 degrees.
pub const GLYPH_ROTATED: u16 = 11;
/// Nine levels of single component nesting, ending at the square.
pub const GLYPH_DEEP: u16 = 12;
pub const DEEP_LEVELS: u16 = 9;
/// A chain where each level references the next [`FAN_OUT_WIDTH`] times and
/// the last level is empty, so the component count grows geometrically.
pub const GLYPH_FAN_OUT: u16 = GLYPH_DEEP + DEEP_LEVELS;
pub const FAN_OUT_LEVELS: u16 = 5;
pub const FAN_OUT_WIDTH: usize = 16;
pub const NUM_GLYPHS: u16 = GLYPH_FAN_OUT + FAN_OUT_LEVELS;

pub const MISSING_GLYPH: u16 = 60000;

pub static SQUARE: &[GlyphPoint] = &[(0, 0, true), (100, 0, true), (100, 100, true), (0, 100, true)];

pub const ADVANCE: u16 = 100;
pub const VERTICAL_ADVANCE: u16 = 1000;
pub const TOP_SIDE_BEARING: i16 = 880;

fn glyph(gid: u16) -> Vec<u8> {
    let bbox = [0, 0, 100, 100];
    match gid {
        GLYPH_EMPTY => Vec::new(),
        GLYPH_SQUARE => simple_glyph(&[SQUARE]),
        GLYPH_OFFSET => composite_glyph(bbox, &[Component::offset(GLYPH_SQUARE, 200, 50)]),
        GLYPH_SCALED => composite_glyph(
            bbox,
            &[Component::offset(GLYPH_SQUARE, 0, 0).with_transform([
                Component::ONE / 2,
                0,
                0,
                Component::ONE / 2,
            ])],
        ),
        GLYPH_NESTED => composite_glyph(
            bbox,
            &[
                Component::offset(GLYPH_OFFSET, 10, 10),
                Component::offset(GLYPH_SQUARE, 0, 0),
            ],
        ),
        GLYPH_SELF_REFERENCE => {
            composite_glyph(bbox, &[Component::offset(GLYPH_SELF_REFERENCE, 0, 0)])
        }
        GLYPH_ANCHORED => composite_glyph(
            bbox,
            &[
                Component::offset(GLYPH_SQUARE, 0, 0),
                Component::anchored(GLYPH_SQUARE, 2, 0),
            ],
        ),
        GLYPH_CYCLE_A => composite_glyph(bbox, &[Component::offset(GLYPH_CYCLE_B, 0, 0)]),
        GLYPH_CYCLE_B => composite_glyph(bbox, &[Component::offset(GLYPH_CYCLE_A, 0, 0)]),
        GLYPH_MISSING_COMPONENT => {
            composite_glyph(bbox, &[Component::offset(MISSING_GLYPH, 0, 0)])
        }
        GLYPH_BAD_ANCHOR => composite_glyph(
            bbox,
            &[
                Component::offset(GLYPH_SQUARE, 0, 0),
                Component::anchored(GLYPH_SQUARE, 50, 0),
            ],
        ),
        GLYPH_ROTATED => composite_glyph(
            bbox,
            &[Component::offset(GLYPH_SQUARE, 0, 0).with_transform([
                0,
                Component::ONE,
                -Component::ONE,
                0,
            ])],
        ),
        _ if (GLYPH_DEEP..GLYPH_FAN_OUT).contains(&gid) => {
            let child = if gid + 1 == GLYPH_FAN_OUT {
                GLYPH_SQUARE
            } else {
                gid + 1
            };
            composite_glyph(bbox, &[Component::offset(child, 0, 0)])
        }
        _ if gid >= GLYPH_FAN_OUT && gid + 1 < NUM_GLYPHS => composite_glyph(
            bbox,
            &vec![Component::offset(gid + 1, 0, 0); FAN_OUT_WIDTH],
        ),
        _ => Vec::new(),
    }
}

pub fn builder() -> FontBuilder {
    let glyphs: Vec<_> = (0..NUM_GLYPHS).map(glyph).collect();
    let (loca, glyf, is_long) = loca_and_glyf(&glyphs);
    let h_metrics: Vec<_> = (0..NUM_GLYPHS).map(|_| (ADVANCE, 0)).collect();
    let v_metrics: Vec<_> = (0..NUM_GLYPHS)
        .map(|_| (VERTICAL_ADVANCE, TOP_SIDE_BEARING))
        .collect();
    let mut builder = FontBuilder::new();
    builder
        .add_raw(
            Tag::new(b"head"),
            HeadBuilder {
                bbox: [-100, 0, 300, 150],
                index_to_loc_format: is_long as i16,
                ..Default::default()
            }
            .build(),
        )
        .add_raw(Tag::new(b"hhea"), FontBuilder::hhea_table(1))
        .add_raw(Tag::new(b"hmtx"), metrics_table(&h_metrics, 1))
        .add_raw(
            Tag::new(b"vhea"),
            HheaBuilder {
                minor_version: 1,
                ascender: 500,
                descender: -500,
                number_of_long_metrics: 1,
                ..Default::default()
            }
            .build(),
        )
        .add_raw(Tag::new(b"vmtx"), metrics_table(&v_metrics, 1))
        .add_raw(Tag::new(b"maxp"), FontBuilder::maxp_table(NUM_GLYPHS))
        .add_raw(Tag::new(b"loca"), loca)
        .add_raw(Tag::new(b"glyf"), glyf);
    builder
}

pub fn font() -> Vec<u8> {
    builder().build()
}
