//! A TrueType font with the metrics and the letter 'A' of Source Sans Pro
//! Regular.
//!
//! Only glyphs 0 to 2 have outlines; the remaining glyphs are empty so that
//! the font keeps the original glyph count.

use sfnt_types::{Fixed, Tag};

use crate::{
    builder::{metrics_table, FontBuilder, HeadBuilder, HheaBuilder},
    glyf::{loca_and_glyf, simple_glyph, GlyphPoint},
    tables::{class_def2, cmap4, cmap_table, gdef_table, name_table, post_table, Os2Builder},
};

pub const NUM_GLYPHS: u16 = 1974;
pub const GLYPH_NOTDEF: u16 = 0;
pub const GLYPH_SPACE: u16 = 1;
pub const GLYPH_A: u16 = 2;
/// An empty glyph with a custom name in `post`.
pub const GLYPH_A_ALT: u16 = 3;

pub const FAMILY_NAME: &str = "Source Sans Pro";

pub static NOTDEF: &[GlyphPoint] = &[(50, 0, true), (450, 0, true), (450, 700, true), (50, 700, true)];

pub static A_OUTER: &[GlyphPoint] = &[
    (3, 0, true),
    (88, 0, true),
    (143, 185, true),
    (399, 185, true),
    (453, 0, true),
    (541, 0, true),
    (318, 656, true),
    (226, 656, true),
];

/// The counter of the 'A', with a run of two off curve points on each side
/// of the apex.
pub static A_INNER: &[GlyphPoint] = &[
    (164, 253, true),
    (378, 253, true),
    (365, 290, true),
    (350, 350, false),
    (320, 480, false),
    (271, 610, true),
    (230, 480, false),
    (200, 350, false),
    (180, 300, true),
    (172, 276, true),
];

/// `(name id, string)` for each record; written for both the Macintosh and
/// Windows platforms.
pub static NAMES: &[(u16, &str)] = &[
    (0, "Copyright 2010, 2012 Adobe Systems Incorporated."),
    (1, FAMILY_NAME),
    (2, "Regular"),
    (3, "2.010;ADBE;SourceSansPro-Regular"),
    (4, "Source Sans Pro"),
    (5, "Version 2.010;PS 2.000;hotconv 1.0.70;makeotf.lib2.5.5900"),
    (6, "SourceSansPro-Regular"),
    (7, "Source is a trademark of Adobe Systems Incorporated."),
    (8, "Adobe Systems Incorporated"),
    (9, "Paul D. Hunt"),
];

/// (advance, left side bearing) for the glyphs with long metrics.
pub static H_METRICS: &[(u16, i16)] = &[(500, 50), (200, 0), (544, 3)];

/// A builder holding every table of the font, for tests that need to
/// alter or drop a table.
pub fn builder() -> FontBuilder {
    let glyphs: Vec<Vec<u8>> = (0..NUM_GLYPHS)
        .map(|gid| match gid {
            GLYPH_NOTDEF => simple_glyph(&[NOTDEF]),
            GLYPH_A => simple_glyph(&[A_OUTER, A_INNER]),
            _ => Vec::new(),
        })
        .collect();
    let (loca, glyf, is_long) = loca_and_glyf(&glyphs);

    let head = HeadBuilder {
        font_revision: Fixed::from_f64(2.01),
        units_per_em: 1000,
        bbox: [-454, -293, 2159, 968],
        index_to_loc_format: is_long as i16,
        ..Default::default()
    };
    let hhea = HheaBuilder {
        ascender: 984,
        descender: -273,
        line_gap: 0,
        advance_max: 2200,
        min_leading_bearing: -454,
        min_trailing_bearing: -400,
        max_extent: 2159,
        caret_slope_rise: 1,
        caret_slope_run: 0,
        number_of_long_metrics: H_METRICS.len() as u16,
        ..Default::default()
    };
    let metrics: Vec<(u16, i16)> = (0..NUM_GLYPHS as usize)
        .map(|gid| H_METRICS.get(gid).copied().unwrap_or((544, 0)))
        .collect();
    let os2 = Os2Builder {
        version: 3,
        x_avg_char_width: 495,
        weight_class: 400,
        width_class: 5,
        subscript: [650, 600, 0, 75],
        superscript: [650, 600, 0, 350],
        strikeout_size: 50,
        strikeout_position: 291,
        vendor_id: Tag::new(b"ADBE"),
        fs_selection: 0x0040,
        first_char_index: 0x20,
        last_char_index: 0x41,
        typo_ascender: 750,
        typo_descender: -250,
        typo_line_gap: 0,
        win_ascent: 984,
        win_descent: 273,
        x_height: 486,
        cap_height: 660,
        ..Default::default()
    };
    let mut name_index = vec![0u16; NUM_GLYPHS as usize];
    name_index[GLYPH_SPACE as usize] = 3;
    name_index[GLYPH_A as usize] = 36;
    name_index[GLYPH_A_ALT as usize] = 258;
    let post = post_table(
        Fixed::ZERO,
        -50,
        50,
        false,
        Some((name_index.as_slice(), &["A.alt"][..])),
    );
    let names: Vec<_> = [(1u16, 0u16, 0u16), (3, 1, 0x409)]
        .iter()
        .flat_map(|(platform, encoding, language)| {
            NAMES
                .iter()
                .map(move |(id, string)| (*platform, *encoding, *language, *id, *string))
        })
        .collect();
    let cmap_subtable = cmap4(&[(0x20, GLYPH_SPACE), (0x41, GLYPH_A)]);
    let cmap = cmap_table(&[(0, 3, cmap_subtable.clone()), (3, 1, cmap_subtable)]);
    let gdef = gdef_table(&class_def2(&[(GLYPH_A, GLYPH_A, 1)]), &[], &[]);

    let mut builder = FontBuilder::new();
    builder
        .add_raw(Tag::new(b"head"), head.build())
        .add_raw(Tag::new(b"hhea"), hhea.build())
        .add_raw(Tag::new(b"maxp"), maxp_v1(NUM_GLYPHS))
        .add_raw(Tag::new(b"hmtx"), metrics_table(&metrics, H_METRICS.len()))
        .add_raw(Tag::new(b"OS/2"), os2.build())
        .add_raw(Tag::new(b"post"), post)
        .add_raw(Tag::new(b"name"), name_table(&names))
        .add_raw(Tag::new(b"cmap"), cmap)
        .add_raw(Tag::new(b"GDEF"), gdef)
        .add_raw(Tag::new(b"loca"), loca)
        .add_raw(Tag::new(b"glyf"), glyf);
    builder
}

/// The assembled font.
pub fn font() -> Vec<u8> {
    builder().build()
}

/// A version 1.0 `maxp` table.
pub(crate) fn maxp_v1(num_glyphs: u16) -> Vec<u8> {
    be_buffer! {
        0x00010000u32,
        num_glyphs,
        18u16,          // max points
        2u16,           // max contours
        [0u16, 0],      // max composite points, contours
        2u16,           // max zones
        [0u16, 0, 0, 0, 0, 0, 0, 0]
    }
    .into_vec()
}
