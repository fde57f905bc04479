//! A collection of two faces that differ in name and glyph count.

use sfnt_types::Tag;

use crate::{builder::{collection, FontBuilder}, tables::name_table};

pub const FAMILY_NAMES: [&str; 2] = ["Sfnt Collection", "Sfnt Collection Bold"];
pub const NUM_GLYPHS: [u16; 2] = [3, 5];

pub fn font() -> Vec<u8> {
    let faces: Vec<FontBuilder> = FAMILY_NAMES
        .iter()
        .zip(NUM_GLYPHS)
        .map(|(family, num_glyphs)| {
            let mut face = FontBuilder::with_required_tables(num_glyphs);
            face.add_raw(Tag::new(b"name"), name_table(&[(3, 1, 0x409, 1, *family)]));
            face
        })
        .collect();
    collection(&faces)
}
