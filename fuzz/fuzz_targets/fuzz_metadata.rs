#![no_main]
use std::error::Error;

use libfuzzer_sys::fuzz_target;
use sfnt_outline::{
    instance::{LocationRef, Size},
    raw::FontRef,
    GlyphId, MetadataProvider,
};

fn do_metadata_things(data: &[u8]) -> Result<(), Box<dyn Error>> {
    let font = FontRef::new(data)?;

    let _ = font.attributes();
    let _ = font.metrics(Size::new(16.0), LocationRef::default());
    for instance in font.named_instances().iter() {
        let location = instance.location();
        let _ = font.metrics(Size::unscaled(), &location);
    }

    let glyph_metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());
    let origins = font.vertical_origins(Size::unscaled(), LocationRef::default());
    let classes = font.glyph_classes();
    let names = font.glyph_names();
    for gid in 0..glyph_metrics.glyph_count().min(u16::MAX as u32) {
        let gid = GlyphId::new(gid as u16);
        let _ = glyph_metrics.left_side_bearing(gid);
        let _ = glyph_metrics.top_side_bearing(gid);
        let _ = origins.y_origin(gid);
        let _ = classes.glyph_class(gid);
        if let Some(name) = names.get(gid) {
            let _ = names.glyph_id(&name.to_string());
        }
    }

    Ok(())
}

fuzz_target!(|data: &[u8]| {
    let _ = do_metadata_things(data);
});
