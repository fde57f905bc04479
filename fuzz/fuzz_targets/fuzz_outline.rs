#![no_main]
use std::error::Error;

use libfuzzer_sys::{arbitrary, arbitrary::Arbitrary, fuzz_target};
use sfnt_outline::{
    instance::Size,
    outline::{NullPen, SvgPen},
    raw::FontRef,
    MetadataProvider,
};

/// Drawing options chosen by the fuzzer alongside the font bytes.
#[derive(Arbitrary, Debug)]
struct OutlineRequest {
    /// None => unscaled
    size: Option<f32>,
    axis_positions: Vec<f32>,
    svg: bool,
}

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    request: OutlineRequest,
    data: &'a [u8],
}

fn do_outline_things(input: Input) -> Result<(), Box<dyn Error>> {
    let font = FontRef::new(input.data)?;
    let request = input.request;
    let size = request.size.map(Size::new).unwrap_or_else(Size::unscaled);
    let settings = font
        .axes()
        .iter()
        .zip(&request.axis_positions)
        .map(|(axis, pos)| (axis.tag(), *pos))
        .collect::<Vec<_>>();
    let location = font.axes().location(settings);
    let outlines = font.outline_glyphs();
    let metrics = font.glyph_metrics(size, &location);

    // we don't care about the result, just that we don't panic, hang, etc
    for glyph in outlines.iter() {
        if request.svg {
            let _ = glyph.draw(size, &location, &mut SvgPen::default());
        } else {
            let _ = glyph.draw(size, &location, &mut NullPen);
        }
        let _ = metrics.bounds(glyph.glyph_id());
        let _ = metrics.advance_width(glyph.glyph_id());
    }
    Ok(())
}

fuzz_target!(|input: Input| {
    let _ = do_outline_things(input);
});
