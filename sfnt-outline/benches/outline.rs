use criterion::{criterion_group, criterion_main, Criterion};
use sfnt_outline::{
    instance::{LocationRef, Size},
    outline::NullPen,
    raw::FontRef,
    MetadataProvider, NormalizedCoord,
};

fn draw_all(font: &FontRef, size: Size, coords: &[NormalizedCoord]) {
    let outlines = font.outline_glyphs();
    for glyph in outlines.iter() {
        let _ = glyph.draw(size, LocationRef::new(coords), &mut NullPen);
    }
}

fn outline(c: &mut Criterion) {
    let fonts = [
        ("glyf", sfnt_test_data::glyf_a::font()),
        ("cff", sfnt_test_data::cff::font()),
        ("gvar", sfnt_test_data::variable::font()),
    ];
    for (name, data) in &fonts {
        let font = FontRef::new(data).unwrap();
        c.bench_function(&format!("{name}_unscaled"), |b| {
            b.iter(|| draw_all(&font, Size::unscaled(), &[]))
        });
        c.bench_function(&format!("{name}_16ppem"), |b| {
            b.iter(|| draw_all(&font, Size::new(16.0), &[NormalizedCoord::from_f32(0.5)]))
        });
    }
}

criterion_group!(benches, outline);
criterion_main!(benches);
