//! Glyph classification from the `GDEF` table.

use raw::{tables::gdef::Gdef, types::GlyphId, TableProvider};

pub use raw::tables::gdef::GlyphClass;

/// Glyph classes, mark attachment classes and mark glyph sets.
///
/// Every query answers "unclassified" for fonts without a `GDEF` table.
#[derive(Clone, Default)]
pub struct GlyphClasses<'a> {
    gdef: Option<Gdef<'a>>,
}

impl<'a> GlyphClasses<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        Self {
            gdef: font.gdef().ok(),
        }
    }

    /// Returns true if the font has a `GDEF` table.
    pub fn is_present(&self) -> bool {
        self.gdef.is_some()
    }

    pub fn glyph_class(&self, glyph_id: GlyphId) -> Option<GlyphClass> {
        self.gdef.as_ref()?.glyph_class(glyph_id)
    }

    /// The mark attachment class, 0 when unassigned.
    pub fn mark_attachment_class(&self, glyph_id: GlyphId) -> u16 {
        self.gdef
            .as_ref()
            .map(|gdef| gdef.mark_attachment_class(glyph_id))
            .unwrap_or(0)
    }

    /// Returns true if the glyph belongs to the mark glyph set at
    /// `set_index`.
    pub fn is_mark_glyph(&self, glyph_id: GlyphId, set_index: u16) -> bool {
        self.gdef
            .as_ref()
            .is_some_and(|gdef| gdef.is_mark_glyph(glyph_id, set_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataProvider;
    use raw::{types::Tag, FontRef};
    use sfnt_test_data::{
        glyf_a,
        tables::{class_def1, class_def2, coverage1, coverage2, gdef_table},
        variable,
    };

    #[test]
    fn glyph_classes() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let classes = font.glyph_classes();
        assert!(classes.is_present());
        assert_eq!(
            classes.glyph_class(GlyphId::new(glyf_a::GLYPH_A)),
            Some(GlyphClass::Base)
        );
        assert_eq!(classes.glyph_class(GlyphId::new(glyf_a::GLYPH_SPACE)), None);
        assert_eq!(classes.mark_attachment_class(GlyphId::new(glyf_a::GLYPH_A)), 0);
        assert!(!classes.is_mark_glyph(GlyphId::new(glyf_a::GLYPH_A), 0));
    }

    #[test]
    fn marks_and_sets() {
        let mut builder = glyf_a::builder();
        builder.add_raw(
            Tag::new(b"GDEF"),
            gdef_table(
                &class_def1(2, &[1, 3, 2, 4]),
                &class_def2(&[(3, 4, 7)]),
                &[coverage1(&[3, 10]), coverage2(&[(4, 6)])],
            ),
        );
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        let classes = font.glyph_classes();
        let gid = GlyphId::new;
        assert_eq!(classes.glyph_class(gid(2)), Some(GlyphClass::Base));
        assert_eq!(classes.glyph_class(gid(3)), Some(GlyphClass::Mark));
        assert_eq!(classes.glyph_class(gid(4)), Some(GlyphClass::Ligature));
        assert_eq!(classes.glyph_class(gid(5)), Some(GlyphClass::Component));
        assert_eq!(classes.glyph_class(gid(6)), None);
        assert_eq!(classes.mark_attachment_class(gid(3)), 7);
        assert_eq!(classes.mark_attachment_class(gid(5)), 0);
        assert!(classes.is_mark_glyph(gid(10), 0));
        assert!(!classes.is_mark_glyph(gid(4), 0));
        assert!(classes.is_mark_glyph(gid(5), 1));
        assert!(!classes.is_mark_glyph(gid(5), 2));
    }

    #[test]
    fn missing_gdef() {
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        let classes = font.glyph_classes();
        assert!(!classes.is_present());
        assert_eq!(classes.glyph_class(GlyphId::new(1)), None);
        assert_eq!(classes.mark_attachment_class(GlyphId::new(1)), 0);
    }
}
