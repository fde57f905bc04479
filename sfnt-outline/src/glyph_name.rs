//! Glyph names from the `post` and `CFF` tables.

use core::fmt;

use raw::{
    tables::{
        cff::Cff,
        post::Post,
        postscript::{Charset, Latin1String},
    },
    types::GlyphId,
    TableProvider,
};

/// Mapping between glyph identifiers and names.
///
/// Names come from a version 1.0 or 2.0 `post` table, otherwise from the
/// charset of a name keyed `CFF` table. Fonts with neither have no glyph
/// names.
#[derive(Clone)]
pub struct GlyphNames<'a> {
    source: Source<'a>,
}

#[derive(Clone)]
enum Source<'a> {
    Post(Post<'a>),
    Cff(Cff<'a>, Charset<'a>),
    None,
}

impl<'a> GlyphNames<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        if let Ok(post) = font.post() {
            if post.num_names() != 0 {
                return Self {
                    source: Source::Post(post),
                };
            }
        }
        if let Ok(cff) = font.cff() {
            match cff.charset() {
                Ok(Some(charset)) => {
                    return Self {
                        source: Source::Cff(cff, charset),
                    }
                }
                Ok(None) => {}
                Err(e) => log::debug!("unusable CFF charset: {e}"),
            }
        }
        Self {
            source: Source::None,
        }
    }

    /// Where the names are read from.
    pub fn source(&self) -> GlyphNameSource {
        match self.source {
            Source::Post(_) => GlyphNameSource::Post,
            Source::Cff(..) => GlyphNameSource::Cff,
            Source::None => GlyphNameSource::None,
        }
    }

    /// Returns the name of the glyph, if it has a non-empty one.
    pub fn get(&self, glyph_id: GlyphId) -> Option<GlyphName<'a>> {
        let name = match &self.source {
            Source::Post(post) => GlyphName::Utf8(post.glyph_name(glyph_id)?),
            Source::Cff(cff, charset) => {
                GlyphName::Latin1(cff.string(charset.string_id(glyph_id).ok()?)?)
            }
            Source::None => return None,
        };
        (!name.is_empty()).then_some(name)
    }

    /// Returns the first glyph with the given name.
    pub fn glyph_id(&self, name: &str) -> Option<GlyphId> {
        match &self.source {
            Source::Post(post) => post.glyph_id_for_name(name),
            Source::Cff(cff, charset) => charset
                .iter()
                .find(|(_, sid)| cff.string(*sid).is_some_and(|string| string == name))
                .map(|(gid, _)| gid),
            Source::None => None,
        }
    }

    /// Returns every glyph that has a name, with that name.
    pub fn iter(&self) -> impl Iterator<Item = (GlyphId, GlyphName<'a>)> + 'a + Clone {
        let names = self.clone();
        let count = match &self.source {
            Source::Post(post) => post.num_names() as u32,
            Source::Cff(_, charset) => charset.num_glyphs(),
            Source::None => 0,
        };
        (0..count.min(u16::MAX as u32 + 1)).filter_map(move |gid| {
            let gid = GlyphId::new(gid as u16);
            Some((gid, names.get(gid)?))
        })
    }
}

/// Table providing the glyph names of a font.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GlyphNameSource {
    Post,
    Cff,
    /// The font has no glyph names.
    None,
}

/// Name of a single glyph.
///
/// `post` names are UTF-8 while `CFF` strings are Latin-1.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum GlyphName<'a> {
    Utf8(&'a str),
    Latin1(Latin1String<'a>),
}

impl GlyphName<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Utf8(name) => name.is_empty(),
            Self::Latin1(name) => name.is_empty(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Utf8(name) => name.as_bytes(),
            Self::Latin1(name) => name.as_bytes(),
        }
    }
}

impl fmt::Display for GlyphName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8(name) => f.write_str(name),
            Self::Latin1(name) => write!(f, "{name}"),
        }
    }
}

impl PartialEq<&str> for GlyphName<'_> {
    fn eq(&self, other: &&str) -> bool {
        match self {
            Self::Utf8(name) => name == other,
            Self::Latin1(name) => name == other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataProvider;
    use raw::{types::Tag, FontRef};
    use sfnt_test_data::{cff, glyf_a, variable};

    #[test]
    fn post_names() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let names = font.glyph_names();
        assert_eq!(names.source(), GlyphNameSource::Post);
        assert_eq!(names.get(GlyphId::new(glyf_a::GLYPH_NOTDEF)).unwrap(), ".notdef");
        assert_eq!(names.get(GlyphId::new(glyf_a::GLYPH_SPACE)).unwrap(), "space");
        assert_eq!(names.get(GlyphId::new(glyf_a::GLYPH_A)).unwrap(), "A");
        assert_eq!(names.get(GlyphId::new(glyf_a::GLYPH_A_ALT)).unwrap(), "A.alt");
        assert!(names.get(GlyphId::new(glyf_a::NUM_GLYPHS)).is_none());
        assert_eq!(names.glyph_id("A.alt"), Some(GlyphId::new(glyf_a::GLYPH_A_ALT)));
        assert_eq!(names.glyph_id("Z"), None);
        assert_eq!(names.iter().count(), glyf_a::NUM_GLYPHS as usize);
    }

    #[test]
    fn cff_names() {
        let data = cff::font();
        let font = FontRef::new(&data).unwrap();
        let names = font.glyph_names();
        // the post table is version 3.0
        assert_eq!(names.source(), GlyphNameSource::Cff);
        let expected = [".notdef", "A", "B", "C", "D", "E", "F.ss01"];
        let collected: Vec<_> = names.iter().map(|(_, name)| name.to_string()).collect();
        assert_eq!(collected, expected);
        assert_eq!(
            names.get(GlyphId::new(cff::GLYPH_CUSTOM_NAME)).unwrap(),
            "F.ss01"
        );
        assert_eq!(names.glyph_id("C"), Some(GlyphId::new(3)));
    }

    #[test]
    fn cid_fonts_have_no_names() {
        let data = cff::cid_font();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.glyph_names().source(), GlyphNameSource::None);
    }

    #[test]
    fn no_names() {
        let data = variable::font();
        let font = FontRef::new(&data).unwrap();
        let names = font.glyph_names();
        assert_eq!(names.source(), GlyphNameSource::None);
        assert!(names.get(GlyphId::new(1)).is_none());
        assert_eq!(names.iter().count(), 0);
        let mut builder = glyf_a::builder();
        builder.remove(Tag::new(b"post"));
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.glyph_names().source(), GlyphNameSource::None);
    }
}
