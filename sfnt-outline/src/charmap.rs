//! Mapping of characters (codepoints, not graphemes) to nominal glyph
//! identifiers.
//!
//! This is a 1-to-1 mapping from Unicode characters and
//! [Unicode variation sequences](http://unicode.org/faq/vs.html) to the
//! default glyph of the font. Substitutions that depend on context are
//! the job of a shaping engine and are not handled here.

use raw::{
    tables::{
        cmap::{
            Cmap, Cmap0, Cmap12, Cmap12Iter, Cmap14, Cmap14Iter, Cmap4, Cmap4Iter, Cmap6,
            CmapSubtable, PlatformId,
        },
        name::MacRomanMapping,
    },
    types::GlyphId,
    TableProvider,
};

pub use raw::tables::cmap::MapVariant;

/// Largest valid Unicode scalar value.
const MAX_CODEPOINT: u32 = 0x10FFFF;

/// Mapping of characters to nominal glyph identifiers.
///
/// Built from the [cmap](https://learn.microsoft.com/en-us/typography/opentype/spec/cmap)
/// table with [`MetadataProvider::charmap`](crate::MetadataProvider::charmap).
///
/// ## Selection strategy
///
/// A Windows symbol subtable is taken when present. Otherwise the subtable
/// with the widest Unicode coverage wins: full repertoire (UCS-4) before the
/// Basic Multilingual Plane, and both before a Macintosh Roman subtable.
/// Characters are encoded to Mac Roman bytes before a lookup in the latter,
/// so anything outside that character set is unmapped.
/// Formats 0, 4, 6 and 12 are supported for codepoints. Variation sequences
/// come from a format 14 subtable.
#[derive(Clone, Default)]
pub struct Charmap<'a> {
    codepoint_subtable: Option<CodepointSubtable<'a>>,
    variant_subtable: Option<Cmap14<'a>>,
}

impl<'a> Charmap<'a> {
    pub fn new(font: &impl TableProvider<'a>) -> Self {
        let cmap = match font.cmap() {
            Ok(cmap) => cmap,
            Err(e) => {
                log::debug!("no usable cmap table: {e}");
                return Self::default();
            }
        };
        Self::from_cmap(&cmap)
    }

    fn from_cmap(cmap: &Cmap<'a>) -> Self {
        const ENCODING_MS_SYMBOL: u16 = 0;
        const ENCODING_MS_UNICODE_BMP: u16 = 1;
        const ENCODING_MS_UCS_4: u16 = 10;
        const ENCODING_UNICODE_FULL: u16 = 4;
        const ENCODING_UNICODE_VARIANTS: u16 = 5;
        const ENCODING_MAC_ROMAN: u16 = 0;
        let mut kind = MappingKind::None;
        let mut codepoint_subtable = None;
        let mut variant_subtable = None;
        // Records are searched in reverse so that on ties the earliest
        // record wins.
        for record in cmap.encoding_records().iter().rev() {
            let subtable = match record.subtable(cmap.offset_data()) {
                Ok(subtable) => subtable,
                Err(e) => {
                    log::debug!(
                        "skipping cmap subtable ({:?}, {}): {e}",
                        record.platform_id(),
                        record.encoding_id()
                    );
                    continue;
                }
            };
            let candidate = match (record.platform_id(), record.encoding_id()) {
                (PlatformId::Unicode, ENCODING_UNICODE_VARIANTS) => {
                    if let CmapSubtable::Format14(cmap14) = subtable {
                        variant_subtable = Some(cmap14);
                    }
                    continue;
                }
                (PlatformId::Windows, ENCODING_MS_SYMBOL) => MappingKind::Symbol,
                (PlatformId::Windows, ENCODING_MS_UCS_4)
                | (PlatformId::Unicode, ENCODING_UNICODE_FULL) => MappingKind::UnicodeFull,
                (PlatformId::Iso, _)
                | (PlatformId::Unicode, _)
                | (PlatformId::Windows, ENCODING_MS_UNICODE_BMP) => MappingKind::UnicodeBmp,
                (PlatformId::Macintosh, ENCODING_MAC_ROMAN) => MappingKind::MacRoman,
                _ => continue,
            };
            if candidate < kind {
                continue;
            }
            if let Some(subtable) = SupportedSubtable::new(subtable) {
                kind = candidate;
                codepoint_subtable = Some(CodepointSubtable {
                    subtable,
                    kind: candidate,
                });
            }
        }
        Self {
            codepoint_subtable,
            variant_subtable,
        }
    }

    /// Returns true if a character mapping is available.
    pub fn has_map(&self) -> bool {
        self.codepoint_subtable.is_some()
    }

    /// Returns true if a symbol mapping was selected.
    pub fn is_symbol(&self) -> bool {
        self.codepoint_subtable
            .as_ref()
            .map(|subtable| subtable.kind == MappingKind::Symbol)
            .unwrap_or(false)
    }

    /// Returns true if a Unicode variation sequence mapping is available.
    pub fn has_variant_map(&self) -> bool {
        self.variant_subtable.is_some()
    }

    /// Format of the selected codepoint subtable.
    pub fn format(&self) -> Option<u16> {
        Some(match self.codepoint_subtable.as_ref()?.subtable {
            SupportedSubtable::Format0(_) => 0,
            SupportedSubtable::Format4(_) => 4,
            SupportedSubtable::Format6(_) => 6,
            SupportedSubtable::Format12(_) => 12,
        })
    }

    /// Maps a character to a nominal glyph identifier.
    ///
    /// Returns `None` for unmapped characters and for values past
    /// U+10FFFF.
    pub fn map(&self, ch: impl Into<u32>) -> Option<GlyphId> {
        let ch = ch.into();
        if ch > MAX_CODEPOINT {
            return None;
        }
        self.codepoint_subtable.as_ref()?.map(ch)
    }

    /// Maps a character to a nominal glyph identifier, falling back to
    /// `.notdef`.
    pub fn map_or_notdef(&self, ch: impl Into<u32>) -> GlyphId {
        self.map(ch).unwrap_or(GlyphId::NOTDEF)
    }

    /// Returns an iterator over all mappings of codepoint to nominal glyph
    /// identifier, in codepoint order for well formed subtables.
    /// Mappings from a Mac Roman subtable are reported with their Unicode
    /// values and so are not sorted.
    pub fn mappings(&self) -> Mappings<'a> {
        let mac_roman = self
            .codepoint_subtable
            .as_ref()
            .map(|subtable| subtable.kind == MappingKind::MacRoman)
            .unwrap_or(false);
        let inner = match self.codepoint_subtable.as_ref().map(|s| &s.subtable) {
            None => MappingsInner::None,
            Some(SupportedSubtable::Format4(cmap4)) => MappingsInner::Format4(cmap4.iter()),
            Some(SupportedSubtable::Format12(cmap12)) => MappingsInner::Format12(cmap12.iter()),
            Some(SupportedSubtable::Format0(cmap0)) => MappingsInner::Trimmed {
                subtable: SupportedSubtable::Format0(*cmap0),
                next: 0,
                end: cmap0.glyph_id_array().len() as u32,
            },
            Some(SupportedSubtable::Format6(cmap6)) => {
                let start = cmap6.first_code() as u32;
                MappingsInner::Trimmed {
                    subtable: SupportedSubtable::Format6(*cmap6),
                    next: start,
                    end: start + cmap6.glyph_id_array().len() as u32,
                }
            }
        };
        Mappings { inner, mac_roman }
    }

    /// Maps a character and variation selector to a nominal glyph
    /// identifier.
    ///
    /// Returns `None` when the sequence is not listed in the font.
    pub fn map_variant(&self, ch: impl Into<u32>, selector: impl Into<u32>) -> Option<MapVariant> {
        self.variant_subtable.as_ref()?.map_variant(ch, selector)
    }

    /// Returns an iterator over all `(character, selector, variant)`
    /// triples.
    pub fn variant_mappings(&self) -> VariantMappings<'a> {
        VariantMappings(self.variant_subtable.as_ref().map(Cmap14::iter))
    }
}

/// Iterator over all mappings of character to nominal glyph identifier.
///
/// Created with [`Charmap::mappings`].
#[derive(Clone)]
pub struct Mappings<'a> {
    inner: MappingsInner<'a>,
    mac_roman: bool,
}

impl Iterator for Mappings<'_> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (code, gid) = self.inner.next()?;
            if !self.mac_roman {
                return Some((code, gid));
            }
            if let Ok(byte) = u8::try_from(code) {
                return Some((MacRomanMapping.decode(byte) as u32, gid));
            }
        }
    }
}

impl MappingsInner<'_> {
    fn next(&mut self) -> Option<(u32, GlyphId)> {
        match self {
            MappingsInner::None => None,
            MappingsInner::Format4(iter) => iter.next(),
            MappingsInner::Format12(iter) => iter.next(),
            MappingsInner::Trimmed { subtable, next, end } => {
                while *next < *end {
                    let ch = *next;
                    *next += 1;
                    if let Some(gid) = subtable.map(ch) {
                        return Some((ch, gid));
                    }
                }
                None
            }
        }
    }
}

#[derive(Clone)]
enum MappingsInner<'a> {
    None,
    Format4(Cmap4Iter<'a>),
    Format12(Cmap12Iter<'a>),
    /// Formats 0 and 6 are dense arrays over a codepoint range.
    Trimmed {
        subtable: SupportedSubtable<'a>,
        next: u32,
        end: u32,
    },
}

/// Iterator over all mappings of character and variation selector to
/// glyph.
///
/// Created with [`Charmap::variant_mappings`].
#[derive(Clone)]
pub struct VariantMappings<'a>(Option<Cmap14Iter<'a>>);

impl Iterator for VariantMappings<'_> {
    type Item = (u32, u32, MapVariant);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.as_mut()?.next()
    }
}

#[derive(Clone)]
struct CodepointSubtable<'a> {
    subtable: SupportedSubtable<'a>,
    kind: MappingKind,
}

impl CodepointSubtable<'_> {
    fn map(&self, codepoint: u32) -> Option<GlyphId> {
        match self.kind {
            MappingKind::MacRoman => {
                let byte = MacRomanMapping.encode(char::from_u32(codepoint)?)?;
                self.subtable.map(byte as u32)
            }
            // Symbol fonts place their glyphs at U+F000..U+F0FF; Windows also
            // makes them reachable from U+0000..U+00FF.
            MappingKind::Symbol => self.subtable.map(codepoint).or_else(|| {
                (codepoint <= 0xFF)
                    .then(|| self.subtable.map(codepoint + 0xF000))
                    .flatten()
            }),
            _ => self.subtable.map(codepoint),
        }
    }
}

#[derive(Clone)]
enum SupportedSubtable<'a> {
    Format0(Cmap0<'a>),
    Format4(Cmap4<'a>),
    Format6(Cmap6<'a>),
    Format12(Cmap12<'a>),
}

impl<'a> SupportedSubtable<'a> {
    fn new(subtable: CmapSubtable<'a>) -> Option<Self> {
        Some(match subtable {
            CmapSubtable::Format0(cmap0) => Self::Format0(cmap0),
            CmapSubtable::Format4(cmap4) => Self::Format4(cmap4),
            CmapSubtable::Format6(cmap6) => Self::Format6(cmap6),
            CmapSubtable::Format12(cmap12) => Self::Format12(cmap12),
            _ => return None,
        })
    }

    fn map(&self, codepoint: u32) -> Option<GlyphId> {
        match self {
            Self::Format0(subtable) => subtable.map_codepoint(codepoint),
            Self::Format4(subtable) => subtable.map_codepoint(codepoint),
            Self::Format6(subtable) => subtable.map_codepoint(codepoint),
            Self::Format12(subtable) => subtable.map_codepoint(codepoint),
        }
    }
}

/// Greater is preferred.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
enum MappingKind {
    None,
    MacRoman,
    UnicodeBmp,
    UnicodeFull,
    Symbol,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataProvider;
    use raw::{types::Tag, FontRef};
    use sfnt_test_data::{
        glyf_a,
        tables::{cmap12, cmap14, cmap4, cmap_table, VariationSelector},
        BeBuffer,
    };

    fn font_with_cmap(cmap: Vec<u8>) -> Vec<u8> {
        let mut builder = glyf_a::builder();
        builder.add_raw(Tag::new(b"cmap"), cmap);
        builder.build()
    }

    fn cmap6(first_code: u16, glyphs: &[u16]) -> Vec<u8> {
        BeBuffer::new()
            .push(6u16)
            .push(10 + glyphs.len() as u16 * 2)
            .push(0u16)
            .push(first_code)
            .push(glyphs.len() as u16)
            .extend(glyphs.iter().copied())
            .into_vec()
    }

    #[test]
    fn map_format_4() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let charmap = font.charmap();
        assert_eq!(charmap.format(), Some(4));
        assert!(!charmap.is_symbol());
        assert_eq!(charmap.map('A'), Some(GlyphId::new(glyf_a::GLYPH_A)));
        assert_eq!(charmap.map(' '), Some(GlyphId::new(glyf_a::GLYPH_SPACE)));
        assert_eq!(charmap.map('B'), None);
        assert_eq!(charmap.map_or_notdef('B'), GlyphId::NOTDEF);
        assert_eq!(charmap.map(0x110000u32), None);
        assert_eq!(charmap.map_or_notdef(0xFFFF_FFFFu32), GlyphId::NOTDEF);
    }

    #[test]
    fn prefer_full_repertoire() {
        let data = font_with_cmap(cmap_table(&[
            (3, 1, cmap4(&[(0x41, 5)])),
            (3, 10, cmap12(&[(0x41, 0x43, 7), (0x1F600, 0x1F600, 10)])),
        ]));
        let font = FontRef::new(&data).unwrap();
        let charmap = font.charmap();
        assert_eq!(charmap.format(), Some(12));
        assert_eq!(charmap.map('A'), Some(GlyphId::new(7)));
        assert_eq!(charmap.map('C'), Some(GlyphId::new(9)));
        assert_eq!(charmap.map('\u{1F600}'), Some(GlyphId::new(10)));
    }

    #[test]
    fn symbol_remaps_low_range() {
        let data = font_with_cmap(cmap_table(&[
            (3, 0, cmap4(&[(0xF041, 2)])),
            (3, 10, cmap12(&[(0x41, 0x41, 3)])),
        ]));
        let font = FontRef::new(&data).unwrap();
        let charmap = font.charmap();
        assert!(charmap.is_symbol());
        assert_eq!(charmap.map(0xF041u32), Some(GlyphId::new(2)));
        assert_eq!(charmap.map('A'), Some(GlyphId::new(2)));
        assert_eq!(charmap.map(0x141u32), None);
    }

    #[test]
    fn map_format_6() {
        let data = font_with_cmap(cmap_table(&[(3, 1, cmap6(0x30, &[4, 0, 6]))]));
        let font = FontRef::new(&data).unwrap();
        let charmap = font.charmap();
        assert_eq!(charmap.format(), Some(6));
        assert_eq!(charmap.map('0'), Some(GlyphId::new(4)));
        // glyph 0 entries are unmapped
        assert_eq!(charmap.map('1'), None);
        assert_eq!(charmap.map('3'), None);
        assert_eq!(
            charmap.mappings().collect::<Vec<_>>(),
            [(0x30, GlyphId::new(4)), (0x32, GlyphId::new(6))]
        );
    }

    #[test]
    fn map_format_0_as_fallback() {
        let mut glyphs = [0u8; 256];
        glyphs[b'A' as usize] = 2;
        let format0 = BeBuffer::new()
            .push(0u16)
            .push(262u16)
            .push(0u16)
            .extend_bytes(&glyphs)
            .into_vec();
        let data = font_with_cmap(cmap_table(&[(1, 0, format0)]));
        let font = FontRef::new(&data).unwrap();
        let charmap = font.charmap();
        assert_eq!(charmap.format(), Some(0));
        assert_eq!(charmap.map('A'), Some(GlyphId::new(2)));
        assert_eq!(charmap.mappings().count(), 1);
    }

    #[test]
    fn mac_roman_bytes_are_decoded() {
        let mut glyphs = [0u8; 256];
        // 0x8E is 'é' and 0xE9 is 'È' in Mac Roman
        glyphs[0x8E] = 5;
        glyphs[0xE9] = 9;
        let format0 = BeBuffer::new()
            .push(0u16)
            .push(262u16)
            .push(0u16)
            .extend_bytes(&glyphs)
            .into_vec();
        let data = font_with_cmap(cmap_table(&[(1, 0, format0)]));
        let font = FontRef::new(&data).unwrap();
        let charmap = font.charmap();
        assert_eq!(charmap.map('é'), Some(GlyphId::new(5)));
        assert_eq!(charmap.map('È'), Some(GlyphId::new(9)));
        // the raw byte values are not characters of this subtable
        assert_eq!(charmap.map(0x8Eu32), None);
        // no Mac Roman byte for this one
        assert_eq!(charmap.map('\u{0100}'), None);
        assert_eq!(
            charmap.mappings().collect::<Vec<_>>(),
            [(0xE9, GlyphId::new(5)), (0xC8, GlyphId::new(9))]
        );
    }

    #[test]
    fn no_cmap() {
        let mut builder = glyf_a::builder();
        builder.remove(Tag::new(b"cmap"));
        let data = builder.build();
        let font = FontRef::new(&data).unwrap();
        let charmap = font.charmap();
        assert!(!charmap.has_map());
        assert_eq!(charmap.map('A'), None);
        assert_eq!(charmap.mappings().count(), 0);
    }

    #[test]
    fn map_variants() {
        let selector = VariationSelector {
            selector: 0xFE00,
            default_uvs: vec![(0x41, 1)],
            non_default_uvs: vec![(0x30, 9)],
        };
        let data = font_with_cmap(cmap_table(&[
            (0, 3, cmap4(&[(0x30, 3), (0x41, 2)])),
            (0, 5, cmap14(&[selector])),
        ]));
        let font = FontRef::new(&data).unwrap();
        let charmap = font.charmap();
        assert!(charmap.has_variant_map());
        assert_eq!(
            charmap.map_variant('A', 0xFE00u32),
            Some(MapVariant::UseDefault)
        );
        assert_eq!(
            charmap.map_variant('B', 0xFE00u32),
            Some(MapVariant::UseDefault)
        );
        assert_eq!(
            charmap.map_variant('0', 0xFE00u32),
            Some(MapVariant::Variant(GlyphId::new(9)))
        );
        assert_eq!(charmap.map_variant('1', 0xFE00u32), None);
        assert_eq!(charmap.map_variant('A', 0xFE01u32), None);
        for (ch, selector, variant) in charmap.variant_mappings() {
            assert_eq!(charmap.map_variant(ch, selector), Some(variant));
        }
    }

    #[test]
    fn mappings_round_trip() {
        let data = glyf_a::font();
        let font = FontRef::new(&data).unwrap();
        let charmap = font.charmap();
        let mappings: Vec<_> = charmap.mappings().collect();
        assert_eq!(
            mappings,
            [
                (0x20, GlyphId::new(glyf_a::GLYPH_SPACE)),
                (0x41, GlyphId::new(glyf_a::GLYPH_A))
            ]
        );
    }
}
