use super::{
    attribute::Attributes,
    charmap::Charmap,
    glyph_class::GlyphClasses,
    glyph_name::GlyphNames,
    instance::{LocationRef, Size},
    metrics::{GlyphMetrics, Metrics},
    outline::OutlineGlyphCollection,
    string::{LocalizedStrings, StringId},
    variation::{AxisCollection, NamedInstanceCollection},
    vertical_origin::VerticalOrigins,
};

/// Interface for types that can provide font metadata and outlines.
pub trait MetadataProvider<'a>: raw::TableProvider<'a> + Sized {
    /// Returns the classification attributes: width, style and weight.
    fn attributes(&self) -> Attributes {
        Attributes::new(self)
    }

    /// Returns the collection of variation axes.
    fn axes(&self) -> AxisCollection<'a> {
        AxisCollection::new(self)
    }

    /// Returns the collection of named variation instances.
    fn named_instances(&self) -> NamedInstanceCollection<'a> {
        NamedInstanceCollection::new(self)
    }

    /// Returns an iterator over the localized strings for the given
    /// identifier, in storage order.
    fn localized_strings(&self, id: StringId) -> LocalizedStrings<'a> {
        LocalizedStrings::new(self, id)
    }

    /// Returns an iterator over every record of the `name` table.
    fn name_records(&self) -> LocalizedStrings<'a> {
        LocalizedStrings::all(self)
    }

    /// Returns the global font metrics for the specified size and location in
    /// normalized variation space.
    fn metrics(&self, size: Size, location: impl Into<LocationRef<'a>>) -> Metrics {
        Metrics::new(self, size, location)
    }

    /// Returns the glyph specific metrics for the specified size and location
    /// in normalized variation space.
    fn glyph_metrics(&self, size: Size, location: impl Into<LocationRef<'a>>) -> GlyphMetrics<'a> {
        GlyphMetrics::new(self, size, location)
    }

    /// Returns the vertical origins of glyphs.
    fn vertical_origins(
        &self,
        size: Size,
        location: impl Into<LocationRef<'a>>,
    ) -> VerticalOrigins<'a> {
        VerticalOrigins::new(self, size, location)
    }

    /// Returns the character to nominal glyph identifier mapping.
    fn charmap(&self) -> Charmap<'a> {
        Charmap::new(self)
    }

    /// Returns the glyph names of the font.
    fn glyph_names(&self) -> GlyphNames<'a> {
        GlyphNames::new(self)
    }

    /// Returns the `GDEF` glyph classification.
    fn glyph_classes(&self) -> GlyphClasses<'a> {
        GlyphClasses::new(self)
    }

    /// Returns the collection of glyph outlines.
    fn outline_glyphs(&self) -> OutlineGlyphCollection<'a> {
        OutlineGlyphCollection::new(self)
    }
}

/// Blanket implementation of `MetadataProvider` for any type that implements
/// `TableProvider`.
impl<'a, T> MetadataProvider<'a> for T where T: raw::TableProvider<'a> {}
