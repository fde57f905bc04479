//! Print metadata and glyph outlines of a font.
//!
//! With no options this prints a summary of the font: its attributes,
//! family names and global metrics. Individual sections can be selected
//! with flags, and glyphs can be drawn as SVG path data.

use std::str::FromStr;

use sfnt_outline::{
    instance::{Location, LocationRef, Size},
    metrics::GlyphMetrics,
    outline::SvgPen,
    raw::{FileRef, FontRef},
    string::StringId,
    GlyphId, MetadataProvider, VariationSetting,
};

mod print;

use print::PrettyPrinter;

fn main() -> Result<(), Error> {
    env_logger::init();
    let args = flags::Args::from_env().map_err(|e| Error(e.to_string()))?;
    let bytes = std::fs::read(&args.input).map_err(|e| Error::new(format_args!(
        "failed to read '{}': {e}",
        args.input.display()
    )))?;
    let font = load_font(&bytes, args.index.unwrap_or(0))?;
    let size = args.size.map(Size::new).unwrap_or_else(Size::unscaled);
    let location = match &args.location {
        Some(settings) => parse_location(&font, settings)?,
        None => Location::default(),
    };

    let stdout = std::io::stdout();
    let mut locked = stdout.lock();
    let mut printer = PrettyPrinter::new(&mut locked);
    let report = Report {
        font: font.clone(),
        size,
        location: LocationRef::from(&location),
    };

    let show_all = !(args.list
        || args.metrics
        || args.names
        || args.axes
        || args.glyph.is_some()
        || args.char.is_some());
    if args.list {
        report.tables(&mut printer)?;
    }
    if args.names || show_all {
        report.names(&mut printer, args.names)?;
    }
    if show_all {
        report.attributes(&mut printer)?;
    }
    if args.metrics || show_all {
        report.metrics(&mut printer)?;
    }
    if args.axes || show_all {
        report.axes(&mut printer)?;
    }
    if let Some(ch) = &args.char {
        let ch = parse_char(ch)?;
        match font.charmap().map(ch) {
            Some(glyph_id) => report.glyph(&mut printer, glyph_id, args.svg)?,
            None => printer.error("charmap", format_args!("no glyph for {ch:?}"))?,
        }
    }
    if let Some(glyph) = args.glyph {
        report.glyph(&mut printer, GlyphId::new(glyph), args.svg)?;
    }
    Ok(())
}

fn load_font(bytes: &[u8], index: u32) -> Result<FontRef<'_>, Error> {
    let file = FileRef::new(bytes).map_err(Error::new)?;
    match file {
        FileRef::Font(font) if index == 0 => Ok(font),
        FileRef::Font(_) => Err(Error::new("index given for a file with a single font")),
        FileRef::Collection(collection) => collection.get(index).map_err(Error::new),
    }
}

/// Parses `tag=value` settings separated by commas.
fn parse_location(font: &FontRef, settings: &str) -> Result<Location, Error> {
    let settings = settings
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            VariationSetting::from_str(s)
                .map_err(|e| Error::new(format_args!("invalid setting '{s}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(font.axes().location(settings))
}

/// Accepts a single character or a `U+XXXX` code point.
fn parse_char(text: &str) -> Result<char, Error> {
    if let Some(hex) = text
        .strip_prefix("U+")
        .or_else(|| text.strip_prefix("u+"))
    {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| Error::new(format_args!("invalid code point '{text}'")));
    }
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(Error::new(format_args!(
            "expected a single character, found '{text}'"
        ))),
    }
}

struct Report<'a> {
    font: FontRef<'a>,
    size: Size,
    location: LocationRef<'a>,
}

impl Report<'_> {
    fn tables(&self, printer: &mut PrettyPrinter) -> Result<(), Error> {
        let records = self.font.table_directory().table_records();
        let offset_pad = hex_width(
            records
                .iter()
                .map(|rec| rec.offset())
                .max()
                .unwrap_or_default(),
        );
        printer.section("tables")?;
        for record in records {
            printer.line(format_args!(
                "{0} 0x{1:02$X} {3:8} 0x{4:08X}",
                record.tag(),
                record.offset(),
                offset_pad,
                record.length(),
                record.checksum()
            ))?;
        }
        printer.end_section();
        Ok(())
    }

    /// Prints the common family names, or every record when `all` is set.
    fn names(&self, printer: &mut PrettyPrinter, all: bool) -> Result<(), Error> {
        printer.section("names")?;
        if all {
            for string in self.font.name_records() {
                printer.field(
                    &format!(
                        "{} ({}, {}, {})",
                        string.id(),
                        string.platform_id(),
                        string.encoding_id(),
                        string.language().unwrap_or("?")
                    ),
                    &string,
                )?;
            }
        } else {
            for (label, id) in [
                ("family", StringId::FAMILY_NAME),
                ("subfamily", StringId::SUBFAMILY_NAME),
                ("full name", StringId::FULL_NAME),
                ("postscript name", StringId::POSTSCRIPT_NAME),
                ("version", StringId::VERSION_STRING),
            ] {
                printer.optional_field(
                    label,
                    self.font.localized_strings(id).english_or_first(),
                )?;
            }
        }
        printer.end_section();
        Ok(())
    }

    fn attributes(&self, printer: &mut PrettyPrinter) -> Result<(), Error> {
        let attributes = self.font.attributes();
        printer.section("attributes")?;
        printer.field("weight", attributes.weight.value())?;
        printer.field("width", format_args!("{:?}", attributes.width))?;
        printer.field("style", format_args!("{:?}", attributes.style))?;
        printer.end_section();
        Ok(())
    }

    fn metrics(&self, printer: &mut PrettyPrinter) -> Result<(), Error> {
        let metrics = self.font.metrics(self.size, self.location);
        printer.section("metrics")?;
        printer.field("units per em", metrics.units_per_em)?;
        printer.field("glyph count", metrics.glyph_count)?;
        printer.field("monospace", metrics.is_monospace)?;
        printer.field("italic angle", metrics.italic_angle)?;
        printer.field("ascent", metrics.ascent)?;
        printer.field("descent", metrics.descent)?;
        printer.field("leading", metrics.leading)?;
        printer.optional_field("cap height", metrics.cap_height)?;
        printer.optional_field("x height", metrics.x_height)?;
        printer.optional_field("average width", metrics.average_width)?;
        printer.optional_field("max width", metrics.max_width)?;
        printer.optional_field(
            "underline",
            metrics
                .underline
                .map(|line| format!("{} ({})", line.position, line.thickness)),
        )?;
        printer.optional_field(
            "strikeout",
            metrics
                .strikeout
                .map(|line| format!("{} ({})", line.position, line.thickness)),
        )?;
        printer.optional_field(
            "bounds",
            metrics.bounds.map(|b| {
                format!("{} {} {} {}", b.x_min, b.y_min, b.x_max, b.y_max)
            }),
        )?;
        printer.end_section();
        Ok(())
    }

    fn axes(&self, printer: &mut PrettyPrinter) -> Result<(), Error> {
        let axes = self.font.axes();
        if axes.is_empty() {
            return Ok(());
        }
        printer.section("axes")?;
        for axis in axes.iter() {
            printer.field(
                &axis.tag().to_string(),
                format_args!(
                    "{} {} {}{}",
                    axis.min_value(),
                    axis.default_value(),
                    axis.max_value(),
                    if axis.is_hidden() { " (hidden)" } else { "" }
                ),
            )?;
        }
        printer.end_section();
        let instances = self.font.named_instances();
        if !instances.is_empty() {
            printer.section("instances")?;
            for instance in instances.iter() {
                let name = self
                    .font
                    .localized_strings(instance.subfamily_name_id())
                    .english_or_first()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| instance.subfamily_name_id().to_string());
                let coords: Vec<_> = instance.user_coords().map(|c| c.to_string()).collect();
                printer.field(&name, coords.join(" "))?;
            }
            printer.end_section();
        }
        Ok(())
    }

    fn glyph(
        &self,
        printer: &mut PrettyPrinter,
        glyph_id: GlyphId,
        svg: bool,
    ) -> Result<(), Error> {
        printer.section(&format!("glyph {glyph_id}"))?;
        printer.optional_field(
            "name",
            self.font.glyph_names().get(glyph_id).map(|n| n.to_string()),
        )?;
        let metrics: GlyphMetrics = self.font.glyph_metrics(self.size, self.location);
        printer.optional_field("advance width", metrics.advance_width(glyph_id))?;
        printer.optional_field("left side bearing", metrics.left_side_bearing(glyph_id))?;
        printer.optional_field("advance height", metrics.advance_height(glyph_id))?;
        printer.optional_field(
            "vertical origin",
            self.font
                .vertical_origins(self.size, self.location)
                .y_origin(glyph_id),
        )?;
        let outlines = self.font.outline_glyphs();
        let mut pen = SvgPen::with_precision(2);
        match outlines.draw(glyph_id, self.size, self.location, &mut pen) {
            Ok(adjusted) => {
                printer.optional_field(
                    "bounds",
                    adjusted.bounds.map(|b| {
                        format!("{} {} {} {}", b.x_min, b.y_min, b.x_max, b.y_max)
                    }),
                )?;
                if svg {
                    printer.field("path", pen.as_str())?;
                }
            }
            Err(e) => {
                log::debug!("outline of glyph {glyph_id} failed: {e:?}");
                printer.error("outline", e)?;
            }
        }
        printer.end_section();
        printer.newline()?;
        Ok(())
    }
}

fn hex_width(val: u32) -> usize {
    match val {
        0..=0xffff => 4usize,
        0x10000..=0xffff_ff => 6,
        0x1000000.. => 8,
    }
}

#[derive(Debug, Clone)]
struct Error(String);

impl Error {
    fn new(t: impl std::fmt::Display) -> Self {
        Self(t.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::new(e)
    }
}

mod flags {
    use std::path::PathBuf;

    xflags::xflags! {
        /// Print metadata and glyph outlines of a font
        cmd args {
                required input: PathBuf
                /// Index of the font in a collection
                optional -i, --index index: u32
                /// List the table directory
                optional -l, --list
                /// Print global metrics
                optional -m, --metrics
                /// Print every name record
                optional -n, --names
                /// Print variation axes and named instances
                optional -a, --axes
                /// Print the glyph with this identifier
                optional -g, --glyph glyph: u16
                /// Print the glyph mapped to this character (or U+XXXX)
                optional -c, --char char: String
                /// Variation settings such as 'wght=700,wdth=75'
                optional --location location: String
                /// Size in pixels per em
                optional -s, --size size: f32
                /// Include SVG path data for glyphs
                optional --svg
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chars_and_code_points() {
        assert_eq!(parse_char("A").unwrap(), 'A');
        assert_eq!(parse_char("U+00E9").unwrap(), 'é');
        assert!(parse_char("AB").is_err());
        assert!(parse_char("U+D800").is_err());
    }

    #[test]
    fn location_from_settings() {
        let data = sfnt_test_data::variable::font();
        let font = FontRef::new(&data).unwrap();
        let location = parse_location(&font, "wght=900").unwrap();
        assert_eq!(location.coords()[0].to_f32(), 1.0);
        assert!(parse_location(&font, "wght").is_err());
    }

    #[test]
    fn collection_index() {
        let data = sfnt_test_data::glyf_a::font();
        assert!(load_font(&data, 0).is_ok());
        assert!(load_font(&data, 1).is_err());
    }
}
