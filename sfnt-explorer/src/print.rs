//! pretty printing implementation

use std::io::Write;

use ansi_term::{Color, Style};

// width of the left column, which contains the field names.
const L_COLUMN_WIDTH: usize = 24;

pub struct PrettyPrinter<'a> {
    is_tty: bool,
    indent_size: usize,
    depth: usize,
    writer: &'a mut (dyn Write + 'a),
}

impl<'a> PrettyPrinter<'a> {
    pub fn new(writer: &'a mut (dyn Write + 'a)) -> Self {
        PrettyPrinter {
            is_tty: atty::is(atty::Stream::Stdout),
            indent_size: 2,
            depth: 0,
            writer,
        }
    }

    /// Starts a named group; fields printed before the matching
    /// [`end_section`](Self::end_section) are indented beneath it.
    pub fn section(&mut self, title: &str) -> std::io::Result<()> {
        self.indent()?;
        let style = self.style(Color::Cyan.bold());
        writeln!(self.writer, "{}", style.paint(title))?;
        self.depth += 1;
        Ok(())
    }

    pub fn end_section(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn field(&mut self, name: &str, value: impl std::fmt::Display) -> std::io::Result<()> {
        self.indent()?;
        let pad = L_COLUMN_WIDTH.saturating_sub(self.depth * self.indent_size);
        let style = self.style(Color::Yellow.normal());
        writeln!(self.writer, "{}{value}", style.paint(format!("{name:pad$}")))
    }

    /// Prints an optional value, with a dimmed placeholder for `None`.
    pub fn optional_field<T: std::fmt::Display>(
        &mut self,
        name: &str,
        value: Option<T>,
    ) -> std::io::Result<()> {
        match value {
            Some(value) => self.field(name, value),
            None => {
                let missing = self.style(Style::new().dimmed()).paint("-").to_string();
                self.field(name, missing)
            }
        }
    }

    pub fn line(&mut self, text: impl std::fmt::Display) -> std::io::Result<()> {
        self.indent()?;
        writeln!(self.writer, "{text}")
    }

    pub fn error(&mut self, context: &str, err: impl std::fmt::Display) -> std::io::Result<()> {
        self.indent()?;
        let style = self.style(Color::Red.normal());
        writeln!(self.writer, "{}", style.paint(format!("{context}: {err}")))
    }

    pub fn newline(&mut self) -> std::io::Result<()> {
        writeln!(self.writer)
    }

    fn indent(&mut self) -> std::io::Result<()> {
        write!(self.writer, "{:1$}", "", self.depth * self.indent_size)
    }

    fn style(&self, style: Style) -> Style {
        if self.is_tty {
            style
        } else {
            Style::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_indent_fields() {
        let mut out = Vec::new();
        let mut printer = PrettyPrinter::new(&mut out);
        printer.is_tty = false;
        printer.section("metrics").unwrap();
        printer.field("ascent", 800).unwrap();
        printer.optional_field::<f32>("x height", None).unwrap();
        printer.end_section();
        printer.line("done").unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "metrics");
        assert_eq!(lines[1], format!("  {:22}800", "ascent"));
        assert_eq!(lines[2], format!("  {:22}-", "x height"));
        assert_eq!(lines[3], "done");
    }
}
