//! Pretty formatter with configurable indent, newline and escaping

use std::io;

use serde_json::ser::Formatter;

use super::options::{Escaping, JsonOptions};

/// `serde_json` formatter for store files
///
/// Layout follows `serde_json::ser::PrettyFormatter`, with the indent unit
/// and newline taken from `JsonOptions`. Under `Escaping::Strict` the
/// fragments serde_json would write verbatim are escaped further.
pub struct JarFormatter {
    current_indent: usize,
    has_value: bool,
    indent: Vec<u8>,
    newline: Vec<u8>,
    escaping: Escaping,
}

impl JarFormatter {
    pub fn new(options: &JsonOptions) -> Self {
        Self {
            current_indent: 0,
            has_value: false,
            indent: options.indent_unit().into_bytes(),
            newline: options.newline.clone().into_bytes(),
            escaping: options.escaping,
        }
    }

    fn write_indent<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for _ in 0..self.current_indent {
            writer.write_all(&self.indent)?;
        }
        Ok(())
    }

    fn open<W>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(bracket)
    }

    fn close<W>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_indent -= 1;
        if self.has_value {
            writer.write_all(&self.newline)?;
            self.write_indent(writer)?;
        }
        writer.write_all(bracket)
    }

    fn separate<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !first {
            writer.write_all(b",")?;
        }
        writer.write_all(&self.newline)?;
        self.write_indent(writer)
    }
}

impl Formatter for JarFormatter {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.open(writer, b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.close(writer, b"]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.separate(writer, first)
    }

    fn end_array_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.open(writer, b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.close(writer, b"}")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.separate(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn end_object_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        match self.escaping {
            Escaping::Relaxed => writer.write_all(fragment.as_bytes()),
            Escaping::Strict => write_strict_fragment(writer, fragment),
        }
    }
}

fn needs_strict_escape(c: char) -> bool {
    !c.is_ascii() || c == '\u{7f}' || matches!(c, '<' | '>' | '&' | '\'' | '+' | '`')
}

fn write_strict_fragment<W>(writer: &mut W, fragment: &str) -> io::Result<()>
where
    W: ?Sized + io::Write,
{
    let mut start = 0;
    for (index, c) in fragment.char_indices() {
        if !needs_strict_escape(c) {
            continue;
        }
        writer.write_all(fragment[start..index].as_bytes())?;
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
            write!(writer, "\\u{:04X}", unit)?;
        }
        start = index + c.len_utf8();
    }
    writer.write_all(fragment[start..].as_bytes())
}
