//! Code writer with indentation tracking.
//!
//! Indentation is held in an `Rc<Cell<usize>>` so the guard returned by
//! [`CodeWriter::indent`] does not borrow the writer.
//!
//! ```
//! use idlgen_codegen::code_writer::CodeWriter;
//!
//! let mut w = CodeWriter::with_indent_spaces(String::new(), 4);
//! w.block("fn f()", |w| w.writeln("g();")).unwrap();
//!
//! assert_eq!(w.into_inner(), "fn f() {\n    g();\n}\n");
//! ```

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Indentation-aware writer over any `fmt::Write`
pub struct CodeWriter<W> {
    writer: W,
    indent_level: Rc<Cell<usize>>,
    indent_string: String,
    at_line_start: bool,
}

impl<W: fmt::Write> CodeWriter<W> {
    /// Create a writer with the given indent string
    pub fn new(writer: W, indent_string: String) -> Self {
        Self {
            writer,
            indent_level: Rc::new(Cell::new(0)),
            indent_string,
            at_line_start: true,
        }
    }

    /// Create a writer indenting by `spaces` spaces
    pub fn with_indent_spaces(writer: W, spaces: usize) -> Self {
        Self::new(writer, " ".repeat(spaces))
    }

    /// Write text without a newline, indenting first if at line start
    pub fn write(&mut self, text: &str) -> fmt::Result {
        if text.is_empty() {
            return Ok(());
        }
        if self.at_line_start {
            for _ in 0..self.indent_level.get() {
                self.writer.write_str(&self.indent_string)?;
            }
            self.at_line_start = false;
        }
        self.writer.write_str(text)
    }

    /// Write text followed by a newline
    pub fn writeln(&mut self, text: &str) -> fmt::Result {
        self.write(text)?;
        self.writer.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    /// Write an empty line (never indented)
    pub fn blank_line(&mut self) -> fmt::Result {
        self.writer.write_char('\n')?;
        self.at_line_start = true;
        Ok(())
    }

    /// Increase indentation while the returned guard is alive
    pub fn indent(&mut self) -> IndentGuard {
        self.indent_level.set(self.indent_level.get() + 1);
        IndentGuard {
            indent_level: Rc::clone(&self.indent_level),
        }
    }

    /// Write `header {`, the body one level deeper, then `}`
    pub fn block<F>(&mut self, header: &str, body: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        self.block_with_suffix(header, "", body)
    }

    /// Like [`CodeWriter::block`], with text after the closing brace
    /// (`}` followed by `,` or `;`)
    pub fn block_with_suffix<F>(&mut self, header: &str, suffix: &str, body: F) -> fmt::Result
    where
        F: FnOnce(&mut Self) -> fmt::Result,
    {
        if header.is_empty() {
            self.writeln("{")?;
        } else {
            self.writeln(&format!("{header} {{"))?;
        }
        {
            let _indent = self.indent();
            body(self)?;
        }
        self.writeln(&format!("}}{suffix}"))
    }

    /// Write a `//` comment line
    pub fn comment(&mut self, text: &str) -> fmt::Result {
        if text.is_empty() {
            return self.writeln("//");
        }
        self.writeln(&format!("// {text}"))
    }

    /// Current indentation level
    pub fn indent_level(&self) -> usize {
        self.indent_level.get()
    }

    /// Consume the writer and return the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Support for `write!`
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        let formatted = fmt::format(args);
        self.write(&formatted)
    }

    /// Write items separated by `separator`
    pub fn write_separated<I, F>(&mut self, items: I, separator: &str, mut write_item: F) -> fmt::Result
    where
        I: IntoIterator,
        F: FnMut(&mut Self, I::Item) -> fmt::Result,
    {
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.write(separator)?;
            }
            write_item(self, item)?;
        }
        Ok(())
    }
}

/// Restores the previous indentation level when dropped
pub struct IndentGuard {
    indent_level: Rc<Cell<usize>>,
}

impl Drop for IndentGuard {
    fn drop(&mut self) {
        self.indent_level
            .set(self.indent_level.get().saturating_sub(1));
    }
}

/// `writeln!`-style formatting for [`CodeWriter`]
#[macro_export]
macro_rules! cw_writeln {
    ($w:expr, $($arg:tt)*) => {
        $w.writeln(&format!($($arg)*))
    };
}
