//! LDIF serializer.
//!
//! Entries are rendered faithfully: attributes in table order, one line per value, no sorting or
//! deduplication. Values that are not RFC 2849 SAFE-STRINGs are base64-encoded, and every record
//! (including the last) is terminated by a blank line so the output always re-parses.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::borrow::Borrow;
use std::fmt::{self, Write};
use tracing::debug;

use crate::entry::Entry;
use crate::Result;
use ldif_core::LdifConfig;

/// Renders entries as LDIF text, optionally folding long lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LdifWriter {
    line_width: Option<usize>,
}

impl LdifWriter {
    /// Creates a writer; lines longer than `line_width` bytes are folded when it is set.
    #[must_use]
    pub const fn new(line_width: Option<usize>) -> Self {
        Self { line_width }
    }

    /// Creates a writer using the fold width from a configuration.
    #[must_use]
    pub const fn from_config(config: &LdifConfig) -> Self {
        Self::new(config.line_width)
    }

    /// Fold width, if folding is enabled.
    #[must_use]
    pub const fn line_width(&self) -> Option<usize> {
        self.line_width
    }

    /// Renders all entries to a string.
    ///
    /// # Errors
    ///
    /// Returns [`ldif_core::Error::InternalError`] if formatting fails.
    pub fn write<E: Borrow<Entry>>(&self, entries: &[E]) -> Result<String> {
        let mut out = String::new();
        self.write_to(&mut out, entries)?;
        debug!(entries = entries.len(), bytes = out.len(), "wrote LDIF output");
        Ok(out)
    }

    /// Renders all entries into an arbitrary formatting sink.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if a write fails.
    pub fn write_to<W: Write, E: Borrow<Entry>>(&self, out: &mut W, entries: &[E]) -> fmt::Result {
        for entry in entries {
            self.write_record(out, entry.borrow())?;
        }
        Ok(())
    }

    /// Renders a single entry, including its terminating blank line.
    ///
    /// # Errors
    ///
    /// Returns [`ldif_core::Error::InternalError`] if formatting fails.
    pub fn write_entry(&self, entry: &Entry) -> Result<String> {
        let mut out = String::new();
        self.write_record(&mut out, entry)?;
        Ok(out)
    }

    /// Size in bytes of the entry's serialized form.
    #[must_use]
    pub fn entry_size(&self, entry: &Entry) -> usize {
        let mut counter = ByteCounter::default();
        // ByteCounter::write_str never fails.
        let _ = self.write_record(&mut counter, entry);
        counter.bytes
    }

    fn write_record<W: Write>(&self, out: &mut W, entry: &Entry) -> fmt::Result {
        self.write_line(out, "dn", entry.dn().as_str())?;
        for attribute in entry.attributes() {
            for value in attribute.values() {
                self.write_line(out, attribute.name(), value)?;
            }
        }
        out.write_char('\n')
    }

    fn write_line<W: Write>(&self, out: &mut W, name: &str, value: &str) -> fmt::Result {
        let line = if value.is_empty() {
            format!("{name}:")
        } else if is_safe_string(value) {
            format!("{name}: {value}")
        } else {
            format!("{name}:: {}", STANDARD.encode(value))
        };

        match self.line_width {
            Some(width) if line.len() > width => write_folded(out, &line, width),
            _ => {
                out.write_str(&line)?;
                out.write_char('\n')
            }
        }
    }
}

/// Renders entries with the default writer (no folding).
///
/// # Errors
///
/// Returns [`ldif_core::Error::InternalError`] if formatting fails.
pub fn write<E: Borrow<Entry>>(entries: &[E]) -> Result<String> {
    LdifWriter::default().write(entries)
}

/// Returns true if `value` may be written without base64 (RFC 2849 SAFE-STRING).
#[must_use]
pub fn is_safe_string(value: &str) -> bool {
    let bytes = value.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return true;
    };

    if matches!(first, b' ' | b':' | b'<') || *last == b' ' {
        return false;
    }

    bytes
        .iter()
        .all(|b| b.is_ascii() && !b.is_ascii_control())
}

/// Splits `line` into a first line of at most `width` bytes and continuation lines of one space
/// plus at most `width - 1` bytes. Splits fall on UTF-8 boundaries, and a continuation segment is
/// never whitespace-only, since the parser treats such lines as record separators.
fn write_folded<W: Write>(out: &mut W, line: &str, width: usize) -> fmt::Result {
    let mut rest = line;
    let mut first = true;

    while !rest.is_empty() {
        let budget = if first { width } else { width.saturating_sub(1).max(1) };
        let mut end = budget.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map_or(rest.len(), char::len_utf8);
        }
        while rest[..end].trim().is_empty() && end < rest.len() {
            end += 1;
            while !rest.is_char_boundary(end) {
                end += 1;
            }
        }

        if !first {
            out.write_char(' ')?;
        }
        out.write_str(&rest[..end])?;
        out.write_char('\n')?;

        rest = &rest[end..];
        first = false;
    }

    Ok(())
}

#[derive(Debug, Default)]
struct ByteCounter {
    bytes: usize,
}

impl Write for ByteCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.bytes += s.len();
        Ok(())
    }
}
