//! Buffered XML writer with explicit commit points

use crate::error::Result;
use std::io::Write;

/// XML writer that collects output in a reusable buffer
///
/// Nothing reaches the underlying writer until [`XmlWriter::commit`] or
/// [`XmlWriter::flush`] is called, which lets callers emit a unit (a row, a
/// whole part) atomically: a unit is either written in full or not at all.
pub struct XmlWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(writer: W) -> Self {
        XmlWriter {
            writer,
            buffer: Vec::with_capacity(8192), // 8KB buffer
        }
    }

    /// Write raw bytes directly
    #[inline]
    pub fn write_raw(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Write string data
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.write_raw(s.as_bytes())
    }

    /// Write XML element start tag (left open for attributes)
    #[inline]
    pub fn start_element(&mut self, name: &str) {
        self.write_raw(b"<");
        self.write_str(name);
    }

    /// Write XML element end tag
    #[inline]
    pub fn end_element(&mut self, name: &str) {
        self.write_raw(b"</");
        self.write_str(name);
        self.write_raw(b">");
    }

    /// Write self-closing element without attributes
    #[inline]
    pub fn empty_element(&mut self, name: &str) {
        self.write_raw(b"<");
        self.write_str(name);
        self.write_raw(b"/>");
    }

    /// Write attribute
    #[inline]
    pub fn attribute(&mut self, name: &str, value: &str) {
        self.write_raw(b" ");
        self.write_str(name);
        self.write_raw(b"=\"");
        self.write_escaped(value);
        self.write_raw(b"\"");
    }

    /// Write attribute with integer value
    #[inline]
    pub fn attribute_int<I: itoa::Integer>(&mut self, name: &str, value: I) {
        let mut num = itoa::Buffer::new();
        self.write_raw(b" ");
        self.write_str(name);
        self.write_raw(b"=\"");
        self.write_str(num.format(value));
        self.write_raw(b"\"");
    }

    /// Write attribute with a decimal value
    #[inline]
    pub fn attribute_number(&mut self, name: &str, value: f64) {
        self.write_raw(b" ");
        self.write_str(name);
        self.write_raw(b"=\"");
        self.write_number(value);
        self.write_raw(b"\"");
    }

    /// Close start tag
    #[inline]
    pub fn close_start_tag(&mut self) {
        self.write_raw(b">")
    }

    /// Close start tag as a self-closing element
    #[inline]
    pub fn close_empty(&mut self) {
        self.write_raw(b"/>")
    }

    /// Write an element holding escaped text: `<name>text</name>`
    pub fn text_element(&mut self, name: &str, text: &str) {
        self.start_element(name);
        self.close_start_tag();
        self.write_escaped(text);
        self.end_element(name);
    }

    /// Write a number using `.` as decimal separator, whatever the host locale
    #[inline]
    pub fn write_number(&mut self, value: f64) {
        // Display for f64 is locale independent and round-trips
        self.buffer.extend_from_slice(value.to_string().as_bytes());
    }

    /// Write text content with XML escaping
    #[inline]
    pub fn write_escaped(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '&' => self.buffer.extend_from_slice(b"&amp;"),
                '<' => self.buffer.extend_from_slice(b"&lt;"),
                '>' => self.buffer.extend_from_slice(b"&gt;"),
                '"' => self.buffer.extend_from_slice(b"&quot;"),
                '\'' => self.buffer.extend_from_slice(b"&apos;"),
                _ => {
                    let mut buf = [0; 4];
                    self.buffer
                        .extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
    }

    /// Drop everything written since the last commit
    pub fn discard(&mut self) {
        self.buffer.clear();
    }

    /// Move the buffer to the underlying writer without flushing it
    pub fn commit(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.writer.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        Ok(())
    }

    /// Commit and flush the underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.commit()?;
        self.writer.flush()?;
        Ok(())
    }

    /// Commit and give back the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.commit()?;
        Ok(self.writer)
    }
}
