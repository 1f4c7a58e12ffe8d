//! Forward-only scalar cursors and writers for the JMF model format.
//!
//! The same record codecs drive both encodings of the format through the
//! [`ScalarRead`] / [`ScalarWrite`] traits:
//!
//! - **Text**: whitespace/newline-delimited tokens; `;`-prefixed comment
//!   lines are dropped before tokenizing; floats are written with a fixed
//!   decimal precision.
//! - **Binary**: little-endian `i32` integers and `f32` floats; strings are
//!   `u32` length + raw bytes with no terminator.
//!
//! Cursors strictly advance and never rewind. Reads past end-of-stream fail
//! with [`Error::UnexpectedEof`].

use std::fmt::Write as _;

use glam::{Quat, Vec3};

use crate::error::Error;

/// Typed "read next scalar" operations over a token or byte stream.
pub trait ScalarRead {
    fn next_int(&mut self) -> Result<i64, Error>;
    fn next_float(&mut self) -> Result<f32, Error>;
    fn next_str(&mut self) -> Result<String, Error>;

    /// Count of unconsumed tokens (text) or bytes (binary).
    fn remaining(&self) -> usize;

    /// Advance past `n` tokens/bytes without interpreting them.
    fn skip(&mut self, n: usize) -> Result<(), Error>;

    fn next_vec3(&mut self) -> Result<Vec3, Error> {
        Ok(Vec3::new(
            self.next_float()?,
            self.next_float()?,
            self.next_float()?,
        ))
    }

    fn next_quat(&mut self) -> Result<Quat, Error> {
        let x = self.next_float()?;
        let y = self.next_float()?;
        let z = self.next_float()?;
        let w = self.next_float()?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }
}

/// Typed scalar writer mirroring [`ScalarRead`].
///
/// `comment` and `blank_line` are text-only verbosity hooks; the binary
/// writer ignores them so codecs can emit them unconditionally.
pub trait ScalarWrite {
    fn put_int(&mut self, v: i64);
    fn put_float(&mut self, v: f32);
    fn put_str(&mut self, s: &str);

    /// Write a run of floats as one multi-component value (a single
    /// tab-separated line in text mode).
    fn put_floats(&mut self, vs: &[f32]);

    fn comment(&mut self, text: &str);
    fn blank_line(&mut self);

    fn put_vec3(&mut self, v: Vec3) {
        self.put_floats(&[v.x, v.y, v.z]);
    }

    fn put_quat(&mut self, q: Quat) {
        self.put_floats(&[q.x, q.y, q.z, q.w]);
    }
}

// ============================================================================
// Text cursor
// ============================================================================

/// Token cursor over the text encoding.
pub struct TextCursor<'a> {
    tokens: Vec<&'a str>,
    pos: usize,
}

impl<'a> TextCursor<'a> {
    /// Tokenize `input`, dropping comment lines (first non-blank char `;`).
    pub fn new(input: &'a str) -> Self {
        let tokens = input
            .lines()
            .filter(|line| !line.trim_start().starts_with(';'))
            .flat_map(|line| line.split_whitespace())
            .collect();
        Self { tokens, pos: 0 }
    }

    fn next_token(&mut self, context: &'static str) -> Result<&'a str, Error> {
        let token = self
            .tokens
            .get(self.pos)
            .copied()
            .ok_or(Error::UnexpectedEof { context })?;
        self.pos += 1;
        Ok(token)
    }
}

/// Parse a float token, truncating malformed values with excess `.`-delimited
/// segments (`1.0.astray` → `1.0`) instead of failing. Legacy corpus files
/// contain such tokens; see DESIGN.md.
fn parse_float_lenient(token: &str) -> Result<f32, Error> {
    if let Ok(v) = token.parse::<f32>() {
        return Ok(v);
    }
    let mut parts = token.splitn(3, '.');
    if let (Some(whole), Some(frac)) = (parts.next(), parts.next()) {
        if parts.next().is_some() {
            let truncated = format!("{whole}.{frac}");
            if let Ok(v) = truncated.parse::<f32>() {
                return Ok(v);
            }
        }
    }
    Err(Error::BadNumber {
        token: token.to_string(),
    })
}

impl ScalarRead for TextCursor<'_> {
    fn next_int(&mut self) -> Result<i64, Error> {
        let token = self.next_token("integer")?;
        token.parse::<i64>().map_err(|_| Error::BadNumber {
            token: token.to_string(),
        })
    }

    fn next_float(&mut self) -> Result<f32, Error> {
        let token = self.next_token("float")?;
        parse_float_lenient(token)
    }

    fn next_str(&mut self) -> Result<String, Error> {
        Ok(self.next_token("string")?.to_string())
    }

    fn remaining(&self) -> usize {
        self.tokens.len() - self.pos
    }

    fn skip(&mut self, n: usize) -> Result<(), Error> {
        if self.remaining() < n {
            return Err(Error::UnexpectedEof { context: "skip" });
        }
        self.pos += n;
        Ok(())
    }
}

// ============================================================================
// Binary cursor
// ============================================================================

/// Byte cursor over the binary encoding (little-endian, fixed-width).
pub struct BinaryCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Consume exactly `n` bytes.
    pub fn take(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], Error> {
        if self.data.len() - self.pos < n {
            return Err(Error::UnexpectedEof { context });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn next_u16(&mut self) -> Result<u16, Error> {
        let b = self.take(2, "u16")?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn next_i16(&mut self) -> Result<i16, Error> {
        let b = self.take(2, "i16")?;
        Ok(i16::from_le_bytes([b[0], b[1]]))
    }

    pub fn next_u32(&mut self) -> Result<u32, Error> {
        let b = self.take(4, "u32")?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn next_f32(&mut self) -> Result<f32, Error> {
        let b = self.take(4, "f32")?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read `len` raw bytes as a string (length was declared elsewhere).
    pub fn next_str_exact(&mut self, len: usize) -> Result<String, Error> {
        let bytes = self.take(len, "string bytes")?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

impl ScalarRead for BinaryCursor<'_> {
    fn next_int(&mut self) -> Result<i64, Error> {
        let b = self.take(4, "integer")?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as i64)
    }

    fn next_float(&mut self) -> Result<f32, Error> {
        let b = self.take(4, "float")?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn next_str(&mut self) -> Result<String, Error> {
        let len = self.next_u32()? as usize;
        if len > self.remaining() {
            return Err(Error::BadCount {
                what: "string length",
                count: len as i64,
            });
        }
        self.next_str_exact(len)
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn skip(&mut self, n: usize) -> Result<(), Error> {
        self.take(n, "skip")?;
        Ok(())
    }
}

// ============================================================================
// Text writer
// ============================================================================

/// Text writer with fixed decimal precision and optional verbosity output.
pub struct TextWriter {
    out: String,
    precision: usize,
    comments: bool,
    blank_lines: bool,
}

impl TextWriter {
    pub fn new(precision: u8, comments: bool, blank_lines: bool) -> Self {
        Self {
            out: String::new(),
            precision: precision as usize,
            comments,
            blank_lines,
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.out.into_bytes()
    }

    fn push_float(&mut self, v: f32) {
        // `write!` to a String cannot fail.
        let _ = write!(self.out, "{:.*}", self.precision, v);
    }
}

impl ScalarWrite for TextWriter {
    fn put_int(&mut self, v: i64) {
        let _ = writeln!(self.out, "{v}");
    }

    fn put_float(&mut self, v: f32) {
        self.push_float(v);
        self.out.push('\n');
    }

    fn put_str(&mut self, s: &str) {
        debug_assert!(
            !s.chars().any(char::is_whitespace),
            "text-mode names must be single tokens: {s:?}"
        );
        self.out.push_str(s);
        self.out.push('\n');
    }

    fn put_floats(&mut self, vs: &[f32]) {
        for (i, &v) in vs.iter().enumerate() {
            if i > 0 {
                self.out.push('\t');
            }
            self.push_float(v);
        }
        self.out.push('\n');
    }

    fn comment(&mut self, text: &str) {
        if self.comments {
            let _ = writeln!(self.out, ";{text}");
        }
    }

    fn blank_line(&mut self) {
        if self.blank_lines {
            self.out.push('\n');
        }
    }
}

// ============================================================================
// Binary writer
// ============================================================================

/// Binary writer; comments and blank lines are no-ops.
pub struct BinaryWriter {
    out: Vec<u8>,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self { out: Vec::new() }
    }

    /// Append raw bytes (magic tag).
    pub fn push_raw(&mut self, bytes: &[u8]) {
        self.out.extend_from_slice(bytes);
    }

    pub fn finish(self) -> Vec<u8> {
        self.out
    }
}

impl Default for BinaryWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScalarWrite for BinaryWriter {
    fn put_int(&mut self, v: i64) {
        self.out.extend_from_slice(&(v as i32).to_le_bytes());
    }

    fn put_float(&mut self, v: f32) {
        self.out.extend_from_slice(&v.to_le_bytes());
    }

    fn put_str(&mut self, s: &str) {
        self.out
            .extend_from_slice(&(s.len() as u32).to_le_bytes());
        self.out.extend_from_slice(s.as_bytes());
    }

    fn put_floats(&mut self, vs: &[f32]) {
        for &v in vs {
            self.put_float(v);
        }
    }

    fn comment(&mut self, _text: &str) {}

    fn blank_line(&mut self) {}
}
