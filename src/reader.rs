//! Read lines laid out according to a Fortran-style format string.
//!
//! The first step is to compile the format string into a [`FortReader`]:
//!
//! ```
//! use fortreader::reader::FortReader;
//! use fortreader::format_specs::FortValue;
//!
//! let reader = FortReader::parse("2I10,2X,A8").unwrap();
//! assert_eq!(reader.len(), 3);
//!
//! let values = reader.read("       123       456  hello   ").unwrap();
//! assert_eq!(values, vec![FortValue::Integer(123), FortValue::Integer(456), FortValue::Char("hello".to_owned())]);
//! ```
//!
//! The same reader can then be used for any number of lines. [`FortReader::read`] fails on
//! the first field that does not convert; [`FortReader::probe`] instead counts how many
//! fields do, which is handy for deciding whether a line fits a layout at all:
//!
//! ```
//! # use fortreader::reader::FortReader;
//! let reader = FortReader::parse("I5,F8.3").unwrap();
//! assert_eq!(reader.probe("   12   1.500"), 2);
//! assert_eq!(reader.probe("   12   x.500"), 1);
//! assert!(reader.read("   12   x.500").is_err());
//! ```
use std::fmt::Display;

use itertools::Itertools;

use crate::columns::ColumnEntry;
use crate::fort_error::{ConvResult, FormatResult};
use crate::format_specs::{self, FortValue};

/// Settings for reading lines
///
/// To use, instantiate the default version with `ReadSettings::default()` and
/// modify the desired settings with the public methods:
///
/// ```
/// # use fortreader::reader::ReadSettings;
/// let settings = ReadSettings::default().do_trim(false).skip_malformed(true);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadSettings {
    pub(crate) trim_strings: bool,
    pub(crate) skip_blank: bool,
    pub(crate) skip_malformed: bool,
}

impl ReadSettings {
    /// Set whether to trim leading and trailing whitespace from `A` fields.
    ///
    /// Default is `true`, i.e. do remove the whitespace.
    pub fn do_trim(mut self, trim_strings: bool) -> Self {
        self.trim_strings = trim_strings;
        self
    }

    /// Set whether table reads ignore lines that are empty or only whitespace.
    ///
    /// Default is `true`.
    pub fn skip_blank(mut self, skip_blank: bool) -> Self {
        self.skip_blank = skip_blank;
        self
    }

    /// Set whether table reads drop lines that fail to convert instead of returning an error.
    ///
    /// Default is `false`.
    pub fn skip_malformed(mut self, skip_malformed: bool) -> Self {
        self.skip_malformed = skip_malformed;
        self
    }
}

impl Default for ReadSettings {
    fn default() -> Self {
        Self { trim_strings: true, skip_blank: true, skip_malformed: false }
    }
}

/// A compiled format string, ready to read lines.
///
/// A reader never changes after it is built, so it can be shared freely between
/// threads reading different lines.
#[derive(Debug, Clone, PartialEq)]
pub struct FortReader {
    fmt: String,
    canonical: String,
    entries: Vec<ColumnEntry>,
    total_width: usize,
    settings: ReadSettings,
}

impl FortReader {
    /// Compile a format string such as `"2I10,2X,A8,3F20.10"`.
    ///
    /// Returns a [`FormatError`](crate::fort_error::FormatError) naming the first
    /// descriptor that does not match the grammar.
    pub fn parse(fmt_str: &str) -> FormatResult<Self> {
        Self::parse_custom(fmt_str, ReadSettings::default())
    }

    /// Compile a format string with customized settings.
    pub fn parse_custom(fmt_str: &str, settings: ReadSettings) -> FormatResult<Self> {
        let descriptors = format_specs::parse_descriptors(fmt_str)?;
        let (entries, total_width) = format_specs::compile(&descriptors);
        let canonical = descriptors.iter().join(",");

        log::debug!("compiled format '{fmt_str}' into {} entries over {total_width} columns", entries.len());
        Ok(Self { fmt: fmt_str.to_owned(), canonical, entries, total_width, settings })
    }

    /// Read every entry from `line`, in order.
    ///
    /// Returns the first [`ConversionError`](crate::fort_error::ConversionError) encountered;
    /// no partial result is returned.
    pub fn read(&self, line: &str) -> ConvResult<Vec<FortValue>> {
        self.read_with(line, &self.settings)
    }

    pub(crate) fn read_with(&self, line: &str, settings: &ReadSettings) -> ConvResult<Vec<FortValue>> {
        self.entries.iter()
            .map(|e| e.read_custom(line, settings.trim_strings))
            .collect()
    }

    /// Count how many entries of `line` convert successfully.
    ///
    /// This never fails; a line that fully matches the layout scores [`len`](Self::len).
    pub fn probe(&self, line: &str) -> usize {
        self.entries.iter()
            .filter(|e| e.read_custom(line, self.settings.trim_strings).is_ok())
            .count()
    }

    /// Number of value-producing entries (skip fields do not count).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the format has no value-producing entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The format string exactly as it was given to [`parse`](Self::parse).
    pub fn describe(&self) -> &str {
        &self.fmt
    }

    /// The format string rebuilt from its descriptors, with upper case codes and explicit
    /// repeat counts, e.g. `"2i10,a8"` becomes `"2I10,1A8"`.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The compiled entries, in column order.
    pub fn columns(&self) -> &[ColumnEntry] {
        &self.entries
    }

    /// Total number of columns the format covers, skip fields included.
    pub fn total_width(&self) -> usize {
        self.total_width
    }

    pub fn settings(&self) -> &ReadSettings {
        &self.settings
    }
}

impl Display for FortReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FortReader({})", self.fmt)
    }
}
