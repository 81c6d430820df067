//! A single typed field at fixed columns of a line
use std::fmt::Display;

use crate::fort_error::{ConversionError, ConvResult};
use crate::format_specs::{FieldKind, FortValue};
use crate::parsing;

/// A typed field occupying the character columns `start..stop` of a line.
///
/// Offsets are 0-based and `stop` is exclusive. Entries are produced by
/// [`compile`](crate::format_specs::compile) and never hold a [`FieldKind::Skip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnEntry {
    start: usize,
    stop: usize,
    kind: FieldKind,
}

impl ColumnEntry {
    pub(crate) fn new(start: usize, stop: usize, kind: FieldKind) -> Self {
        debug_assert!(!kind.is_positional(), "skip fields do not get column entries");
        debug_assert!(start <= stop);
        Self { start, stop, kind }
    }

    /// First column of the entry
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last column of the entry
    pub fn stop(&self) -> usize {
        self.stop
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Width of the entry in columns, i.e. `stop - start`
    pub fn width(&self) -> usize {
        self.stop - self.start
    }

    /// The raw text of this entry's columns in `line`.
    pub fn slice<'l>(&self, line: &'l str) -> &'l str {
        parsing::column_slice(line, self.start, self.stop)
    }

    /// Read this entry from `line` and convert it to its declared type.
    ///
    /// Strings are stripped of surrounding whitespace; see [`read_custom`](Self::read_custom)
    /// to keep it.
    pub fn read(&self, line: &str) -> ConvResult<FortValue> {
        self.read_custom(line, true)
    }

    /// Read this entry from `line`, choosing whether to strip `A` fields.
    pub fn read_custom(&self, line: &str, trim_strings: bool) -> ConvResult<FortValue> {
        let text = self.slice(line);
        let res = match self.kind {
            FieldKind::Integer => parsing::parse_integer(text).map(FortValue::Integer),
            FieldKind::Real(_) => parsing::parse_real(text).map(FortValue::Real),
            FieldKind::Char => Ok(FortValue::Char(parsing::parse_char(text, trim_strings))),
            FieldKind::Skip => unreachable!("skip fields do not get column entries"),
        };

        res.map_err(|reason| ConversionError {
            start: self.start,
            stop: self.stop,
            kind: self.kind,
            text: text.to_owned(),
            reason,
        })
    }
}

impl Display for ColumnEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ColumnEntry({},{},{})", self.start, self.stop, self.kind)
    }
}
