//! Errors in format strings, field values, and line sources
use std::fmt::Display;
use pest::RuleType;
use pest::error::InputLocation;

use crate::format_specs::FieldKind;

/// Type alias for a `Result` with [`FormatError`] as the error type.
pub type FormatResult<T> = Result<T, FormatError>;

/// Type alias for a `Result` with [`ConversionError`] as the error type.
pub type ConvResult<T> = Result<T, ConversionError>;

/// An edit descriptor in a format string did not match the descriptor grammar.
///
/// Compilation stops at the first bad descriptor, so no reader is ever built
/// from a partially valid format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    /// The offending descriptor, exactly as it appeared between the commas.
    pub descriptor: String,
    /// Why it was rejected.
    pub reason: String,
}

impl FormatError {
    pub(crate) fn new<S: Into<String>>(descriptor: &str, reason: S) -> Self {
        Self { descriptor: descriptor.to_owned(), reason: reason.into() }
    }

    pub(crate) fn from_pest<R: RuleType>(e: pest::error::Error<R>, descriptor: &str) -> Self {
        let at = match e.location {
            InputLocation::Pos(p) => p,
            InputLocation::Span((p, _)) => p,
        };
        Self::new(descriptor, format!("expected [repeat]<I|F|E|A|X>[width[.decimals]], stopped at character {at}"))
    }
}

impl Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unrecognized format descriptor '{}': {}", self.descriptor, self.reason)
    }
}

impl std::error::Error for FormatError {}


/// The text in a column could not be converted to the column's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    /// First character column of the failing entry (0-based)
    pub start: usize,
    /// One past the last character column of the failing entry
    pub stop: usize,
    /// The declared type of the entry
    pub kind: FieldKind,
    /// The raw, unstripped text sliced out of the line
    pub text: String,
    /// Message from the underlying number parser
    pub reason: String,
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Could not convert columns {}..{} ('{}') as type {}: {}",
               self.start, self.stop, self.text, self.kind, self.reason)
    }
}

impl std::error::Error for ConversionError {}


/// Errors while reading many lines from a line source.
///
/// These are returned inside an [`error_stack::Report`], which carries the line number
/// and the failing line as attachments and the underlying [`ConversionError`] or
/// [`std::io::Error`] as its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    /// A line could not be read from the source
    ReadFailed,
    /// A line did not match the reader's layout
    MalformedLine,
    /// The names given for a table's columns did not line up with the format's entries
    ColumnMismatch,
    /// The rows that were read could not be assembled into a dataframe
    BuildFailed,
}

impl Display for TableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableError::ReadFailed => write!(f, "Could not read a line of table data"),
            TableError::MalformedLine => write!(f, "A line of table data did not match the format"),
            TableError::ColumnMismatch => write!(f, "Table columns did not match the format"),
            TableError::BuildFailed => write!(f, "Could not build a dataframe from the table rows"),
        }
    }
}

impl std::error::Error for TableError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_error_display() {
        assert_eq!(TableError::ColumnMismatch.to_string(), "Table columns did not match the format");
        assert_eq!(TableError::BuildFailed.to_string(), "Could not build a dataframe from the table rows");
        assert_ne!(TableError::BuildFailed, TableError::ColumnMismatch);
    }
}
