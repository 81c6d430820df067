//! Represent Fortran edit descriptors as Rust types.
//!
//! A format string such as `"2I10,2X,A8,3F20.10"` is a comma-separated list of edit
//! descriptors. Each descriptor is a (optional) repeat count, a one-letter type code,
//! and a (optional) width with an (optional) number of decimals:
//!
//! ```
//! # use fortreader::format_specs::{FortField, FieldKind, RealFmt};
//! let field = FortField::parse("3F20.10").unwrap();
//! assert_eq!(field, FortField { repeat: 3, kind: FieldKind::Real(RealFmt::F), width: 20, decimals: Some(10) });
//! assert_eq!(field.total_width(), 60);
//! ```
//!
//! Only the codes `I`, `F`, `E`, `A` and `X` are recognized, in either case. Nested groups,
//! scale factors, and tab descriptors are not supported.
//!
//! [`compile`] turns a whole format string into the [`ColumnEntry`] layout used by
//! [`FortReader`](crate::reader::FortReader).
use std::fmt::Display;

use pest::Parser;

use crate::columns::ColumnEntry;
use crate::fort_error::{FormatError, FormatResult};

#[derive(Parser)]
#[grammar = "fort.pest"]
pub(crate) struct FortParser;

/// Representation of which code a real (i.e. floating point) field was written with.
///
/// Both are read the same way; the code is kept so that layouts and errors can show
/// what the format string actually said.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealFmt {
    E,
    F,
}

impl Display for RealFmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RealFmt::E => "E",
            RealFmt::F => "F",
        };

        write!(f, "{s}")
    }
}

/// The type of a descriptor, i.e. how the text in its columns is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `I`: a base 10 integer
    Integer,
    /// `F` or `E`: a floating point number in decimal or exponential notation
    Real(RealFmt),
    /// `A`: a string, stripped of surrounding whitespace by default
    Char,
    /// `X`: columns to skip over, which produce no value
    Skip,
}

impl FieldKind {
    fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "I" => Some(Self::Integer),
            "F" => Some(Self::Real(RealFmt::F)),
            "E" => Some(Self::Real(RealFmt::E)),
            "A" => Some(Self::Char),
            "X" => Some(Self::Skip),
            _ => None,
        }
    }

    /// Returns `true` for skip (`X`) fields, `false` otherwise.
    pub fn is_positional(&self) -> bool {
        matches!(self, FieldKind::Skip)
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Integer => write!(f, "I"),
            FieldKind::Real(fmt) => write!(f, "{fmt}"),
            FieldKind::Char => write!(f, "A"),
            FieldKind::Skip => write!(f, "X"),
        }
    }
}

/// One parsed edit descriptor, e.g. `2I10` or `F20.10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FortField {
    /// How many consecutive identical fields this descriptor stands for; 1 if not written.
    pub repeat: u32,
    pub kind: FieldKind,
    /// Width of each field in characters. Always 1 for skip fields, and 0 if a typed
    /// descriptor had no width.
    pub width: u32,
    /// Digits after the decimal point, if given. This is informational only; it does not
    /// constrain how real values are read.
    pub decimals: Option<u32>,
}

/// Largest repeat count a single descriptor may have.
pub const MAX_REPEAT: u32 = 100_000;

impl FortField {
    /// Parse a single edit descriptor.
    ///
    /// The whole descriptor must match, so blanks anywhere in it are an error. Returns a
    /// [`FormatError`] naming `descriptor` if it does not match the grammar, one of its
    /// numbers does not fit in a `u32`, or its repeat count is over [`MAX_REPEAT`].
    pub fn parse(descriptor: &str) -> FormatResult<Self> {
        let tree = FortParser::parse(Rule::descriptor, descriptor)
            .map_err(|e| FormatError::from_pest(e, descriptor))?
            .next()
            .ok_or_else(|| FormatError::new(descriptor, "empty descriptor"))?;

        let mut repeat = 1;
        let mut kind = None;
        let mut width = 0;
        let mut decimals = None;

        for pair in tree.into_inner() {
            match pair.as_rule() {
                Rule::repeat => repeat = parse_number(pair.as_str(), descriptor, "repeat count")?,
                Rule::code => kind = FieldKind::from_code(pair.as_str()),
                Rule::width => width = parse_number(pair.as_str(), descriptor, "width")?,
                Rule::decimals => decimals = Some(parse_number(pair.as_str(), descriptor, "decimal count")?),
                _ => continue,
            }
        }

        let kind = kind.ok_or_else(|| FormatError::new(descriptor, "missing type code"))?;
        if repeat > MAX_REPEAT {
            return Err(FormatError::new(descriptor, format!("repeat count {repeat} is over the limit of {MAX_REPEAT}")));
        }
        if kind.is_positional() {
            // One X always advances by one column per repeat, whatever width was written.
            width = 1;
        }

        Ok(Self { repeat, kind, width, decimals })
    }

    /// Number of characters this descriptor covers, i.e. `repeat * width`.
    pub fn total_width(&self) -> usize {
        self.repeat as usize * self.width as usize
    }
}

impl Display for FortField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self { repeat, kind, width, decimals } = self;
        match (kind, decimals) {
            (FieldKind::Skip, _) => write!(f, "{repeat}{kind}"),
            (_, Some(d)) => write!(f, "{repeat}{kind}{width}.{d}"),
            (_, None) => write!(f, "{repeat}{kind}{width}"),
        }
    }
}

fn parse_number(s: &str, descriptor: &str, what: &str) -> FormatResult<u32> {
    s.parse()
        .map_err(|e| FormatError::new(descriptor, format!("invalid {what} '{s}': {e}")))
}

/// Split a format string on commas and parse each descriptor in order.
///
/// Fails on the first descriptor that does not parse.
pub fn parse_descriptors(fmt_str: &str) -> FormatResult<Vec<FortField>> {
    fmt_str.split(',')
        .map(FortField::parse)
        .collect()
}

/// Compile parsed descriptors into the column layout of a line.
///
/// Each typed descriptor yields `repeat` entries of `width` columns, each starting where
/// the previous stopped. Skip descriptors only move the column cursor. Returns the entries
/// and the total number of columns consumed.
pub fn compile(descriptors: &[FortField]) -> (Vec<ColumnEntry>, usize) {
    let mut entries = vec![];
    let mut start = 0;

    for d in descriptors {
        if d.kind.is_positional() {
            start += d.total_width();
            continue;
        }

        for _ in 0..d.repeat {
            let stop = start + d.width as usize;
            entries.push(ColumnEntry::new(start, stop, d.kind));
            start = stop;
        }
    }

    (entries, start)
}

/// A value read from one column entry.
///
/// Fortran character fields are mapped to `String`s for convenience.
#[derive(Debug, Clone, PartialEq)]
pub enum FortValue {
    Char(String),
    Integer(i64),
    Real(f64),
}

impl FortValue {
    /// The integer value, if this is an `Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        if let Self::Integer(i) = self { Some(*i) } else { None }
    }

    /// The floating point value, if this is a `Real`.
    pub fn as_real(&self) -> Option<f64> {
        if let Self::Real(r) = self { Some(*r) } else { None }
    }

    /// The string value, if this is a `Char`.
    pub fn as_str(&self) -> Option<&str> {
        if let Self::Char(s) = self { Some(s) } else { None }
    }
}

impl Display for FortValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FortValue::Char(s) => write!(f, "{s}"),
            FortValue::Integer(i) => write!(f, "{i}"),
            FortValue::Real(r) => write!(f, "{r}"),
        }
    }
}

impl From<i64> for FortValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FortValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<&str> for FortValue {
    fn from(value: &str) -> Self {
        Self::Char(value.to_owned())
    }
}
