//! Read fixed-column text records described by Fortran-style edit descriptors.
//!
//! A format string such as `"2I10,2X,A8,3F20.10"` is compiled once into a
//! [`FortReader`](reader::FortReader), which then reads any number of lines:
//!
//! ```
//! use fortreader::reader::FortReader;
//! use fortreader::format_specs::FortValue;
//!
//! let reader = FortReader::parse("2I10,2X,A8").unwrap();
//! let values = reader.read("       123       456  hello   ").unwrap();
//! assert_eq!(values[2], FortValue::Char("hello".to_owned()));
//! ```
extern crate pest;
#[macro_use]
extern crate pest_derive;
pub mod fort_error;
pub mod format_specs;
pub mod columns;
pub mod reader;
pub mod table;
pub(crate) mod parsing;
#[cfg(feature = "serde")]
pub mod de;
#[cfg(feature = "dataframes")]
pub mod dataframes;
