//! Read fixed-column data directly as a `DataFrame`.
use std::io::BufRead;

use error_stack::{Report, ResultExt};
use polars::frame::row::Row;
use polars::prelude::{AnyValue, DataFrame, DataType, Field, Schema};

use crate::format_specs::{FieldKind, FortValue};
use crate::fort_error::TableError;
use crate::reader::FortReader;
use crate::table::{self, TableResult};

impl FieldKind {
    /// Return the [Polars DataType](polars::datatypes::DataType) that matches this field type.
    ///
    /// All integer fields map to `Int64` and all real fields to `Float64`. Skip fields
    /// return `None`.
    pub fn polars_dtype(&self) -> Option<DataType> {
        match self {
            FieldKind::Char => Some(DataType::Utf8),
            FieldKind::Integer => Some(DataType::Int64),
            FieldKind::Real(_) => Some(DataType::Float64),
            FieldKind::Skip => None,
        }
    }
}

impl From<FortValue> for AnyValue<'_> {
    fn from(value: FortValue) -> Self {
        match value {
            FortValue::Char(s) => AnyValue::Utf8Owned(s.into()),
            FortValue::Integer(i) => AnyValue::Int64(i),
            FortValue::Real(f) => AnyValue::Float64(f),
        }
    }
}

/// Read a table with a known layout and column names into a dataframe
///
/// This requires that you have a buffered reader (`f`) positioned so that the next line read will be the
/// first row of the data. Lines are read with [`table::read_table`], so blank and malformed lines are
/// handled according to `reader`'s settings. Each entry of `reader` becomes one column, named by the
/// matching element of `colnames`.
///
/// Returns a [`TableError::ColumnMismatch`] report if `colnames` does not have exactly one name per
/// entry of `reader`, and a [`TableError::BuildFailed`] report carrying the Polars error if the
/// rows cannot be assembled into a frame.
///
/// # Notes
/// This constructs the DataFrame row by row, which Polars warns will be slow compared to
/// column-by-column, and reads the entirety of `f` into memory first.
pub fn read_to_dataframe<R: BufRead, S: AsRef<str>>(f: R, reader: &FortReader, colnames: &[S]) -> TableResult<DataFrame> {
    if reader.len() != colnames.len() {
        return Err(Report::new(TableError::ColumnMismatch)
            .attach_printable(format!("{} columns in the format, {} names given", reader.len(), colnames.len())));
    }

    let col_iter = reader.columns().iter().zip(colnames.iter())
        .filter_map(|(c, n)| {
            c.kind().polars_dtype().map(|dt| Field::new(n.as_ref(), dt))
        });
    let schema = Schema::from_iter(col_iter);

    let rows: Vec<Row> = table::read_table(f, reader)?
        .into_iter()
        .map(|values| Row::new(values.into_iter().map(AnyValue::from).collect()))
        .collect();

    build_frame(&rows, &schema)
}

fn build_frame(rows: &[Row], schema: &Schema) -> TableResult<DataFrame> {
    DataFrame::from_rows_and_schema(rows, schema)
        .change_context(TableError::BuildFailed)
        .attach_printable_lazy(|| format!("{} rows, {} columns", rows.len(), schema.len()))
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use super::*;
    use polars::prelude::*;
    use stringreader::StringReader;

    #[test]
    fn test_to_dataframe() -> TableResult<()> {
        let table = StringReader::new("Alpha 1234  9.5\nBeta  -678 -1.5");
        let table = BufReader::new(table);
        let reader = FortReader::parse("A5,1X,I4,1X,F4.1").unwrap();
        let df = read_to_dataframe(table, &reader, &["Name", "ID", "Score"])?;

        // Can't use the df! macro because it makes the integer column an i32 instead of i64
        let ex_schema = Schema::from_iter([
            Field::new("Name", DataType::Utf8),
            Field::new("ID", DataType::Int64),
            Field::new("Score", DataType::Float64),
        ]);

        let ex_rows = vec![
            Row::new(vec![AnyValue::Utf8Owned("Alpha".into()), AnyValue::Int64(1234), AnyValue::Float64(9.5)]),
            Row::new(vec![AnyValue::Utf8Owned("Beta".into()), AnyValue::Int64(-678), AnyValue::Float64(-1.5)]),
        ];

        let expected = DataFrame::from_rows_and_schema(&ex_rows, &ex_schema).unwrap();
        assert_eq!(df.column("Name").unwrap(), expected.column("Name").unwrap());
        assert_eq!(df.column("ID").unwrap(), expected.column("ID").unwrap());
        assert_eq!(df.column("Score").unwrap(), expected.column("Score").unwrap());
        Ok(())
    }

    #[test]
    fn test_wrong_colnames() {
        let table = BufReader::new(StringReader::new("Alpha 1234  9.5"));
        let reader = FortReader::parse("A5,1X,I4,1X,F4.1").unwrap();
        let err = read_to_dataframe(table, &reader, &["Name", "ID"]).unwrap_err();
        assert_eq!(err.current_context(), &TableError::ColumnMismatch);
    }

    #[test]
    fn test_build_failure() {
        let schema = Schema::from_iter([Field::new("ID", DataType::Int64)]);
        let rows = vec![Row::new(vec![AnyValue::Utf8Owned("abc".into())])];
        let err = build_frame(&rows, &schema).unwrap_err();
        assert_eq!(err.current_context(), &TableError::BuildFailed);
        assert!(err.downcast_ref::<PolarsError>().is_some(), "Report should carry the Polars error");
    }

    #[test]
    fn test_malformed_line() {
        let table = BufReader::new(StringReader::new("Alpha 1234  9.5\nBeta  -6x8 -1.5"));
        let reader = FortReader::parse("A5,1X,I4,1X,F4.1").unwrap();
        let err = read_to_dataframe(table, &reader, &["Name", "ID", "Score"]).unwrap_err();
        assert_eq!(err.current_context(), &TableError::MalformedLine);
    }
}
