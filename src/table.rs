//! Read many lines, or pick between several layouts.
//!
//! Files written with fixed-column formats often come in more than one flavor (for
//! example a standard and an extended width variant). [`best_match`] scores a line
//! against several readers with [`FortReader::probe`], and [`read_with_fallback`] tries
//! them strictly one after another:
//!
//! ```
//! use fortreader::reader::FortReader;
//! use fortreader::table::best_match;
//!
//! let standard = FortReader::parse("I8,1X,A4,1X,F8.3").unwrap();
//! let extended = FortReader::parse("I10,1X,A8,1X,F8.3").unwrap();
//! let line = "        12 CA        1.500";
//! assert_eq!(best_match(&[standard, extended], line), Some((1, 3)));
//! ```
use std::io::BufRead;

use error_stack::{Report, ResultExt};

use crate::fort_error::{ConvResult, TableError};
use crate::format_specs::FortValue;
use crate::reader::{FortReader, ReadSettings};

/// A type alias for `Result` with an [`error_stack::Report`] of [`TableError`] as the error type.
pub type TableResult<T> = Result<T, Report<TableError>>;

/// Return the index of the reader that converts the most fields of `line`, and that count.
///
/// Ties go to the earliest reader. Returns `None` if `readers` is empty.
pub fn best_match(readers: &[FortReader], line: &str) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for (i, r) in readers.iter().enumerate() {
        let score = r.probe(line);
        match best {
            Some((_, best_score)) if best_score >= score => {},
            _ => best = Some((i, score)),
        }
    }
    best
}

/// Read `line` with `first`, then with each of `rest` in order, until one succeeds.
///
/// Returns the index of the reader that succeeded (0 for `first`, 1 for `rest[0]`, etc.)
/// with its values. If every reader fails, the error from the last one is returned.
pub fn read_with_fallback(first: &FortReader, rest: &[FortReader], line: &str) -> ConvResult<(usize, Vec<FortValue>)> {
    let mut res = first.read(line).map(|v| (0, v));
    for (i, r) in rest.iter().enumerate() {
        if res.is_ok() {
            break;
        }
        res = r.read(line).map(|v| (i + 1, v));
    }
    res
}

/// Read every line of `f` with `reader`, using the reader's own settings.
///
/// This requires a buffered reader positioned so that the next line read is the first
/// row of data. See [`read_table_custom`] for which lines are skipped and which errors
/// are returned.
pub fn read_table<R: BufRead>(f: R, reader: &FortReader) -> TableResult<Vec<Vec<FortValue>>> {
    read_table_custom(f, reader, *reader.settings())
}

/// Read every line of `f` with `reader` and customized settings.
///
/// Blank lines are ignored if `settings` says to skip them, and likewise for lines that
/// fail to convert. Otherwise a line that fails to convert returns a
/// [`TableError::MalformedLine`] with the 1-based line number, the line itself, and the
/// [`ConversionError`](crate::fort_error::ConversionError) attached. I/O errors return a
/// [`TableError::ReadFailed`].
pub fn read_table_custom<R: BufRead>(f: R, reader: &FortReader, settings: ReadSettings) -> TableResult<Vec<Vec<FortValue>>> {
    let mut rows = vec![];
    for (line_idx, line) in f.lines().enumerate() {
        let line_num = line_idx + 1;
        let line = line
            .change_context(TableError::ReadFailed)
            .attach_printable_lazy(|| format!("line {line_num}"))?;

        if settings.skip_blank && line.trim().is_empty() {
            log::trace!("skipping blank line {line_num}");
            continue;
        }

        match reader.read_with(&line, &settings) {
            Ok(values) => rows.push(values),
            Err(e) if settings.skip_malformed => {
                log::trace!("skipping line {line_num}: {e}");
            },
            Err(e) => {
                return Err(Report::new(e)
                    .change_context(TableError::MalformedLine)
                    .attach_printable(format!("line {line_num}: '{line}'")));
            }
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::BufReader;

    use stringreader::StringReader;

    use super::*;
    use crate::fort_error::ConversionError;

    fn psf_readers() -> Vec<FortReader> {
        vec![
            FortReader::parse("I8,1X,A4,1X,A4,1X,A4,1X,A4,1X,A4,1X,2F14.6,I8").unwrap(),
            FortReader::parse("I10,1X,A8,1X,A8,1X,A8,1X,A8,1X,A4,1X,2F14.6,I8").unwrap(),
        ]
    }

    fn standard_line() -> String {
        format!("{:>8} {:<4} {:<4} {:<4} {:<4} {:<4} {:>14.6}{:>14.4}{:>8}",
                1, "U", "1", "ALA", "N", "NH3", -0.3, 14.007, 0)
    }

    fn extended_line() -> String {
        format!("{:>10} {:<8} {:<8} {:<8} {:<8} {:<4} {:>14.6}{:>14.4}{:>8}",
                1, "U", "1", "ALA", "N", "NH3", -0.3, 14.007, 0)
    }

    #[test]
    fn test_best_match() {
        let readers = psf_readers();
        let standard = standard_line();
        let extended = extended_line();
        let (standard, extended) = (standard.as_str(), extended.as_str());
        assert_eq!(best_match(&readers, standard), Some((0, readers[0].len())));
        assert_eq!(best_match(&readers, extended), Some((1, readers[1].len())));
        assert_eq!(best_match(&[], standard), None);
    }

    #[test]
    fn test_best_match_tie() {
        let readers = vec![FortReader::parse("A3").unwrap(), FortReader::parse("A5").unwrap()];
        assert_eq!(best_match(&readers, "anything"), Some((0, 1)), "Ties should go to the first reader");
    }

    #[test]
    fn test_read_with_fallback() {
        let readers = psf_readers();
        let (idx, values) = read_with_fallback(&readers[0], &readers[1..], &extended_line()).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(values[0], FortValue::Integer(1));
        assert_eq!(values[4], FortValue::Char("N".to_owned()));
        assert_eq!(values[6], FortValue::Real(-0.3));

        let err: ConversionError = read_with_fallback(&readers[0], &readers[1..], "garbage").unwrap_err();
        assert_eq!((err.start, err.stop), (0, 10), "Should report the last reader's error");
    }

    #[test]
    fn test_read_table() -> TableResult<()> {
        let table = StringReader::new("Alpha 1234  9.5\n\nBeta  -678 -1.5\n");
        let reader = FortReader::parse("A5,1X,I4,1X,F4.1").unwrap();
        let rows = read_table(BufReader::new(table), &reader)?;
        assert_eq!(rows, vec![
            vec![FortValue::Char("Alpha".to_owned()), FortValue::Integer(1234), FortValue::Real(9.5)],
            vec![FortValue::Char("Beta".to_owned()), FortValue::Integer(-678), FortValue::Real(-1.5)],
        ]);
        Ok(())
    }

    #[test]
    fn test_read_table_malformed() {
        let table = StringReader::new("Alpha 1234  9.5\nBeta  -6x8 -1.5\n");
        let reader = FortReader::parse("A5,1X,I4,1X,F4.1").unwrap();
        let err = read_table(BufReader::new(table), &reader).unwrap_err();
        assert_eq!(err.current_context(), &TableError::MalformedLine);

        let cause = err.downcast_ref::<ConversionError>().expect("Report should carry the conversion error");
        assert_eq!(cause.text, "-6x8");
        assert!(format!("{err:?}").contains("line 2"), "Report should name the line number");
    }

    #[test]
    fn test_read_table_skip_malformed() -> TableResult<()> {
        let table = StringReader::new("Alpha 1234  9.5\nBeta  -6x8 -1.5\n   \nGamma   12  0.5");
        let reader = FortReader::parse("A5,1X,I4,1X,F4.1").unwrap();
        let settings = ReadSettings::default().skip_malformed(true);
        let rows = read_table_custom(BufReader::new(table), &reader, settings)?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0], FortValue::Char("Gamma".to_owned()));
        Ok(())
    }

    #[test]
    fn test_read_table_keep_blank() {
        let table = StringReader::new("Alpha 1234  9.5\n\n");
        let reader = FortReader::parse("A5,1X,I4,1X,F4.1").unwrap();
        let settings = ReadSettings::default().skip_blank(false);
        let err = read_table_custom(BufReader::new(table), &reader, settings).unwrap_err();
        assert_eq!(err.current_context(), &TableError::MalformedLine);
    }
}
