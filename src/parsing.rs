//! Convert the text of one column to a value.
//!
//! All of these take the raw slice of the line; whitespace padding around a number is
//! allowed, whitespace inside it is not.

/// Return the characters of `line` in columns `start..stop`.
///
/// Columns count characters, not bytes. Columns past the end of the line are simply
/// missing from the result, so a short line gives a short (or empty) slice.
pub(crate) fn column_slice(line: &str, start: usize, stop: usize) -> &str {
    if line.is_ascii() {
        let n = line.len();
        return &line[start.min(n)..stop.min(n)];
    }

    let byte_offset = |col: usize| {
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    };
    &line[byte_offset(start)..byte_offset(stop)]
}

/// Integers are read as `i64`; a value outside its range is an error rather than wrapping.
pub(crate) fn parse_integer(s: &str) -> Result<i64, String> {
    s.trim().parse::<i64>().map_err(|e| e.to_string())
}

pub(crate) fn parse_real(s: &str) -> Result<f64, String> {
    s.trim().parse::<f64>().map_err(|e| e.to_string())
}

pub(crate) fn parse_char(s: &str, trim: bool) -> String {
    if trim {
        s.trim().to_owned()
    } else {
        s.to_owned()
    }
}
