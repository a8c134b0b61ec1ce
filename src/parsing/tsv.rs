use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::parsing::{Cell, ParseError, RawRow, RawTable};
use crate::utils::validation::check_row_limit;

/// Read a delimited text file (CSV or TSV) into raw rows
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened, or
/// `ParseError::Csv` if the content is not valid delimited text.
pub fn read_delimited_file(path: &Path, delimiter: u8) -> Result<RawTable, ParseError> {
    let file = std::fs::File::open(path)?;
    read_delimited(file, delimiter)
}

/// Read delimited text from any reader
///
/// Rows may have differing field counts. Row numbers are the 1-based line
/// on which each record starts, so blank lines keep their place in the
/// numbering.
///
/// # Errors
///
/// Returns `ParseError::Io` if the input cannot be read, `ParseError::Csv`
/// on malformed input, or `ParseError::TooManyRows` if the row limit is
/// exceeded.
pub fn read_delimited<R: Read>(mut reader: R, delimiter: u8) -> Result<RawTable, ParseError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let line_starts = line_starts(&data);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_slice());

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;

        if check_row_limit(rows.len()).is_some() {
            return Err(ParseError::TooManyRows(rows.len() + 1));
        }

        let number = record
            .position()
            .and_then(|p| usize::try_from(p.byte()).ok())
            .map_or(i + 1, |offset| record_line(&data, &line_starts, offset));

        let cells = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();

        rows.push(RawRow { number, cells });
    }

    Ok(RawTable { rows })
}

/// Byte offsets at which each line begins
fn line_starts(data: &[u8]) -> Vec<usize> {
    std::iter::once(0)
        .chain(
            data.iter()
                .enumerate()
                .filter(|&(_, &b)| b == b'\n')
                .map(|(i, _)| i + 1),
        )
        .collect()
}

/// 1-based line of the record whose parse began at `offset`.
///
/// The reader reports the offset where it started reading, which lies
/// before any blank lines it skipped on the way to the record.
fn record_line(data: &[u8], line_starts: &[usize], offset: usize) -> usize {
    let start = data
        .get(offset..)
        .and_then(|rest| rest.iter().position(|&b| b != b'\n' && b != b'\r'))
        .map_or(offset, |skipped| offset + skipped);
    line_starts.partition_point(|&line_start| line_start <= start)
}
