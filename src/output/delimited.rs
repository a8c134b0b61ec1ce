use csv::WriterBuilder;

use crate::output::{OutputError, ResultTable};

/// Render the result table as delimited text
///
/// # Errors
///
/// Returns `OutputError::Csv` if a record cannot be encoded, or
/// `OutputError::Io` if the buffer cannot be flushed.
pub fn render(table: &ResultTable, delimiter: u8) -> Result<Vec<u8>, OutputError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    for record in table.text_rows() {
        writer.write_record(&record)?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| OutputError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ResultRow;

    #[test]
    fn test_render_csv_quotes_embedded_commas() {
        let table = ResultTable {
            rows: vec![ResultRow {
                signal_name: "Sig, 1".to_string(),
                mass: 760.5855,
                lipid_names: "PC 34:1 > PE 37:1".to_string(),
                confidences: "1.20 > -0.40".to_string(),
            }],
        };

        let text = String::from_utf8(render(&table, b',').unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Signal name,Mass,Lipid name,Confidence");
        assert_eq!(lines[1], "\"Sig, 1\",760.5855,PC 34:1 > PE 37:1,1.20 > -0.40");
    }
}
