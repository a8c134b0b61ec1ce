use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use crate::parsing::{Cell, ParseError, RawRow, RawTable};

/// Read one worksheet of a spreadsheet workbook
///
/// When `sheet` is `None` the first worksheet is used.
///
/// # Errors
///
/// Returns `ParseError::Workbook` if the workbook cannot be opened or read,
/// `ParseError::MissingSheet` if the named sheet does not exist, or
/// `ParseError::NoSheets` if the workbook is empty.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<RawTable, ParseError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names();

    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(ParseError::MissingSheet(name.to_string()));
            }
            name.to_string()
        }
        None => sheet_names.first().cloned().ok_or(ParseError::NoSheets)?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;

    // The range starts at the first used cell, not at A1
    let first_row = range
        .start()
        .map_or(0, |(row, _)| usize::try_from(row).unwrap_or(usize::MAX));

    let rows: Vec<RawRow> = range
        .rows()
        .enumerate()
        .map(|(i, cells)| RawRow {
            number: first_row.saturating_add(i + 1),
            cells: cells.iter().map(convert_cell).collect(),
        })
        .collect();

    debug!(
        "Read {} rows from sheet '{}' of {}",
        rows.len(),
        sheet_name,
        path.display()
    );

    Ok(RawTable { rows })
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Float(f) => Cell::Number(*f),
        #[allow(clippy::cast_precision_loss)]
        Data::Int(i) => Cell::Number(*i as f64),
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ObservedSignal, ReferenceEntry};
    use crate::parsing::{load_references, load_signals, TableLayout};
    use rust_xlsxwriter::Workbook;

    fn write_fixture(path: &Path) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Feuil1").unwrap();
        sheet.write_string(0, 0, "Export").unwrap();
        sheet.write_string(1, 0, "Date").unwrap();
        sheet.write_string(1, 1, "05-10-2023").unwrap();
        sheet.write_string(4, 0, "Lipid name").unwrap();
        sheet.write_string(4, 1, "Exact Mass").unwrap();
        sheet.write_string(4, 3, "Signal name").unwrap();
        sheet.write_string(4, 4, "Mass").unwrap();
        sheet.write_string(5, 0, "LipidA").unwrap();
        sheet.write_number(5, 1, 760.5851).unwrap();
        sheet.write_string(6, 0, "LipidB").unwrap();
        sheet.write_string(6, 1, "100,0").unwrap();
        sheet.write_string(5, 3, "Sig1").unwrap();
        sheet.write_number(5, 4, 760.5855).unwrap();

        let other = workbook.add_worksheet();
        other.set_name("Notes").unwrap();
        other.write_string(0, 0, "nothing here").unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_load_both_tables_from_one_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.xlsx");
        write_fixture(&path);

        let refs = load_references(&path, &TableLayout::references()).unwrap();
        assert_eq!(
            refs,
            vec![
                ReferenceEntry::new("LipidA", 760.5851),
                ReferenceEntry::new("LipidB", 100.0),
            ]
        );

        let signals = load_signals(&path, &TableLayout::signals()).unwrap();
        assert_eq!(signals, vec![ObservedSignal::new("Sig1", 760.5855)]);
    }

    #[test]
    fn test_named_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.xlsx");
        write_fixture(&path);

        let table = read_sheet(&path, Some("Feuil1")).unwrap();
        assert_eq!(table.rows[0].number, 1);
        assert_eq!(table.rows[0].cells[0], Cell::Text("Export".to_string()));

        assert!(matches!(
            read_sheet(&path, Some("Sheet9")),
            Err(ParseError::MissingSheet(name)) if name == "Sheet9"
        ));
    }
}
