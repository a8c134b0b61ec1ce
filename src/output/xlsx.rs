use rust_xlsxwriter::{Format, FormatAlign, Workbook, XlsxError};

use crate::output::{ResultTable, HEADERS};
use crate::utils::validation::count_to_f64;

/// Name of the single worksheet in the result workbook
pub const RESULTS_SHEET: &str = "Results";

/// Extra width added to the longest cell of each column
const COLUMN_PADDING: usize = 2;

/// Render the result table as an xlsx workbook.
///
/// Headers are bold and centered; data cells are left aligned. Every cell
/// is vertically centered and each column is as wide as its longest text
/// plus padding.
///
/// # Errors
///
/// Returns `XlsxError` if the workbook cannot be assembled.
pub fn render(table: &ResultTable) -> Result<Vec<u8>, XlsxError> {
    let header_format = Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    let body_format = Format::new()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(RESULTS_SHEET)?;

    for (col, title) in (0u16..).zip(HEADERS) {
        sheet.write_string_with_format(0, col, title, &header_format)?;
    }

    for (row_num, row) in (1u32..).zip(&table.rows) {
        sheet.write_string_with_format(row_num, 0, &row.signal_name, &body_format)?;
        sheet.write_number_with_format(row_num, 1, row.mass, &body_format)?;
        sheet.write_string_with_format(row_num, 2, &row.lipid_names, &body_format)?;
        sheet.write_string_with_format(row_num, 3, &row.confidences, &body_format)?;
    }

    for (col, width) in (0u16..).zip(column_widths(table)) {
        sheet.set_column_width(col, count_to_f64(width))?;
    }

    workbook.save_to_buffer()
}

/// Character width of the longest cell in each column, plus padding
fn column_widths(table: &ResultTable) -> [usize; 4] {
    let mut widths = [0usize; 4];
    for row in table.text_rows() {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }
    widths.map(|w| w + COLUMN_PADDING)
}
