//! Excel export of the base table.
//!
//! Sheet layout:
//!
//! ```text
//!                          | roi-stats.cpu0.L1I | ... | roi-stats.cpu0.ipc-cumulative
//!                          | load               | ... | -
//!                          | miss               | ... | -
//! prefetch | suite | trace |                    |     |
//! FDIP     | srv   | t1    | 4                  | ... | 2
//! ```

use crate::parser::schema::Scalar;
use crate::table::{FlatTable, COLUMN_LEVELS};
use crate::utils::config::ROW_LEVEL_NAMES;
use crate::utils::error::OutputError;
use log::debug;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

const SHEET_NAME: &str = "stats";

/// Render the base table as an in-memory .xlsx file
pub fn render_workbook(table: &FlatTable) -> Result<Vec<u8>, OutputError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let bold = Format::new().set_bold();
    let index_columns = ROW_LEVEL_NAMES.len();

    // Column header, one row per column level
    for (j, column) in table.columns().enumerate() {
        let col = to_col(index_columns + j)?;
        for (level, segment) in column.iter().enumerate() {
            worksheet.write_string_with_format(to_row(level)?, col, segment.label(), &bold)?;
        }
    }

    // Index names under the column header
    let names_row = to_row(COLUMN_LEVELS)?;
    for (i, name) in ROW_LEVEL_NAMES.iter().enumerate() {
        worksheet.write_string_with_format(names_row, to_col(i)?, *name, &bold)?;
    }

    let columns: Vec<_> = table.columns().collect();
    for (r, row) in table.rows().enumerate() {
        let sheet_row = to_row(COLUMN_LEVELS + 1 + r)?;
        worksheet.write_string(sheet_row, 0, row.prefetcher.as_str())?;
        worksheet.write_string(sheet_row, 1, row.suite.as_str())?;
        worksheet.write_string(sheet_row, 2, row.trace.as_str())?;

        for (j, column) in columns.iter().enumerate() {
            if let Some(value) = table.get(row, column) {
                write_scalar(worksheet, sheet_row, to_col(index_columns + j)?, value)?;
            }
        }
    }

    debug!(
        "Workbook holds {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );

    Ok(workbook.save_to_buffer()?)
}

fn write_scalar(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Scalar,
) -> Result<(), OutputError> {
    match value {
        Scalar::Number(n) if n.is_finite() => {
            worksheet.write_number(row, col, *n)?;
        }
        Scalar::Number(n) => {
            worksheet.write_string(row, col, n.to_string())?;
        }
        Scalar::Text(text) => {
            worksheet.write_string(row, col, text.as_str())?;
        }
        Scalar::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        Scalar::Null => {}
    }
    Ok(())
}

fn to_row(index: usize) -> Result<u32, OutputError> {
    u32::try_from(index).map_err(|_| OutputError::TableTooLarge(format!("row {}", index)))
}

fn to_col(index: usize) -> Result<u16, OutputError> {
    u16::try_from(index).map_err(|_| OutputError::TableTooLarge(format!("column {}", index)))
}
