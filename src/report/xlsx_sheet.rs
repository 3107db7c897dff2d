use crate::model::ReportError;
use crate::report::{COLUMNS, EmaColumns, ReportRow};
use crate::utils::round2;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::info;

const SHEET_NAME: &str = "EMA Analysis";

fn write_optional(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<f64>,
) -> Result<(), XlsxError> {
    // Undefined values stay blank cells.
    if let Some(v) = value {
        sheet.write_number(row, col, round2(v))?;
    }
    Ok(())
}

fn write_ema_columns(
    sheet: &mut Worksheet,
    row: u32,
    first_col: u16,
    cols: &EmaColumns,
) -> Result<(), XlsxError> {
    write_optional(sheet, row, first_col, cols.period.map(|p| p as f64))?;
    write_optional(sheet, row, first_col + 1, cols.ema)?;
    if cols.trend == Some(true) {
        sheet.write_string(row, first_col + 2, "Trend")?;
    }
    write_optional(sheet, row, first_col + 3, cols.distance_pct)?;
    write_optional(sheet, row, first_col + 4, cols.z_score)?;
    Ok(())
}

/// Builds the workbook in memory: one sheet, bold header in `COLUMNS` order,
/// numbers stored as numeric cells rounded to 2 decimals.
pub fn render_xlsx(rows: &[ReportRow]) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }

    for (i, report_row) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &report_row.ticker)?;
        sheet.write_string(row, 1, &report_row.name)?;
        sheet.write_number(row, 2, round2(report_row.last_price))?;
        write_ema_columns(sheet, row, 3, &report_row.max_contacts)?;
        write_ema_columns(sheet, row, 8, &report_row.long_term)?;
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn write_xlsx_file(path: &Path, rows: &[ReportRow]) -> Result<(), ReportError> {
    std::fs::write(path, render_xlsx(rows)?)?;
    info!("XLSX sheet written: {} ({} rows)", path.display(), rows.len());
    Ok(())
}
