use crate::model::ReportError;
use crate::report::{COLUMNS, ReportRow};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes the header and one record per row; undefined values are empty cells.
pub fn write_csv<W: Write>(writer: W, rows: &[ReportRow]) -> Result<(), ReportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for row in rows {
        csv_writer.write_record(row.cells())?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, rows: &[ReportRow]) -> Result<(), ReportError> {
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), rows)?;
    info!("CSV sheet written: {} ({} rows)", path.display(), rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_rows;

    #[test]
    fn writes_header_and_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &sample_rows()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Ticker,Name,Last Price,EMA Period Max Contacts"));
        assert_eq!(
            lines[1],
            "AI.PA,Air Liquide,171.46,80,165.00,Trend,3.91,1.23,240,180.00,,-4.75,"
        );
        assert_eq!(lines[2], "NEW.PA,<New> & Co,10.00,,,,,,,,,,");
    }

    #[test]
    fn empty_report_still_has_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().lines().count(), 1);
    }
}
