// Ticker roster loading (CSV, XLSX or HTML table)
use crate::model::{ParserError, RosterError, TickerEntry};
use crate::normalizer::normalize_all;
use crate::parser::{HtmlRosterParser, RosterParser};
use calamine::{Reader, Xlsx};
use std::fs;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::info;

/// Loads the roster file, picking the format from its extension, and
/// returns the normalized entries in file order.
pub fn load_roster(path: &Path) -> Result<Vec<TickerEntry>, RosterError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let raw = match extension.as_str() {
        "csv" => {
            let file = fs::File::open(path).map_err(|source| RosterError::Io {
                path: path.display().to_string(),
                source,
            })?;
            parse_csv_roster(file)?
        }
        "xlsx" => {
            let file = fs::File::open(path).map_err(|source| RosterError::Io {
                path: path.display().to_string(),
                source,
            })?;
            parse_xlsx_roster(BufReader::new(file))?
        }
        "html" | "htm" => {
            let html = fs::read_to_string(path).map_err(|source| RosterError::Io {
                path: path.display().to_string(),
                source,
            })?;
            HtmlRosterParser::new().parse(&html)?
        }
        other => return Err(RosterError::UnsupportedFormat(other.to_string())),
    };

    let total = raw.len();
    let roster = normalize_all(raw);
    info!(
        "Roster {}: {} rows, {} usable tickers",
        path.display(),
        total,
        roster.len()
    );

    if roster.is_empty() {
        return Err(RosterError::Empty);
    }
    Ok(roster)
}

/// Reads `Ticker` and `Name` columns (header match is case-insensitive).
pub fn parse_csv_roster<R: Read>(reader: R) -> Result<Vec<TickerEntry>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let ticker_idx = column_index(headers.iter(), "ticker")?;
    let name_idx = column_index(headers.iter(), "name")?;

    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        entries.push(TickerEntry::new(
            record.get(ticker_idx).unwrap_or_default(),
            record.get(name_idx).unwrap_or_default(),
        ));
    }
    Ok(entries)
}

/// Reads the first worksheet; the first row holds the headers.
pub fn parse_xlsx_roster<RS: Read + Seek>(reader: RS) -> Result<Vec<TickerEntry>, RosterError> {
    let mut workbook: Xlsx<RS> = Xlsx::new(reader)?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(ParserError::MissingField("worksheet".to_string()).into());
    };
    let range = workbook.worksheet_range(&sheet)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|r| r.iter().map(|c| c.to_string().trim().to_string()).collect())
        .unwrap_or_default();
    let ticker_idx = column_index(headers.iter().map(String::as_str), "ticker")?;
    let name_idx = column_index(headers.iter().map(String::as_str), "name")?;

    let cell = |row: &[calamine::Data], idx: usize| {
        row.get(idx).map(|c| c.to_string()).unwrap_or_default()
    };
    Ok(rows
        .map(|row| TickerEntry::new(cell(row, ticker_idx), cell(row, name_idx)))
        .collect())
}

/// Position of the header matching `wanted`, ignoring ASCII case.
fn column_index<'a>(
    mut headers: impl Iterator<Item = &'a str>,
    wanted: &str,
) -> Result<usize, RosterError> {
    headers
        .position(|h| h.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ParserError::MissingField(wanted.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_roster_reads_named_columns() {
        let data = "Name,Ticker,Sector\nAir Liquide,AI.PA,Chemicals\nLVMH,MC.PA\n,OR.PA,Cosmetics\n";
        let entries = parse_csv_roster(data.as_bytes()).unwrap();
        assert_eq!(
            entries,
            vec![
                TickerEntry::new("AI.PA", "Air Liquide"),
                TickerEntry::new("MC.PA", "LVMH"),
                TickerEntry::new("OR.PA", ""),
            ]
        );
    }

    #[test]
    fn csv_roster_requires_ticker_column() {
        let data = "Symbol,Name\nAI.PA,Air Liquide\n";
        assert!(matches!(
            parse_csv_roster(data.as_bytes()),
            Err(RosterError::Parser(_))
        ));
    }

    fn xlsx_bytes(rows: &[[&str; 3]]) -> Vec<u8> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    sheet.write_string(r as u32, c as u16, *value).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn xlsx_roster_reads_named_columns() {
        let bytes = xlsx_bytes(&[
            ["NAME", "Sector", "TICKER"],
            ["Air Liquide", "Chemicals", "AI.PA"],
            ["LVMH", "", "MC.PA"],
            ["", "Cosmetics", "OR.PA"],
        ]);
        let entries = parse_xlsx_roster(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(
            entries,
            vec![
                TickerEntry::new("AI.PA", "Air Liquide"),
                TickerEntry::new("MC.PA", "LVMH"),
                TickerEntry::new("OR.PA", ""),
            ]
        );
    }

    #[test]
    fn xlsx_roster_requires_name_column() {
        let bytes = xlsx_bytes(&[["Ticker", "Company", "Sector"], ["AI.PA", "Air Liquide", ""]]);
        assert!(matches!(
            parse_xlsx_roster(std::io::Cursor::new(bytes)),
            Err(RosterError::Parser(ParserError::MissingField(f))) if f == "name"
        ));
    }

    #[test]
    fn xlsx_roster_file_is_loaded_and_normalized() {
        let path = std::env::temp_dir().join(format!("ema-contact-roster-{}.xlsx", std::process::id()));
        let bytes = xlsx_bytes(&[
            ["Ticker", "Name", ""],
            [" ai.pa ", "Air Liquide", ""],
            ["AI.PA", "Duplicate", ""],
            ["MC.PA", "LVMH", ""],
        ]);
        fs::write(&path, bytes).unwrap();
        let roster = load_roster(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(
            roster,
            vec![
                TickerEntry::new("AI.PA", "Air Liquide"),
                TickerEntry::new("MC.PA", "LVMH"),
            ]
        );
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        assert!(matches!(
            load_roster(Path::new("tickers.ods")),
            Err(RosterError::UnsupportedFormat(ext)) if ext == "ods"
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_roster(Path::new("/nonexistent/tickers.csv")),
            Err(RosterError::Io { .. })
        ));
    }
}
