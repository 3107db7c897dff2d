// HTML roster parsing: the first table carrying Ticker and Name headers
use crate::model::{ParserError, TickerEntry};
use scraper::{ElementRef, Html, Selector};

pub trait RosterParser {
    fn parse(&self, html: &str) -> Result<Vec<TickerEntry>, ParserError>;
}

pub struct HtmlRosterParser;

impl HtmlRosterParser {
    pub fn new() -> Self {
        Self
    }
}

fn selector(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::HtmlParseError(e.to_string()))
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

impl RosterParser for HtmlRosterParser {
    fn parse(&self, html: &str) -> Result<Vec<TickerEntry>, ParserError> {
        let document = Html::parse_document(html);

        let table_selector = selector("table")?;
        let row_selector = selector("tr")?;
        let cell_selector = selector("th, td")?;

        for table in document.select(&table_selector) {
            let mut rows = table.select(&row_selector);
            let Some(header) = rows.next() else {
                continue;
            };

            let headers: Vec<String> = header
                .select(&cell_selector)
                .map(|c| cell_text(c).to_lowercase())
                .collect();
            let ticker_idx = headers.iter().position(|h| h == "ticker");
            let name_idx = headers.iter().position(|h| h == "name");
            let (Some(ticker_idx), Some(name_idx)) = (ticker_idx, name_idx) else {
                continue;
            };

            let entries = rows
                .map(|row| {
                    let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();
                    TickerEntry::new(
                        cells.get(ticker_idx).cloned().unwrap_or_default(),
                        cells.get(name_idx).cloned().unwrap_or_default(),
                    )
                })
                .collect();
            return Ok(entries);
        }

        Err(ParserError::MissingField(
            "no table with Ticker and Name columns".to_string(),
        ))
    }
}
