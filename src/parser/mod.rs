pub mod chart_parser;
pub mod roster_table;

pub use chart_parser::{ChartParser, YahooChartParser};
pub use roster_table::{HtmlRosterParser, RosterParser};
