use crate::model::StorageError;
use crate::report::ReportRow;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::path::Path;
use tracing::info;

/// A single-sheet SQLite export: the `ema_analysis` table is rebuilt on
/// every run, so the file only ever holds the latest report.
pub struct SqliteSheet {
    conn: Connection,
}

impl SqliteSheet {
    /// Opens (or creates) the database file.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        Ok(Self { conn })
    }

    /// Drops previous contents and writes `rows` in order in one transaction.
    pub fn replace_rows(
        &self,
        rows: &[ReportRow],
        generated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute_batch(
            "
            DROP TABLE IF EXISTS ema_analysis;
            DROP TABLE IF EXISTS run_info;

            CREATE TABLE ema_analysis (
                position INTEGER PRIMARY KEY,
                ticker TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                last_price REAL NOT NULL,
                ema_period_max_contacts INTEGER,
                ema_max_contacts REAL,
                trend_max_contacts INTEGER,
                distance_pct_max_contacts REAL,
                z_score_max_contacts REAL,
                ema_period_long_term INTEGER,
                ema_long_term REAL,
                trend_long_term INTEGER,
                distance_pct_long_term REAL,
                z_score_long_term REAL
            );

            CREATE TABLE run_info (
                generated_at TEXT NOT NULL,
                row_count INTEGER NOT NULL
            );
            ",
        )?;
        Self::insert_all(&tx, rows, generated_at)?;
        tx.commit()?;

        info!("SQLite sheet updated with {} rows", rows.len());
        Ok(())
    }

    fn insert_all(
        conn: &Connection,
        rows: &[ReportRow],
        generated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(
            "INSERT INTO ema_analysis (
                position, ticker, name, last_price,
                ema_period_max_contacts, ema_max_contacts, trend_max_contacts,
                distance_pct_max_contacts, z_score_max_contacts,
                ema_period_long_term, ema_long_term, trend_long_term,
                distance_pct_long_term, z_score_long_term
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        )?;

        for (position, row) in rows.iter().enumerate() {
            let best = &row.max_contacts;
            let long = &row.long_term;
            stmt.execute(params![
                position as i64,
                &row.ticker,
                &row.name,
                round2(Some(row.last_price)),
                best.period.map(|p| p as i64),
                round2(best.ema),
                best.trend,
                round2(best.distance_pct),
                round2(best.z_score),
                long.period.map(|p| p as i64),
                round2(long.ema),
                long.trend,
                round2(long.distance_pct),
                round2(long.z_score),
            ])?;
        }

        conn.execute(
            "INSERT INTO run_info (generated_at, row_count) VALUES (?1, ?2)",
            params![generated_at, rows.len() as i64],
        )?;
        Ok(())
    }
}

#[cfg(test)]
impl SqliteSheet {
    fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Tickers in report order.
    fn tickers(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT ticker FROM ema_analysis ORDER BY position ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tickers = Vec::new();
        for ticker in rows {
            tickers.push(ticker?);
        }
        Ok(tickers)
    }
}

fn round2(value: Option<f64>) -> Option<f64> {
    value.map(crate::utils::round2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_rows;
    use chrono::TimeZone;

    fn sheet() -> SqliteSheet {
        SqliteSheet::from_connection(Connection::open_in_memory().unwrap())
    }

    #[test]
    fn stores_rows_in_order_with_nulls() {
        let sheet = sheet();
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        sheet.replace_rows(&sample_rows(), at).unwrap();

        assert_eq!(sheet.tickers().unwrap(), vec!["AI.PA", "NEW.PA"]);

        let (price, trend, z_long): (f64, Option<bool>, Option<f64>) = sheet
            .conn
            .query_row(
                "SELECT last_price, trend_max_contacts, z_score_long_term FROM ema_analysis WHERE ticker = 'AI.PA'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(price, 171.46);
        assert_eq!(trend, Some(true));
        assert_eq!(z_long, None);

        let period: Option<i64> = sheet
            .conn
            .query_row(
                "SELECT ema_period_long_term FROM ema_analysis WHERE ticker = 'NEW.PA'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(period, None);

        let stored_at: DateTime<Utc> = sheet
            .conn
            .query_row("SELECT generated_at FROM run_info", [], |row| row.get(0))
            .unwrap();
        assert_eq!(stored_at, at);
    }

    #[test]
    fn rerun_replaces_previous_rows() {
        let sheet = sheet();
        let at = Utc::now();
        sheet.replace_rows(&sample_rows(), at).unwrap();
        sheet.replace_rows(&sample_rows()[1..], at).unwrap();
        assert_eq!(sheet.tickers().unwrap(), vec!["NEW.PA"]);
    }
}
