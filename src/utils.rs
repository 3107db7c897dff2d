// Utility functions
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::Path;

/// Преобразует unix-время (секунды) в `DateTime<Utc>`, если возможно.
pub fn timestamp_from_unix(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Rounds to two decimals, for display only.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Formats an optional number with two decimals; `None` becomes an empty cell.
pub fn fmt2(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", round2(v))).unwrap_or_default()
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Creates the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
