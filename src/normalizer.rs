use crate::model::TickerEntry;
use std::collections::HashSet;
use tracing::warn;

/// Trims fields, upper-cases symbols, drops incomplete rows and keeps the
/// first occurrence of each symbol.
pub fn normalize_all(entries: Vec<TickerEntry>) -> Vec<TickerEntry> {
    let mut seen = HashSet::new();
    let mut roster = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(entry) = normalize_entry(entry) else {
            continue;
        };
        if !seen.insert(entry.symbol.clone()) {
            warn!("Duplicate ticker {} ignored", entry.symbol);
            continue;
        }
        roster.push(entry);
    }

    roster
}

fn normalize_entry(entry: TickerEntry) -> Option<TickerEntry> {
    let symbol = entry.symbol.trim().to_uppercase();
    let name = entry.name.trim().to_string();
    if symbol.is_empty() || name.is_empty() {
        return None;
    }
    Some(TickerEntry { symbol, name })
}
