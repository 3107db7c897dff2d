use crate::model::ReportError;
use crate::report::{COLUMNS, ReportRow};
use crate::utils::escape_html;
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::info;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ccc; padding: 4px 8px; text-align: right; }
td:nth-child(2), td:nth-child(1) { text-align: left; }
th { background: #f0f0f0; cursor: pointer; user-select: none; }
#search { margin-bottom: 1em; padding: 4px; width: 20em; }
"#;

// Sorts on header click (numbers numerically, empty cells last) and filters
// rows by the search box.
const SCRIPT: &str = r#"
(function () {
  var table = document.getElementById('results');
  var body = table.tBodies[0];
  var dir = {};
  function key(cell) {
    var text = cell.textContent.trim();
    var num = parseFloat(text);
    return { empty: text === '', num: isNaN(num) ? null : num, text: text.toLowerCase() };
  }
  Array.prototype.forEach.call(table.tHead.rows[0].cells, function (th, idx) {
    th.addEventListener('click', function () {
      dir[idx] = dir[idx] === 1 ? -1 : 1;
      var rows = Array.prototype.slice.call(body.rows);
      rows.sort(function (a, b) {
        var ka = key(a.cells[idx]), kb = key(b.cells[idx]);
        if (ka.empty !== kb.empty) { return ka.empty ? 1 : -1; }
        if (ka.num !== null && kb.num !== null) { return (ka.num - kb.num) * dir[idx]; }
        return ka.text.localeCompare(kb.text) * dir[idx];
      });
      rows.forEach(function (row) { body.appendChild(row); });
    });
  });
  document.getElementById('search').addEventListener('input', function (e) {
    var needle = e.target.value.toLowerCase();
    Array.prototype.forEach.call(body.rows, function (row) {
      row.style.display = row.textContent.toLowerCase().indexOf(needle) === -1 ? 'none' : '';
    });
  });
})();
"#;

/// Renders a standalone page with a sortable, searchable results table.
pub fn render_html(rows: &[ReportRow], generated_at: DateTime<Utc>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>EMA Analysis Results</title>\n");
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n<h1>EMA Analysis Results</h1>\n");
    html.push_str(&format!(
        "<p>Generated {} &middot; {} tickers</p>\n",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        rows.len()
    ));
    html.push_str("<input id=\"search\" type=\"search\" placeholder=\"Search...\">\n");
    html.push_str("<table id=\"results\">\n<thead>\n<tr>");
    for column in COLUMNS {
        html.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row.cells() {
            html.push_str(&format!("<td>{}</td>", escape_html(&cell)));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html.push_str(&format!("<script>{}</script>\n", SCRIPT));
    html.push_str("</body>\n</html>\n");
    html
}

pub fn write_html_file(
    path: &Path,
    rows: &[ReportRow],
    generated_at: DateTime<Utc>,
) -> Result<(), ReportError> {
    std::fs::write(path, render_html(rows, generated_at))?;
    info!("HTML report written: {} ({} rows)", path.display(), rows.len());
    Ok(())
}
