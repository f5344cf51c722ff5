//! Text and JSON rendering of a census result.

use std::fmt::Write as _;
use std::time::UNIX_EPOCH;

use filecensus_scan::ScanResult;
use serde_json::{Value, json};

const COUNT_WIDTH: usize = 10;
const SIZE_WIDTH: usize = 12;
const MIN_DIR_WIDTH: usize = 9;
const MAX_DIR_WIDTH: usize = 80;

/// Format size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Render the Directory / Count / Size table with a Total footer.
pub fn render_table(result: &ScanResult) -> String {
    if result.is_empty() {
        return "No results found\n".to_string();
    }

    let dir_width = result
        .rows
        .iter()
        .map(|row| row.key.display().to_string().chars().count())
        .max()
        .unwrap_or(0)
        .clamp(MIN_DIR_WIDTH, MAX_DIR_WIDTH);
    let rule = "─".repeat(dir_width + COUNT_WIDTH + SIZE_WIDTH + 4);

    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        " {:<dir_width$} {:>COUNT_WIDTH$} {:>SIZE_WIDTH$}",
        "Directory", "Count", "Size"
    );
    let _ = writeln!(out, "{rule}");

    for row in &result.rows {
        let _ = writeln!(
            out,
            " {:<dir_width$} {:>COUNT_WIDTH$} {:>SIZE_WIDTH$}",
            truncate(&row.key.display().to_string(), dir_width),
            row.tally.count,
            format_size(row.tally.bytes)
        );
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        " {:<dir_width$} {:>COUNT_WIDTH$} {:>SIZE_WIDTH$}",
        "Total",
        result.total.count,
        format_size(result.total.bytes)
    );
    let _ = writeln!(out, "{rule}");
    out
}

/// Build the JSON document for `--format json`.
pub fn render_json(result: &ScanResult) -> Value {
    let rows: Vec<Value> = result
        .rows
        .iter()
        .map(|row| {
            json!({
                "directory": row.key.to_string_lossy(),
                "count": row.tally.count,
                "size": row.tally.bytes,
            })
        })
        .collect();

    let errors: Vec<String> = result
        .error
        .iter()
        .flat_map(|err| err.errors().iter().map(ToString::to_string))
        .collect();

    let scanned_at = result
        .scanned_at
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());

    json!({
        "root": result.root_path.to_string_lossy(),
        "scanned_at": scanned_at,
        "rows": rows,
        "total": {
            "count": result.total.count,
            "size": result.total.bytes,
        },
        "scan_duration_ms": result.scan_duration.as_millis() as u64,
        "errors": errors,
    })
}

/// Truncate a string to max length, keeping the tail of long paths.
fn truncate(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(len - max_len + 1).collect();
        format!("…{tail}")
    }
}
