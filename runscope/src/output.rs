//! Rendering of API records for the terminal: aligned tables and key/value
//! blocks, or pretty JSON.

use std::fmt::Write;

use runscope_lib::format_timestamp_display;
use serde::Serialize;
use serde_json::{Map, Value};

/// Widest a table cell may get before it is cut.
const MAX_CELL: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

/// Writes command results to stdout in the selected format.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    format: OutputFormat,
    use_utc: bool,
}

impl Printer {
    pub fn new(format: OutputFormat, use_utc: bool) -> Self {
        Self { format, use_utc }
    }

    pub fn print<T: Serialize>(&self, value: &T) -> Result<(), String> {
        let value = serde_json::to_value(value).map_err(|e| e.to_string())?;
        println!("{}", self.render(&value)?);
        Ok(())
    }

    pub fn render(&self, value: &Value) -> Result<String, String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            OutputFormat::Plain => Ok(self.plain(value)),
        }
    }

    fn plain(&self, value: &Value) -> String {
        let mut out = String::new();
        match value {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                self.table(items, &mut out)
            }
            _ => self.block(value, &mut out, 0),
        }
        out.trim_end().to_string()
    }

    /// Arrays of records: one row per record, scalar fields only.
    fn table(&self, rows: &[Value], out: &mut String) {
        let columns = scalar_columns(rows);
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|col| {
                        row.get(col)
                            .map(|v| truncate(&self.scalar(col, v), MAX_CELL))
                            .unwrap_or_else(|| "-".to_string())
                    })
                    .collect()
            })
            .collect();
        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                cells
                    .iter()
                    .map(|r| r[i].chars().count())
                    .chain(std::iter::once(col.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let line = |values: &[String]| -> String {
            values
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!("{:<width$}", v, width = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };
        let _ = writeln!(out, "{}", line(&columns));
        let _ = writeln!(out, "{}", line(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>()));
        for row in &cells {
            let _ = writeln!(out, "{}", line(row));
        }
    }

    fn block(&self, value: &Value, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        match value {
            Value::Object(map) => self.fields(map, out, depth),
            Value::Array(items) if items.is_empty() => {
                let _ = writeln!(out, "{}(none)", pad);
            }
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(map) => {
                            let _ = writeln!(out, "{}-", pad);
                            self.fields(map, out, depth + 1);
                        }
                        other => {
                            let _ = writeln!(out, "{}- {}", pad, self.scalar("", other));
                        }
                    }
                }
            }
            other => {
                let _ = writeln!(out, "{}{}", pad, self.scalar("", other));
            }
        }
    }

    fn fields(&self, map: &Map<String, Value>, out: &mut String, depth: usize) {
        let pad = "  ".repeat(depth);
        for (key, val) in map {
            match val {
                Value::Object(m) if m.is_empty() => {}
                Value::Array(a) if a.is_empty() => {}
                Value::Object(_) | Value::Array(_) => {
                    let _ = writeln!(out, "{}{}:", pad, key);
                    self.block(val, out, depth + 1);
                }
                _ => {
                    let _ = writeln!(out, "{}{}: {}", pad, key, self.scalar(key, val));
                }
            }
        }
    }

    fn scalar(&self, key: &str, value: &Value) -> String {
        match value {
            Value::Null => "-".to_string(),
            Value::String(s) => s.clone(),
            Value::Number(n) if is_timestamp_key(key) => n
                .as_f64()
                .map(|secs| format_timestamp_display(secs, self.use_utc))
                .unwrap_or_else(|| n.to_string()),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Array(a) => format!("[{}]", a.len()),
            Value::Object(_) => "{..}".to_string(),
        }
    }
}

fn is_timestamp_key(key: &str) -> bool {
    key.ends_with("_at") || key == "last_run"
}

/// Column names in first-seen order, skipping fields that only ever hold
/// nested records or lists.
fn scalar_columns(rows: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(map) = row {
            for (key, val) in map {
                if !(val.is_object() || val.is_array()) && !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

fn truncate(s: &str, max: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max {
        s
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
