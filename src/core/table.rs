//! CN-002: Delimited tabular text — model, parser, numeric coercion.
//!
//! First row is the header. Fields are comma-separated with RFC-4180-style
//! quoting (`"` wraps a field, `""` escapes a quote). Header lookup is
//! exact and case-sensitive; there is no positional column fallback.

use std::path::Path;

/// An immutable, in-memory table. Every row has exactly as many fields as
/// the header.
#[derive(Debug, Clone)]
pub struct Table {
    /// Logical dataset name (`recipe`, `ingredients`, ...)
    pub name: String,

    /// Header fields, in file order
    pub headers: Vec<String>,

    /// Data rows, in file order
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Index of a column by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Whether the table has a column with this exact header name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate the cells of one column, top to bottom.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| cell(row, idx)))
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fetch one cell, empty string when out of range.
pub fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Parse a delimited file from disk.
pub fn parse_table_file(name: &str, path: &Path) -> Result<Table, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    parse_table(name, &content)
}

/// Parse delimited text. Fails on empty input, an empty header, an
/// unterminated quote, or a row whose field count differs from the header.
pub fn parse_table(name: &str, text: &str) -> Result<Table, String> {
    let mut lines = text
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .enumerate()
        .filter(|(_, l)| !l.is_empty());

    let (_, header_line) = lines.next().ok_or_else(|| format!("{}: empty input", name))?;
    let headers = split_record(header_line).map_err(|e| format!("{}: header: {}", name, e))?;
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(format!("{}: empty header", name));
    }

    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let fields =
            split_record(line).map_err(|e| format!("{}: line {}: {}", name, line_no + 1, e))?;
        if fields.len() != headers.len() {
            return Err(format!(
                "{}: line {}: {} fields, expected {}",
                name,
                line_no + 1,
                fields.len(),
                headers.len()
            ));
        }
        rows.push(fields);
    }

    Ok(Table {
        name: name.to_string(),
        headers,
        rows,
    })
}

/// Split one record into fields, honoring quotes. Quoted newlines are not
/// supported; records are line-based.
fn split_record(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut field));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(field);
    Ok(fields)
}

/// Coerce a cell to a finite number. Empty and non-numeric cells are
/// `None`; each aggregate decides whether that means drop or zero-fill.
pub fn coerce_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
