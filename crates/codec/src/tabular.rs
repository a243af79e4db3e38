//! Quote-aware tabular codec
//!
//! Decoder: a single-pass character scanner. Fields may be wrapped in
//! double quotes; inside a quoted field, `""` escapes a literal quote and
//! delimiters/newlines are data. `\r\n` and `\r` row breaks are normalized
//! to `\n`. The header row defines the column names; data rows are padded
//! with nulls or truncated to the header length.
//!
//! Type coercion on read: empty cell → null, `true`/`false`
//! (case-insensitive) → boolean, integer-looking token → integer,
//! numeric-looking token → decimal, anything else → text.

use serde_json::{Number, Value};
use std::fmt;
use thiserror::Error;

/// Field delimiter of the tabular form
pub const DELIMITER: char = ',';

/// Errors from the tabular decoder
#[derive(Debug, Error)]
pub enum CodecError {
    /// A quoted field was still open at end of input
    #[error("unterminated quoted field starting on line {line}")]
    UnterminatedQuote {
        /// Line on which the quote was opened
        line: usize,
    },
}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// One decoded cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// Empty cell
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer token that fits an i64
    Int(i64),
    /// Decimal or out-of-range integer token
    Float(f64),
    /// Everything else
    Text(String),
}

impl Field {
    /// Coerce a raw cell to its typed value
    pub fn coerce(raw: &str) -> Field {
        if raw.is_empty() {
            return Field::Null;
        }
        if raw.eq_ignore_ascii_case("true") {
            return Field::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Field::Bool(false);
        }
        if looks_numeric(raw) {
            if is_integer_token(raw) {
                if let Ok(n) = raw.parse::<i64>() {
                    return Field::Int(n);
                }
            }
            if let Ok(f) = raw.parse::<f64>() {
                return Field::Float(f);
            }
        }
        Field::Text(raw.to_string())
    }

    /// Convert a JSON value to a field
    ///
    /// Composite values become their canonical JSON text.
    pub fn from_json(value: &Value) -> Field {
        match value {
            Value::Null => Field::Null,
            Value::Bool(b) => Field::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Field::Int(i),
                None => Field::Float(n.as_f64().unwrap_or(0.0)),
            },
            Value::String(s) => Field::Text(s.clone()),
            composite => Field::Text(composite.to_string()),
        }
    }

    /// Convert this field to a JSON value
    pub fn to_json(&self) -> Value {
        match self {
            Field::Null => Value::Null,
            Field::Bool(b) => Value::Bool(*b),
            Field::Int(i) => Value::Number(Number::from(*i)),
            Field::Float(f) => Number::from_f64(*f).map(Value::Number).unwrap_or(Value::Null),
            Field::Text(s) => Value::String(s.clone()),
        }
    }

    /// Whether this field is null
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Null => Ok(()),
            Field::Bool(b) => write!(f, "{}", b),
            Field::Int(i) => write!(f, "{}", i),
            Field::Float(x) => write!(f, "{}", x),
            Field::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A decoded tabular file: header columns plus typed rows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Column names from the header row
    pub columns: Vec<String>,
    /// Data rows, each exactly `columns.len()` fields long
    pub rows: Vec<Vec<Field>>,
}

impl Table {
    /// Build a table from column-name → JSON-value records
    ///
    /// The column set is the union of keys across all records, in
    /// first-seen order; records missing a column render null.
    pub fn from_records(records: &[serde_json::Map<String, Value>]) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for record in records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                columns
                    .iter()
                    .map(|c| record.get(c).map(Field::from_json).unwrap_or(Field::Null))
                    .collect()
            })
            .collect();

        Table { columns, rows }
    }

    /// Materialize one row as a column-name → JSON-value record
    pub fn record(&self, index: usize) -> serde_json::Map<String, Value> {
        let mut record = serde_json::Map::new();
        if let Some(row) = self.rows.get(index) {
            for (column, field) in self.columns.iter().zip(row) {
                record.insert(column.clone(), field.to_json());
            }
        }
        record
    }
}

/// Decode tabular text into a typed table
///
/// Empty input yields an empty table (a collection with zero records
/// serializes to an empty file).
///
/// # Errors
///
/// Returns [`CodecError::UnterminatedQuote`] if a quoted field is still
/// open at end of input.
pub fn decode(input: &str) -> CodecResult<Table> {
    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut line = 1usize;
    let mut quote_line = 1usize;

    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        cell.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                '\n' => {
                    line += 1;
                    cell.push('\n');
                }
                _ => cell.push(c),
            }
        } else {
            match c {
                '"' if cell.is_empty() => {
                    in_quotes = true;
                    quote_line = line;
                }
                DELIMITER => row.push(std::mem::take(&mut cell)),
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    line += 1;
                    end_row(&mut raw_rows, &mut row, &mut cell);
                }
                '\n' => {
                    line += 1;
                    end_row(&mut raw_rows, &mut row, &mut cell);
                }
                _ => cell.push(c),
            }
        }
    }
    if in_quotes {
        return Err(CodecError::UnterminatedQuote { line: quote_line });
    }
    end_row(&mut raw_rows, &mut row, &mut cell);

    let mut raw_rows = raw_rows.into_iter();
    let Some(columns) = raw_rows.next() else {
        return Ok(Table::default());
    };

    let width = columns.len();
    let rows = raw_rows
        .map(|raw| {
            let mut fields: Vec<Field> =
                raw.iter().take(width).map(|c| Field::coerce(c)).collect();
            fields.resize(width, Field::Null);
            fields
        })
        .collect();

    Ok(Table { columns, rows })
}

/// Flush the pending cell and row; blank lines produce no row
fn end_row(raw_rows: &mut Vec<Vec<String>>, row: &mut Vec<String>, cell: &mut String) {
    if row.is_empty() && cell.is_empty() {
        return;
    }
    row.push(std::mem::take(cell));
    raw_rows.push(std::mem::take(row));
}

/// Encode a typed table back to tabular text
///
/// Any cell containing the delimiter, a quote, or a line break is wrapped
/// in quotes with internal quotes doubled. Composite JSON text (cells
/// starting with `{` or `[`) is always wrapped.
pub fn encode(table: &Table) -> String {
    let mut out = String::new();
    if table.columns.is_empty() {
        return out;
    }

    let header: Vec<String> = table.columns.iter().map(|c| escape_cell(c)).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in &table.rows {
        let cells: Vec<String> = row.iter().map(encode_field).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn encode_field(field: &Field) -> String {
    match field {
        Field::Text(s) => escape_cell(s),
        other => other.to_string(),
    }
}

fn escape_cell(text: &str) -> String {
    let needs_quotes = text.contains(DELIMITER)
        || text.contains('"')
        || text.contains('\n')
        || text.contains('\r')
        || text.starts_with('{')
        || text.starts_with('[');
    if needs_quotes {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Whether a token has the shape of an integer (sign + digits)
fn is_integer_token(raw: &str) -> bool {
    let body = raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

/// Whether a token matches the integer-or-decimal numeric pattern
fn looks_numeric(raw: &str) -> bool {
    let body = raw.strip_prefix(&['+', '-'][..]).unwrap_or(raw);
    let (mantissa, exponent) = match body.split_once(&['e', 'E'][..]) {
        Some((m, e)) => (m, Some(e)),
        None => (body, None),
    };

    let mut digits = 0usize;
    let mut dots = 0usize;
    for b in mantissa.bytes() {
        match b {
            b'0'..=b'9' => digits += 1,
            b'.' => dots += 1,
            _ => return false,
        }
    }
    if digits == 0 || dots > 1 {
        return false;
    }

    match exponent {
        None => true,
        Some(e) => {
            let e = e.strip_prefix(&['+', '-'][..]).unwrap_or(e);
            !e.is_empty() && e.bytes().all(|b| b.is_ascii_digit())
        }
    }
}
