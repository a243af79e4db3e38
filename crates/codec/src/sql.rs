//! INSERT-statement rendering
//!
//! Every archived collection also carries a `.sql` artifact so an operator
//! can replay it with standard database tooling. The pipeline never parses
//! these files back.

use serde_json::Value;

/// Render one INSERT statement per record
///
/// Column order follows `columns`; records missing a column render `NULL`.
pub fn render_insert_statements(
    table_name: &str,
    columns: &[String],
    records: &[serde_json::Map<String, Value>],
) -> String {
    let mut out = String::new();
    if records.is_empty() {
        return out;
    }

    let column_list = columns.join(", ");
    for record in records {
        let values: Vec<String> = columns
            .iter()
            .map(|c| sql_literal(record.get(c).unwrap_or(&Value::Null)))
            .collect();
        out.push_str(&format!(
            "INSERT INTO {} ({}) VALUES ({});\n",
            table_name,
            column_list,
            values.join(", ")
        ));
    }
    out
}

/// Render a JSON value as a SQL literal
///
/// Strings are single-quoted with internal quotes doubled; composite
/// values render as their JSON text in a string literal.
fn sql_literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quote(s),
        composite => quote(&composite.to_string()),
    }
}

fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
