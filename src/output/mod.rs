//! Output formatters for query results.
//!
//! Every result type is `Serialize`; formatting goes through a
//! `serde_json::Value` so one renderer covers search hits, recommendations,
//! assistant replies and catalog statistics alike.

use std::io::Write;

use colored::Colorize;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::OutputFormat;
use crate::core::Result;

/// Output format enum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Markdown,
    Text,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Markdown => Format::Markdown,
            OutputFormat::Text => Format::Text,
        }
    }
}

impl Format {
    pub fn format_value<W: Write>(&self, value: &Value, writer: &mut W) -> Result<()> {
        match self {
            Format::Json => format_json(value, writer),
            Format::Markdown => format_markdown(value, writer, 0),
            Format::Text => format_text(value, writer, 0),
        }
    }

    pub fn format<T: Serialize, W: Write>(&self, data: &T, writer: &mut W) -> Result<()> {
        let value = serde_json::to_value(data)?;
        self.format_value(&value, writer)
    }

    /// Render into a string.
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        let mut buf = Vec::new();
        self.format(data, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn format_json<W: Write>(value: &Value, writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    Ok(())
}

fn format_markdown<W: Write>(value: &Value, writer: &mut W, depth: usize) -> Result<()> {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                if is_nested(val) {
                    let header_level = "#".repeat((depth + 1).min(6));
                    writeln!(writer, "{} {}\n", header_level, format_key(key))?;
                    format_markdown(val, writer, depth + 1)?;
                } else {
                    writeln!(writer, "**{}**: {}\n", format_key(key), format_scalar(val))?;
                }
            }
        }
        Value::Array(arr) if arr.is_empty() => writeln!(writer, "_No items_\n")?,
        Value::Array(arr) if is_table_compatible(arr) => format_as_table(arr, writer)?,
        Value::Array(arr) if arr.iter().all(|v| !is_nested(v)) => {
            for item in arr {
                writeln!(writer, "- {}", format_scalar(item))?;
            }
            writeln!(writer)?;
        }
        Value::Array(arr) => {
            for item in arr {
                writeln!(writer, "---\n")?;
                format_markdown(item, writer, depth)?;
            }
        }
        _ => writeln!(writer, "{}\n", format_scalar(value))?,
    }
    Ok(())
}

fn format_text<W: Write>(value: &Value, writer: &mut W, indent: usize) -> Result<()> {
    let prefix = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                if is_nested(val) {
                    let heading = format!("{}:", format_key(key));
                    writeln!(writer, "{}{}", prefix, heading.as_str().bold())?;
                    format_text(val, writer, indent + 1)?;
                } else {
                    writeln!(writer, "{}{}: {}", prefix, format_key(key), format_scalar(val))?;
                }
            }
        }
        Value::Array(arr) if arr.is_empty() => writeln!(writer, "{prefix}(none)")?,
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                match item {
                    Value::Object(map) if is_flat(map) => {
                        writeln!(writer, "{}{}. {}", prefix, i + 1, inline_record(map))?;
                    }
                    Value::Object(_) | Value::Array(_) => {
                        let ordinal = format!("{}.", i + 1);
                        writeln!(writer, "{}{}", prefix, ordinal.as_str().cyan())?;
                        format_text(item, writer, indent + 1)?;
                    }
                    _ => writeln!(writer, "{}- {}", prefix, format_scalar(item))?,
                }
            }
        }
        _ => writeln!(writer, "{}{}", prefix, format_scalar(value))?,
    }
    Ok(())
}

/// One-line `Key: value | Key: value` rendering, skipping nulls.
fn inline_record(map: &Map<String, Value>) -> String {
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| format!("{}: {}", format_key(k), format_scalar(v)))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn format_key(key: &str) -> String {
    key.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) => format!("{f:.2}"),
            None => n.to_string(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => if *b { "Yes" } else { "No" }.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) if arr.is_empty() => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Objects, and arrays holding anything other than scalars, get their own
/// section. Arrays of scalars (tag lists) render inline.
fn is_nested(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(arr) => arr.iter().any(|v| matches!(v, Value::Object(_) | Value::Array(_))),
        _ => false,
    }
}

fn is_flat(map: &Map<String, Value>) -> bool {
    map.values().all(|v| !is_nested(v))
}

fn is_table_compatible(arr: &[Value]) -> bool {
    !arr.is_empty()
        && arr
            .iter()
            .all(|v| matches!(v, Value::Object(map) if is_flat(map)))
}

fn format_as_table<W: Write>(arr: &[Value], writer: &mut W) -> Result<()> {
    let Some(Value::Object(first)) = arr.first() else {
        return Ok(());
    };
    let headers: Vec<&str> = first.keys().map(|s| s.as_str()).collect();

    write!(writer, "|")?;
    for header in &headers {
        write!(writer, " {} |", format_key(header))?;
    }
    writeln!(writer)?;

    write!(writer, "|")?;
    for _ in &headers {
        write!(writer, " --- |")?;
    }
    writeln!(writer)?;

    for item in arr {
        if let Value::Object(map) = item {
            write!(writer, "|")?;
            for header in &headers {
                let value = map.get(*header).unwrap_or(&Value::Null);
                write!(writer, " {} |", format_scalar(value).replace('|', "\\|"))?;
            }
            writeln!(writer)?;
        }
    }

    writeln!(writer)?;
    Ok(())
}
