use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::record::CityRecord;

/// Write `<dir>/<title>.json`.
pub fn write_record(dir: &Path, record: &CityRecord) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", record.title));
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer(&mut w, record)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    w.flush()?;
    Ok(path)
}

/// Write every record as one flattened row: a leading row number, then one
/// column per json path (`scores.security`, ...). Lists stay as compact json
/// in a single cell.
pub fn write_csv(path: &Path, records: &[CityRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    let rows = records
        .iter()
        .map(|r| serde_json::to_value(r).map(|v| flatten(&v)))
        .collect::<Result<Vec<_>, _>>()?;

    let Some(first) = rows.first() else {
        return Ok(());
    };

    let mut header = vec![String::new()];
    header.extend(first.iter().map(|(k, _)| k.clone()));
    write_row(&mut w, &header)?;

    for (i, row) in rows.into_iter().enumerate() {
        let mut cells = vec![i.to_string()];
        cells.extend(row.into_iter().map(|(_, v)| v));
        write_row(&mut w, &cells)?;
    }

    w.flush()?;
    Ok(())
}

/// Flatten nested objects into `(dotted.path, cell)` pairs, keeping field order.
pub fn flatten(value: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    if let Value::Object(map) = value {
        flatten_into(&mut out, "", map);
    }
    out
}

fn flatten_into(out: &mut Vec<(String, String)>, prefix: &str, map: &Map<String, Value>) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) => flatten_into(out, &path, inner),
            Value::String(s) => out.push((path, s.clone())),
            Value::Null => out.push((path, String::new())),
            other => out.push((path, other.to_string())),
        }
    }
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(w: &mut W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}
