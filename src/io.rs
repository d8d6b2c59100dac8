// 📂 Lead files - JSON in, JSON + text out
// Thin wrappers around serde_json; all failures carry the offending path.

use crate::change_log::ChangeLog;
use crate::lead::Lead;
use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

// ============================================================================
// DOCUMENT SHAPE
// ============================================================================

/// How the lead array sits in the input document. Outputs reuse the same shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentShape {
    /// `[ {...}, {...} ]`
    #[default]
    Array,

    /// `{ "leads": [ {...}, {...} ] }`
    Wrapped,
}

#[derive(Serialize)]
struct LeadWrapper<'a> {
    leads: &'a [Lead],
}

// ============================================================================
// LOADING
// ============================================================================

/// Read leads from a JSON document, keeping input order.
pub fn load_leads(path: &Path) -> Result<(Vec<Lead>, DocumentShape)> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open lead file {}", path.display()))?;

    let document: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;

    parse_document(document).with_context(|| format!("Failed to read leads from {}", path.display()))
}

/// Accepts a bare array of leads or an object with a `leads` array
pub fn parse_document(document: Value) -> Result<(Vec<Lead>, DocumentShape)> {
    let (array, shape) = match document {
        Value::Array(items) => (items, DocumentShape::Array),
        Value::Object(mut map) => match map.remove("leads") {
            Some(Value::Array(items)) => (items, DocumentShape::Wrapped),
            Some(_) => bail!("\"leads\" must be an array"),
            None => bail!("expected an array of leads or an object with a \"leads\" array"),
        },
        _ => bail!("expected an array of leads or an object with a \"leads\" array"),
    };

    let mut leads = Vec::with_capacity(array.len());
    for (index, item) in array.into_iter().enumerate() {
        let lead: Lead = serde_json::from_value(item)
            .with_context(|| format!("Failed to deserialize lead at index {}", index))?;
        leads.push(lead);
    }

    Ok((leads, shape))
}

// ============================================================================
// WRITING
// ============================================================================

/// Pretty-printed JSON, absent fields omitted, order preserved.
pub fn write_leads(leads: &[Lead], shape: DocumentShape, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let written = match shape {
        DocumentShape::Array => serde_json::to_writer_pretty(&mut writer, leads),
        DocumentShape::Wrapped => serde_json::to_writer_pretty(&mut writer, &LeadWrapper { leads }),
    };
    written.with_context(|| format!("Failed to write leads to {}", path.display()))?;

    writeln!(writer).with_context(|| format!("Failed to write leads to {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    Ok(())
}

/// One formatted block per entry, each followed by a blank line.
pub fn write_change_logs(change_logs: &[ChangeLog], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for log in change_logs {
        writeln!(writer, "{}", log)
            .with_context(|| format!("Failed to write change log to {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
