//! Wildcard extraction and grouping
//!
//! Extraction fans out over sequences instead of failing on them: the
//! wildcard marker recurses into every element with the remaining segments,
//! and a non-wildcard segment applied to a sequence is transparently pushed
//! down to every element. Absent children are dropped, never an error.

use std::collections::HashMap;

use tracing::trace;

use crate::error::AccessError;
use crate::splitter::Splitter;
use crate::value::{MapValue, SeqValue, TypeTag, Value};

/// Extract every value matching `path`, fanning out at wildcard segments.
///
/// Exactly one match yields that value; zero or several yield a sequence.
pub(crate) fn extract(value: &Value, path: &str, separator: &str, wildcard: &str) -> Value {
    let segments: Vec<&str> = Splitter::new(path, separator).map(|(s, _)| s).collect();
    let mut results = Vec::new();
    extract_recursive(value, &segments, wildcard, &mut results);
    trace!(path, matches = results.len(), "extraction complete");
    if results.len() == 1 {
        return results.swap_remove(0);
    }
    Value::Seq(SeqValue::new(TypeTag::Any, results))
}

fn extract_recursive(value: &Value, segments: &[&str], wildcard: &str, results: &mut Vec<Value>) {
    let current = value.canonical();
    let Some((segment, rest)) = segments.split_first() else {
        results.push(current.clone());
        return;
    };
    match current {
        Value::Map(map) => {
            if let Some(child) = map.get(segment) {
                extract_recursive(child, rest, wildcard, results);
            }
        }
        Value::Record(record) => {
            if let Some(field) = record.field(segment) {
                if field.visible {
                    extract_recursive(&field.value, rest, wildcard, results);
                }
            }
        }
        Value::Seq(seq) => {
            if *segment == wildcard {
                // Each wildcard level collects its fan-out into one sequence
                // result, so parallel extractions stay correlated per level.
                let mut group = Vec::new();
                for item in &seq.items {
                    extract_recursive(item, rest, wildcard, &mut group);
                }
                if !group.is_empty() {
                    results.push(Value::Seq(SeqValue::new(TypeTag::Any, group)));
                }
            } else {
                // Implicit auto-flatten: a named segment cannot apply to a
                // sequence directly, so it is applied to every element.
                for item in &seq.items {
                    extract_recursive(item, segments, wildcard, results);
                }
            }
        }
        _ => {}
    }
}

/// Extract a data sequence and a key sequence, then correlate them
/// element-by-element into a keyed grouping.
///
/// A repeated key accumulates its values into an ordered sequence; a key
/// seen once keeps its single value.
pub(crate) fn extract_grouped(
    value: &Value,
    data_path: &str,
    group_path: &str,
    separator: &str,
    wildcard: &str,
) -> Result<Value, AccessError> {
    let data = sequence_items(extract(value, data_path, separator, wildcard))?;
    let keys = sequence_items(extract(value, group_path, separator, wildcard))?;
    if data.len() != keys.len() {
        return Err(AccessError::GroupLengthMismatch);
    }

    let mut buckets: HashMap<String, Vec<Value>> = HashMap::new();
    for (key_value, data_value) in keys.into_iter().zip(data) {
        buckets
            .entry(key_value.display_key())
            .or_default()
            .push(data_value);
    }

    let entries = buckets
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                values.swap_remove(0)
            } else {
                Value::Seq(SeqValue::new(TypeTag::Any, values))
            };
            (key, value)
        })
        .collect();
    Ok(Value::Map(MapValue::with_entries(
        TypeTag::Str,
        TypeTag::Any,
        entries,
    )))
}

fn sequence_items(extracted: Value) -> Result<Vec<Value>, AccessError> {
    match extracted {
        Value::Seq(seq) => Ok(seq.items),
        _ => Err(AccessError::NotASequence),
    }
}
