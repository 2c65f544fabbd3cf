//! Traversal engine: walks a value one path segment at a time
//!
//! Reads resolve to a reference into the value graph. Writes resolve to a
//! [`Location`]: keyed-container entries are not independently addressable,
//! so the final segment of a write into a map yields the container itself
//! plus the pending key instead of descending further.

use std::sync::Arc;

use tracing::trace;

use crate::error::AccessError;
use crate::filter;
use crate::splitter::Splitter;
use crate::value::{MapValue, SeqValue, TypeTag, Value};

/// A resolved write destination
#[derive(Debug)]
pub(crate) enum Location<'a> {
    /// A keyed-container entry, deferred to the container's own insertion
    Entry {
        /// The container to re-insert into
        map: &'a mut MapValue,
        /// The entry key still to be applied
        key: String,
    },
    /// A directly addressable slot with its declared type
    Slot {
        /// The value to overwrite in place
        value: &'a mut Value,
        /// Declared type of the slot
        ty: TypeTag,
    },
}

/// Resolve a path against a value for reading.
///
/// An empty path short-circuits and returns the value itself.
pub(crate) fn resolve<'a>(
    root: &'a Value,
    path: &str,
    separator: &str,
) -> Result<&'a Value, AccessError> {
    trace!(path, "resolving for read");
    let mut value = root;
    for (segment, position) in Splitter::new(path, separator) {
        value = step(value, segment, position)?;
    }
    Ok(value)
}

/// Apply one segment to a value, dispatching on its kind.
fn step<'a>(value: &'a Value, segment: &str, position: usize) -> Result<&'a Value, AccessError> {
    let current = value.canonical();
    match current {
        Value::Map(map) => {
            check_string_keys(map)?;
            map.get(segment).ok_or(AccessError::NotFound)
        }
        Value::Record(record) => {
            let field = record.field(segment).ok_or(AccessError::NotFound)?;
            if !field.visible {
                return Err(AccessError::Unexported);
            }
            Ok(&field.value)
        }
        Value::Seq(seq) => {
            // Bracket notation on a root sequence can produce a leading
            // empty segment; it addresses nothing and is skipped.
            if position == 0 && segment.is_empty() {
                return Ok(current);
            }
            let index = seq_index(seq, segment)?;
            Ok(&seq.items[index])
        }
        _ => Err(AccessError::NotFound),
    }
}

/// Resolve a path against a value for writing.
pub(crate) fn resolve_mut<'a>(
    root: &'a mut Value,
    path: &str,
    separator: &str,
) -> Result<Location<'a>, AccessError> {
    trace!(path, "resolving for write");
    let mut splitter = Splitter::new(path, separator);
    let last = splitter.remaining().checked_sub(1);
    let mut value = root;
    let mut ty = TypeTag::Any;
    while let Some((segment, position)) = splitter.next() {
        value = canonical_mut(value)?;
        if position == 0 && segment.is_empty() && matches!(&*value, Value::Seq(_)) {
            continue;
        }
        match value {
            Value::Map(map) => {
                check_string_keys(map)?;
                if Some(position) == last {
                    return Ok(Location::Entry {
                        map,
                        key: segment.to_string(),
                    });
                }
                ty = map.val_ty.clone();
                value = map.get_mut(segment).ok_or(AccessError::NotFound)?;
            }
            Value::Record(record) => {
                let field = record.field_mut(segment).ok_or(AccessError::NotFound)?;
                if !field.visible {
                    return Err(AccessError::Unexported);
                }
                ty = field.ty.clone();
                value = &mut field.value;
            }
            Value::Seq(seq) => {
                ty = seq.elem_ty.clone();
                let index = seq_index(seq, segment)?;
                value = &mut seq.items[index];
            }
            _ => return Err(AccessError::NotFound),
        }
    }
    Ok(Location::Slot { value, ty })
}

/// Resolve a sequence segment to an element index: bracketed text first
/// tries the filter evaluator, then falls through to plain integer parsing,
/// so a numeric-looking filter literal is never misread as an index.
fn seq_index(seq: &SeqValue, segment: &str) -> Result<usize, AccessError> {
    let mut text = segment;
    if let Some(inner) = bracketed(segment) {
        text = inner;
        if let Some(predicate) = filter::parse(inner)? {
            return filter::find_index(seq, &predicate);
        }
    }
    let index: i64 = text.parse().map_err(|_| AccessError::InvalidIndex)?;
    if index < 0 || index as usize >= seq.items.len() {
        return Err(AccessError::IndexOutOfRange);
    }
    Ok(index as usize)
}

/// Strip a single level of `[...]` enclosure.
pub(crate) fn bracketed(segment: &str) -> Option<&str> {
    segment.strip_prefix('[').and_then(|s| s.strip_suffix(']'))
}

/// Mutable counterpart of [`Value::canonical`]: unwraps transparent layers,
/// failing with `Unaddressable` on a shared value that is still aliased.
fn canonical_mut(value: &mut Value) -> Result<&mut Value, AccessError> {
    let mut current = value;
    loop {
        match current {
            Value::Optional(Some(inner)) => current = inner.as_mut(),
            Value::Shared(shared) => {
                current = Arc::get_mut(shared).ok_or(AccessError::Unaddressable)?;
            }
            _ => return Ok(current),
        }
    }
}

fn check_string_keys(map: &MapValue) -> Result<(), AccessError> {
    match map.key_ty {
        TypeTag::Str | TypeTag::Any => Ok(()),
        _ => Err(AccessError::MapKeyNotString),
    }
}
