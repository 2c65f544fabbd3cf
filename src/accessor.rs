//! Public access surface: configured engine for reads, writes and batches

use std::collections::HashMap;

use tracing::debug;

use crate::decode::TextDecoder;
use crate::error::AccessError;
use crate::extract;
use crate::mutate::{self, NewValue};
use crate::resolver::{self, bracketed};
use crate::splitter::Splitter;
use crate::value::Value;

/// Default segment separator.
pub const SEPARATOR: &str = ".";
/// Default wildcard ("for each element") marker.
pub const WILDCARD: &str = "#";

/// Engine configuration, immutable once the accessor is built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Segment separator; splits the path outside bracketed sub-expressions
    pub separator: String,
    /// Wildcard marker; a segment equal to it fans out over sequences
    pub wildcard: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            separator: SEPARATOR.to_string(),
            wildcard: WILDCARD.to_string(),
        }
    }
}

/// A batch-read result: requested paths mapped to their resolved values
pub type Fields = HashMap<String, Value>;

/// Path-addressed access to deeply nested values.
///
/// An accessor holds only configuration; every call is a pure computation
/// over the caller-supplied value and retains no references afterwards.
#[derive(Debug, Clone)]
pub struct Accessor {
    separator: String,
    wildcard: String,
}

impl Default for Accessor {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Accessor {
    /// Build an accessor from options. An empty separator falls back to the
    /// default one.
    pub fn new(options: Options) -> Self {
        let separator = if options.separator.is_empty() {
            SEPARATOR.to_string()
        } else {
            options.separator
        };
        Self {
            separator,
            wildcard: options.wildcard,
        }
    }

    /// Read the value at `path`.
    ///
    /// A path containing the wildcard marker diverts to extraction and
    /// fans out over sequences instead of resolving a single location.
    pub fn get(&self, value: &Value, path: &str) -> Result<Value, AccessError> {
        if !self.wildcard.is_empty() && path.contains(&self.wildcard) {
            return Ok(extract::extract(value, path, &self.separator, &self.wildcard));
        }
        resolver::resolve(value, path, &self.separator).map(Value::clone)
    }

    /// Read the values at `path` and correlate them with the values at
    /// `group_by`, producing a keyed grouping. Repeated keys accumulate
    /// their values into an ordered sequence.
    pub fn get_grouped(
        &self,
        value: &Value,
        path: &str,
        group_by: &str,
    ) -> Result<Value, AccessError> {
        extract::extract_grouped(value, path, group_by, &self.separator, &self.wildcard)
    }

    /// Read several paths at once. Duplicate paths are read once; the first
    /// failing path aborts the batch and discards partial results.
    pub fn get_many(&self, value: &Value, paths: &[&str]) -> Result<Fields, AccessError> {
        let mut fields = Fields::with_capacity(paths.len());
        for path in paths {
            if !fields.contains_key(*path) {
                let resolved = self.get(value, path)?;
                fields.insert((*path).to_string(), resolved);
            }
        }
        Ok(fields)
    }

    /// Write to the location at `path`: a plain value, the zero value of the
    /// destination's declared type, or a deletion.
    pub fn set(&self, value: &mut Value, path: &str, new: NewValue) -> Result<(), AccessError> {
        debug!(path, "set");
        let location = resolver::resolve_mut(value, path, &self.separator)?;
        mutate::apply(location, new)
    }

    /// Keep the elements of the sequence at `path` that are related to
    /// `candidates`.
    ///
    /// With a plain path the sequence's elements themselves are tested for
    /// structural membership in `candidates`. When the final segment is a
    /// bracketed sub-path (e.g. `items.[user.id]`), the parent sequence is
    /// filtered instead: an element survives when the value at the sub-path
    /// renders to the same display string as any candidate.
    pub fn filter_slice(
        &self,
        value: &Value,
        path: &str,
        candidates: &[Value],
    ) -> Result<Vec<Value>, AccessError> {
        let segments: Vec<&str> = Splitter::new(path, &self.separator).map(|(s, _)| s).collect();
        if let Some(last) = segments.last() {
            if let Some(sub_path) = bracketed(last) {
                if sub_path.contains(&self.separator) && !sub_path.contains('=') {
                    let parent_path = segments[..segments.len() - 1].join(&self.separator);
                    return self.filter_by_sub_path(value, &parent_path, sub_path, candidates);
                }
            }
        }

        let resolved = resolver::resolve(value, path, &self.separator)?;
        match resolved.canonical() {
            Value::Seq(seq) => Ok(seq
                .items
                .iter()
                .filter(|item| candidates.contains(*item))
                .cloned()
                .collect()),
            _ => Err(AccessError::NotASequence),
        }
    }

    fn filter_by_sub_path(
        &self,
        value: &Value,
        parent_path: &str,
        sub_path: &str,
        candidates: &[Value],
    ) -> Result<Vec<Value>, AccessError> {
        let parent = resolver::resolve(value, parent_path, &self.separator)?;
        let Value::Seq(seq) = parent.canonical() else {
            return Err(AccessError::NotASequence);
        };
        let wanted: Vec<String> = candidates.iter().map(Value::display_key).collect();
        let mut kept = Vec::new();
        for item in &seq.items {
            // Elements without the sub-path are skipped, like filter misses.
            let Ok(sub_value) = resolver::resolve(item, sub_path, &self.separator) else {
                continue;
            };
            if wanted.contains(&sub_value.display_key()) {
                kept.push(item.clone());
            }
        }
        Ok(kept)
    }

    /// Read a path out of raw structured text through a decoder. A decoder
    /// miss (unparseable text or an absent path) reads as `NotFound`.
    pub fn get_text<D: TextDecoder>(
        &self,
        decoder: &D,
        text: &str,
        path: &str,
    ) -> Result<Value, AccessError> {
        decoder
            .decode_get(text, path)?
            .ok_or(AccessError::NotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::value::{RecordValue, TypeTag};
    use serde_json::json;

    fn accessor() -> Accessor {
        Accessor::default()
    }

    fn fixture() -> Value {
        Value::from(json!({
            "name": "store",
            "books": [
                {"title": "Moby Dick", "price": 8.99},
                {"title": "Sword of Honour", "price": 12.99}
            ],
            "tags": ["fiction", "classic", "sea"]
        }))
    }

    #[test]
    fn test_get_nested() {
        let data = fixture();
        assert_eq!(
            accessor().get(&data, "books.0.title").unwrap(),
            Value::from("Moby Dick")
        );
    }

    #[test]
    fn test_get_wildcard_diverts_to_extraction() {
        let data = fixture();
        assert_eq!(
            accessor().get(&data, "books.#.title").unwrap(),
            Value::from(json!(["Moby Dick", "Sword of Honour"]))
        );
    }

    #[test]
    fn test_custom_separator() {
        let data = fixture();
        let accessor = Accessor::new(Options {
            separator: "->".into(),
            wildcard: "#".into(),
        });
        assert_eq!(
            accessor.get(&data, "books->1->price").unwrap(),
            Value::from(12.99)
        );
    }

    #[test]
    fn test_get_many_deduplicates_and_aborts_on_error() {
        let data = fixture();
        let fields = accessor()
            .get_many(&data, &["name", "books.0.price", "name"])
            .unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["name"], Value::from("store"));
        assert_eq!(fields["books.0.price"], Value::from(8.99));

        assert_eq!(
            accessor()
                .get_many(&data, &["name", "missing.path"])
                .unwrap_err(),
            AccessError::NotFound
        );
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let mut data = fixture();
        let accessor = accessor();
        accessor
            .set(&mut data, "books.0.price", NewValue::Value(Value::from(9.99)))
            .unwrap();
        assert_eq!(
            accessor.get(&data, "books.0.price").unwrap(),
            Value::from(9.99)
        );
    }

    #[test]
    fn test_set_on_record_enforces_visibility() {
        let mut record = Value::Record(RecordValue::new("User").with_field(
            "secret",
            TypeTag::Str,
            false,
            Value::from("x"),
        ));
        assert_eq!(
            accessor()
                .set(&mut record, "secret", NewValue::Value(Value::from("y")))
                .unwrap_err(),
            AccessError::Unexported
        );
    }

    #[test]
    fn test_filter_slice_membership() {
        let data = fixture();
        let kept = accessor()
            .filter_slice(
                &data,
                "tags",
                &[Value::from("classic"), Value::from("unknown")],
            )
            .unwrap();
        assert_eq!(kept, vec![Value::from("classic")]);
    }

    #[test]
    fn test_filter_slice_requires_sequence() {
        let data = fixture();
        assert_eq!(
            accessor()
                .filter_slice(&data, "name", &[Value::from("store")])
                .unwrap_err(),
            AccessError::NotASequence
        );
    }

    #[test]
    fn test_filter_slice_by_sub_path() {
        let data = Value::from(json!({
            "orders": [
                {"user": {"id": 1}, "total": 10},
                {"user": {"id": 2}, "total": 20},
                {"user": {"id": 3}, "total": 30}
            ]
        }));
        let kept = accessor()
            .filter_slice(
                &data,
                "orders.[user.id]",
                &[Value::from(1i64), Value::from(3.0)],
            )
            .unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(
            kept[0],
            Value::from(json!({"user": {"id": 1}, "total": 10}))
        );
        assert_eq!(
            kept[1],
            Value::from(json!({"user": {"id": 3}, "total": 30}))
        );
    }

    #[test]
    fn test_grouped_read() {
        let data = Value::from(json!({
            "vals": [10, 20, 30],
            "labels": ["x", "y", "x"]
        }));
        let grouped = accessor().get_grouped(&data, "vals.#", "labels.#").unwrap();
        assert_eq!(grouped, Value::from(json!({"x": [10, 30], "y": 20})));
    }
}
