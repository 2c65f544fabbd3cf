//! Mutation engine: applies a new value, zero or deletion to a resolved
//! write destination, enforcing declared-type compatibility

use tracing::debug;

use crate::error::AccessError;
use crate::resolver::Location;
use crate::value::{TypeTag, Value};

/// The value side of a write operation
#[derive(Debug, Clone, PartialEq)]
pub enum NewValue {
    /// Overwrite with this value, subject to type compatibility
    Value(Value),
    /// Reset the destination to the zero value of its declared type
    Zero,
    /// Remove a keyed-container entry; on any other destination this
    /// degrades to writing the zero value
    Delete,
}

impl From<Value> for NewValue {
    fn from(value: Value) -> Self {
        NewValue::Value(value)
    }
}

/// Commit a write to a resolved location.
pub(crate) fn apply(location: Location<'_>, new: NewValue) -> Result<(), AccessError> {
    match location {
        Location::Entry { map, key } => {
            debug!(key = key.as_str(), "writing keyed-container entry");
            match new {
                NewValue::Delete => {
                    map.remove(&key);
                }
                NewValue::Zero => {
                    let zero = map.val_ty.zero();
                    map.insert(key, zero);
                }
                NewValue::Value(value) => {
                    if map.val_ty != TypeTag::Any && value.type_tag() != map.val_ty {
                        return Err(AccessError::TypesDoNotMatch);
                    }
                    map.insert(key, value);
                }
            }
            Ok(())
        }
        Location::Slot { value, ty } => {
            debug!("writing addressable slot");
            match new {
                NewValue::Zero | NewValue::Delete => {
                    *value = ty.zero();
                }
                NewValue::Value(new_value) => {
                    if ty != TypeTag::Any && new_value.type_tag() != ty {
                        return Err(AccessError::TypesDoNotMatch);
                    }
                    *value = new_value;
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::resolver::resolve_mut;
    use crate::value::{MapValue, RecordValue, Scalar};
    use serde_json::json;

    #[test]
    fn test_map_entry_insert_and_overwrite() {
        let mut data = Value::from(json!({"a": 1}));
        let location = resolve_mut(&mut data, "b", ".").unwrap();
        apply(location, NewValue::Value(Value::from(2i64))).unwrap();
        assert_eq!(data, Value::from(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_map_entry_delete() {
        let mut data = Value::from(json!({"a": 1, "b": 2}));
        let location = resolve_mut(&mut data, "b", ".").unwrap();
        apply(location, NewValue::Delete).unwrap();
        assert_eq!(data, Value::from(json!({"a": 1})));
    }

    #[test]
    fn test_map_entry_zero_writes_declared_zero() {
        let mut map = Value::Map(MapValue::new(TypeTag::Str, TypeTag::Int));
        let entry = resolve_mut(&mut map, "n", ".").unwrap();
        apply(entry, NewValue::Zero).unwrap();
        let Value::Map(map) = &map else {
            panic!("expected map")
        };
        assert_eq!(map.get("n"), Some(&Value::from(0i64)));
    }

    #[test]
    fn test_typed_map_rejects_mismatched_entry() {
        let mut map = Value::Map(MapValue::new(TypeTag::Str, TypeTag::Int));
        let entry = resolve_mut(&mut map, "n", ".").unwrap();
        assert_eq!(
            apply(entry, NewValue::Value(Value::from("nope"))).unwrap_err(),
            AccessError::TypesDoNotMatch
        );
    }

    #[test]
    fn test_unset_map_lazily_initializes() {
        let mut map = Value::Map(MapValue::unset(TypeTag::Str, TypeTag::Any));
        let entry = resolve_mut(&mut map, "k", ".").unwrap();
        apply(entry, NewValue::Value(Value::from(9i64))).unwrap();
        let Value::Map(map) = &map else {
            panic!("expected map")
        };
        assert!(!map.is_unset());
        assert_eq!(map.get("k"), Some(&Value::from(9i64)));
    }

    #[test]
    fn test_record_field_zero_resets_to_declared_default() {
        let mut record = Value::Record(RecordValue::new("User").with_field(
            "name",
            TypeTag::Str,
            true,
            Value::from("ada"),
        ));
        let slot = resolve_mut(&mut record, "name", ".").unwrap();
        apply(slot, NewValue::Zero).unwrap();
        let Value::Record(record) = &record else {
            panic!("expected record")
        };
        assert_eq!(record.field("name").unwrap().value, Value::from(""));
    }

    #[test]
    fn test_delete_on_record_field_degrades_to_zero() {
        let mut record = Value::Record(RecordValue::new("User").with_field(
            "age",
            TypeTag::Int,
            true,
            Value::from(30i64),
        ));
        let slot = resolve_mut(&mut record, "age", ".").unwrap();
        apply(slot, NewValue::Delete).unwrap();
        let Value::Record(record) = &record else {
            panic!("expected record")
        };
        assert_eq!(record.field("age").unwrap().value, Value::from(0i64));
    }

    #[test]
    fn test_slot_type_mismatch() {
        let mut record = Value::Record(RecordValue::new("User").with_field(
            "age",
            TypeTag::Int,
            true,
            Value::from(30i64),
        ));
        let slot = resolve_mut(&mut record, "age", ".").unwrap();
        assert_eq!(
            apply(slot, NewValue::Value(Value::from("thirty"))).unwrap_err(),
            AccessError::TypesDoNotMatch
        );
    }

    #[test]
    fn test_sequence_element_write() {
        let mut data = Value::from(json!({"items": [1, 2, 3]}));
        let slot = resolve_mut(&mut data, "items.1", ".").unwrap();
        apply(slot, NewValue::Value(Value::from(20i64))).unwrap();
        assert_eq!(data, Value::from(json!({"items": [1, 20, 3]})));
    }

    #[test]
    fn test_root_overwrite() {
        let mut data = Value::Scalar(Scalar::Int(1));
        let slot = resolve_mut(&mut data, "", ".").unwrap();
        apply(slot, NewValue::Value(Value::from("replaced"))).unwrap();
        assert_eq!(data, Value::from("replaced"));
    }
}
