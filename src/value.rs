//! Runtime value model: keyed maps, sequences, records and scalars
//!
//! `Value` is a closed tagged union. Every non-terminal variant exposes
//! exactly one access discipline: maps by string key, sequences by index,
//! records by field name. `Optional` and `Shared` are transparent layers
//! that every component unwraps before kind dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Declared type of a map entry, sequence element or record field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeTag {
    /// Fully dynamic: accepts any runtime value
    Any,
    /// Boolean
    Bool,
    /// Signed 64-bit integer
    Int,
    /// Unsigned 64-bit integer
    Uint,
    /// 64-bit floating point
    Float,
    /// String
    Str,
    /// Keyed container with declared key and value types
    Map(Box<TypeTag>, Box<TypeTag>),
    /// Sequence with a declared element type
    Seq(Box<TypeTag>),
}

impl TypeTag {
    /// The zero value of this type: the value a `Zero` write produces
    pub fn zero(&self) -> Value {
        match self {
            TypeTag::Any => Value::Scalar(Scalar::Null),
            TypeTag::Bool => Value::Scalar(Scalar::Bool(false)),
            TypeTag::Int => Value::Scalar(Scalar::Int(0)),
            TypeTag::Uint => Value::Scalar(Scalar::Uint(0)),
            TypeTag::Float => Value::Scalar(Scalar::Float(0.0)),
            TypeTag::Str => Value::Scalar(Scalar::Str(String::new())),
            TypeTag::Map(k, v) => Value::Map(MapValue::unset((**k).clone(), (**v).clone())),
            TypeTag::Seq(t) => Value::Seq(SeqValue::new((**t).clone(), Vec::new())),
        }
    }
}

/// A terminal leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Absent / null
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer
    Uint(u64),
    /// Floating point
    Float(f64),
    /// String
    Str(String),
}

/// An unordered string-keyed container
///
/// `entries` may be unset, modelling a keyed container that was declared but
/// never initialized: reads miss, and the first write through the mutation
/// engine initializes it.
#[derive(Debug, Clone)]
pub struct MapValue {
    /// Declared key type; must be `Str` or `Any` to be path-addressable
    pub key_ty: TypeTag,
    /// Declared value type of every entry
    pub val_ty: TypeTag,
    entries: Option<HashMap<String, Value>>,
}

impl MapValue {
    /// An initialized, empty map
    pub fn new(key_ty: TypeTag, val_ty: TypeTag) -> Self {
        Self {
            key_ty,
            val_ty,
            entries: Some(HashMap::new()),
        }
    }

    /// An unset map: declared but holding no storage yet
    pub fn unset(key_ty: TypeTag, val_ty: TypeTag) -> Self {
        Self {
            key_ty,
            val_ty,
            entries: None,
        }
    }

    /// A map populated from existing entries
    pub fn with_entries(
        key_ty: TypeTag,
        val_ty: TypeTag,
        entries: HashMap<String, Value>,
    ) -> Self {
        Self {
            key_ty,
            val_ty,
            entries: Some(entries),
        }
    }

    /// True when the map was never initialized
    pub fn is_unset(&self) -> bool {
        self.entries.is_none()
    }

    /// Number of entries (0 for an unset map)
    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, HashMap::len)
    }

    /// True when the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up an entry by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.as_ref()?.get(key)
    }

    /// Look up an entry mutably by key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.as_mut()?.get_mut(key)
    }

    /// Insert an entry, initializing unset storage first
    pub fn insert(&mut self, key: String, value: Value) {
        self.entries.get_or_insert_with(HashMap::new).insert(key, value);
    }

    /// Remove an entry by key
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.as_mut()?.remove(key)
    }

    /// Iterate entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter().flatten()
    }
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        // Declared types do not participate in structural equality; an unset
        // map compares equal to an empty one.
        match (&self.entries, &other.entries) {
            (None, None) => true,
            (Some(a), Some(b)) => a == b,
            (None, Some(m)) | (Some(m), None) => m.is_empty(),
        }
    }
}

/// An ordered, index-addressable sequence
#[derive(Debug, Clone)]
pub struct SeqValue {
    /// Declared element type
    pub elem_ty: TypeTag,
    /// Elements in order
    pub items: Vec<Value>,
}

impl SeqValue {
    /// A sequence from existing items
    pub fn new(elem_ty: TypeTag, items: Vec<Value>) -> Self {
        Self { elem_ty, items }
    }
}

impl PartialEq for SeqValue {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

/// One named field of a record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Declared field type
    pub ty: TypeTag,
    /// Whether the field is part of the record's external contract;
    /// path access to an invisible field fails rather than leaking it
    pub visible: bool,
    /// Current field value
    pub value: Value,
}

/// A fixed-shape aggregate of named fields
#[derive(Debug, Clone)]
pub struct RecordValue {
    /// Record type name
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<Field>,
}

impl RecordValue {
    /// An empty record of the given type name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field, builder style
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        ty: TypeTag,
        visible: bool,
        value: Value,
    ) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty,
            visible,
            value,
        });
        self
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field mutably by name
    pub fn field_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.fields.iter_mut().find(|f| f.name == name)
    }
}

impl PartialEq for RecordValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

/// A polymorphic runtime value
#[derive(Debug, Clone)]
pub enum Value {
    /// Unordered string-keyed container
    Map(MapValue),
    /// Ordered sequence
    Seq(SeqValue),
    /// Named-field aggregate
    Record(RecordValue),
    /// Terminal leaf
    Scalar(Scalar),
    /// Transparent optional layer; `None` resolves as no kind at all
    Optional(Option<Box<Value>>),
    /// Transparent shared-reference layer; writable only while uniquely owned
    Shared(Arc<Value>),
}

impl Value {
    /// The null scalar
    pub fn null() -> Value {
        Value::Scalar(Scalar::Null)
    }

    /// Unwrap transparent `Optional`/`Shared` layers.
    ///
    /// An unset optional is left as-is: it matches no container kind, so
    /// descending into it fails without ever dereferencing a missing value.
    pub fn canonical(&self) -> &Value {
        let mut current = self;
        loop {
            match current {
                Value::Optional(Some(inner)) => current = inner,
                Value::Shared(shared) => current = shared.as_ref(),
                _ => return current,
            }
        }
    }

    /// Runtime type of this value, for write-time compatibility checks.
    ///
    /// Records and null report `Any`: record shapes are runtime constructs,
    /// so declared typing covers scalars and containers only.
    pub fn type_tag(&self) -> TypeTag {
        match self.canonical() {
            Value::Map(m) => TypeTag::Map(Box::new(m.key_ty.clone()), Box::new(m.val_ty.clone())),
            Value::Seq(s) => TypeTag::Seq(Box::new(s.elem_ty.clone())),
            Value::Record(_) => TypeTag::Any,
            Value::Scalar(Scalar::Null) => TypeTag::Any,
            Value::Scalar(Scalar::Bool(_)) => TypeTag::Bool,
            Value::Scalar(Scalar::Int(_)) => TypeTag::Int,
            Value::Scalar(Scalar::Uint(_)) => TypeTag::Uint,
            Value::Scalar(Scalar::Float(_)) => TypeTag::Float,
            Value::Scalar(Scalar::Str(_)) => TypeTag::Str,
            Value::Optional(_) => TypeTag::Any,
            Value::Shared(_) => TypeTag::Any,
        }
    }

    /// Render this value as a grouping key.
    ///
    /// Strings render bare, whole floats render as integers, everything else
    /// falls back to its JSON rendering.
    pub fn display_key(&self) -> String {
        match self.canonical() {
            Value::Scalar(Scalar::Str(s)) => s.clone(),
            Value::Scalar(Scalar::Int(i)) => i.to_string(),
            Value::Scalar(Scalar::Uint(u)) => u.to_string(),
            Value::Scalar(Scalar::Bool(b)) => b.to_string(),
            Value::Scalar(Scalar::Null) | Value::Optional(None) => "null".to_string(),
            Value::Scalar(Scalar::Float(f)) => {
                if f.is_finite() && f.fract() == 0.0 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self.canonical(), other.canonical()) {
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => a == b,
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Optional(None), Value::Optional(None)) => true,
            _ => false,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Map(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (key, value) in m.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Seq(s) => {
                let mut seq = serializer.serialize_seq(Some(s.items.len()))?;
                for item in &s.items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Record(r) => {
                let visible = r.fields.iter().filter(|f| f.visible);
                let mut map = serializer.serialize_map(None)?;
                for field in visible {
                    map.serialize_entry(&field.name, &field.value)?;
                }
                map.end()
            }
            Value::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Value::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Value::Scalar(Scalar::Int(i)) => serializer.serialize_i64(*i),
            Value::Scalar(Scalar::Uint(u)) => serializer.serialize_u64(*u),
            Value::Scalar(Scalar::Float(f)) => serializer.serialize_f64(*f),
            Value::Scalar(Scalar::Str(s)) => serializer.serialize_str(s),
            Value::Optional(None) => serializer.serialize_unit(),
            Value::Optional(Some(inner)) => inner.serialize(serializer),
            Value::Shared(shared) => shared.serialize(serializer),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Scalar(Scalar::Null),
            serde_json::Value::Bool(b) => Value::Scalar(Scalar::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Scalar(Scalar::Int(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Scalar(Scalar::Uint(u))
                } else {
                    n.as_f64()
                        .map(|f| Value::Scalar(Scalar::Float(f)))
                        .unwrap_or_else(Value::null)
                }
            }
            serde_json::Value::String(s) => Value::Scalar(Scalar::Str(s)),
            serde_json::Value::Array(items) => Value::Seq(SeqValue::new(
                TypeTag::Any,
                items.into_iter().map(Value::from).collect(),
            )),
            serde_json::Value::Object(entries) => Value::Map(MapValue::with_entries(
                TypeTag::Str,
                TypeTag::Any,
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            )),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Scalar(Scalar::Int(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Scalar(Scalar::Uint(u))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Scalar(Scalar::Float(f))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Str(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(SeqValue::new(TypeTag::Any, items))
    }
}

impl From<HashMap<String, Value>> for Value {
    fn from(entries: HashMap<String, Value>) -> Self {
        Value::Map(MapValue::with_entries(TypeTag::Str, TypeTag::Any, entries))
    }
}
