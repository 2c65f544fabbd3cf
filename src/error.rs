//! Error types returned by path resolution, filtering and mutation

/// Errors produced while resolving, filtering or mutating a path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// The named field, key or element does not exist
    #[error("field not found")]
    NotFound,

    /// A sequence segment is not a valid integer index
    #[error("invalid index")]
    InvalidIndex,

    /// A sequence index is outside `[0, len)`
    #[error("index out of range")]
    IndexOutOfRange,

    /// A keyed container is not addressable by string keys
    #[error("map key is not of string type")]
    MapKeyNotString,

    /// The record field exists but is not part of the external contract
    #[error("field is not externally visible")]
    Unexported,

    /// The destination cannot be written in place
    #[error("field is unaddressable")]
    Unaddressable,

    /// The new value's type does not match the destination's declared type
    #[error("value type does not match field type")]
    TypesDoNotMatch,

    /// A bracketed segment contains `=` but does not match the filter grammar
    #[error("invalid search expression")]
    InvalidFilterExpression,

    /// No sequence element satisfied the filter predicate
    #[error("no matches for filter expression")]
    FilterNotFound,

    /// The filter literal could not be interpreted
    #[error("invalid value for filter expression")]
    InvalidFilterValue,

    /// A grouping or slice-filter source did not resolve to a sequence
    #[error("value at path is not a sequence")]
    NotASequence,

    /// The grouped data and key sequences have different lengths
    #[error("grouped sequences have different lengths")]
    GroupLengthMismatch,
}
