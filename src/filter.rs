//! Filter predicate evaluator for bracketed path segments
//!
//! The grammar is deliberately tiny: `key==literal` (one or two `=`), where
//! `key` is word characters and hyphens, possibly empty. It is not a general
//! expression language and must stay that way.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::AccessError;
use crate::value::{Scalar, SeqValue, Value};

static FILTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([\w-]*)==?(.*)$").expect("filter grammar pattern"));

/// Literal side of a filter predicate, decided by a fixed precedence:
/// quoted string, boolean keyword, null keyword, numeric parse, raw string.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Literal {
    /// Single-quote-delimited string, quotes stripped
    Str(String),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
    /// Anything that parses as f64
    Num(f64),
    /// Fallback: the raw text
    Raw(String),
}

/// A parsed `key==literal` predicate
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FilterPredicate {
    pub key: String,
    pub literal: Literal,
}

/// Parse the inside of a bracketed segment as a filter predicate.
///
/// Text without any `=` is not a syntactic filter at all and returns
/// `Ok(None)`, letting the caller fall through to plain index parsing.
pub(crate) fn parse(expr: &str) -> Result<Option<FilterPredicate>, AccessError> {
    if !expr.contains('=') {
        return Ok(None);
    }
    let captures = FILTER_RE
        .captures(expr)
        .ok_or(AccessError::InvalidFilterExpression)?;
    Ok(Some(FilterPredicate {
        key: captures[1].to_string(),
        literal: parse_literal(&captures[2]),
    }))
}

fn parse_literal(raw: &str) -> Literal {
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return Literal::Str(raw[1..raw.len() - 1].to_string());
    }
    match raw {
        "true" => Literal::Bool(true),
        "false" => Literal::Bool(false),
        "null" => Literal::Null,
        _ => raw
            .parse::<f64>()
            .map(Literal::Num)
            .unwrap_or_else(|_| Literal::Raw(raw.to_string())),
    }
}

/// Index of the first sequence element matching the predicate, in iteration
/// order. First match wins; later matches are never considered.
pub(crate) fn find_index(seq: &SeqValue, predicate: &FilterPredicate) -> Result<usize, AccessError> {
    for (index, item) in seq.items.iter().enumerate() {
        let candidate = match item.canonical() {
            Value::Map(map) => match map.get(&predicate.key) {
                Some(value) => value,
                None => continue,
            },
            Value::Record(record) => match record.field(&predicate.key) {
                Some(field) => &field.value,
                None => continue,
            },
            other if predicate.key.is_empty() => other,
            _ => continue,
        };
        if literal_matches(candidate, &predicate.literal) {
            return Ok(index);
        }
    }
    Err(AccessError::FilterNotFound)
}

/// Compare a candidate value against the parsed literal.
///
/// A numeric literal widens any integer- or float-typed candidate to f64;
/// every other combination uses structural equality.
fn literal_matches(candidate: &Value, literal: &Literal) -> bool {
    let candidate = candidate.canonical();
    if let Literal::Num(n) = literal {
        if let Value::Scalar(scalar) = candidate {
            match scalar {
                Scalar::Int(i) => return *i as f64 == *n,
                Scalar::Uint(u) => return *u as f64 == *n,
                Scalar::Float(f) => return *f == *n,
                _ => {}
            }
        }
    }
    match literal {
        Literal::Str(s) | Literal::Raw(s) => {
            matches!(candidate, Value::Scalar(Scalar::Str(cs)) if cs == s)
        }
        Literal::Bool(b) => matches!(candidate, Value::Scalar(Scalar::Bool(cb)) if cb == b),
        Literal::Null => {
            matches!(candidate, Value::Scalar(Scalar::Null) | Value::Optional(None))
        }
        Literal::Num(_) => false,
    }
}
