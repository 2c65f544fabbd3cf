#![forbid(unsafe_code)]
#![warn(missing_docs)]
//! # valuepath
//!
//! Path-addressed access to deeply nested values: keyed maps, sequences,
//! records and scalars, behind one delimiter-notation path grammar.
//!
//! Supports:
//! - `owner.name`: nested map keys and record fields
//! - `books.1.title`: sequence indexing, bracketed (`[1]`) or bare
//! - `books.[title=='Moby Dick'].price`: first-match filter segments
//! - `books.#.price`: wildcard fan-out over sequences
//! - grouped reads correlating two wildcard paths into a keyed mapping
//! - writes with typed destinations, zero-value resets and deletion
//!
//! ```
//! use valuepath::{Accessor, NewValue, Value};
//!
//! let accessor = Accessor::default();
//! let mut store = Value::from(serde_json::json!({
//!     "books": [{"title": "Moby Dick", "price": 8.99}]
//! }));
//!
//! let price = accessor.get(&store, "books.0.price")?;
//! assert_eq!(price, Value::from(8.99));
//!
//! accessor.set(&mut store, "books.0.price", NewValue::Value(Value::from(9.50)))?;
//! assert_eq!(accessor.get(&store, "books.0.price")?, Value::from(9.50));
//! # Ok::<(), valuepath::AccessError>(())
//! ```

pub mod accessor;
pub mod decode;
pub mod error;
pub mod splitter;
pub mod value;

mod extract;
mod filter;
mod mutate;
mod resolver;

pub use accessor::{Accessor, Fields, Options, SEPARATOR, WILDCARD};
pub use decode::{JsonDecoder, TextDecoder};
pub use error::AccessError;
pub use mutate::NewValue;
pub use splitter::Splitter;
pub use value::{Field, MapValue, RecordValue, Scalar, SeqValue, TypeTag, Value};
