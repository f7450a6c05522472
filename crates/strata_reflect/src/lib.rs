//! Reflection-driven binary serialization.
//!
//! ## Menu
//!
//! - [`registry`]: named, typed, ordered properties of record types
//!   ([`StructRegistry`], [`Struct`], [`derive::Reflect`]).
//! - [`codec`]: the type-directed [`Codec`] covering scalars, strings,
//!   envelope messages, sequences, sets, maps and user-defined types.
//! - [`Archiver`]: an ordered, untyped list of independently encoded values.
//! - [`schema`]: runtime wire schemas synthesized from reflected properties
//!   ([`SchemaRegistry`]).
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! let mut scores = BTreeMap::new();
//! scores.insert(String::from("alice"), vec![3_u32, 5]);
//!
//! let bytes = strata_reflect::serialize(&scores).unwrap();
//!
//! let mut back = BTreeMap::<String, Vec<u32>>::new();
//! strata_reflect::deserialize(&mut back, &bytes).unwrap();
//! assert_eq!(back, scores);
//! ```
//!
//! [`StructRegistry`]: registry::StructRegistry
//! [`Struct`]: registry::Struct
//! [`Codec`]: codec::Codec
//! [`SchemaRegistry`]: schema::SchemaRegistry
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code names `strata_reflect`; the alias keeps that path valid
// inside this crate's own tests.
extern crate self as strata_reflect;

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod archive;
mod error;

pub mod codec;
pub mod registry;
pub mod schema;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use archive::Archiver;
pub use codec::{deserialize, deserialize_with, serialize, serialize_with};
pub use error::{AccessError, CodecError, SchemaError};
pub use registry::Reflect;
pub use strata_reflect_derive as derive;
pub use strata_wire as wire;
