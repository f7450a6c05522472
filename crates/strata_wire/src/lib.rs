//! The binary envelope format used by strata.
//!
//! The format is the tag/length wire encoding popularised by Protocol
//! Buffers: every field is a varint key `(number << 3) | wire_type`
//! followed by a varint, a little-endian 64-bit word, or a length-delimited
//! byte run. Unknown fields are skipped on decode.
//!
//! # Overview
//!
//! - [`WireWriter`] / [`WireReader`]: field-level encoding and decoding.
//! - [`Message`]: a type with a fixed wire layout (`encode` / `parse`).
//! - [`envelope`]: the fixed messages the type-directed codec builds on
//!   ([`IntegerValue`], [`SequenceValue`], [`Archive`], ...).
//! - [`SchemaPool`]: message schemas constructed at runtime, with a
//!   human-readable [`definition`](MessageDescriptor::definition).
//! - [`DynamicMessage`]: a message whose layout is a runtime
//!   [`MessageDescriptor`].
//!
//! # Example
//!
//! ```
//! use strata_wire::{Message, IntegerValue};
//!
//! let bytes = IntegerValue { value: -7 }.encode();
//! let decoded = IntegerValue::decode(&bytes).unwrap();
//! assert_eq!(decoded.value, -7);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// no_std support

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod dynamic;
mod error;
mod message;
mod reader;
mod schema;
mod wire_type;
mod writer;

pub mod envelope;
pub mod varint;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use dynamic::DynamicMessage;
pub use envelope::{Archive, ArchiveMember, AssociateEntry, AssociateValue};
pub use envelope::{FloatValue, IntegerValue, SequenceValue, StringValue};
pub use error::{SchemaError, WireError};
pub use message::Message;
pub use reader::{WireReader, WireValue};
pub use schema::{FieldDescriptor, FieldKind, MessageDescriptor, SchemaPool};
pub use wire_type::{MAX_FIELD_NUMBER, WireType};
pub use writer::WireWriter;
