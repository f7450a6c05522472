//! Dynamic schema synthesis.
//!
//! A [`SchemaMapping`] turns the reflected properties of a record type into
//! a runtime message schema: one optional `bytes` field per property,
//! numbered by the property's tag. The field carries the property encoded
//! with its own codec, so any property type works, at the cost of the
//! schema not describing nested structure.
//!
//! Mappings live in a [`SchemaRegistry`] and go through two phases:
//! declared (properties may still be added) and built (the message schema
//! exists in the registry's pool and the type can be encoded).
//!
//! Types opt into this encoding with [`impl_dynamic_codec!`] or
//! `#[reflect(dynamic)]`.
//!
//! [`impl_dynamic_codec!`]: crate::impl_dynamic_codec

// -----------------------------------------------------------------------------
// Modules

mod mapping;
mod schema_registry;

// -----------------------------------------------------------------------------
// Exports

pub use mapping::{MappingInfo, SchemaMapping};
pub use schema_registry::{MappingBuilder, SchemaRegistry};

// -----------------------------------------------------------------------------
// Tests
