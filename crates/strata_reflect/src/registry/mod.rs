//! Reflection registry: named, typed, ordered properties of record types.
//!
//! ## Menu
//!
//! - [`Property`]: one member of a record, with its accessors and codec.
//! - [`Struct`]: the ordered property list of one record type.
//! - [`StructInfo`]: type-erased view of a [`Struct`].
//! - [`StructRegistry`]: descriptors by type and by name.
//! - [`Reflect`]: self-declaring record types, see
//!   [`derive::Reflect`](crate::derive::Reflect).
//!
//! ## auto_register
//!
//! Types deriving `Reflect` with `#[reflect(auto_register)]` are collected at
//! link time through [`inventory`](https://docs.rs/inventory) and declared by
//! [`StructRegistry::auto_register`]. Not every platform supports this; where
//! it is unsupported, or without the `auto_register` feature, nothing is
//! registered.

// -----------------------------------------------------------------------------
// Modules

mod property;
mod struct_desc;
mod struct_registry;

// -----------------------------------------------------------------------------
// Exports

pub use property::{Property, PropertyInfo};
pub use struct_desc::{Struct, StructInfo};
pub use struct_registry::{Reflect, StructBuilder, StructRegistry};
