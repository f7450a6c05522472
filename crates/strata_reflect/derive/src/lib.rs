//! See [`Reflect`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Derive `Reflect`
///
/// Implements `strata_reflect::Reflect` for a struct with named fields. The
/// generated `declare` registers the struct under its name and one property
/// per field, in field order, with the field's accessors and codec. Every
/// field type must implement `Codec`.
///
/// ```rust, ignore
/// #[derive(Reflect, Default)]
/// #[reflect(name = "Weapon", version = 1, auto_register, dynamic)]
/// struct Weapon {
///     #[reflect(tag = 1, rename = "type")]
///     kind: u32,
///     #[reflect(tag = 2)]
///     name: String,
///     #[reflect(skip)]
///     cached_power: f32,
/// }
/// ```
///
/// ## Type attributes
///
/// - `name = "..."`: the registered name. Defaults to the type's identifier.
/// - `version = N`: informational version tag.
/// - `auto_register`: submit the type for
///   `StructRegistry::auto_register`. Requires the `auto_register` feature;
///   a no-op otherwise. Not available for generic types.
/// - `dynamic`: also implement `Codec` through the type's dynamic schema
///   (see `impl_dynamic_codec!`). The type must then be mapped in the
///   `SchemaRegistry` it is encoded with.
///
/// ## Field attributes
///
/// - `tag = N`: the property tag (`u16`). Untagged properties (tag 0) cannot
///   be part of a dynamic schema.
/// - `rename = "..."`: the property name. Defaults to the field identifier.
/// - `skip`: do not reflect this field.
#[proc_macro_derive(Reflect, attributes(reflect))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectStruct::from_derive_input(&ast) {
        Ok(reflect_struct) => impls::impl_reflect_struct(&reflect_struct).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
