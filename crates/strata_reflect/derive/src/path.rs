//! Paths into `strata_reflect` used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `strata_reflect` crate.
///
/// The path depends on what the deriving crate depends on, so the builder's
/// `Cargo.toml` is scanned:
///
/// 1. A crate depending on `strata_reflect` gets `::strata_reflect`.
/// 2. A crate depending on `strata_core` gets `::strata_core::reflect`.
/// 3. Anything else gets `::strata_reflect`, which may be wrong.
///
/// This touches the file system, so callers resolve it once and pass it on.
pub(crate) fn strata_reflect() -> syn::Path {
    strata_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("strata_reflect"))
}

#[inline(always)]
pub(crate) fn registry_(reflect_path: &syn::Path) -> TokenStream {
    quote! { #reflect_path::registry }
}

#[inline(always)]
pub(crate) fn codec_(reflect_path: &syn::Path) -> TokenStream {
    quote! { #reflect_path::codec }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(reflect_path: &syn::Path) -> TokenStream {
    quote! { #reflect_path::__macro_exports::auto_register }
}

#[inline(always)]
pub(crate) fn alloc_utils_(reflect_path: &syn::Path) -> TokenStream {
    quote! { #reflect_path::__macro_exports::alloc_utils }
}
