use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{WhereClause, parse_quote, spanned::Spanned};

use crate::derive_data::ReflectStruct;

/// Generate the `Reflect` implementation.
///
/// `declare` chains one `property` call per field onto the registry's
/// builder. The accessor closures capture nothing, so they coerce to the
/// `fn` pointers `property` expects.
pub(crate) fn get_reflect_impl(rs: &ReflectStruct, reflect_path: &syn::Path) -> TokenStream {
    let registry_ = crate::path::registry_(reflect_path);
    let ident = rs.ident;
    let name = rs.struct_name();

    let version = rs.attrs.version.map(|version| {
        quote! { .version(#version) }
    });

    let properties = rs.fields.iter().map(|field| {
        let member = field.ident;
        let property_name = field.property_name();
        let tag = field.tag();
        quote_spanned! { field.ty.span() =>
            .property(
                #property_name,
                |__obj| &__obj.#member,
                |__obj| &mut __obj.#member,
                #tag,
            )
        }
    });

    let where_clause = codec_where_clause(rs, reflect_path);
    let (impl_generics, ty_generics, _) = rs.generics.split_for_impl();

    quote! {
        impl #impl_generics #reflect_path::Reflect for #ident #ty_generics #where_clause {
            fn declare(registry: &mut #registry_::StructRegistry) {
                registry
                    .declare::<Self>(#name)
                    #version
                    #(#properties)*;
            }
        }
    }
}

/// The input's where clause, extended for generic types with
/// `Self: 'static` and a `Codec` bound on every reflected field type.
pub(super) fn codec_where_clause(rs: &ReflectStruct, reflect_path: &syn::Path) -> WhereClause {
    let codec_ = crate::path::codec_(reflect_path);

    let mut where_clause = rs
        .generics
        .where_clause
        .clone()
        .unwrap_or_else(|| WhereClause {
            where_token: Default::default(),
            predicates: Default::default(),
        });

    if !rs.generics.params.is_empty() {
        where_clause.predicates.push(parse_quote! { Self: 'static });
        for field in &rs.fields {
            let ty = field.ty;
            where_clause
                .predicates
                .push(parse_quote! { #ty: #codec_::Codec + 'static });
        }
    }

    where_clause
}
