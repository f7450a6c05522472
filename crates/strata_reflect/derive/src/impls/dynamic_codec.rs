use proc_macro2::TokenStream;
use quote::quote_spanned;

use super::reflect::codec_where_clause;
use crate::derive_data::ReflectStruct;

/// Generate a `Codec` implementation through the dynamic schema when the
/// type carries `#[reflect(dynamic)]`.
pub(crate) fn get_dynamic_codec_impl(rs: &ReflectStruct, reflect_path: &syn::Path) -> TokenStream {
    let Some(span) = rs.attrs.dynamic else {
        return TokenStream::new();
    };

    let codec_ = crate::path::codec_(reflect_path);
    let alloc_utils_ = crate::path::alloc_utils_(reflect_path);
    let ident = rs.ident;
    let where_clause = codec_where_clause(rs, reflect_path);
    let (impl_generics, ty_generics, _) = rs.generics.split_for_impl();

    quote_spanned! { span =>
        impl #impl_generics #codec_::Codec for #ident #ty_generics #where_clause {
            const SHAPE: #codec_::Shape = #codec_::Shape::UserDefined;

            #[inline]
            fn encode(
                &self,
                cx: &#codec_::Context<'_>,
            ) -> ::core::result::Result<#alloc_utils_::Vec<u8>, #reflect_path::CodecError> {
                #codec_::encode_dynamic(self, cx)
            }

            #[inline]
            fn decode(
                &mut self,
                bytes: &[u8],
                cx: &#codec_::Context<'_>,
            ) -> ::core::result::Result<(), #reflect_path::CodecError> {
                #codec_::decode_dynamic(self, bytes, cx)
            }
        }
    }
}
