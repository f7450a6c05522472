mod auto_register;
mod dynamic_codec;
mod reflect;

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;

pub(crate) fn impl_reflect_struct(reflect_struct: &ReflectStruct) -> TokenStream {
    let reflect_path = crate::path::strata_reflect();

    let reflect_impl = reflect::get_reflect_impl(reflect_struct, &reflect_path);
    let codec_impl = dynamic_codec::get_dynamic_codec_impl(reflect_struct, &reflect_path);
    let auto_register = auto_register::get_auto_register_impl(reflect_struct, &reflect_path);

    quote! {
        #reflect_impl

        #codec_impl

        #auto_register
    }
}
