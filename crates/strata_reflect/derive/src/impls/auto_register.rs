use proc_macro2::TokenStream;

use crate::derive_data::ReflectStruct;

/// Generate the `inventory` submission for `#[reflect(auto_register)]`.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(rs: &ReflectStruct, reflect_path: &syn::Path) -> TokenStream {
    let Some(span) = rs.attrs.auto_register else {
        return TokenStream::new();
    };

    let auto_register_ = crate::path::auto_register_(reflect_path);
    let ident = rs.ident;

    quote::quote_spanned! { span =>
        #auto_register_::inventory::submit!{
            #auto_register_::__AutoRegisterFunc(
                #auto_register_::__register::<#ident>
            )
        }
    }
}

#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ReflectStruct, _: &syn::Path) -> TokenStream {
    TokenStream::new()
}
