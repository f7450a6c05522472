use proc_macro2::Span;
use syn::{Attribute, LitInt, LitStr, meta::ParseNestedMeta, spanned::Spanned};

use crate::REFLECT_ATTRIBUTE_NAME;

/// Options given through `#[reflect(...)]` on the type itself.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    pub name: Option<LitStr>,
    pub version: Option<u32>,
    pub auto_register: Option<Span>,
    pub dynamic: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
        }

        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        let span = meta.path.span();

        if meta.path.is_ident("name") {
            let lit: LitStr = meta.value()?.parse()?;
            if lit.value().is_empty() {
                return Err(syn::Error::new(lit.span(), "the name must not be empty"));
            }
            set_once(&mut self.name, lit, &meta, "name")
        } else if meta.path.is_ident("version") {
            let lit: LitInt = meta.value()?.parse()?;
            set_once(&mut self.version, lit.base10_parse()?, &meta, "version")
        } else if meta.path.is_ident("auto_register") {
            set_once(&mut self.auto_register, span, &meta, "auto_register")
        } else if meta.path.is_ident("dynamic") {
            set_once(&mut self.dynamic, span, &meta, "dynamic")
        } else {
            Err(meta.error(
                "unknown attribute, expected one of: `name`, `version`, `auto_register`, `dynamic`",
            ))
        }
    }
}

pub(super) fn set_once<T>(
    slot: &mut Option<T>,
    value: T,
    meta: &ParseNestedMeta<'_>,
    what: &str,
) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error(format_args!("`{what}` is specified more than once")));
    }
    *slot = Some(value);
    Ok(())
}
