use proc_macro2::Span;
use syn::{Attribute, LitInt, LitStr, meta::ParseNestedMeta, spanned::Spanned};

use super::type_attributes::set_once;
use crate::REFLECT_ATTRIBUTE_NAME;

/// Options given through `#[reflect(...)]` on a field.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub tag: Option<u16>,
    pub rename: Option<LitStr>,
    pub skip: bool,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
        }

        if this.skip && (this.tag.is_some() || this.rename.is_some()) {
            let attr = attrs
                .iter()
                .find(|attr| attr.path().is_ident(REFLECT_ATTRIBUTE_NAME));
            let span = attr.map_or_else(Span::call_site, Spanned::span);
            return Err(syn::Error::new(
                span,
                "`skip` cannot be combined with `tag` or `rename`",
            ));
        }

        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("tag") {
            let lit: LitInt = meta.value()?.parse()?;
            let tag: u16 = lit
                .base10_parse()
                .map_err(|_| syn::Error::new(lit.span(), "a tag must fit in `u16`"))?;
            set_once(&mut self.tag, tag, &meta, "tag")
        } else if meta.path.is_ident("rename") {
            let lit: LitStr = meta.value()?.parse()?;
            if lit.value().is_empty() {
                return Err(syn::Error::new(lit.span(), "a property name must not be empty"));
            }
            set_once(&mut self.rename, lit, &meta, "rename")
        } else if meta.path.is_ident("skip") {
            if self.skip {
                return Err(meta.error("`skip` is specified more than once"));
            }
            self.skip = true;
            Ok(())
        } else {
            Err(meta.error("unknown attribute, expected one of: `tag`, `rename`, `skip`"))
        }
    }
}
