use syn::{
    Data, DeriveInput, Fields, Generics, Ident, LitStr, Type, ext::IdentExt, spanned::Spanned,
};

use super::{FieldAttributes, TypeAttributes};

/// A reflected field.
pub(crate) struct ReflectField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl ReflectField<'_> {
    /// The registered property name.
    pub fn property_name(&self) -> LitStr {
        match &self.attrs.rename {
            Some(name) => name.clone(),
            None => LitStr::new(&self.ident.unraw().to_string(), self.ident.span()),
        }
    }

    pub fn tag(&self) -> u16 {
        self.attrs.tag.unwrap_or(0)
    }
}

/// Everything the derive needs to know about the input struct.
pub(crate) struct ReflectStruct<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    pub attrs: TypeAttributes,
    /// Reflected fields in declaration order, `skip`ped ones excluded.
    pub fields: Vec<ReflectField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn from_derive_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                Fields::Unnamed(fields) => {
                    return Err(syn::Error::new(
                        fields.span(),
                        "`Reflect` cannot be derived for tuple structs, use named fields",
                    ));
                }
                Fields::Unit => {
                    return Err(syn::Error::new(
                        ast.ident.span(),
                        "`Reflect` cannot be derived for unit structs",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "`Reflect` can only be derived for structs",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "`Reflect` can only be derived for structs",
                ));
            }
        };

        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        let mut errors: Option<syn::Error> = None;
        let mut fields = Vec::with_capacity(named.named.len());
        let mut seen_tags: Vec<(u16, &Ident)> = Vec::new();

        for field in &named.named {
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            let field_attrs = match FieldAttributes::parse_attrs(&field.attrs) {
                Ok(field_attrs) => field_attrs,
                Err(err) => {
                    combine(&mut errors, err);
                    continue;
                }
            };
            if field_attrs.skip {
                continue;
            }
            if let Some(tag) = field_attrs.tag
                && tag != 0
            {
                if let Some((_, other)) = seen_tags.iter().find(|(t, _)| *t == tag) {
                    combine(
                        &mut errors,
                        syn::Error::new(
                            ident.span(),
                            format_args!("tag {tag} is already used by field `{other}`"),
                        ),
                    );
                    continue;
                }
                seen_tags.push((tag, ident));
            }
            fields.push(ReflectField {
                ident,
                ty: &field.ty,
                attrs: field_attrs,
            });
        }

        if let Some(err) = errors {
            return Err(err);
        }

        if attrs.auto_register.is_some() && !ast.generics.params.is_empty() {
            return Err(syn::Error::new(
                ast.generics.span(),
                "`auto_register` is not supported for generic types, register each instantiation manually",
            ));
        }

        Ok(Self {
            ident: &ast.ident,
            generics: &ast.generics,
            attrs,
            fields,
        })
    }

    /// The registered struct name.
    pub fn struct_name(&self) -> LitStr {
        match &self.attrs.name {
            Some(name) => name.clone(),
            None => LitStr::new(&self.ident.unraw().to_string(), self.ident.span()),
        }
    }
}

fn combine(slot: &mut Option<syn::Error>, err: syn::Error) {
    match slot {
        Some(prev) => prev.combine(err),
        None => *slot = Some(err),
    }
}
