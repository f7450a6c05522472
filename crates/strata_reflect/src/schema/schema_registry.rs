use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::fmt::{self, Write};
use core::marker::PhantomData;

use strata_utils::TypeIdMap;
use strata_utils::hash::HashMap;
use strata_wire::SchemaPool;

use crate::SchemaError;
use crate::codec::Codec;
use crate::registry::{Property, Struct, StructRegistry};
use crate::schema::mapping::BuildMapping;
use crate::schema::{MappingInfo, SchemaMapping};

// -----------------------------------------------------------------------------
// SchemaRegistry

/// Schema mappings and the pool their message schemas live in.
///
/// Mappings are declared during startup, then materialized with
/// [`build_all`](Self::build_all). A [`Context`](crate::codec::Context)
/// built [`with_schemas`](crate::codec::Context::with_schemas) lets
/// dynamic-schema types encode through their built schema.
///
/// # Example
///
/// ```
/// use strata_reflect::codec::Context;
/// use strata_reflect::impl_dynamic_codec;
/// use strata_reflect::schema::SchemaRegistry;
///
/// #[derive(Default, Debug, PartialEq)]
/// struct Weapon {
///     kind: u32,
///     name: String,
/// }
/// impl_dynamic_codec!(Weapon);
///
/// let mut schemas = SchemaRegistry::new();
/// schemas
///     .declare::<Weapon>("Weapon", None)
///     .unwrap()
///     .property("type", |w| &w.kind, |w| &mut w.kind, 1)
///     .property("name", |w| &w.name, |w| &mut w.name, 2);
/// schemas.build_all().unwrap();
///
/// assert_eq!(
///     schemas.schema_text::<Weapon>().unwrap(),
///     "message WeaponDynProto {\n  optional bytes type = 1;\n  optional bytes name = 2;\n}\n",
/// );
///
/// let cx = Context::with_schemas(&schemas);
/// let w = Weapon { kind: 22, name: "Blade".into() };
/// let bytes = strata_reflect::serialize_with(&w, &cx).unwrap();
///
/// let mut back = Weapon::default();
/// strata_reflect::deserialize_with(&mut back, &bytes, &cx).unwrap();
/// assert_eq!(back, w);
/// ```
#[derive(Default)]
pub struct SchemaRegistry {
    mappings: Vec<Box<dyn BuildMapping>>,
    by_type: TypeIdMap<usize>,
    by_name: HashMap<Box<str>, usize>,
    pool: SchemaPool,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for mapping in &self.mappings {
            list.entry(&(mapping.source_name(), mapping.target_name(), mapping.is_built()));
        }
        list.finish()
    }
}

impl SchemaRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a mapping for `T` with its own properties.
    ///
    /// `target` names the message and defaults to `source` + `"DynProto"`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateMapping`] if `T` or `source` is already
    /// mapped.
    pub fn declare<T: 'static>(
        &mut self,
        source: &str,
        target: Option<&str>,
    ) -> Result<MappingBuilder<'_, T>, SchemaError> {
        let desc = Arc::new(Struct::<T>::new(source));
        let index = self.insert(SchemaMapping::new(source, target, desc, false))?;
        Ok(MappingBuilder {
            registry: self,
            index,
            _marker: PhantomData,
        })
    }

    /// Declares a mapping for `T` sharing its descriptor in `structs`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::StructNotFound`] if `T` is not reflected, or
    /// [`SchemaError::DuplicateMapping`].
    pub fn map<T: 'static>(
        &mut self,
        structs: &StructRegistry,
        target: Option<&str>,
    ) -> Result<(), SchemaError> {
        let Some(desc) = structs.shared::<T>() else {
            log::warn!("cannot map `{}`: type is not reflected", type_name::<T>());
            return Err(SchemaError::StructNotFound(type_name::<T>()));
        };
        let source = Box::<str>::from(desc.name());
        self.insert(SchemaMapping::new(&source, target, desc, true))?;
        Ok(())
    }

    fn insert<T: 'static>(&mut self, mapping: SchemaMapping<T>) -> Result<usize, SchemaError> {
        let source = mapping.source_name();
        if self.by_type.contains_type::<T>() || self.by_name.contains_key(source) {
            log::warn!("schema mapping for `{source}` ({}) already exists", type_name::<T>());
            return Err(SchemaError::DuplicateMapping(source.into()));
        }

        let index = self.mappings.len();
        self.by_type.insert_type::<T>(index);
        self.by_name.insert(source.into(), index);
        self.mappings.push(Box::new(mapping));
        Ok(index)
    }

    /// Builds every declared mapping, in declaration order.
    ///
    /// Built mappings are skipped, so calling this again only builds what
    /// was declared since. Stops at the first failure; mappings built
    /// before it stay built.
    pub fn build_all(&mut self) -> Result<(), SchemaError> {
        for mapping in &mut self.mappings {
            mapping.build(&mut self.pool)?;
        }
        Ok(())
    }

    /// Builds the mapping of `T` alone.
    pub fn build<T: 'static>(&mut self) -> Result<(), SchemaError> {
        let index = *self
            .by_type
            .get_type::<T>()
            .ok_or(SchemaError::MappingNotFound(type_name::<T>()))?;
        self.mappings[index].build(&mut self.pool)
    }

    pub fn mapping<T: 'static>(&self) -> Option<&SchemaMapping<T>> {
        let index = *self.by_type.get_type::<T>()?;
        let info: &dyn MappingInfo = &*self.mappings[index];
        info.downcast_ref()
    }

    pub fn mapping_by_name(&self, source: &str) -> Option<&dyn MappingInfo> {
        let index = *self.by_name.get(source)?;
        Some(&*self.mappings[index])
    }

    pub fn mapping_by_type_id(&self, type_id: TypeId) -> Option<&dyn MappingInfo> {
        let index = *self.by_type.get(&type_id)?;
        Some(&*self.mappings[index])
    }

    /// Mappings in declaration order.
    pub fn mappings(&self) -> impl ExactSizeIterator<Item = &dyn MappingInfo> {
        self.mappings.iter().map(|m| &**m as &dyn MappingInfo)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// The pool holding every built message schema.
    #[inline]
    pub fn pool(&self) -> &SchemaPool {
        &self.pool
    }

    /// Definition text of the built schema of `T`.
    pub fn schema_text<T: 'static>(&self) -> Option<String> {
        let index = *self.by_type.get_type::<T>()?;
        Some(self.mappings[index].message()?.definition())
    }

    pub fn schema_text_by_name(&self, source: &str) -> Option<String> {
        Some(self.mapping_by_name(source)?.message()?.definition())
    }

    /// Writes the definition of every built schema, in declaration order.
    ///
    /// Each one is preceded by a `// Source -> Target` line and followed by
    /// a blank line.
    pub fn write_definitions(&self, out: &mut impl Write) -> fmt::Result {
        for mapping in &self.mappings {
            let Some(message) = mapping.message() else {
                continue;
            };
            writeln!(out, "// {} -> {}", mapping.source_name(), mapping.target_name())?;
            message.write_definition(out)?;
            out.write_char('\n')?;
        }
        Ok(())
    }

    pub fn definitions(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_definitions(&mut out);
        out
    }

    fn mapping_mut<T: 'static>(&mut self, index: usize) -> Option<&mut SchemaMapping<T>> {
        let any: &mut dyn Any = &mut **self.mappings.get_mut(index)?;
        any.downcast_mut()
    }
}

// -----------------------------------------------------------------------------
// MappingBuilder

/// Adds properties to a mapping declared with [`SchemaRegistry::declare`].
pub struct MappingBuilder<'r, T: 'static> {
    registry: &'r mut SchemaRegistry,
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T: 'static> MappingBuilder<'r, T> {
    /// Registers one property, with the rules of
    /// [`StructBuilder::property`](crate::registry::StructBuilder::property).
    pub fn property<P: Codec + 'static>(
        mut self,
        name: &str,
        get: fn(&T) -> &P,
        get_mut: fn(&mut T) -> &mut P,
        tag: u16,
    ) -> Self {
        match self.desc_mut() {
            Some(desc) => {
                desc.add_property(Property::new(name, get, get_mut, tag));
            }
            None => log::warn!(
                "`{}` is already built, property `{name}` ignored",
                type_name::<T>()
            ),
        }
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        if let Some(desc) = self.desc_mut() {
            desc.set_version(version);
        }
        self
    }

    /// Builds this mapping right away.
    pub fn done(self) -> Result<(), SchemaError> {
        self.registry.mappings[self.index].build(&mut self.registry.pool)
    }

    fn desc_mut(&mut self) -> Option<&mut Struct<T>> {
        self.registry.mapping_mut::<T>(self.index)?.desc_mut()
    }
}
