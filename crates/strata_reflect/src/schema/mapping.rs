use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use strata_wire::{FieldDescriptor, MessageDescriptor, SchemaPool};

use crate::SchemaError;
use crate::registry::{Struct, StructInfo};

// -----------------------------------------------------------------------------
// MappingInfo

/// Type-erased view of a [`SchemaMapping`].
pub trait MappingInfo: Any + Send + Sync {
    /// Name of the record type (the file the schema is declared in).
    fn source_name(&self) -> &str;

    /// Name of the synthesized message.
    fn target_name(&self) -> &str;

    /// The built message schema, `None` while only declared.
    fn message(&self) -> Option<&Arc<MessageDescriptor>>;

    fn struct_info(&self) -> &dyn StructInfo;

    /// `true` if the descriptor is shared with a [`StructRegistry`].
    ///
    /// [`StructRegistry`]: crate::registry::StructRegistry
    fn is_shared(&self) -> bool;

    #[inline]
    fn is_built(&self) -> bool {
        self.message().is_some()
    }
}

pub(crate) trait BuildMapping: MappingInfo {
    fn build(&mut self, pool: &mut SchemaPool) -> Result<(), SchemaError>;
}

// -----------------------------------------------------------------------------
// SchemaMapping

/// Binds a record type to a message schema synthesized from its properties.
///
/// Each property becomes one optional `bytes` field numbered by its tag and
/// holding the property's own encoding. Nested structure is therefore not
/// visible in the schema.
pub struct SchemaMapping<T: 'static> {
    source: Box<str>,
    target: Box<str>,
    desc: Arc<Struct<T>>,
    shared: bool,
    message: Option<Arc<MessageDescriptor>>,
}

impl<T: 'static> SchemaMapping<T> {
    pub(crate) fn new(source: &str, target: Option<&str>, desc: Arc<Struct<T>>, shared: bool) -> Self {
        let target = match target {
            Some(name) if !name.is_empty() => name.into(),
            _ => format!("{source}DynProto").into_boxed_str(),
        };
        Self {
            source: source.into(),
            target,
            desc,
            shared,
            message: None,
        }
    }

    #[inline]
    pub fn struct_desc(&self) -> &Struct<T> {
        &self.desc
    }

    /// The struct descriptor, if the mapping has not been built yet.
    pub(crate) fn desc_mut(&mut self) -> Option<&mut Struct<T>> {
        if self.message.is_some() {
            return None;
        }
        Some(Arc::make_mut(&mut self.desc))
    }
}

impl<T: 'static> MappingInfo for SchemaMapping<T> {
    #[inline]
    fn source_name(&self) -> &str {
        &self.source
    }

    #[inline]
    fn target_name(&self) -> &str {
        &self.target
    }

    #[inline]
    fn message(&self) -> Option<&Arc<MessageDescriptor>> {
        self.message.as_ref()
    }

    #[inline]
    fn struct_info(&self) -> &dyn StructInfo {
        &*self.desc
    }

    #[inline]
    fn is_shared(&self) -> bool {
        self.shared
    }
}

impl<T: 'static> BuildMapping for SchemaMapping<T> {
    fn build(&mut self, pool: &mut SchemaPool) -> Result<(), SchemaError> {
        if self.message.is_some() {
            return Ok(());
        }

        let mut fields = Vec::with_capacity(self.desc.property_count());
        for prop in self.desc.properties() {
            if prop.tag() == 0 {
                return Err(SchemaError::UntaggedProperty {
                    mapping: self.source.clone(),
                    property: prop.name().into(),
                });
            }
            fields.push(FieldDescriptor::bytes(prop.name(), u32::from(prop.tag())));
        }

        let file = format!("{}.proto", self.source);
        let message = pool.build_message(&self.target, &file, fields)?;
        log::trace!("built schema `{}` for `{}`", self.target, self.source);

        self.message = Some(message);
        Ok(())
    }
}

impl dyn MappingInfo {
    pub fn downcast_ref<T: 'static>(&self) -> Option<&SchemaMapping<T>> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }
}
