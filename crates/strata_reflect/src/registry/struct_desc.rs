use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::fmt;

use strata_utils::hash::HashMap;

use crate::AccessError;
use crate::registry::{Property, PropertyInfo};

// -----------------------------------------------------------------------------
// StructInfo

/// Type-erased, read-only view of a [`Struct`] descriptor.
///
/// Obtained from [`StructRegistry::info_by_name`] when the record type is
/// not known statically.
///
/// [`StructRegistry::info_by_name`]: crate::registry::StructRegistry::info_by_name
pub trait StructInfo: Any + Send + Sync {
    fn name(&self) -> &str;

    /// `TypeId` of the described record type.
    fn record_type_id(&self) -> TypeId;

    fn record_type_name(&self) -> &'static str;

    fn version(&self) -> u32;

    fn property_count(&self) -> usize;

    /// The property at `index`, in declaration order.
    fn property_info(&self, index: usize) -> Option<PropertyInfo<'_>>;

    fn property_info_by_name(&self, name: &str) -> Option<PropertyInfo<'_>>;
}

impl dyn StructInfo {
    /// Properties in declaration order.
    pub fn property_infos(&self) -> impl Iterator<Item = PropertyInfo<'_>> + '_ {
        (0..self.property_count()).filter_map(|i| self.property_info(i))
    }

    /// Downcasts to the typed descriptor.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&Struct<T>> {
        let any: &dyn Any = self;
        any.downcast_ref()
    }
}

// -----------------------------------------------------------------------------
// Struct

/// The reflected description of a record type `T`.
///
/// Properties keep their declaration order. Names are unique, and so are
/// non-zero tags.
pub struct Struct<T: 'static> {
    name: Box<str>,
    version: u32,
    properties: Vec<Property<T>>,
    by_name: HashMap<Box<str>, usize>,
    by_tag: BTreeMap<u16, usize>,
}

impl<T: 'static> Clone for Struct<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            version: self.version,
            properties: self.properties.clone(),
            by_name: self.by_name.clone(),
            by_tag: self.by_tag.clone(),
        }
    }
}

impl<T: 'static> fmt::Debug for Struct<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Struct")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("properties", &self.properties)
            .finish()
    }
}

impl<T: 'static> Struct<T> {
    pub fn new(name: impl Into<Box<str>>) -> Self {
        Self {
            name: name.into(),
            version: 0,
            properties: Vec::new(),
            by_name: HashMap::default(),
            by_tag: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Informational version tag.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    /// Adds `prop` unless its name or non-zero tag is already used.
    ///
    /// Returns `true` if the property was added.
    pub fn add_property(&mut self, prop: Property<T>) -> bool {
        if self.by_name.contains_key(prop.name()) {
            log::debug!(
                "`{}`: property `{}` already declared, keeping the first",
                self.name,
                prop.name()
            );
            return false;
        }

        if prop.tag() != 0
            && let Some(&index) = self.by_tag.get(&prop.tag())
        {
            log::warn!(
                "`{}`: tag {} of property `{}` is already used by `{}`, property ignored",
                self.name,
                prop.tag(),
                prop.name(),
                self.properties[index].name()
            );
            return false;
        }

        let index = self.properties.len();
        self.by_name.insert(prop.name().into(), index);
        if prop.tag() != 0 {
            self.by_tag.insert(prop.tag(), index);
        }
        self.properties.push(prop);
        true
    }

    /// Properties in declaration order.
    #[inline]
    pub fn properties(&self) -> core::slice::Iter<'_, Property<T>> {
        self.properties.iter()
    }

    #[inline]
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn has_property(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn property_by_name(&self, name: &str) -> Option<&Property<T>> {
        self.by_name.get(name).map(|&i| &self.properties[i])
    }

    /// Tag 0 never matches.
    pub fn property_by_tag(&self, tag: u16) -> Option<&Property<T>> {
        self.by_tag.get(&tag).map(|&i| &self.properties[i])
    }

    /// Reads property `name` of `obj` as a `P`.
    ///
    /// A missing property yields `P::default()`.
    ///
    /// # Errors
    ///
    /// [`AccessError::TypeMismatch`] if the property is not a `P`.
    pub fn get<P: Clone + Default + 'static>(&self, obj: &T, name: &str) -> Result<P, AccessError> {
        let Some(prop) = self.property_by_name(name) else {
            return Ok(P::default());
        };
        prop.get_as::<P>(obj)
            .cloned()
            .ok_or_else(|| prop.mismatch::<P>())
    }

    /// Writes property `name` of `obj`.
    ///
    /// A missing property is ignored.
    ///
    /// # Errors
    ///
    /// [`AccessError::TypeMismatch`] if the property is not a `P`.
    pub fn set<P: 'static>(&self, obj: &mut T, name: &str, value: P) -> Result<(), AccessError> {
        let Some(prop) = self.property_by_name(name) else {
            return Ok(());
        };
        match prop.get_mut_as::<P>(obj) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(prop.mismatch::<P>()),
        }
    }

    /// A default-constructed `T`.
    #[inline]
    pub fn new_instance(&self) -> T
    where
        T: Default,
    {
        T::default()
    }
}

impl<T: 'static> StructInfo for Struct<T> {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn record_type_id(&self) -> TypeId {
        TypeId::of::<T>()
    }

    #[inline]
    fn record_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    #[inline]
    fn version(&self) -> u32 {
        self.version
    }

    #[inline]
    fn property_count(&self) -> usize {
        self.properties.len()
    }

    fn property_info(&self, index: usize) -> Option<PropertyInfo<'_>> {
        self.properties.get(index).map(PropertyInfo::from)
    }

    fn property_info_by_name(&self, name: &str) -> Option<PropertyInfo<'_>> {
        self.property_by_name(name).map(PropertyInfo::from)
    }
}

// -----------------------------------------------------------------------------
// Tests
