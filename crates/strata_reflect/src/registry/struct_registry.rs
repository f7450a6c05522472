use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::{Any, TypeId, type_name};
use core::fmt;
use core::marker::PhantomData;

use strata_utils::TypeIdMap;
use strata_utils::hash::HashMap;

use crate::codec::Codec;
use crate::registry::{Property, Struct, StructInfo};

// -----------------------------------------------------------------------------
// Reflect

/// A record type that can describe itself to a [`StructRegistry`].
///
/// Usually implemented by [`#[derive(Reflect)]`](crate::derive::Reflect).
pub trait Reflect: Sized + 'static {
    /// Declares the type and its properties.
    fn declare(registry: &mut StructRegistry);
}

// -----------------------------------------------------------------------------
// StructRegistry

/// The set of reflected record types, by type and by name.
///
/// Filled during startup through `&mut` access, then shared read-only.
/// Descriptors are reference counted, so [schema mappings] can hold on to
/// them; re-declaring a type that is already shared copies its descriptor
/// first and leaves the shared one unchanged.
///
/// # Example
///
/// ```
/// use strata_reflect::registry::StructRegistry;
///
/// #[derive(Default)]
/// struct Weapon {
///     kind: u32,
///     name: String,
/// }
///
/// let mut registry = StructRegistry::new();
/// registry
///     .declare::<Weapon>("Weapon")
///     .version(1)
///     .property("type", |w| &w.kind, |w| &mut w.kind, 1)
///     .property("name", |w| &w.name, |w| &mut w.name, 2);
///
/// let desc = registry.struct_by_type::<Weapon>().unwrap();
/// let mut w = desc.new_instance();
/// desc.set(&mut w, "name", String::from("Blade")).unwrap();
/// assert_eq!(w.name, "Blade");
///
/// let info = registry.info_by_name("Weapon").unwrap();
/// assert_eq!(info.property_count(), 2);
/// ```
///
/// [schema mappings]: crate::schema::SchemaRegistry::map
#[derive(Default)]
pub struct StructRegistry {
    structs: TypeIdMap<Arc<dyn StructInfo>>,
    names: HashMap<Box<str>, TypeId>,
}

impl fmt::Debug for StructRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.structs.values().map(|info| info.name()))
            .finish()
    }
}

impl StructRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts or resumes the declaration of `T`.
    ///
    /// The first declaration fixes the name; later ones reuse the existing
    /// descriptor and ignore `name`. A name already taken by another type is
    /// not indexed and a warning is logged.
    pub fn declare<T: 'static>(&mut self, name: &str) -> StructBuilder<'_, T> {
        let type_id = TypeId::of::<T>();
        if !self.structs.contains(&type_id) {
            if self.names.contains_key(name) {
                log::warn!(
                    "struct name `{name}` is taken, `{}` is only reachable by type",
                    type_name::<T>()
                );
            } else {
                self.names.insert(name.into(), type_id);
            }
            self.structs.insert(type_id, Arc::new(Struct::<T>::new(name)));
        }
        StructBuilder {
            registry: self,
            _marker: PhantomData,
        }
    }

    /// Declares `T` through its [`Reflect`] impl, unless already present.
    ///
    /// Returns `true` if `T` was newly registered.
    pub fn register<T: Reflect>(&mut self) -> bool {
        if self.contains::<T>() {
            return false;
        }
        T::declare(self);
        true
    }

    /// Registers every type marked `#[reflect(auto_register)]`.
    ///
    /// Returns the number of newly registered types. Always `0` without the
    /// `auto_register` feature.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> usize {
        #[cfg(feature = "auto_register")]
        {
            crate::__macro_exports::auto_register::__register_types(self)
        }
        #[cfg(not(feature = "auto_register"))]
        {
            0
        }
    }

    #[inline]
    pub fn contains<T: 'static>(&self) -> bool {
        self.structs.contains_type::<T>()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.structs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.structs.is_empty()
    }

    pub fn struct_by_type<T: 'static>(&self) -> Option<&Struct<T>> {
        self.structs
            .get_type::<T>()
            .and_then(|info| (**info).downcast_ref::<T>())
    }

    /// Looks `name` up and checks that it describes `T`.
    pub fn struct_by_name<T: 'static>(&self, name: &str) -> Option<&Struct<T>> {
        self.info_by_name(name)?.downcast_ref::<T>()
    }

    pub fn info_by_name(&self, name: &str) -> Option<&dyn StructInfo> {
        let type_id = self.names.get(name)?;
        self.structs.get(type_id).map(|info| &**info)
    }

    pub fn info_by_type_id(&self, type_id: TypeId) -> Option<&dyn StructInfo> {
        self.structs.get(&type_id).map(|info| &**info)
    }

    /// All descriptors, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn StructInfo> {
        self.structs.values().map(|info| &**info)
    }

    /// A shared handle to the descriptor of `T`.
    pub fn shared<T: 'static>(&self) -> Option<Arc<Struct<T>>> {
        let info = Arc::clone(self.structs.get_type::<T>()?);
        let any: Arc<dyn Any + Send + Sync> = info;
        any.downcast().ok()
    }

    /// Mutable access to the descriptor of `T`, copying it first if shared.
    fn struct_mut<T: 'static>(&mut self) -> Option<&mut Struct<T>> {
        let info = self.structs.get_mut_type::<T>()?;
        if Arc::get_mut(info).is_none() {
            let copy = (**info).downcast_ref::<T>()?.clone();
            *info = Arc::new(copy);
        }
        let any: &mut dyn Any = Arc::get_mut(info)?;
        any.downcast_mut()
    }
}

// -----------------------------------------------------------------------------
// StructBuilder

/// Adds properties to a declared type. See [`StructRegistry::declare`].
pub struct StructBuilder<'r, T: 'static> {
    registry: &'r mut StructRegistry,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T: 'static> StructBuilder<'r, T> {
    /// Registers one property.
    ///
    /// A repeated name is ignored and logged at `debug`. A non-zero tag
    /// used by another property is rejected and logged at `warn`.
    pub fn property<P: Codec + 'static>(
        self,
        name: &str,
        get: fn(&T) -> &P,
        get_mut: fn(&mut T) -> &mut P,
        tag: u16,
    ) -> Self {
        if let Some(desc) = self.registry.struct_mut::<T>() {
            desc.add_property(Property::new(name, get, get_mut, tag));
        }
        self
    }

    pub fn version(self, version: u32) -> Self {
        if let Some(desc) = self.registry.struct_mut::<T>() {
            desc.set_version(version);
        }
        self
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Reflect, StructRegistry};
    use alloc::string::String;

    #[derive(Default)]
    struct Weapon {
        kind: u32,
        name: String,
    }

    impl Reflect for Weapon {
        fn declare(registry: &mut StructRegistry) {
            registry
                .declare::<Self>("Weapon")
                .property("type", |w| &w.kind, |w| &mut w.kind, 1)
                .property("name", |w| &w.name, |w| &mut w.name, 2);
        }
    }

    struct Other;

    #[test]
    fn lookup_by_type_and_name() {
        let mut registry = StructRegistry::new();
        assert!(registry.register::<Weapon>());
        assert!(!registry.register::<Weapon>());

        assert!(registry.struct_by_type::<Weapon>().is_some());
        assert!(registry.struct_by_name::<Weapon>("Weapon").is_some());
        assert!(registry.struct_by_name::<Other>("Weapon").is_none());
        assert!(registry.info_by_name("Nope").is_none());

        let info = registry.info_by_name("Weapon").unwrap();
        let tags: alloc::vec::Vec<_> = info.property_infos().map(|p| p.tag).collect();
        assert_eq!(tags, [1, 2]);
        assert_eq!(info.record_type_name(), core::any::type_name::<Weapon>());
    }

    #[test]
    fn redeclare_extends() {
        let mut registry = StructRegistry::new();
        registry.register::<Weapon>();
        registry
            .declare::<Weapon>("Ignored")
            .version(3)
            .property("type", |w| &w.kind, |w| &mut w.kind, 7);

        let desc = registry.struct_by_type::<Weapon>().unwrap();
        assert_eq!(desc.name(), "Weapon");
        assert_eq!(desc.version(), 3);
        assert_eq!(desc.property_count(), 2);
        assert_eq!(desc.property_by_name("type").unwrap().tag(), 1);
    }

    #[test]
    fn shared_descriptor_is_copied_on_write() {
        let mut registry = StructRegistry::new();
        registry.register::<Weapon>();
        let shared = registry.shared::<Weapon>().unwrap();

        registry.declare::<Weapon>("Weapon").version(2);
        assert_eq!(shared.version(), 0);
        assert_eq!(registry.struct_by_type::<Weapon>().unwrap().version(), 2);
    }

    #[test]
    fn name_clash_keeps_first() {
        let mut registry = StructRegistry::new();
        registry.register::<Weapon>();
        registry.declare::<Other>("Weapon");
        assert!(registry.contains::<Other>());
        assert!(registry.struct_by_name::<Weapon>("Weapon").is_some());
        assert_eq!(registry.len(), 2);
    }
}
