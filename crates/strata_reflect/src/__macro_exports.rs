//! Paths used by generated code. Not public API.

pub mod alloc_utils {
    pub use ::alloc::boxed::Box;
    pub use ::alloc::vec::Vec;
}

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::Reflect;
    use crate::registry::StructRegistry;

    pub use inventory;

    /// A `declare` entry point submitted by `#[reflect(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut StructRegistry) -> bool);

    inventory::collect!(__AutoRegisterFunc);

    /// Registration function handed to [`__AutoRegisterFunc`].
    pub fn __register<T: Reflect>(registry: &mut StructRegistry) -> bool {
        registry.register::<T>()
    }

    /// Runs every submitted entry point and returns how many types were new.
    pub(crate) fn __register_types(registry: &mut StructRegistry) -> usize {
        inventory::iter::<__AutoRegisterFunc>
            .into_iter()
            .filter(|func| (func.0)(registry))
            .count()
    }
}
