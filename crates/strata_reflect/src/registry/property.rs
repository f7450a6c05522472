use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId, type_name};
use core::fmt;

use crate::CodecError;
use crate::codec::{Codec, Context, Shape};

// -----------------------------------------------------------------------------
// Accessor

/// Type-erased view of a property's accessor pair and codec.
trait PropertyAccess<T>: Send + Sync {
    fn value<'a>(&self, obj: &'a T) -> &'a dyn Any;
    fn value_mut<'a>(&self, obj: &'a mut T) -> &'a mut dyn Any;
    fn encode(&self, obj: &T, cx: &Context<'_>) -> Result<Vec<u8>, CodecError>;
    fn decode(&self, obj: &mut T, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError>;
}

struct Accessor<T, P> {
    get: fn(&T) -> &P,
    get_mut: fn(&mut T) -> &mut P,
}

impl<T: 'static, P: Codec + 'static> PropertyAccess<T> for Accessor<T, P> {
    #[inline]
    fn value<'a>(&self, obj: &'a T) -> &'a dyn Any {
        (self.get)(obj)
    }

    #[inline]
    fn value_mut<'a>(&self, obj: &'a mut T) -> &'a mut dyn Any {
        (self.get_mut)(obj)
    }

    #[inline]
    fn encode(&self, obj: &T, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        (self.get)(obj).encode(cx)
    }

    #[inline]
    fn decode(&self, obj: &mut T, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
        (self.get_mut)(obj).decode(bytes, cx)
    }
}

// -----------------------------------------------------------------------------
// Property

/// A named, tagged, typed member of a record type `T`.
///
/// Holds the accessor pair and the codec of the member's type, so the
/// member can be read, written and encoded without knowing its type
/// statically.
pub struct Property<T: 'static> {
    name: Box<str>,
    tag: u16,
    value_type: TypeId,
    value_type_name: &'static str,
    shape: Shape,
    access: Arc<dyn PropertyAccess<T>>,
}

impl<T: 'static> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            tag: self.tag,
            value_type: self.value_type,
            value_type_name: self.value_type_name,
            shape: self.shape,
            access: Arc::clone(&self.access),
        }
    }
}

impl<T: 'static> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("type", &self.value_type_name)
            .field("shape", &self.shape)
            .finish()
    }
}

impl<T: 'static> Property<T> {
    /// Creates a property from an accessor pair.
    ///
    /// A `tag` of 0 marks the property untagged.
    pub fn new<P: Codec + 'static>(
        name: impl Into<Box<str>>,
        get: fn(&T) -> &P,
        get_mut: fn(&mut T) -> &mut P,
        tag: u16,
    ) -> Self {
        Self {
            name: name.into(),
            tag,
            value_type: TypeId::of::<P>(),
            value_type_name: type_name::<P>(),
            shape: P::SHAPE,
            access: Arc::new(Accessor { get, get_mut }),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag, `0` if untagged.
    #[inline]
    pub fn tag(&self) -> u16 {
        self.tag
    }

    #[inline]
    pub fn value_type_id(&self) -> TypeId {
        self.value_type
    }

    #[inline]
    pub fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn is_type<P: 'static>(&self) -> bool {
        self.value_type == TypeId::of::<P>()
    }

    /// The member of `obj` this property refers to.
    #[inline]
    pub fn value<'a>(&self, obj: &'a T) -> &'a dyn Any {
        self.access.value(obj)
    }

    #[inline]
    pub fn value_mut<'a>(&self, obj: &'a mut T) -> &'a mut dyn Any {
        self.access.value_mut(obj)
    }

    /// Typed access, `None` if `P` is not the member's type.
    #[inline]
    pub fn get_as<'a, P: 'static>(&self, obj: &'a T) -> Option<&'a P> {
        self.value(obj).downcast_ref()
    }

    #[inline]
    pub fn get_mut_as<'a, P: 'static>(&self, obj: &'a mut T) -> Option<&'a mut P> {
        self.value_mut(obj).downcast_mut()
    }

    /// Encodes the member alone with its own codec.
    #[inline]
    pub fn encode(&self, obj: &T, cx: &Context<'_>) -> Result<Vec<u8>, CodecError> {
        self.access.encode(obj, cx)
    }

    /// Decodes `bytes` into the member with its own codec.
    #[inline]
    pub fn decode(&self, obj: &mut T, bytes: &[u8], cx: &Context<'_>) -> Result<(), CodecError> {
        self.access.decode(obj, bytes, cx)
    }

    pub(crate) fn mismatch<P>(&self) -> crate::AccessError {
        crate::AccessError::TypeMismatch {
            property: self.name.clone(),
            stored: self.value_type_name,
            requested: type_name::<P>(),
        }
    }
}

// -----------------------------------------------------------------------------
// PropertyInfo

/// A type-erased summary of a [`Property`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInfo<'a> {
    pub name: &'a str,
    pub tag: u16,
    pub type_name: &'static str,
    pub type_id: TypeId,
    pub shape: Shape,
}

impl<'a, T: 'static> From<&'a Property<T>> for PropertyInfo<'a> {
    fn from(prop: &'a Property<T>) -> Self {
        Self {
            name: &prop.name,
            tag: prop.tag,
            type_name: prop.value_type_name,
            type_id: prop.value_type,
            shape: prop.shape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Property;
    use crate::codec::{Context, Shape};
    use alloc::string::String;

    #[derive(Default)]
    struct Weapon {
        kind: u32,
        name: String,
    }

    #[test]
    fn erased_access() {
        let kind = Property::<Weapon>::new("type", |w| &w.kind, |w| &mut w.kind, 1);
        let mut w = Weapon::default();

        *kind.get_mut_as::<u32>(&mut w).unwrap() = 22;
        assert_eq!(w.kind, 22);
        assert_eq!(kind.get_as::<u32>(&w), Some(&22));
        assert_eq!(kind.get_as::<i32>(&w), None);
        assert_eq!(kind.shape(), Shape::Integer);
        assert!(kind.is_type::<u32>());
    }

    #[test]
    fn bound_codec() {
        let name = Property::<Weapon>::new("name", |w| &w.name, |w| &mut w.name, 2);
        let cx = Context::new();

        let src = Weapon {
            kind: 0,
            name: String::from("Blade"),
        };
        let bytes = name.encode(&src, &cx).unwrap();

        let mut dst = Weapon::default();
        name.decode(&mut dst, &bytes, &cx).unwrap();
        assert_eq!(dst.name, "Blade");
    }
}
