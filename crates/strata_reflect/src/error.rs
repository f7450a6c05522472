use alloc::boxed::Box;

use strata_wire::WireError;
use thiserror::Error;

/// An error raised by a [`Codec`](crate::codec::Codec).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CodecError {
    /// The envelope bytes could not be parsed.
    #[error("envelope parse failure: {0}")]
    Wire(#[from] WireError),
    /// The type uses a dynamic schema that is not built in the context.
    #[error("no built schema for `{0}`")]
    SchemaNotFound(&'static str),
    #[error("string value is not valid UTF-8")]
    InvalidUtf8,
    /// A container element failed under [`ElementPolicy::Fail`], or failed
    /// to encode.
    ///
    /// [`ElementPolicy::Fail`]: crate::codec::ElementPolicy::Fail
    #[error("element {index}: {source}")]
    Element {
        index: usize,
        source: Box<CodecError>,
    },
    #[error("property `{name}`: {source}")]
    Property {
        name: Box<str>,
        source: Box<CodecError>,
    },
    /// Raised by hand-written codecs.
    #[error("{0}")]
    Custom(Box<str>),
}

impl CodecError {
    pub fn custom(message: impl Into<Box<str>>) -> Self {
        Self::Custom(message.into())
    }

    pub(crate) fn element(index: usize, source: CodecError) -> Self {
        Self::Element {
            index,
            source: Box::new(source),
        }
    }

    pub(crate) fn property(name: &str, source: CodecError) -> Self {
        Self::Property {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

/// An error raised by typed property access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AccessError {
    #[error("property `{property}` holds `{stored}`, requested `{requested}`")]
    TypeMismatch {
        property: Box<str>,
        stored: &'static str,
        requested: &'static str,
    },
}

/// An error raised while declaring or building schema mappings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// The type or the source name already has a mapping.
    #[error("a schema mapping for `{0}` already exists")]
    DuplicateMapping(Box<str>),
    /// `map` was called for a type the struct registry does not know.
    #[error("no reflected struct for `{0}`")]
    StructNotFound(&'static str),
    #[error("no schema mapping for `{0}`")]
    MappingNotFound(&'static str),
    /// Dynamic schemas number their fields by tag, so tag 0 is unusable.
    #[error("property `{property}` of `{mapping}` has no tag")]
    UntaggedProperty {
        mapping: Box<str>,
        property: Box<str>,
    },
    #[error(transparent)]
    Pool(#[from] strata_wire::SchemaError),
}
