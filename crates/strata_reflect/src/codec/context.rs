use crate::CodecError;
use crate::schema::SchemaRegistry;

/// What a container does with an element that fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ElementPolicy {
    /// Drop the element and keep going. The failure is logged at `debug`.
    #[default]
    Skip,
    /// Fail the whole container with [`CodecError::Element`].
    Fail,
}

/// Runtime codec options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CodecConfig {
    pub element_policy: ElementPolicy,
}

impl CodecConfig {
    #[inline]
    pub const fn new() -> Self {
        Self {
            element_policy: ElementPolicy::Skip,
        }
    }

    #[inline]
    pub const fn with_element_policy(mut self, policy: ElementPolicy) -> Self {
        self.element_policy = policy;
        self
    }
}

/// State threaded through every [`Codec`](super::Codec) call.
///
/// Holds the optional [`SchemaRegistry`] used by dynamic-schema types and the
/// [`CodecConfig`]. Cheap to copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Context<'a> {
    schemas: Option<&'a SchemaRegistry>,
    config: CodecConfig,
}

impl<'a> Context<'a> {
    /// A context without schemas and with the default config.
    #[inline]
    pub const fn new() -> Self {
        Self {
            schemas: None,
            config: CodecConfig::new(),
        }
    }

    #[inline]
    pub const fn with_schemas(schemas: &'a SchemaRegistry) -> Self {
        Self {
            schemas: Some(schemas),
            config: CodecConfig::new(),
        }
    }

    #[inline]
    pub const fn with_config(mut self, config: CodecConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    pub const fn schemas(&self) -> Option<&'a SchemaRegistry> {
        self.schemas
    }

    #[inline]
    pub const fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Applies the element policy to a failed element.
    pub(crate) fn element_failed(&self, index: usize, source: CodecError) -> Result<(), CodecError> {
        match self.config.element_policy {
            ElementPolicy::Skip => {
                log::debug!("skipping container element {index}: {source}");
                Ok(())
            }
            ElementPolicy::Fail => Err(CodecError::element(index, source)),
        }
    }
}
