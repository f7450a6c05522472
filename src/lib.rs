#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use strata_reflect as reflect;
pub use strata_utils as utils;
pub use strata_wire as wire;

/// The items most programs need.
pub mod prelude {
    pub use strata_reflect::codec::{Codec, CodecConfig, Context, ElementPolicy};
    pub use strata_reflect::registry::{Reflect, StructRegistry};
    pub use strata_reflect::schema::SchemaRegistry;
    pub use strata_reflect::{Archiver, CodecError, deserialize, serialize};

    #[cfg(feature = "derive")]
    #[cfg_attr(docsrs, doc(cfg(feature = "derive")))]
    pub use strata_reflect::derive::Reflect;
}
