//! Small shared utilities for the strata crates.
//!
//! - [`hash`]: `hashbrown` containers with deterministic hashing.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
