//! Namespaced object registries.
//!
//! Content (items, materials, ...) is registered into a [`RegistryBuilder`]
//! from any number of threads, one [`Registrator`] per namespace. Freezing
//! the builder consumes it and produces an immutable [`Registry`] in which
//! every entry has a dense, 1-based [`RuntimeId`] and can be looked up by ID
//! or by [`RegistryKey`].
//!
//! Runtime IDs depend on registration order and are therefore not stored in
//! save files directly. A [`RegistryIdMap`] translates between runtime IDs and
//! the save IDs recorded by a particular save, keeping tombstones for content
//! that has since been removed.
//!
//! ```
//! use std::sync::Arc;
//! use tesseract_registry::{RegistryBuilder, RegistryKey, RegistryMeta, impl_registry_object};
//!
//! struct Block {
//! 	meta: RegistryMeta,
//! }
//! impl_registry_object!(Block);
//!
//! let builder = RegistryBuilder::new("block");
//! let core = builder.begin("core");
//! core.register(Arc::new(Block { meta: RegistryMeta::new(RegistryKey::new("core", "stone")?) }))?;
//! core.register(Arc::new(Block { meta: RegistryMeta::new(RegistryKey::new("core", "dirt")?) }))?;
//!
//! let blocks = builder.freeze()?;
//! assert_eq!(blocks.get_by_id(2)?.meta.key().path(), "dirt");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod builder;
mod error;
mod id_map;
mod key;
pub mod namespace;
mod object;
mod registry;

pub use builder::{Registrator, RegistryBuilder};
pub use error::{IdMapError, KeyError, RegistryError, Result};
pub use id_map::{MAX_SAVE_ID, RegistryIdMap, SaveSlot};
pub use key::{DELIMITER, RegistryKey};
pub use object::{RegistryMeta, RegistryObject, RuntimeId};
pub use registry::Registry;

type FxIndexMap<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;

#[cfg(test)]
pub(crate) mod test_fixtures;
