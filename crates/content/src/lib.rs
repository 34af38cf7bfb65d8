//! Game content on top of [`tesseract_registry`].
//!
//! [`Item`] and [`Material`] are registry objects. [`ItemStack`] holds a
//! clamped count of one item plus optional item-specific data, and knows how
//! to merge, split and persist itself through a [`RegistryIdMap`].
//!
//! Content can be declared in code or in TOML [`ContentPack`] files.
//!
//! [`RegistryIdMap`]: tesseract_registry::RegistryIdMap

mod data;
mod error;
mod item;
mod material;
mod pack;
mod stack;

pub use data::{ItemData, ItemDataCodec, ItemDataManager, ItemDataValue};
pub use error::{ContentError, ItemDataError, ItemStackError, Result};
pub use item::{DefaultBehavior, ITEM_REGISTRY, Item, ItemBehavior, ItemProperties};
pub use material::{MATERIAL_REGISTRY, Material, MaterialProperties};
pub use pack::{ContentPack, ItemDef, MaterialDef};
pub use stack::ItemStack;

// Used only by the integration tests.
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tracing_subscriber as _;
