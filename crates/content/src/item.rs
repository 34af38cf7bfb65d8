use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tesseract_registry::{RegistryKey, RegistryMeta, impl_registry_object};

use crate::{ItemDataManager, ItemStack};

/// Name of the registry items are registered into.
pub const ITEM_REGISTRY: &str = "item";

/// Static per-item properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ItemProperties {
	#[serde(deserialize_with = "at_least_one")]
	max_stack_size: u32,
}

impl ItemProperties {
	/// A `max_stack_size` of `0` is raised to `1`.
	pub fn new(max_stack_size: u32) -> Self {
		Self {
			max_stack_size: max_stack_size.max(1),
		}
	}

	pub fn max_stack_size(&self) -> u32 {
		self.max_stack_size
	}
}

impl Default for ItemProperties {
	fn default() -> Self {
		Self { max_stack_size: 64 }
	}
}

fn at_least_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
	Ok(u32::deserialize(deserializer)?.max(1))
}

/// Item-specific reactions to stack interactions.
pub trait ItemBehavior: Send + Sync {
	/// Handles `applied` being dropped onto `target` when the two stacks hold
	/// different items. Returns true if anything changed.
	fn apply_item_stack(&self, target: &mut ItemStack, applied: &mut ItemStack) -> bool {
		let _ = (target, applied);
		false
	}

	/// Value of `stack` when used as currency.
	fn currency_value(&self, stack: &ItemStack) -> u64 {
		let _ = stack;
		0
	}
}

/// Behavior of items that do nothing special.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBehavior;

impl ItemBehavior for DefaultBehavior {}

/// A kind of item. Stacks refer to items by `Arc`, and two stacks hold the
/// same item only if they point at the same registered instance.
pub struct Item {
	meta: RegistryMeta,
	properties: ItemProperties,
	data_manager: Option<Arc<dyn ItemDataManager>>,
	behavior: Arc<dyn ItemBehavior>,
}

impl_registry_object!(Item);

impl Item {
	pub fn new(key: RegistryKey) -> Self {
		Self::with_properties(key, ItemProperties::default())
	}

	pub fn with_properties(key: RegistryKey, properties: ItemProperties) -> Self {
		Self {
			meta: RegistryMeta::new(key),
			properties,
			data_manager: None,
			behavior: Arc::new(DefaultBehavior),
		}
	}

	pub fn with_data_manager(mut self, manager: impl ItemDataManager + 'static) -> Self {
		self.data_manager = Some(Arc::new(manager));
		self
	}

	pub fn with_behavior(mut self, behavior: impl ItemBehavior + 'static) -> Self {
		self.behavior = Arc::new(behavior);
		self
	}

	pub fn key(&self) -> &RegistryKey {
		self.meta.key()
	}

	pub fn properties(&self) -> &ItemProperties {
		&self.properties
	}

	#[inline]
	pub fn max_stack_size(&self) -> u32 {
		self.properties.max_stack_size
	}

	pub fn data_manager(&self) -> Option<&dyn ItemDataManager> {
		self.data_manager.as_deref()
	}

	pub fn behavior(&self) -> &dyn ItemBehavior {
		&*self.behavior
	}
}

impl core::fmt::Debug for Item {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Item")
			.field("key", self.meta.key())
			.field("runtime_id", &self.meta.runtime_id())
			.field("properties", &self.properties)
			.field("has_data", &self.data_manager.is_some())
			.finish()
	}
}
