use std::sync::Arc;

use crate::{RegistryBuilder, RegistryKey, RegistryMeta, impl_registry_object};

#[derive(Debug)]
pub(crate) struct Block {
	pub meta: RegistryMeta,
	pub hardness: u8,
}

impl_registry_object!(Block);

pub(crate) fn block(key: &str) -> Arc<Block> {
	block_with(key, 0)
}

pub(crate) fn block_with(key: &str, hardness: u8) -> Arc<Block> {
	Arc::new(Block {
		meta: RegistryMeta::new(RegistryKey::parse(key).unwrap()),
		hardness,
	})
}

/// Registers `keys` (all `namespace:path`) in order, one registrator per namespace.
pub(crate) fn builder_with(keys: &[&str]) -> RegistryBuilder<Block> {
	let builder = RegistryBuilder::new("block");
	for key in keys {
		let entry = block(key);
		let namespace = entry.meta.key().namespace().to_string();
		builder.begin(&namespace).register(entry).unwrap();
	}
	builder
}
