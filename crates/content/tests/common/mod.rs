//! Shared fixtures for content integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use tesseract_content::{ITEM_REGISTRY, Item, ItemDataCodec, ItemProperties};
use tesseract_data::{DataError, DataObject, DataSink};
use tesseract_registry::{Registry, RegistryBuilder, RegistryKey};

/// Enchantment level stored on tools.
pub struct Enchantment;

impl ItemDataCodec for Enchantment {
	type Value = String;

	fn default_value(&self) -> String {
		String::new()
	}

	fn decode(&self, data: &DataObject) -> Result<String, DataError> {
		data.get_as("Enchantment")
	}

	fn encode(&self, value: &String, sink: &mut dyn DataSink) {
		sink.put("Enchantment", value.as_str().into());
	}
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

pub fn key(s: &str) -> RegistryKey {
	RegistryKey::parse(s).expect("valid key")
}

/// Builds an item registry from `(key, max stack size)` pairs, one namespace
/// at a time in order of first appearance. Items named `*pick*` carry an
/// [`Enchantment`].
pub fn item_registry(defs: &[(&str, u32)]) -> Arc<Registry<Item>> {
	let builder = RegistryBuilder::new(ITEM_REGISTRY);
	for &(name, max) in defs {
		let key = key(name);
		let namespace = key.namespace().to_string();
		let mut item = Item::with_properties(key, ItemProperties::new(max));
		if name.contains("pick") {
			item = item.with_data_manager(Enchantment);
		}
		builder
			.begin(&namespace)
			.register(Arc::new(item))
			.expect("register item");
	}
	Arc::new(builder.freeze().expect("freeze item registry"))
}
