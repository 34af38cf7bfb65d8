//! TOML content packs.
//!
//! A pack declares the items and materials of one namespace:
//!
//! ```toml
//! namespace = "core"
//!
//! [[items]]
//! path = "coin"
//! max_stack_size = 99
//!
//! [[materials]]
//! path = "iron"
//! density = 7874.0
//! electrical_conductor = true
//! ```
//!
//! Item and material properties that are left out keep their defaults.

use std::path::Path;
use std::sync::Arc;

use serde::de::{DeserializeOwned, Error as _, Unexpected};
use serde::{Deserialize, Deserializer};
use tesseract_registry::{RegistryBuilder, RegistryKey};

use crate::{ContentError, Item, ItemProperties, Material, MaterialProperties, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentPack {
	pub namespace: String,
	#[serde(default)]
	pub items: Vec<ItemDef>,
	#[serde(default)]
	pub materials: Vec<MaterialDef>,
}

#[derive(Debug, Clone)]
pub struct ItemDef {
	pub path: String,
	pub properties: ItemProperties,
}

#[derive(Debug, Clone)]
pub struct MaterialDef {
	pub path: String,
	pub properties: MaterialProperties,
}

impl<'de> Deserialize<'de> for ItemDef {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		let (path, properties) = split_path(deserializer)?;
		Ok(Self { path, properties })
	}
}

impl<'de> Deserialize<'de> for MaterialDef {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		let (path, properties) = split_path(deserializer)?;
		Ok(Self { path, properties })
	}
}

/// Reads a definition table as its `path` plus the remaining fields as `P`.
///
/// `P` sees only the property fields, so it can reject unknown ones.
fn split_path<'de, D, P>(deserializer: D) -> std::result::Result<(String, P), D::Error>
where
	D: Deserializer<'de>,
	P: DeserializeOwned,
{
	let mut table = toml::Table::deserialize(deserializer)?;
	let path = match table.remove("path") {
		Some(toml::Value::String(path)) => path,
		Some(other) => {
			return Err(D::Error::invalid_type(
				Unexpected::Other(other.type_str()),
				&"a string",
			));
		}
		None => return Err(D::Error::missing_field("path")),
	};
	let properties = toml::Value::Table(table)
		.try_into()
		.map_err(D::Error::custom)?;
	Ok((path, properties))
}

impl ContentPack {
	/// Parses a pack and validates every key it declares.
	pub fn from_toml_str(content: &str) -> Result<Self> {
		let pack: Self = toml::from_str(content)?;
		for path in pack
			.items
			.iter()
			.map(|def| &def.path)
			.chain(pack.materials.iter().map(|def| &def.path))
		{
			pack.key(path)?;
		}
		Ok(pack)
	}

	/// Loads a pack from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		let pack = Self::from_toml_str(&content)?;
		tracing::info!(
			path = %path.display(),
			namespace = %pack.namespace,
			items = pack.items.len(),
			materials = pack.materials.len(),
			"content pack loaded"
		);
		Ok(pack)
	}

	fn key(&self, path: &str) -> Result<RegistryKey> {
		Ok(RegistryKey::new(&self.namespace, path)?)
	}

	/// Registers every declared item under the pack's namespace.
	pub fn register_items(&self, builder: &RegistryBuilder<Item>) -> Result<()> {
		let registrator = builder.begin(&self.namespace);
		for def in &self.items {
			let item = Item::with_properties(self.key(&def.path)?, def.properties);
			registrator.register(Arc::new(item))?;
		}
		Ok(())
	}

	/// Registers every declared material under the pack's namespace.
	pub fn register_materials(&self, builder: &RegistryBuilder<Material>) -> Result<()> {
		let registrator = builder.begin(&self.namespace);
		for def in &self.materials {
			let material = Material::new(self.key(&def.path)?, def.properties.clone());
			registrator.register(Arc::new(material))?;
		}
		Ok(())
	}
}
