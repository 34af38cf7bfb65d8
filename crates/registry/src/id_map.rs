//! Translation between runtime IDs and the IDs recorded in a save.
//!
//! # Role
//!
//! Runtime IDs follow registration order, which changes whenever content is
//! added or removed. Saves store compact integer save IDs instead, together
//! with the `key -> save ID` table exported by [`RegistryIdMap::export`].
//! Importing that table on load rebuilds the translation.
//!
//! # Invariants
//!
//! - Save ID `0` is never assigned.
//! - A live entry has exactly one save ID for the lifetime of the map.
//! - Keys from the save that no longer resolve stay in the table as tombstones
//!   ([`SaveSlot::Removed`]) and are exported again, so content that comes back
//!   later recovers its old save ID.

use std::sync::Arc;

use tesseract_data::{DataBox, DataObject, DataSink};

use crate::{FxIndexMap, IdMapError, Registry, RegistryKey, RegistryObject, RuntimeId};

/// Largest save ID accepted from save data. Larger values are treated as
/// corrupt so a damaged save cannot force huge table allocations.
pub const MAX_SAVE_ID: u32 = (1 << 24) - 1;

/// What a save ID currently refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveSlot {
	/// The save ID was never assigned.
	#[default]
	Unmapped,
	/// The save referenced content that no longer exists.
	Removed,
	/// The save ID maps to a live entry.
	Live(RuntimeId),
}

/// Bidirectional runtime ID / save ID mapping for one registry and one save.
pub struct RegistryIdMap<T: RegistryObject> {
	registry: Arc<Registry<T>>,
	/// Persistent save ID table, tombstones included. Indexed by canonical
	/// key string so keys that differ only in registry name stay distinct.
	saved: FxIndexMap<Box<str>, (RegistryKey, u32)>,
	/// Indexed by raw runtime ID; slot 0 is unused.
	reg_to_save: Vec<Option<u32>>,
	/// Indexed by save ID; slot 0 is always `Unmapped`.
	save_to_reg: Vec<SaveSlot>,
}

/// Writes `value` at `index`, growing `map` with `filler` as needed.
fn put_slot<S: Clone>(map: &mut Vec<S>, index: usize, filler: S, value: S) {
	if index >= map.len() {
		map.resize(index + 1, filler);
	}
	map[index] = value;
}

impl<T: RegistryObject> RegistryIdMap<T> {
	/// Creates a map for a new save: every entry gets a fresh save ID.
	pub fn new(registry: Arc<Registry<T>>) -> Self {
		let mut map = Self {
			registry,
			saved: FxIndexMap::default(),
			reg_to_save: Vec::new(),
			save_to_reg: Vec::new(),
		};
		map.reset();
		map
	}

	pub fn registry(&self) -> &Arc<Registry<T>> {
		&self.registry
	}

	/// Forgets all save history; the map behaves as for a new save.
	pub fn reset(&mut self) {
		self.initialize(std::iter::empty());
	}

	fn clear(&mut self) {
		self.saved.clear();
		self.reg_to_save.clear();
		self.save_to_reg.clear();
	}

	/// Rebuilds the mapping from the `(key, save ID)` pairs recorded by a save.
	///
	/// Pairs whose key still resolves become live mappings; the rest become
	/// tombstones. Entries the save did not know about get fresh save IDs past
	/// the largest one seen. Malformed pairs are skipped.
	pub fn initialize<I>(&mut self, pairs: I)
	where
		I: IntoIterator<Item = (RegistryKey, u32)>,
	{
		self.clear();
		let registry = Arc::clone(&self.registry);
		let mut live = 0usize;
		let mut removed = 0usize;

		for (key, save_id) in pairs {
			if save_id == 0 || save_id > MAX_SAVE_ID {
				tracing::warn!(registry = registry.name(), %key, save_id, "ignoring out-of-range save ID");
				continue;
			}
			let key = if key.matches_registry(registry.name()) {
				key.without_registry_name()
			} else {
				key
			};
			if self.saved.contains_key(key.as_str()) {
				tracing::warn!(registry = registry.name(), %key, save_id, "ignoring duplicate key in saved ID map");
				continue;
			}
			if self.slot(save_id) != SaveSlot::Unmapped {
				tracing::warn!(registry = registry.name(), %key, save_id, "ignoring duplicate save ID in saved ID map");
				continue;
			}

			let slot = match registry.try_get_id(&key) {
				Ok(Some(id)) => {
					put_slot(&mut self.reg_to_save, id.get() as usize, None, Some(save_id));
					live += 1;
					SaveSlot::Live(id)
				}
				Ok(None) | Err(_) => {
					tracing::debug!(registry = registry.name(), %key, save_id, "saved entry no longer registered");
					removed += 1;
					SaveSlot::Removed
				}
			};
			put_slot(&mut self.save_to_reg, save_id as usize, SaveSlot::Unmapped, slot);
			self.saved.insert(key.as_str().into(), (key, save_id));
		}

		let added = self.assign_missing();
		tracing::debug!(registry = registry.name(), live, removed, added, "ID map initialized");
	}

	/// Gives every live entry without a save ID a fresh one, in runtime ID order.
	fn assign_missing(&mut self) -> usize {
		let registry = Arc::clone(&self.registry);
		let mut next = self.save_to_reg.len().max(1);
		let mut added = 0;
		for (id, entry) in registry.iter() {
			if self.reg_to_save.get(id.get() as usize).copied().flatten().is_some() {
				continue;
			}
			// Registries stay far below MAX_SAVE_ID, so the cast cannot truncate.
			let save_id = next as u32;
			put_slot(&mut self.reg_to_save, id.get() as usize, None, Some(save_id));
			put_slot(&mut self.save_to_reg, next, SaveSlot::Unmapped, SaveSlot::Live(id));
			let key = entry.registry_key().without_registry_name();
			self.saved.insert(key.as_str().into(), (key, save_id));
			next += 1;
			added += 1;
		}
		added
	}

	/// Rebuilds the mapping from an exported table of `key -> Int` entries.
	///
	/// Entries with unparsable keys or non-integer values are skipped.
	pub fn import(&mut self, data: &DataObject) {
		let registry_name = self.registry.name().to_string();
		let pairs: Vec<(RegistryKey, u32)> = data
			.iter()
			.filter_map(|(name, value)| {
				let key = match RegistryKey::parse(name) {
					Ok(key) => key,
					Err(error) => {
						tracing::warn!(registry = %registry_name, %error, "skipping saved ID map entry");
						return None;
					}
				};
				match value.as_int().and_then(|v| u32::try_from(v).ok()) {
					Some(save_id) => Some((key, save_id)),
					None => {
						tracing::warn!(registry = %registry_name, %key, %value, "skipping saved ID map entry with invalid ID");
						None
					}
				}
			})
			.collect();
		self.initialize(pairs);
	}

	/// Writes the `key -> save ID` table, tombstones included.
	pub fn export(&self, sink: &mut dyn DataSink) {
		for (name, &(_, save_id)) in &self.saved {
			sink.put(name, DataBox::Int(i64::from(save_id)));
		}
	}

	/// Iterates the `key -> save ID` table, tombstones included.
	pub fn saved_ids(&self) -> impl Iterator<Item = (&RegistryKey, u32)> + '_ {
		self.saved.values().map(|(key, id)| (key, *id))
	}

	/// Returns what `save_id` refers to.
	pub fn slot(&self, save_id: u32) -> SaveSlot {
		self.save_to_reg
			.get(save_id as usize)
			.copied()
			.unwrap_or_default()
	}

	/// Resolves a save ID to the live entry, if there still is one.
	pub fn load(&self, save_id: u32) -> Option<&Arc<T>> {
		match self.slot(save_id) {
			SaveSlot::Live(id) => self.registry.get(id),
			SaveSlot::Unmapped | SaveSlot::Removed => None,
		}
	}

	/// Returns the save ID for a live entry of the mapped registry.
	pub fn store(&self, entry: &T) -> Result<u32, IdMapError> {
		let key = entry.registry_key();
		let id = entry
			.runtime_id()
			.ok_or_else(|| IdMapError::Unregistered { key: key.clone() })?;
		if !self.registry.contains(entry) {
			return Err(self.not_mapped(key));
		}
		self.reg_to_save
			.get(id.get() as usize)
			.copied()
			.flatten()
			.ok_or_else(|| self.not_mapped(key))
	}

	fn not_mapped(&self, key: &RegistryKey) -> IdMapError {
		IdMapError::NotMapped {
			key: key.clone(),
			registry: Arc::from(self.registry.name()),
		}
	}
}

impl<T: RegistryObject> core::fmt::Debug for RegistryIdMap<T> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("RegistryIdMap")
			.field("registry", &self.registry.name())
			.field("saved", &self.saved.len())
			.finish()
	}
}
