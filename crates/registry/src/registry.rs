use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{RegistryError, RegistryKey, RegistryObject, Result, RuntimeId};

/// Frozen registry with O(1) lookup by runtime ID and by key.
///
/// Produced by [`RegistryBuilder::freeze`](crate::RegistryBuilder::freeze)
/// and never mutated afterwards, so it can be shared freely across threads.
pub struct Registry<T: RegistryObject> {
	name: Arc<str>,
	by_id: Vec<Arc<T>>,
	by_key: FxHashMap<RegistryKey, RuntimeId>,
}

impl<T: RegistryObject> Registry<T> {
	pub(crate) fn from_parts(
		name: Arc<str>,
		by_id: Vec<Arc<T>>,
		by_key: FxHashMap<RegistryKey, RuntimeId>,
	) -> Self {
		Self { name, by_id, by_key }
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Looks up an entry by its typed runtime ID.
	#[inline]
	pub fn get(&self, id: RuntimeId) -> Option<&Arc<T>> {
		self.by_id.get(id.index())
	}

	/// Looks up an entry by raw runtime ID; anything outside `1..=len` is absent.
	#[inline]
	pub fn try_get_by_id(&self, id: u32) -> Option<&Arc<T>> {
		RuntimeId::new(id).and_then(|id| self.get(id))
	}

	pub fn get_by_id(&self, id: u32) -> Result<&Arc<T>> {
		self.try_get_by_id(id)
			.ok_or_else(|| RegistryError::UnknownId {
				registry: self.name.clone(),
				id,
			})
	}

	/// Resolves `key` to a runtime ID.
	///
	/// A key naming a different registry is an error; a missing key is `Ok(None)`.
	pub fn try_get_id(&self, key: &RegistryKey) -> Result<Option<RuntimeId>> {
		if !key.matches_registry(&self.name) {
			return Err(RegistryError::ForeignRegistry {
				key: key.clone(),
				registry: self.name.clone(),
			});
		}
		Ok(self.by_key.get(key).copied())
	}

	/// Looks up an entry by key.
	///
	/// A key naming a different registry is an error; a missing key is `Ok(None)`.
	pub fn try_get_by_key(&self, key: &RegistryKey) -> Result<Option<&Arc<T>>> {
		Ok(self.try_get_id(key)?.and_then(|id| self.get(id)))
	}

	pub fn get_by_key(&self, key: &RegistryKey) -> Result<&Arc<T>> {
		self.try_get_by_key(key)?
			.ok_or_else(|| RegistryError::UnknownKey {
				registry: self.name.clone(),
				key: key.clone(),
			})
	}

	pub fn contains_key(&self, key: &RegistryKey) -> bool {
		matches!(self.try_get_id(key), Ok(Some(_)))
	}

	/// Returns true if `entry` is the object this registry holds under its runtime ID.
	pub fn contains(&self, entry: &T) -> bool {
		entry
			.runtime_id()
			.and_then(|id| self.get(id))
			.is_some_and(|held| std::ptr::eq(Arc::as_ptr(held), entry))
	}

	/// All entries in runtime ID order.
	#[inline]
	pub fn entries(&self) -> &[Arc<T>] {
		&self.by_id
	}

	/// Iterates `(runtime ID, entry)` pairs in ID order.
	pub fn iter(&self) -> impl Iterator<Item = (RuntimeId, &Arc<T>)> + '_ {
		self.by_id
			.iter()
			.enumerate()
			.map(|(index, entry)| (RuntimeId::from_index(index), entry))
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}
}

impl<T: RegistryObject> core::fmt::Debug for Registry<T> {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Registry")
			.field("name", &self.name)
			.field("len", &self.by_id.len())
			.finish()
	}
}
