use std::num::NonZeroU32;
use std::sync::OnceLock;

use crate::RegistryKey;

/// Dense, 1-based identifier assigned to an entry when its registry is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuntimeId(NonZeroU32);

impl RuntimeId {
	/// Returns `None` for `0`, which is never a valid runtime ID.
	#[inline]
	pub const fn new(raw: u32) -> Option<Self> {
		match NonZeroU32::new(raw) {
			Some(id) => Some(Self(id)),
			None => None,
		}
	}

	/// Returns the underlying u32 value.
	#[inline]
	pub const fn get(self) -> u32 {
		self.0.get()
	}

	/// Position of this entry in the dense table.
	#[inline]
	pub(crate) const fn index(self) -> usize {
		(self.0.get() - 1) as usize
	}

	/// # Panics
	///
	/// If `index` does not fit in a u32. Registries never approach that size.
	#[inline]
	pub(crate) fn from_index(index: usize) -> Self {
		u32::try_from(index + 1)
			.ok()
			.and_then(Self::new)
			.expect("registry exceeds u32::MAX entries")
	}
}

impl From<RuntimeId> for u32 {
	fn from(id: RuntimeId) -> Self {
		id.get()
	}
}

impl core::fmt::Display for RuntimeId {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "RuntimeId({})", self.0)
	}
}

/// Identity shared by every registrable object: its key and, once frozen,
/// its runtime ID.
#[derive(Debug)]
pub struct RegistryMeta {
	key: RegistryKey,
	id: OnceLock<RuntimeId>,
}

impl RegistryMeta {
	pub fn new(key: RegistryKey) -> Self {
		Self {
			key,
			id: OnceLock::new(),
		}
	}

	pub fn key(&self) -> &RegistryKey {
		&self.key
	}

	/// Returns the runtime ID, or `None` before the owning registry is frozen.
	pub fn runtime_id(&self) -> Option<RuntimeId> {
		self.id.get().copied()
	}

	/// Assigns the runtime ID. Returns the existing ID if one was already set.
	pub(crate) fn assign(&self, id: RuntimeId) -> Result<(), RuntimeId> {
		self.id.set(id).map_err(|_| self.id.get().copied().unwrap_or(id))
	}
}

/// Anything that can be stored in a registry.
///
/// Implement through [`impl_registry_object!`](crate::impl_registry_object)
/// for types with a `meta: RegistryMeta` field.
pub trait RegistryObject: Send + Sync + 'static {
	fn meta(&self) -> &RegistryMeta;

	/// The key this object is registered under.
	fn registry_key(&self) -> &RegistryKey {
		self.meta().key()
	}

	/// The runtime ID, or `None` before freezing.
	fn runtime_id(&self) -> Option<RuntimeId> {
		self.meta().runtime_id()
	}
}

/// Implements [`RegistryObject`] for a type with a `meta: RegistryMeta` field.
#[macro_export]
macro_rules! impl_registry_object {
	($type:ty) => {
		impl $crate::RegistryObject for $type {
			fn meta(&self) -> &$crate::RegistryMeta {
				&self.meta
			}
		}
	};
}
