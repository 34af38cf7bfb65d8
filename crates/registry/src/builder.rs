//! Open registration phase.
//!
//! # Invariants
//!
//! - Runtime IDs are assigned only by [`RegistryBuilder::freeze`], in
//!   registrator-creation order, then registration order within each
//!   registrator.
//! - No key is staged twice.
//! - `freeze` takes the builder by value, so no [`Registrator`] can outlive it
//!   and nothing can be registered afterwards.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;

use crate::{FxIndexMap, Registry, RegistryError, RegistryKey, RegistryObject, Result, RuntimeId};

/// Entries staged for one namespace.
struct Staging<T> {
	namespace: Arc<str>,
	entries: Mutex<FxIndexMap<RegistryKey, Arc<T>>>,
}

/// Collects registrations from any number of threads until frozen.
///
/// Lookups only exist on the frozen [`Registry`]; a builder cannot be queried:
///
/// ```compile_fail
/// use tesseract_registry::{RegistryBuilder, RegistryMeta, impl_registry_object};
///
/// struct Coin {
/// 	meta: RegistryMeta,
/// }
/// impl_registry_object!(Coin);
///
/// let builder = RegistryBuilder::<Coin>::new("item");
/// let _ = builder.get_by_id(1);
/// ```
///
/// and a registrator cannot be used once the builder is frozen:
///
/// ```compile_fail
/// use std::sync::Arc;
/// use tesseract_registry::{RegistryBuilder, RegistryKey, RegistryMeta, impl_registry_object};
///
/// struct Coin {
/// 	meta: RegistryMeta,
/// }
/// impl_registry_object!(Coin);
///
/// let builder = RegistryBuilder::<Coin>::new("item");
/// let core = builder.begin("core");
/// let _items = builder.freeze();
/// let key = RegistryKey::new("core", "coin").unwrap();
/// let _ = core.register(Arc::new(Coin { meta: RegistryMeta::new(key) }));
/// ```
pub struct RegistryBuilder<T: RegistryObject> {
	name: Arc<str>,
	staging: RwLock<FxIndexMap<Arc<str>, Arc<Staging<T>>>>,
}

impl<T: RegistryObject> RegistryBuilder<T> {
	/// Creates an empty builder for the registry called `name`.
	pub fn new(name: &str) -> Self {
		Self {
			name: Arc::from(name),
			staging: RwLock::new(FxIndexMap::default()),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the registrator for `namespace`, creating it on first use.
	///
	/// Repeated calls with the same namespace share one staging area.
	pub fn begin(&self, namespace: &str) -> Registrator<'_, T> {
		if let Some(staging) = self.staging.read().get(namespace) {
			return Registrator {
				builder: self,
				staging: Arc::clone(staging),
			};
		}

		let mut map = self.staging.write();
		let staging = map
			.entry(Arc::from(namespace))
			.or_insert_with(|| {
				tracing::debug!(registry = %self.name, namespace, "registrator created");
				Arc::new(Staging {
					namespace: Arc::from(namespace),
					entries: Mutex::new(FxIndexMap::default()),
				})
			})
			.clone();
		Registrator {
			builder: self,
			staging,
		}
	}

	/// Returns the number of entries staged so far across all namespaces.
	pub fn len(&self) -> usize {
		self.staging
			.read()
			.values()
			.map(|staging| staging.entries.lock().len())
			.sum()
	}

	/// Returns true if nothing has been staged yet.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Assigns runtime IDs and publishes every staged entry.
	///
	/// Fails without assigning anything if an entry was already frozen into
	/// another registry.
	pub fn freeze(self) -> Result<Registry<T>> {
		let staging = self.staging.into_inner();
		let entries: Vec<(RegistryKey, Arc<T>)> = staging
			.into_values()
			.flat_map(|staging| {
				let mut staged = staging.entries.lock();
				std::mem::take(&mut *staged)
			})
			.collect();

		// IDs are write-once, so a failure halfway through assignment cannot be
		// undone. Checking first leaves only a concurrent freeze of another
		// builder holding the same entry able to fail below.
		for (key, entry) in &entries {
			if let Some(id) = entry.runtime_id() {
				return Err(RegistryError::AlreadyRegistered {
					key: key.clone(),
					id,
				});
			}
		}

		let mut by_id = Vec::with_capacity(entries.len());
		let mut by_key = FxHashMap::with_capacity_and_hasher(entries.len(), Default::default());
		for (key, entry) in entries {
			let id = RuntimeId::from_index(by_id.len());
			if let Err(existing) = entry.meta().assign(id) {
				return Err(RegistryError::AlreadyRegistered { key, id: existing });
			}
			by_key.insert(key, id);
			by_id.push(entry);
		}

		tracing::debug!(registry = %self.name, entries = by_id.len(), "registry frozen");
		Ok(Registry::from_parts(self.name, by_id, by_key))
	}
}

/// Registers entries into one namespace of a [`RegistryBuilder`].
pub struct Registrator<'a, T: RegistryObject> {
	builder: &'a RegistryBuilder<T>,
	staging: Arc<Staging<T>>,
}

impl<T: RegistryObject> Clone for Registrator<'_, T> {
	fn clone(&self) -> Self {
		Self {
			builder: self.builder,
			staging: Arc::clone(&self.staging),
		}
	}
}

impl<T: RegistryObject> Registrator<'_, T> {
	pub fn namespace(&self) -> &str {
		&self.staging.namespace
	}

	pub fn registry_name(&self) -> &str {
		self.builder.name()
	}

	/// Stages `entry`. It becomes visible once the builder is frozen.
	pub fn register(&self, entry: Arc<T>) -> Result<()> {
		let key = entry.registry_key();
		if !key.matches_registry(&self.builder.name) {
			return Err(RegistryError::ForeignRegistry {
				key: key.clone(),
				registry: self.builder.name.clone(),
			});
		}
		if key.namespace() != &*self.staging.namespace {
			return Err(RegistryError::ForeignNamespace {
				key: key.clone(),
				namespace: self.staging.namespace.clone(),
			});
		}
		if let Some(id) = entry.runtime_id() {
			return Err(RegistryError::AlreadyRegistered {
				key: key.clone(),
				id,
			});
		}

		let mut entries = self.staging.entries.lock();
		match entries.entry(key.without_registry_name()) {
			indexmap::map::Entry::Occupied(o) => Err(RegistryError::DuplicateKey {
				key: o.key().clone(),
				registry: self.builder.name.clone(),
			}),
			indexmap::map::Entry::Vacant(v) => {
				v.insert(entry);
				Ok(())
			}
		}
	}

	/// Stages each entry in order, stopping at the first failure.
	pub fn register_all<I>(&self, entries: I) -> Result<()>
	where
		I: IntoIterator<Item = Arc<T>>,
	{
		entries.into_iter().try_for_each(|entry| self.register(entry))
	}

	/// Returns the number of entries staged in this namespace.
	pub fn len(&self) -> usize {
		self.staging.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
