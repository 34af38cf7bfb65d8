use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::KeyError;
use crate::namespace;

/// Separator between the segments of a key.
pub const DELIMITER: char = ':';

/// Namespaced identifier of a registry entry: `[registry:]namespace:path`.
///
/// The registry name is semantic only. Two keys are equal when their
/// namespace and path match, unless both carry a registry name and those
/// names differ. Hashing ignores the registry name for the same reason.
#[derive(Clone)]
pub struct RegistryKey {
	registry: Option<Arc<str>>,
	namespace: Arc<str>,
	path: Arc<str>,
	full: Arc<str>,
}

impl RegistryKey {
	/// Parses `path`, `namespace:path` or `registry:namespace:path`.
	///
	/// A key with a single segment lives in the current namespace (see
	/// [`namespace::current`]).
	pub fn parse(s: &str) -> Result<Self, KeyError> {
		let segments: Vec<&str> = s.split(DELIMITER).collect();
		if segments.len() > 3 {
			return Err(KeyError::TooManySegments(s.to_string()));
		}
		if segments.iter().any(|seg| seg.is_empty()) {
			return Err(KeyError::EmptySegment(s.to_string()));
		}
		match segments.as_slice() {
			[path] => Ok(Self::build(None, namespace::current(), Arc::from(*path))),
			[ns, path] => Ok(Self::build(None, Arc::from(*ns), Arc::from(*path))),
			[registry, ns, path] => Ok(Self::build(
				Some(Arc::from(*registry)),
				Arc::from(*ns),
				Arc::from(*path),
			)),
			_ => Err(KeyError::TooManySegments(s.to_string())),
		}
	}

	/// Creates a key with no registry name.
	pub fn new(namespace: &str, path: &str) -> Result<Self, KeyError> {
		validate_namespace(namespace)?;
		validate_path(path)?;
		Ok(Self::build(None, Arc::from(namespace), Arc::from(path)))
	}

	/// Creates a key bound to a specific registry.
	pub fn with_registry(registry: &str, namespace: &str, path: &str) -> Result<Self, KeyError> {
		if registry.is_empty() || registry.contains(DELIMITER) {
			return Err(KeyError::InvalidRegistry(registry.to_string()));
		}
		validate_namespace(namespace)?;
		validate_path(path)?;
		Ok(Self::build(
			Some(Arc::from(registry)),
			Arc::from(namespace),
			Arc::from(path),
		))
	}

	fn build(registry: Option<Arc<str>>, namespace: Arc<str>, path: Arc<str>) -> Self {
		let full = match &registry {
			Some(reg) => format!("{reg}{DELIMITER}{namespace}{DELIMITER}{path}"),
			None => format!("{namespace}{DELIMITER}{path}"),
		};
		Self {
			registry,
			namespace,
			path,
			full: Arc::from(full),
		}
	}

	pub fn registry_name(&self) -> Option<&str> {
		self.registry.as_deref()
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	/// Canonical string form.
	pub fn as_str(&self) -> &str {
		&self.full
	}

	/// Returns false only if this key names a registry other than `registry`.
	pub fn matches_registry(&self, registry: &str) -> bool {
		self.registry.as_deref().is_none_or(|own| own == registry)
	}

	/// Returns this key with the registry name dropped.
	pub fn without_registry_name(&self) -> Self {
		match self.registry {
			None => self.clone(),
			Some(_) => Self::build(None, self.namespace.clone(), self.path.clone()),
		}
	}
}

fn validate_namespace(namespace: &str) -> Result<(), KeyError> {
	if namespace.is_empty() || namespace.contains(DELIMITER) {
		return Err(KeyError::InvalidNamespace(namespace.to_string()));
	}
	Ok(())
}

fn validate_path(path: &str) -> Result<(), KeyError> {
	if path.is_empty() || path.contains(DELIMITER) {
		return Err(KeyError::InvalidPath(path.to_string()));
	}
	Ok(())
}

pub(crate) fn is_valid_namespace(namespace: &str) -> bool {
	validate_namespace(namespace).is_ok()
}

impl PartialEq for RegistryKey {
	fn eq(&self, other: &Self) -> bool {
		if matches!((&self.registry, &other.registry), (Some(a), Some(b)) if a != b) {
			return false;
		}
		self.namespace == other.namespace && self.path == other.path
	}
}

impl Eq for RegistryKey {}

impl Hash for RegistryKey {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.namespace.hash(state);
		self.path.hash(state);
	}
}

impl core::fmt::Display for RegistryKey {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(&self.full)
	}
}

impl core::fmt::Debug for RegistryKey {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_tuple("RegistryKey").field(&&*self.full).finish()
	}
}

impl FromStr for RegistryKey {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<&str> for RegistryKey {
	type Error = KeyError;

	fn try_from(s: &str) -> Result<Self, Self::Error> {
		Self::parse(s)
	}
}

impl TryFrom<String> for RegistryKey {
	type Error = KeyError;

	fn try_from(s: String) -> Result<Self, Self::Error> {
		Self::parse(&s)
	}
}

impl Serialize for RegistryKey {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.full)
	}
}

impl<'de> Deserialize<'de> for RegistryKey {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Self::parse(&s).map_err(serde::de::Error::custom)
	}
}
