use std::sync::Arc;

use thiserror::Error;

use crate::{RegistryKey, RuntimeId};

/// Errors raised while parsing or constructing a [`RegistryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
	#[error("invalid registry key {0:?}: expected [registry:]namespace:path")]
	TooManySegments(String),

	#[error("invalid registry key {0:?}: empty segment")]
	EmptySegment(String),

	#[error("invalid registry name {0:?}: must be non-empty and cannot contain ':'")]
	InvalidRegistry(String),

	#[error("invalid namespace {0:?}: must be non-empty and cannot contain ':'")]
	InvalidNamespace(String),

	#[error("invalid path {0:?}: must be non-empty and cannot contain ':'")]
	InvalidPath(String),
}

/// Registry misuse. These indicate content definition or load-order bugs and
/// should abort loading.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
	/// The key names a different registry.
	#[error("{key} does not belong to registry {registry:?}")]
	ForeignRegistry { key: RegistryKey, registry: Arc<str> },

	/// The key's namespace differs from the registrator's.
	#[error("cannot register {key} from namespace {namespace:?}")]
	ForeignNamespace { key: RegistryKey, namespace: Arc<str> },

	/// Another entry with the same key was registered first.
	#[error("duplicate registry key {key} in registry {registry:?}")]
	DuplicateKey { key: RegistryKey, registry: Arc<str> },

	/// The object was already frozen into a registry.
	#[error("{key} already has runtime ID {id}")]
	AlreadyRegistered { key: RegistryKey, id: RuntimeId },

	#[error("registry {registry:?} has no entry with ID {id}")]
	UnknownId { registry: Arc<str>, id: u32 },

	#[error("registry {registry:?} has no entry {key}")]
	UnknownKey { registry: Arc<str>, key: RegistryKey },
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors raised when translating an object into a save ID.
#[derive(Debug, Clone, Error)]
pub enum IdMapError {
	/// The object has never been frozen into a registry.
	#[error("{key} has not been assigned a runtime ID")]
	Unregistered { key: RegistryKey },

	/// The object belongs to a different registry than the map.
	#[error("{key} has no save ID in the map for registry {registry:?}")]
	NotMapped { key: RegistryKey, registry: Arc<str> },
}
