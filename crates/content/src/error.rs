use std::path::PathBuf;

use tesseract_data::{DataError, DataType};
use tesseract_registry::{IdMapError, KeyError, RegistryError};
use thiserror::Error;

/// Errors raised by item data managers.
#[derive(Debug, Error)]
pub enum ItemDataError {
	/// The value is not of the type the item's data manager stores.
	#[error("item data has the wrong type: expected {expected}")]
	TypeMismatch { expected: &'static str },

	#[error(transparent)]
	Data(#[from] DataError),
}

/// Errors raised while reading or writing an [`ItemStack`](crate::ItemStack) record.
#[derive(Debug, Error)]
pub enum ItemStackError {
	#[error(transparent)]
	Data(#[from] DataError),

	#[error(transparent)]
	IdMap(#[from] IdMapError),

	#[error(transparent)]
	ItemData(#[from] ItemDataError),

	#[error(transparent)]
	Key(#[from] KeyError),

	#[error(transparent)]
	Registry(#[from] RegistryError),

	/// The save ID is unmapped or refers to removed content.
	#[error("no item with save ID {0}")]
	UnknownItem(i64),

	#[error("invalid item count {0}")]
	InvalidCount(i64),

	/// The `ID` field is neither a key string nor an integer save ID.
	#[error("item ID must be a string or an int, found {0}")]
	InvalidId(DataType),
}

/// Errors raised while loading or registering a content pack.
#[derive(Debug, Error)]
pub enum ContentError {
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the pack that failed to read.
		path: PathBuf,
		error: std::io::Error,
	},

	#[error("content pack parse error: {0}")]
	Parse(#[from] toml::de::Error),

	#[error(transparent)]
	Key(#[from] KeyError),

	#[error(transparent)]
	Registry(#[from] RegistryError),
}

/// Result type for content pack operations.
pub type Result<T> = std::result::Result<T, ContentError>;
