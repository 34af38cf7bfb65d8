use thiserror::Error;

use crate::DataType;

/// Errors raised when reading or encoding structured data.
#[derive(Debug, Error)]
pub enum DataError {
	/// A required entry is absent.
	#[error("missing entry: {0}")]
	Missing(String),

	/// An entry exists but holds a different type of value.
	#[error("entry {key:?} has type {found}, expected {expected}")]
	TypeMismatch {
		key: String,
		expected: DataType,
		found: DataType,
	},

	/// A numeric entry does not fit the requested integer type.
	#[error("entry {key:?} value {value} is out of range")]
	OutOfRange { key: String, value: i64 },

	/// Binary encoding or decoding failed.
	#[error("codec error: {0}")]
	Codec(#[from] postcard::Error),
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
