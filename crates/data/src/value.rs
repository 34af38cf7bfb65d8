use serde::{Deserialize, Serialize};

use crate::{DataError, DataObject, Result};

/// Type tag of a [`DataBox`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
	Bool,
	Int,
	Float,
	String,
	List,
	Object,
}

impl core::fmt::Display for DataType {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let name = match self {
			Self::Bool => "bool",
			Self::Int => "int",
			Self::Float => "float",
			Self::String => "string",
			Self::List => "list",
			Self::Object => "object",
		};
		f.write_str(name)
	}
}

/// A single structured value that remembers its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataBox {
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	List(Vec<DataBox>),
	Object(DataObject),
}

impl DataBox {
	/// Returns the type tag of this value.
	pub fn data_type(&self) -> DataType {
		match self {
			Self::Bool(_) => DataType::Bool,
			Self::Int(_) => DataType::Int,
			Self::Float(_) => DataType::Float,
			Self::String(_) => DataType::String,
			Self::List(_) => DataType::List,
			Self::Object(_) => DataType::Object,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the value as a float, widening integers.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(v) => Some(*v),
			Self::Int(v) => Some(*v as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[DataBox]> {
		match self {
			Self::List(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&DataObject> {
		match self {
			Self::Object(v) => Some(v),
			_ => None,
		}
	}
}

impl core::fmt::Display for DataBox {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match self {
			Self::Bool(v) => write!(f, "{v}"),
			Self::Int(v) => write!(f, "{v}i"),
			Self::Float(v) => write!(f, "{v}f"),
			Self::String(v) => write!(f, "{v:?}"),
			Self::List(items) => {
				f.write_str("[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(",")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Self::Object(obj) => write!(f, "{obj}"),
		}
	}
}

macro_rules! impl_from_for_box {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for DataBox {
				fn from(v: $ty) -> Self {
					DataBox::$variant(v.into())
				}
			}
		)*
	};
}

impl_from_for_box! {
	bool => Bool,
	i64 => Int,
	i32 => Int,
	u32 => Int,
	f64 => Float,
	f32 => Float,
	String => String,
	&str => String,
	Vec<DataBox> => List,
	DataObject => Object,
}

/// Types that can be extracted from a [`DataBox`].
///
/// `key` is only used to build error messages.
pub trait FromDataBox: Sized {
	fn from_box(key: &str, value: &DataBox) -> Result<Self>;
}

fn mismatch(key: &str, expected: DataType, value: &DataBox) -> DataError {
	DataError::TypeMismatch {
		key: key.to_string(),
		expected,
		found: value.data_type(),
	}
}

impl FromDataBox for bool {
	fn from_box(key: &str, value: &DataBox) -> Result<Self> {
		value
			.as_bool()
			.ok_or_else(|| mismatch(key, DataType::Bool, value))
	}
}

impl FromDataBox for i64 {
	fn from_box(key: &str, value: &DataBox) -> Result<Self> {
		value.as_int().ok_or_else(|| mismatch(key, DataType::Int, value))
	}
}

impl FromDataBox for i32 {
	fn from_box(key: &str, value: &DataBox) -> Result<Self> {
		let v = i64::from_box(key, value)?;
		i32::try_from(v).map_err(|_| DataError::OutOfRange {
			key: key.to_string(),
			value: v,
		})
	}
}

impl FromDataBox for u32 {
	fn from_box(key: &str, value: &DataBox) -> Result<Self> {
		let v = i64::from_box(key, value)?;
		u32::try_from(v).map_err(|_| DataError::OutOfRange {
			key: key.to_string(),
			value: v,
		})
	}
}

impl FromDataBox for f64 {
	fn from_box(key: &str, value: &DataBox) -> Result<Self> {
		value
			.as_float()
			.ok_or_else(|| mismatch(key, DataType::Float, value))
	}
}

impl FromDataBox for String {
	fn from_box(key: &str, value: &DataBox) -> Result<Self> {
		value
			.as_str()
			.map(str::to_string)
			.ok_or_else(|| mismatch(key, DataType::String, value))
	}
}

impl FromDataBox for DataObject {
	fn from_box(key: &str, value: &DataBox) -> Result<Self> {
		value
			.as_object()
			.cloned()
			.ok_or_else(|| mismatch(key, DataType::Object, value))
	}
}
