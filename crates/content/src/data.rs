//! Item-specific data attached to an [`ItemStack`](crate::ItemStack).
//!
//! Data values are shared, immutable and type-erased ([`ItemData`]). Each
//! item with data owns one [`ItemDataManager`] that creates defaults, checks
//! assigned values and converts them to and from [`DataObject`]s. Most
//! managers are written as a typed [`ItemDataCodec`] instead.

use std::any::{Any, type_name};
use std::fmt::Debug;
use std::sync::Arc;

use tesseract_data::{DataError, DataObject, DataSink};

use crate::ItemDataError;

/// Type-erased item data value with dynamic equality.
pub trait ItemDataValue: Debug + Send + Sync + 'static {
	fn as_any(&self) -> &dyn Any;

	/// Returns true if `other` has the same concrete type and compares equal.
	fn dyn_eq(&self, other: &dyn ItemDataValue) -> bool;
}

impl<T: Any + Debug + PartialEq + Send + Sync> ItemDataValue for T {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn dyn_eq(&self, other: &dyn ItemDataValue) -> bool {
		other
			.as_any()
			.downcast_ref::<T>()
			.is_some_and(|other| self == other)
	}
}

impl dyn ItemDataValue {
	pub fn is<T: Any>(&self) -> bool {
		self.as_any().is::<T>()
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.as_any().downcast_ref::<T>()
	}
}

/// Shared item data. Stacks split from one another share the same value.
pub type ItemData = Arc<dyn ItemDataValue>;

/// Object-safe handler for one item's data.
pub trait ItemDataManager: Send + Sync {
	/// Data given to new stacks of the item.
	fn default_data(&self) -> ItemData;

	fn load(&self, data: &DataObject) -> Result<ItemData, ItemDataError>;

	fn store(&self, value: &ItemData, sink: &mut dyn DataSink) -> Result<(), ItemDataError>;

	/// Accepts `value` if this manager can store it.
	fn check(&self, value: ItemData) -> Result<ItemData, ItemDataError>;
}

/// Typed item data handler. Every codec is an [`ItemDataManager`].
///
/// ```
/// use tesseract_content::{ItemDataCodec, ItemDataManager};
/// use tesseract_data::{DataError, DataObject, DataSink};
///
/// struct Durability;
///
/// impl ItemDataCodec for Durability {
/// 	type Value = u32;
///
/// 	fn default_value(&self) -> u32 {
/// 		100
/// 	}
///
/// 	fn decode(&self, data: &DataObject) -> Result<u32, DataError> {
/// 		data.get_as("Durability")
/// 	}
///
/// 	fn encode(&self, value: &u32, sink: &mut dyn DataSink) {
/// 		sink.put("Durability", (*value).into());
/// 	}
/// }
///
/// let data = Durability.default_data();
/// assert_eq!(data.downcast_ref::<u32>(), Some(&100));
/// ```
pub trait ItemDataCodec: Send + Sync {
	type Value: Any + Debug + PartialEq + Send + Sync;

	fn default_value(&self) -> Self::Value;

	fn decode(&self, data: &DataObject) -> Result<Self::Value, DataError>;

	fn encode(&self, value: &Self::Value, sink: &mut dyn DataSink);
}

fn mismatch<V>() -> ItemDataError {
	ItemDataError::TypeMismatch {
		expected: type_name::<V>(),
	}
}

impl<C: ItemDataCodec> ItemDataManager for C {
	fn default_data(&self) -> ItemData {
		Arc::new(self.default_value())
	}

	fn load(&self, data: &DataObject) -> Result<ItemData, ItemDataError> {
		Ok(Arc::new(self.decode(data)?))
	}

	fn store(&self, value: &ItemData, sink: &mut dyn DataSink) -> Result<(), ItemDataError> {
		let value = value
			.downcast_ref::<C::Value>()
			.ok_or_else(mismatch::<C::Value>)?;
		self.encode(value, sink);
		Ok(())
	}

	fn check(&self, value: ItemData) -> Result<ItemData, ItemDataError> {
		if value.is::<C::Value>() {
			Ok(value)
		} else {
			Err(mismatch::<C::Value>())
		}
	}
}
