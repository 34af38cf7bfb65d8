//! Counted stacks of one item.
//!
//! # Invariants
//!
//! - `count` never exceeds the item's max stack size.
//! - A stack without an item has a count of zero and no data.
//! - If the item has a data manager, `data` was produced or accepted by it.
//!
//! # Record format
//!
//! [`ItemStack::save`] writes `ID` (key string when portable, save ID
//! otherwise), `Count` and, when present, a nested `Data` object.

use std::sync::Arc;

use tesseract_data::{DataBox, DataError, DataObject, DataSink};
use tesseract_registry::{RegistryIdMap, RegistryKey, RegistryObject};

use crate::{Item, ItemData, ItemDataError, ItemStackError};

const ID_FIELD: &str = "ID";
const COUNT_FIELD: &str = "Count";
const DATA_FIELD: &str = "Data";

/// Zero or more of one item, plus optional item data.
///
/// The default value is the empty stack.
#[derive(Clone, Default)]
pub struct ItemStack {
	item: Option<Arc<Item>>,
	count: u32,
	data: Option<ItemData>,
}

impl ItemStack {
	/// Creates a stack of `count` items with the item's default data.
	///
	/// `count` is clamped to the max stack size; a count of zero gives the
	/// empty stack.
	pub fn new(item: Arc<Item>, count: u32) -> Self {
		let data = item.data_manager().map(|manager| manager.default_data());
		Self::from_parts(item, count, data)
	}

	/// Creates a stack carrying `data`, which the item's data manager must accept.
	///
	/// Items without a data manager drop `data`.
	pub fn with_data(item: Arc<Item>, count: u32, data: ItemData) -> Result<Self, ItemDataError> {
		let data = match item.data_manager() {
			Some(manager) => Some(manager.check(data)?),
			None => None,
		};
		Ok(Self::from_parts(item, count, data))
	}

	fn from_parts(item: Arc<Item>, count: u32, data: Option<ItemData>) -> Self {
		let count = count.min(item.max_stack_size());
		if count == 0 {
			return Self::empty();
		}
		Self {
			item: Some(item),
			count,
			data,
		}
	}

	pub const fn empty() -> Self {
		Self {
			item: None,
			count: 0,
			data: None,
		}
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.item.is_none() || self.count == 0
	}

	pub fn item(&self) -> Option<&Arc<Item>> {
		self.item.as_ref()
	}

	#[inline]
	pub fn count(&self) -> u32 {
		self.count
	}

	pub fn data(&self) -> Option<&ItemData> {
		self.data.as_ref()
	}

	/// Max stack size of the held item, or `0` without an item.
	pub fn max_stack_size(&self) -> u32 {
		self.item.as_ref().map_or(0, |item| item.max_stack_size())
	}

	/// Sets the count, clamped to `0..=max_stack_size`.
	///
	/// Does nothing on a stack without an item. A count of zero keeps the
	/// item, but the stack reports itself as empty.
	pub fn set_count(&mut self, count: i64) {
		if self.item.is_none() {
			return;
		}
		let max = i64::from(self.max_stack_size());
		self.count = count.clamp(0, max) as u32;
	}

	/// Replaces the item data.
	///
	/// Ignored if the stack has no item or the item has no data manager.
	pub fn set_data(&mut self, data: ItemData) -> Result<(), ItemDataError> {
		let Some(manager) = self.item.as_ref().and_then(|item| item.data_manager()) else {
			return Ok(());
		};
		self.data = Some(manager.check(data)?);
		Ok(())
	}

	/// Returns true if both stacks hold the same item instance and equal data.
	pub fn are_items_equal(&self, other: &ItemStack) -> bool {
		let same_item = match (&self.item, &other.item) {
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		};
		same_item
			&& match (&self.data, &other.data) {
				(Some(a), Some(b)) => (**a).dyn_eq(&**b),
				(None, None) => true,
				_ => false,
			}
	}

	/// Moves as much of `other` into this stack as fits.
	///
	/// Returns true if `other` ended up empty. Stacks of different items are
	/// left unchanged.
	pub fn stack(&mut self, other: &mut ItemStack) -> bool {
		if other.is_empty() {
			return true;
		}
		if self.is_empty() {
			*self = std::mem::take(other);
			return true;
		}
		if !self.are_items_equal(other) {
			return false;
		}

		let space = self.max_stack_size().saturating_sub(self.count);
		if space >= other.count {
			self.count += other.count;
			*other = Self::empty();
			true
		} else {
			self.count += space;
			other.count -= space;
			false
		}
	}

	/// Drops `other` onto this stack, as in an inventory.
	///
	/// An empty stack takes all of `other`; equal items are merged; anything
	/// else is up to this stack's [`ItemBehavior`](crate::ItemBehavior).
	/// Returns true if anything changed.
	pub fn apply(&mut self, other: &mut ItemStack) -> bool {
		if self.is_empty() {
			*self = std::mem::take(other);
			return true;
		}
		if self.are_items_equal(other) {
			let before = other.count;
			self.stack(other);
			return other.count != before;
		}
		match self.item.clone() {
			Some(item) => item.behavior().apply_item_stack(self, other),
			None => false,
		}
	}

	/// Removes up to `count` items into a new stack sharing this stack's data.
	pub fn split(&mut self, count: u32) -> ItemStack {
		if self.is_empty() || count == 0 {
			return Self::empty();
		}
		if count >= self.count {
			return std::mem::take(self);
		}
		self.count -= count;
		Self {
			item: self.item.clone(),
			count,
			data: self.data.clone(),
		}
	}

	/// Currency value as decided by the item's behavior; `0` when empty.
	pub fn currency_value(&self) -> u64 {
		match &self.item {
			Some(item) if !self.is_empty() => item.behavior().currency_value(self),
			_ => 0,
		}
	}

	/// Reads a stack record. Unreadable records give the empty stack.
	pub fn load(data: &DataObject, ids: &RegistryIdMap<Item>) -> Self {
		match Self::try_load(data, ids) {
			Ok(stack) => stack,
			Err(error) => {
				tracing::debug!(%error, record = %data, "discarding unreadable item stack");
				Self::empty()
			}
		}
	}

	/// Reads a stack record, reporting why it could not be read.
	///
	/// A count above the max stack size is clamped rather than rejected.
	pub fn try_load(data: &DataObject, ids: &RegistryIdMap<Item>) -> Result<Self, ItemStackError> {
		let id = data
			.get(ID_FIELD)
			.ok_or_else(|| DataError::Missing(ID_FIELD.to_string()))?;
		let item = match id {
			DataBox::String(name) => {
				let key = RegistryKey::parse(name)?;
				Arc::clone(ids.registry().get_by_key(&key)?)
			}
			DataBox::Int(save_id) => u32::try_from(*save_id)
				.ok()
				.and_then(|save_id| ids.load(save_id))
				.cloned()
				.ok_or(ItemStackError::UnknownItem(*save_id))?,
			other => return Err(ItemStackError::InvalidId(other.data_type())),
		};

		let count: i64 = data.get_as(COUNT_FIELD)?;
		if count < 0 {
			return Err(ItemStackError::InvalidCount(count));
		}
		let count = u32::try_from(count).unwrap_or(u32::MAX);

		let item_data = match item.data_manager() {
			Some(manager) => match data.get(DATA_FIELD).and_then(DataBox::as_object) {
				Some(nested) => Some(manager.load(nested)?),
				None => Some(manager.default_data()),
			},
			None => None,
		};
		Ok(Self::from_parts(item, count, item_data))
	}

	/// Replaces the item data with data read from `data`.
	///
	/// Ignored if the stack has no item or the item has no data manager.
	pub fn load_data(&mut self, data: &DataObject) -> Result<(), ItemDataError> {
		if let Some(manager) = self.item.as_ref().and_then(|item| item.data_manager()) {
			self.data = Some(manager.load(data)?);
		}
		Ok(())
	}

	/// Writes this stack as a record. Empty stacks write nothing.
	///
	/// Portable records name the item by key and survive any change to the
	/// item registry. Compact records use the save ID from `ids`.
	pub fn save(
		&self,
		sink: &mut dyn DataSink,
		portable: bool,
		ids: &RegistryIdMap<Item>,
	) -> Result<(), ItemStackError> {
		let Some(item) = self.item.as_ref().filter(|_| !self.is_empty()) else {
			return Ok(());
		};
		let id = if portable {
			DataBox::from(item.registry_key().as_str())
		} else {
			DataBox::from(ids.store(item)?)
		};
		sink.put(ID_FIELD, id);
		sink.put(COUNT_FIELD, DataBox::from(self.count));
		if let (Some(manager), Some(data)) = (item.data_manager(), &self.data) {
			sink.write_object(DATA_FIELD, |nested| manager.store(data, nested))?;
		}
		Ok(())
	}
}

impl core::fmt::Debug for ItemStack {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		match &self.item {
			Some(item) if !self.is_empty() => f
				.debug_struct("ItemStack")
				.field("item", item.key())
				.field("count", &self.count)
				.field("data", &self.data)
				.finish(),
			_ => f.write_str("ItemStack(empty)"),
		}
	}
}

#[cfg(test)]
mod tests;
