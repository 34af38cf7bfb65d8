use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DataBox, DataError, FromDataBox, Result};

/// Streaming writer for structured data.
///
/// Writers only ever append named values. Nested objects go through
/// `write_object` on `dyn DataSink`, which scopes a fresh [`DataObject`] and
/// stores it under the given key once the closure returns.
pub trait DataSink {
	/// Writes `value` under `key`, replacing any previous value.
	fn put(&mut self, key: &str, value: DataBox);
}

impl dyn DataSink + '_ {
	/// Writes a nested object under `key` built by `write`.
	///
	/// Nothing is stored if `write` fails.
	pub fn write_object<E, F>(&mut self, key: &str, write: F) -> std::result::Result<(), E>
	where
		F: FnOnce(&mut dyn DataSink) -> std::result::Result<(), E>,
	{
		let mut nested = DataObject::new();
		write(&mut nested)?;
		self.put(key, DataBox::Object(nested));
		Ok(())
	}
}

/// String-keyed map of [`DataBox`] values.
///
/// Keys iterate in sorted order, so two equal objects always encode to the
/// same bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataObject {
	entries: BTreeMap<String, DataBox>,
}

impl DataObject {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn get(&self, key: &str) -> Option<&DataBox> {
		self.entries.get(key)
	}

	/// Reads a required entry as `T`.
	pub fn get_as<T: FromDataBox>(&self, key: &str) -> Result<T> {
		let value = self
			.entries
			.get(key)
			.ok_or_else(|| DataError::Missing(key.to_string()))?;
		T::from_box(key, value)
	}

	/// Reads an optional entry as `T`; absence is `Ok(None)`, a wrong type is still an error.
	pub fn get_opt<T: FromDataBox>(&self, key: &str) -> Result<Option<T>> {
		self.entries
			.get(key)
			.map(|value| T::from_box(key, value))
			.transpose()
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<DataBox>) -> Option<DataBox> {
		self.entries.insert(key.into(), value.into())
	}

	pub fn remove(&mut self, key: &str) -> Option<DataBox> {
		self.entries.remove(key)
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &DataBox)> + '_ {
		self.entries.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Encodes this object with postcard.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Decodes an object previously produced by [`DataObject::to_bytes`].
	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		Ok(postcard::from_bytes(bytes)?)
	}
}

impl DataSink for DataObject {
	fn put(&mut self, key: &str, value: DataBox) {
		self.entries.insert(key.to_string(), value);
	}
}

impl<K: Into<String>, V: Into<DataBox>> FromIterator<(K, V)> for DataObject {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			entries: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

impl<'a> IntoIterator for &'a DataObject {
	type Item = (&'a String, &'a DataBox);
	type IntoIter = std::collections::btree_map::Iter<'a, String, DataBox>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.iter()
	}
}

impl core::fmt::Display for DataObject {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str("{")?;
		for (i, (key, value)) in self.entries.iter().enumerate() {
			if i > 0 {
				f.write_str(",")?;
			}
			write!(f, "{key}:{value}")?;
		}
		f.write_str("}")
	}
}
