use std::sync::Arc;

use proptest::prelude::*;
use tesseract_data::{DataBox, DataError, DataObject, DataSink};
use tesseract_registry::{Registry, RegistryBuilder, RegistryIdMap, RegistryKey};

use super::*;
use crate::{ITEM_REGISTRY, ItemBehavior, ItemDataCodec, ItemProperties};

struct Charge;

impl ItemDataCodec for Charge {
	type Value = u32;

	fn default_value(&self) -> u32 {
		10
	}

	fn decode(&self, data: &DataObject) -> Result<u32, DataError> {
		data.get_as("Charge")
	}

	fn encode(&self, value: &u32, sink: &mut dyn DataSink) {
		sink.put("Charge", (*value).into());
	}
}

/// Dropping anything onto a bin destroys it.
struct Bin;

impl ItemBehavior for Bin {
	fn apply_item_stack(&self, _target: &mut ItemStack, applied: &mut ItemStack) -> bool {
		*applied = ItemStack::empty();
		true
	}
}

struct Coin;

impl ItemBehavior for Coin {
	fn currency_value(&self, stack: &ItemStack) -> u64 {
		u64::from(stack.count()) * 5
	}
}

fn item(path: &str, max: u32) -> Arc<Item> {
	Arc::new(Item::with_properties(
		RegistryKey::new("core", path).unwrap(),
		ItemProperties::new(max),
	))
}

struct Items {
	ids: RegistryIdMap<Item>,
}

impl Items {
	fn get(&self, path: &str) -> Arc<Item> {
		let key = RegistryKey::new("core", path).unwrap();
		Arc::clone(self.ids.registry().get_by_key(&key).unwrap())
	}
}

fn items() -> Items {
	let builder = RegistryBuilder::new(ITEM_REGISTRY);
	let core = builder.begin("core");
	let entries = [
		Item::with_properties(RegistryKey::new("core", "coin").unwrap(), ItemProperties::new(99))
			.with_behavior(Coin),
		Item::with_properties(RegistryKey::new("core", "sword").unwrap(), ItemProperties::new(1)),
		Item::new(RegistryKey::new("core", "battery").unwrap()).with_data_manager(Charge),
		Item::new(RegistryKey::new("core", "bin").unwrap()).with_behavior(Bin),
	];
	core.register_all(entries.into_iter().map(Arc::new)).unwrap();
	let registry: Arc<Registry<Item>> = Arc::new(builder.freeze().unwrap());
	Items {
		ids: RegistryIdMap::new(registry),
	}
}

#[test]
fn test_new_clamps_count() {
	let sword = item("sword", 1);
	let stack = ItemStack::new(Arc::clone(&sword), 5);
	assert_eq!(stack.count(), 1);
	assert_eq!(stack.max_stack_size(), 1);

	let none = ItemStack::new(sword, 0);
	assert!(none.is_empty());
	assert!(none.item().is_none());
}

#[test]
fn test_default_is_empty() {
	let stack = ItemStack::default();
	assert!(stack.is_empty());
	assert_eq!(stack.count(), 0);
	assert_eq!(stack.max_stack_size(), 0);
	assert_eq!(stack.currency_value(), 0);
	assert_eq!(format!("{stack:?}"), "ItemStack(empty)");
}

#[test]
fn test_set_count_clamps() {
	let mut stack = ItemStack::new(item("coin", 99), 10);
	stack.set_count(500);
	assert_eq!(stack.count(), 99);
	stack.set_count(-3);
	assert_eq!(stack.count(), 0);
	assert!(stack.is_empty());
	assert!(stack.item().is_some());

	let mut empty = ItemStack::empty();
	empty.set_count(5);
	assert_eq!(empty.count(), 0);
}

#[test]
fn test_coin_stacking_fills_to_max() {
	let coin = item("coin", 99);
	let mut a = ItemStack::new(Arc::clone(&coin), 50);
	let mut b = ItemStack::new(coin, 60);

	assert!(!a.stack(&mut b));
	assert_eq!(a.count(), 99);
	assert_eq!(b.count(), 11);
}

#[test]
fn test_stack_exact_fit_drains_other() {
	let coin = item("coin", 99);
	let mut a = ItemStack::new(Arc::clone(&coin), 49);
	let mut b = ItemStack::new(coin, 50);

	assert!(a.stack(&mut b));
	assert_eq!(a.count(), 99);
	assert!(b.is_empty());
}

#[test]
fn test_stack_edge_cases() {
	let coin = item("coin", 99);
	let sword = item("sword", 1);

	let mut a = ItemStack::new(Arc::clone(&coin), 5);
	assert!(a.stack(&mut ItemStack::empty()));
	assert_eq!(a.count(), 5);

	let mut empty = ItemStack::empty();
	let mut b = ItemStack::new(Arc::clone(&coin), 7);
	assert!(empty.stack(&mut b));
	assert_eq!(empty.count(), 7);
	assert!(b.is_empty());

	let mut swords = ItemStack::new(sword, 1);
	assert!(!a.stack(&mut swords));
	assert_eq!(a.count(), 5);
	assert_eq!(swords.count(), 1);
}

#[test]
fn test_same_key_different_instance_does_not_stack() {
	let mut a = ItemStack::new(item("coin", 99), 1);
	let mut b = ItemStack::new(item("coin", 99), 1);
	assert!(!a.are_items_equal(&b));
	assert!(!a.stack(&mut b));
}

#[test]
fn test_data_takes_part_in_equality() {
	let items = items();
	let battery = items.get("battery");
	let full = ItemStack::new(Arc::clone(&battery), 1);
	let also_full = ItemStack::with_data(Arc::clone(&battery), 1, Arc::new(10u32)).unwrap();
	let drained = ItemStack::with_data(battery, 1, Arc::new(0u32)).unwrap();

	assert!(full.are_items_equal(&also_full));
	assert!(!full.are_items_equal(&drained));
}

#[test]
fn test_set_data_is_checked() {
	let items = items();
	let mut battery = ItemStack::new(items.get("battery"), 1);
	assert_eq!(battery.data().unwrap().downcast_ref::<u32>(), Some(&10));

	battery.set_data(Arc::new(3u32)).unwrap();
	assert_eq!(battery.data().unwrap().downcast_ref::<u32>(), Some(&3));
	assert!(battery.set_data(Arc::new("flat")).is_err());
	assert_eq!(battery.data().unwrap().downcast_ref::<u32>(), Some(&3));

	let mut coin = ItemStack::new(items.get("coin"), 1);
	coin.set_data(Arc::new(3u32)).unwrap();
	assert!(coin.data().is_none());
	assert!(ItemStack::with_data(items.get("battery"), 1, Arc::new(1i64)).is_err());
}

#[test]
fn test_apply() {
	let items = items();

	let mut empty = ItemStack::empty();
	let mut coins = ItemStack::new(items.get("coin"), 3);
	assert!(empty.apply(&mut coins));
	assert_eq!(empty.count(), 3);
	assert!(coins.is_empty());

	let mut full = ItemStack::new(items.get("coin"), 99);
	let mut more = ItemStack::new(items.get("coin"), 4);
	assert!(!full.apply(&mut more));
	assert_eq!(more.count(), 4);

	let mut partial = ItemStack::new(items.get("coin"), 97);
	assert!(partial.apply(&mut more));
	assert_eq!(partial.count(), 99);
	assert_eq!(more.count(), 2);

	let mut sword = ItemStack::new(items.get("sword"), 1);
	assert!(!sword.apply(&mut more));
	assert_eq!(more.count(), 2);

	let mut bin = ItemStack::new(items.get("bin"), 1);
	assert!(bin.apply(&mut more));
	assert!(more.is_empty());
	assert_eq!(bin.count(), 1);
}

#[test]
fn test_split() {
	let items = items();
	let mut stack = ItemStack::new(items.get("battery"), 10);
	stack.set_data(Arc::new(7u32)).unwrap();

	let part = stack.split(4);
	assert_eq!(part.count(), 4);
	assert_eq!(stack.count(), 6);
	assert!(Arc::ptr_eq(part.data().unwrap(), stack.data().unwrap()));

	assert!(stack.split(0).is_empty());
	let rest = stack.split(100);
	assert_eq!(rest.count(), 6);
	assert!(stack.is_empty());
	assert!(stack.item().is_none());
	assert!(stack.split(1).is_empty());
}

#[test]
fn test_currency_value() {
	let items = items();
	assert_eq!(ItemStack::new(items.get("coin"), 7).currency_value(), 35);
	assert_eq!(ItemStack::new(items.get("sword"), 1).currency_value(), 0);
}

#[test]
fn test_save_load_portable() {
	let items = items();
	let mut stack = ItemStack::new(items.get("battery"), 12);
	stack.set_data(Arc::new(4u32)).unwrap();

	let mut record = DataObject::new();
	stack.save(&mut record, true, &items.ids).unwrap();
	assert_eq!(record.get_as::<String>("ID").unwrap(), "core:battery");
	assert_eq!(record.get_as::<i64>("Count").unwrap(), 12);
	assert_eq!(
		record.get_as::<DataObject>("Data").unwrap().get_as::<u32>("Charge").unwrap(),
		4
	);

	let loaded = ItemStack::load(&record, &items.ids);
	assert!(loaded.are_items_equal(&stack));
	assert_eq!(loaded.count(), 12);
}

#[test]
fn test_save_load_compact() {
	let items = items();
	let stack = ItemStack::new(items.get("sword"), 1);

	let mut record = DataObject::new();
	stack.save(&mut record, false, &items.ids).unwrap();
	assert_eq!(record.get_as::<i64>("ID").unwrap(), 2);
	assert!(!record.contains_key("Data"));

	let loaded = ItemStack::load(&record, &items.ids);
	assert!(Arc::ptr_eq(loaded.item().unwrap(), stack.item().unwrap()));
	assert_eq!(loaded.count(), 1);
}

#[test]
fn test_save_empty_writes_nothing() {
	let items = items();
	let mut record = DataObject::new();
	ItemStack::empty().save(&mut record, true, &items.ids).unwrap();
	assert!(record.is_empty());
}

#[test]
fn test_save_unregistered_item_compact_fails() {
	let items = items();
	let stack = ItemStack::new(item("coin", 99), 1);
	let mut record = DataObject::new();
	assert!(matches!(
		stack.save(&mut record, false, &items.ids),
		Err(ItemStackError::IdMap(_))
	));
}

#[test]
fn test_load_missing_data_uses_default() {
	let items = items();
	let record: DataObject = [("ID", DataBox::from("core:battery")), ("Count", DataBox::Int(1))]
		.into_iter()
		.collect();
	let loaded = ItemStack::load(&record, &items.ids);
	assert_eq!(loaded.data().unwrap().downcast_ref::<u32>(), Some(&10));
}

#[test]
fn test_load_clamps_count() {
	let items = items();
	let record: DataObject = [("ID", DataBox::from("core:sword")), ("Count", DataBox::Int(40))]
		.into_iter()
		.collect();
	assert_eq!(ItemStack::load(&record, &items.ids).count(), 1);
}

#[test]
fn test_load_rejects_bad_records() {
	let items = items();
	let cases: Vec<(DataBox, DataBox)> = vec![
		(DataBox::from("core:missing"), DataBox::Int(1)),
		(DataBox::from("item:core:coin:extra"), DataBox::Int(1)),
		(DataBox::from("block:core:coin"), DataBox::Int(1)),
		(DataBox::Int(77), DataBox::Int(1)),
		(DataBox::Int(-1), DataBox::Int(1)),
		(DataBox::Float(1.0), DataBox::Int(1)),
		(DataBox::from("core:coin"), DataBox::Int(-5)),
		(DataBox::from("core:coin"), DataBox::from("five")),
	];
	for (id, count) in cases {
		let record: DataObject = [("ID", id), ("Count", count)].into_iter().collect();
		assert!(ItemStack::try_load(&record, &items.ids).is_err(), "{record}");
		assert!(ItemStack::load(&record, &items.ids).is_empty());
	}

	let bad_data: DataObject = [
		("ID", DataBox::from("core:battery")),
		("Count", DataBox::Int(1)),
		("Data", DataBox::Object(DataObject::new())),
	]
	.into_iter()
	.collect();
	assert!(matches!(
		ItemStack::try_load(&bad_data, &items.ids),
		Err(ItemStackError::ItemData(_))
	));
	assert!(ItemStack::load(&DataObject::new(), &items.ids).is_empty());
}

#[test]
fn test_load_data() {
	let items = items();
	let mut stack = ItemStack::new(items.get("battery"), 1);
	let record: DataObject = [("Charge", DataBox::Int(2))].into_iter().collect();
	stack.load_data(&record).unwrap();
	assert_eq!(stack.data().unwrap().downcast_ref::<u32>(), Some(&2));

	let mut coin = ItemStack::new(items.get("coin"), 1);
	coin.load_data(&record).unwrap();
	assert!(coin.data().is_none());
}

proptest! {
	#[test]
	fn prop_set_count_clamps(max in 1u32..200, value in -1000i64..1000) {
		let mut stack = ItemStack::new(item("thing", max), 1);
		stack.set_count(value);
		prop_assert_eq!(i64::from(stack.count()), value.clamp(0, i64::from(max)));
		prop_assert_eq!(stack.is_empty(), stack.count() == 0);
	}

	#[test]
	fn prop_stack_conserves_items(max in 1u32..200, a in 0u32..200, b in 0u32..200) {
		let thing = item("thing", max);
		let mut first = ItemStack::new(Arc::clone(&thing), a);
		let mut second = ItemStack::new(thing, b);
		let (a, b) = (first.count(), second.count());

		let drained = first.stack(&mut second);
		prop_assert_eq!(first.count() + second.count(), a + b);
		prop_assert!(first.count() <= max);
		prop_assert_eq!(second.count(), (a + b).saturating_sub(max));
		prop_assert_eq!(drained, second.is_empty());
	}

	#[test]
	fn prop_split_conserves_items(max in 1u32..200, a in 0u32..200, n in 1u32..300) {
		let mut stack = ItemStack::new(item("thing", max), a);
		let a = stack.count();

		let taken = stack.split(n);
		prop_assert_eq!(stack.count() + taken.count(), a);
		prop_assert_eq!(taken.count(), n.min(a));
	}
}
