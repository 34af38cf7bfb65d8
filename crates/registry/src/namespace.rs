//! Current namespace for single-segment keys.
//!
//! Content loaders run inside a namespace scope so that bare paths such as
//! `"sword"` resolve to `"<namespace>:sword"`. The scope is per thread; a
//! thread that never entered one uses [`DEFAULT_NAMESPACE`].

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::KeyError;
use crate::key::is_valid_namespace;

/// Namespace used when no scope has been entered on the current thread.
pub const DEFAULT_NAMESPACE: &str = "tesseract";

thread_local! {
	static CURRENT: RefCell<Option<Arc<str>>> = const { RefCell::new(None) };
}

/// Returns the namespace single-segment keys resolve into on this thread.
pub fn current() -> Arc<str> {
	CURRENT.with(|cell| {
		cell.borrow()
			.clone()
			.unwrap_or_else(|| Arc::from(DEFAULT_NAMESPACE))
	})
}

/// Makes `namespace` current on this thread until the guard is dropped.
///
/// Scopes nest; dropping a guard restores whatever was current before it.
pub fn enter(namespace: &str) -> Result<NamespaceGuard, KeyError> {
	if !is_valid_namespace(namespace) {
		return Err(KeyError::InvalidNamespace(namespace.to_string()));
	}
	let previous = CURRENT.with(|cell| cell.replace(Some(Arc::from(namespace))));
	Ok(NamespaceGuard {
		previous,
		_not_send: PhantomData,
	})
}

/// Restores the previous namespace on drop. Bound to the thread that created it.
#[must_use = "the namespace is only current while the guard is alive"]
pub struct NamespaceGuard {
	previous: Option<Arc<str>>,
	_not_send: PhantomData<*const ()>,
}

impl Drop for NamespaceGuard {
	fn drop(&mut self) {
		let previous = self.previous.take();
		CURRENT.with(|cell| *cell.borrow_mut() = previous);
	}
}
