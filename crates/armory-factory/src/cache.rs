//! Retained singleton instances.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::FactoryResult;
use crate::spec::SpecKey;
use crate::value::Value;

/// Map of (group, id) to the instance handed out for a singleton spec.
///
/// Entries are only removed by [`InstanceCache::clear`].
#[derive(Debug, Default)]
pub struct InstanceCache {
	instances: RwLock<HashMap<SpecKey, Value>>,
}

impl InstanceCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the cached instance for `key`, producing and storing it first if
	/// needed.
	///
	/// The producer runs without holding the lock, so it may resolve other
	/// specifications through the same factory. When two callers race, the
	/// first stored instance wins and is returned to both.
	pub fn get_or_create<F>(&self, key: &SpecKey, producer: F) -> FactoryResult<Value>
	where
		F: FnOnce() -> FactoryResult<Value>,
	{
		if let Some(instance) = self.get(key) {
			tracing::trace!(key = %key, "instance cache hit");
			return Ok(instance);
		}
		tracing::trace!(key = %key, "instance cache miss");

		let produced = producer()?;

		let mut instances = self.instances.write();
		if let Some(existing) = instances.get(key) {
			tracing::warn!(key = %key, "discarding instance produced concurrently");
			return Ok(existing.clone());
		}
		instances.insert(key.clone(), produced.clone());
		Ok(produced)
	}

	pub fn get(&self, key: &SpecKey) -> Option<Value> {
		self.instances.read().get(key).cloned()
	}

	pub fn contains(&self, key: &SpecKey) -> bool {
		self.instances.read().contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.instances.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.instances.read().is_empty()
	}

	pub fn clear(&self) {
		self.instances.write().clear();
	}
}
