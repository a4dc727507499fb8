//! Grouped storage of registered specifications.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{FactoryError, FactoryResult};
use crate::spec::{ConflictPolicy, Spec, SpecKey, SpecSet};

/// Outcome of a batch registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
	/// Ids that were new to the group.
	pub added: Vec<String>,
	/// Ids whose existing record was replaced.
	pub replaced: Vec<String>,
	/// Ids left untouched because they already existed.
	pub skipped: Vec<String>,
}

impl RegistrationReport {
	/// Ids whose record is now the one from the batch.
	pub fn stored(&self) -> impl Iterator<Item = &str> {
		self.added.iter().chain(&self.replaced).map(String::as_str)
	}
}

type Groups = HashMap<String, HashMap<String, Spec>>;

/// Thread-safe map of group to id to specification.
#[derive(Debug, Default)]
pub struct SpecStore {
	groups: RwLock<Groups>,
}

impl SpecStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a batch of specifications to `group` under `policy`.
	///
	/// With [`ConflictPolicy::Error`] the batch is checked in full before
	/// anything is written, so a conflict leaves the store unchanged.
	pub fn register(
		&self,
		group: &str,
		specs: SpecSet,
		policy: ConflictPolicy,
	) -> FactoryResult<RegistrationReport> {
		let mut groups = self.groups.write();

		if policy == ConflictPolicy::Error {
			if let Some(existing) = groups.get(group) {
				if let Some(id) = specs.ids().find(|id| existing.contains_key(*id)) {
					return Err(FactoryError::Conflict {
						key: SpecKey::new(group, id),
					});
				}
			}
		}

		let entries = groups.entry(group.to_string()).or_default();
		let mut report = RegistrationReport::default();
		for (id, spec) in specs {
			match (entries.contains_key(&id), policy) {
				(false, _) => {
					entries.insert(id.clone(), spec);
					report.added.push(id);
				}
				(true, ConflictPolicy::Skip) => {
					tracing::debug!(group, id = %id, "keeping existing specification");
					report.skipped.push(id);
				}
				(true, _) => {
					entries.insert(id.clone(), spec);
					report.replaced.push(id);
				}
			}
		}

		tracing::debug!(
			group,
			policy = %policy,
			added = report.added.len(),
			replaced = report.replaced.len(),
			skipped = report.skipped.len(),
			"registered specifications"
		);
		Ok(report)
	}

	/// Returns a copy of the record stored under `key`.
	pub fn get(&self, key: &SpecKey) -> FactoryResult<Spec> {
		self.groups
			.read()
			.get(key.group())
			.and_then(|entries| entries.get(key.id()))
			.cloned()
			.ok_or_else(|| FactoryError::NotFound { key: key.clone() })
	}

	pub fn contains(&self, key: &SpecKey) -> bool {
		self.groups
			.read()
			.get(key.group())
			.is_some_and(|entries| entries.contains_key(key.id()))
	}

	/// Ids registered in `group`, sorted.
	pub fn ids(&self, group: &str) -> Vec<String> {
		let mut ids: Vec<String> = self
			.groups
			.read()
			.get(group)
			.map(|entries| entries.keys().cloned().collect())
			.unwrap_or_default();
		ids.sort();
		ids
	}

	/// Groups holding at least one specification, sorted.
	pub fn groups(&self) -> Vec<String> {
		let mut groups: Vec<String> = self
			.groups
			.read()
			.iter()
			.filter(|(_, entries)| !entries.is_empty())
			.map(|(group, _)| group.clone())
			.collect();
		groups.sort();
		groups
	}

	/// Total number of specifications across all groups.
	pub fn len(&self) -> usize {
		self.groups.read().values().map(HashMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn clear(&self) {
		self.groups.write().clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::Value;
	use crate::spec::DEFAULT_GROUP;
	use rstest::{fixture, rstest};

	#[fixture]
	fn store() -> SpecStore {
		let store = SpecStore::new();
		store
			.register(
				DEFAULT_GROUP,
				SpecSet::new().with("foo", Spec::value(1)).with("bar", Spec::value(2)),
				ConflictPolicy::Error,
			)
			.unwrap();
		store
	}

	fn stored_int(store: &SpecStore, id: &str) -> Option<i64> {
		store
			.get(&SpecKey::in_default_group(id))
			.ok()
			.and_then(|spec| spec.stored_value().and_then(Value::as_i64))
	}

	#[rstest]
	fn test_error_policy_is_all_or_nothing(store: SpecStore) {
		// Arrange
		let batch = SpecSet::new().with("baz", Spec::value(3)).with("foo", Spec::value(10));

		// Act
		let error = store.register(DEFAULT_GROUP, batch, ConflictPolicy::Error).unwrap_err();

		// Assert
		assert_eq!(error.to_string(), "id conflict, foo is already defined");
		assert!(!store.contains(&SpecKey::in_default_group("baz")));
		assert_eq!(stored_int(&store, "foo"), Some(1));
	}

	#[rstest]
	fn test_skip_policy_keeps_existing(store: SpecStore) {
		// Arrange
		let batch = SpecSet::new().with("foo", Spec::value(10)).with("baz", Spec::value(3));

		// Act
		let report = store.register(DEFAULT_GROUP, batch, ConflictPolicy::Skip).unwrap();

		// Assert
		assert_eq!(report.skipped, vec!["foo".to_string()]);
		assert_eq!(report.added, vec!["baz".to_string()]);
		assert_eq!(stored_int(&store, "foo"), Some(1));
		assert_eq!(stored_int(&store, "baz"), Some(3));
	}

	#[rstest]
	fn test_overwrite_policy_replaces(store: SpecStore) {
		let batch = SpecSet::new().with("foo", Spec::value(10));

		let report = store.register(DEFAULT_GROUP, batch, ConflictPolicy::Overwrite).unwrap();

		assert_eq!(report.replaced, vec!["foo".to_string()]);
		assert_eq!(stored_int(&store, "foo"), Some(10));
	}

	#[rstest]
	fn test_groups_are_independent(store: SpecStore) {
		// Arrange
		let batch = SpecSet::new().with("foo", Spec::value(99));

		// Act
		store.register("admin", batch, ConflictPolicy::Error).unwrap();

		// Assert
		assert_eq!(stored_int(&store, "foo"), Some(1));
		assert_eq!(store.groups(), vec!["admin".to_string(), DEFAULT_GROUP.to_string()]);
		assert_eq!(store.ids(DEFAULT_GROUP), vec!["bar".to_string(), "foo".to_string()]);
		assert_eq!(store.len(), 3);
	}

	#[rstest]
	fn test_missing_key_is_not_found(store: SpecStore) {
		let error = store.get(&SpecKey::new("admin", "foo")).unwrap_err();
		assert_eq!(error.to_string(), "foo (group 'admin'): specification not found");
	}

	#[rstest]
	fn test_clear_empties_every_group(store: SpecStore) {
		store.clear();
		assert!(store.is_empty());
		assert!(store.groups().is_empty());
	}
}
