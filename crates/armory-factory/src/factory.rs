//! The factory: registration entry points and resolution.

use std::fmt;
use std::sync::Arc;

use crate::cache::InstanceCache;
use crate::callable::{Callable, CallableRegistry, CallableResolver};
use crate::classifier::{Classification, classify};
use crate::config::FactoryConfig;
use crate::error::FactoryResult;
use crate::instantiator::Instantiator;
use crate::spec::{ConflictPolicy, DEFAULT_GROUP, Lifecycle, Spec, SpecKey, SpecSet};
use crate::store::{RegistrationReport, SpecStore};
use crate::value::Value;

/// Specification-driven object factory.
///
/// A `Factory` owns the registered specifications and the retained singleton
/// instances. It is `Send + Sync`; share it behind an [`Arc`] to resolve from
/// several threads.
///
/// # Examples
///
/// ```
/// use armory_factory::{Factory, Spec, SpecSet, Value};
///
/// let factory = Factory::new();
/// factory
///     .register(SpecSet::new().with("foo", Spec::value(20)))
///     .unwrap();
///
/// assert_eq!(factory.resolve("foo").unwrap(), Value::Int(20));
/// ```
pub struct Factory {
	config: FactoryConfig,
	store: SpecStore,
	cache: InstanceCache,
	callables: Arc<dyn CallableResolver>,
}

impl Factory {
	/// Creates an empty factory with the default configuration and no named
	/// callables.
	pub fn new() -> Self {
		Self::with_config(FactoryConfig::default())
	}

	pub fn with_config(config: FactoryConfig) -> Self {
		Self::from_parts(config, Arc::new(CallableRegistry::new()))
	}

	pub fn builder() -> FactoryBuilder {
		FactoryBuilder::new()
	}

	fn from_parts(config: FactoryConfig, callables: Arc<dyn CallableResolver>) -> Self {
		Self {
			config,
			store: SpecStore::new(),
			cache: InstanceCache::new(),
			callables,
		}
	}

	pub fn config(&self) -> &FactoryConfig {
		&self.config
	}

	/// Registers specifications in the default group under the configured
	/// default policy.
	pub fn register(&self, specs: SpecSet) -> FactoryResult<RegistrationReport> {
		self.register_in(DEFAULT_GROUP, specs, self.config.default_policy)
	}

	/// Registers specifications in the default group under `policy`.
	pub fn register_with(
		&self,
		specs: SpecSet,
		policy: ConflictPolicy,
	) -> FactoryResult<RegistrationReport> {
		self.register_in(DEFAULT_GROUP, specs, policy)
	}

	/// Registers specifications in `group` under `policy`.
	///
	/// With eager validation enabled every record is classified first and the
	/// batch is rejected on the first error.
	pub fn register_in(
		&self,
		group: &str,
		specs: SpecSet,
		policy: ConflictPolicy,
	) -> FactoryResult<RegistrationReport> {
		self.validate(group, &specs)?;
		self.store.register(group, specs, policy)
	}

	/// Classifies every record of `specs` as registration would.
	///
	/// Does nothing unless eager validation is enabled. Nothing is stored.
	pub fn validate(&self, group: &str, specs: &SpecSet) -> FactoryResult<()> {
		if !self.config.eager_validation {
			return Ok(());
		}
		for (id, spec) in specs.iter() {
			classify(&SpecKey::new(group, id), spec, self.config.kind_policy)?;
		}
		Ok(())
	}

	/// Resolves `id` in the default group.
	pub fn resolve(&self, id: &str) -> FactoryResult<Value> {
		self.resolve_key(&SpecKey::in_default_group(id))
	}

	/// Alias of [`Factory::resolve`].
	pub fn get(&self, id: &str) -> FactoryResult<Value> {
		self.resolve(id)
	}

	/// Resolves `id` in `group`.
	pub fn resolve_in(&self, group: &str, id: &str) -> FactoryResult<Value> {
		self.resolve_key(&SpecKey::new(group, id))
	}

	/// Resolves a fully qualified key.
	pub fn resolve_key(&self, key: &SpecKey) -> FactoryResult<Value> {
		let spec = self.store.get(key)?;
		let classification = classify(key, &spec, self.config.kind_policy)?;
		tracing::debug!(
			key = %key,
			kind = %classification.kind,
			lifecycle = %classification.lifecycle,
			"resolving specification"
		);

		match classification.lifecycle {
			Lifecycle::PerRequest => self.instantiate(key, &spec, classification),
			Lifecycle::Singleton => self
				.cache
				.get_or_create(key, || self.instantiate(key, &spec, classification)),
		}
	}

	fn instantiate(
		&self,
		key: &SpecKey,
		spec: &Spec,
		classification: Classification,
	) -> FactoryResult<Value> {
		Instantiator::new(self.callables.as_ref(), &self.config.placeholder)
			.instantiate(key, spec, classification)
	}

	/// Whether a specification is registered under `id` in `group`.
	pub fn contains(&self, group: &str, id: &str) -> bool {
		self.store.contains(&SpecKey::new(group, id))
	}

	/// Ids registered in `group`, sorted.
	pub fn ids(&self, group: &str) -> Vec<String> {
		self.store.ids(group)
	}

	/// Non-empty groups, sorted.
	pub fn groups(&self) -> Vec<String> {
		self.store.groups()
	}

	/// Number of registered specifications across all groups.
	pub fn len(&self) -> usize {
		self.store.len()
	}

	pub fn is_empty(&self) -> bool {
		self.store.is_empty()
	}

	/// Number of retained singleton instances.
	pub fn cached_instances(&self) -> usize {
		self.cache.len()
	}

	/// Forgets every specification and every retained instance.
	pub fn reset(&self) {
		self.store.clear();
		self.cache.clear();
		tracing::debug!("factory reset");
	}
}

impl Default for Factory {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for Factory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Factory")
			.field("config", &self.config)
			.field("specs", &self.store.len())
			.field("instances", &self.cache.len())
			.finish_non_exhaustive()
	}
}

/// Builder for [`Factory`].
///
/// Named callables added with [`FactoryBuilder::callable`] are collected in a
/// [`CallableRegistry`]; [`FactoryBuilder::resolver`] replaces that registry
/// with a host resolver.
#[derive(Default)]
pub struct FactoryBuilder {
	config: FactoryConfig,
	registry: CallableRegistry,
	resolver: Option<Arc<dyn CallableResolver>>,
}

impl FactoryBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn config(mut self, config: FactoryConfig) -> Self {
		self.config = config;
		self
	}

	pub fn resolver<R>(mut self, resolver: R) -> Self
	where
		R: CallableResolver + 'static,
	{
		self.resolver = Some(Arc::new(resolver));
		self
	}

	/// Binds a callable to `name` in the builder's registry.
	pub fn callable(mut self, name: impl Into<String>, callable: Callable) -> Self {
		self.registry.insert(name, callable);
		self
	}

	pub fn build(self) -> Factory {
		let callables: Arc<dyn CallableResolver> = match self.resolver {
			Some(resolver) => {
				if !self.registry.is_empty() {
					tracing::warn!(
						names = ?self.registry.names(),
						"named callables ignored in favour of the host resolver"
					);
				}
				resolver
			}
			None => Arc::new(self.registry),
		};
		Factory::from_parts(self.config, callables)
	}
}
