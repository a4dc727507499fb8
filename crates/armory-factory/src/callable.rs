//! Callables and host name resolution.
//!
//! Constructors, setters and functions are all [`Callable`]s: shared closures
//! taking an optional receiver object and positional arguments. Specifications
//! may refer to a callable directly or by name; names are resolved through a
//! host supplied [`CallableResolver`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{FactoryError, FactoryResult};
use crate::value::{Object, Value};

type CallableFn = dyn Fn(Option<&Object>, Vec<Value>) -> FactoryResult<Value> + Send + Sync;

/// A shared, invocable function.
///
/// Cloning is cheap and preserves identity, see [`Callable::ptr_eq`].
#[derive(Clone)]
pub struct Callable(Arc<CallableFn>);

impl Callable {
	/// Creates a callable that receives the invocation's receiver.
	pub fn new<F>(func: F) -> Self
	where
		F: Fn(Option<&Object>, Vec<Value>) -> FactoryResult<Value> + Send + Sync + 'static,
	{
		Self(Arc::new(func))
	}

	/// Creates a callable that ignores any receiver.
	pub fn from_fn<F>(func: F) -> Self
	where
		F: Fn(Vec<Value>) -> FactoryResult<Value> + Send + Sync + 'static,
	{
		Self::new(move |_, args| func(args))
	}

	/// Creates a callable that requires a receiver, e.g. a setter or a
	/// constructor.
	pub fn method<F>(func: F) -> Self
	where
		F: Fn(&Object, Vec<Value>) -> FactoryResult<Value> + Send + Sync + 'static,
	{
		Self::new(move |receiver, args| match receiver {
			Some(this) => func(this, args),
			None => Err(FactoryError::invocation("method invoked without a receiver")),
		})
	}

	/// Invokes the callable with an explicit receiver.
	pub fn call(&self, receiver: Option<&Object>, args: Vec<Value>) -> FactoryResult<Value> {
		(self.0)(receiver, args)
	}

	/// Invokes the callable without a receiver.
	pub fn invoke(&self, args: Vec<Value>) -> FactoryResult<Value> {
		self.call(None, args)
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for Callable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "<function {:p}>", Arc::as_ptr(&self.0).cast::<()>())
	}
}

/// Reference to a callable: either a name to resolve or the callable itself.
#[derive(Debug, Clone)]
pub enum CallableRef {
	/// Name resolved through the factory's [`CallableResolver`].
	Name(String),
	/// Direct reference.
	Callable(Callable),
}

impl From<&str> for CallableRef {
	fn from(name: &str) -> Self {
		Self::Name(name.to_string())
	}
}

impl From<String> for CallableRef {
	fn from(name: String) -> Self {
		Self::Name(name)
	}
}

impl From<Callable> for CallableRef {
	fn from(callable: Callable) -> Self {
		Self::Callable(callable)
	}
}

/// Host collaborator mapping names to callables.
pub trait CallableResolver: Send + Sync {
	/// Returns the callable bound to `name`, if any.
	fn resolve_callable(&self, name: &str) -> Option<Callable>;
}

impl CallableResolver for HashMap<String, Callable> {
	fn resolve_callable(&self, name: &str) -> Option<Callable> {
		self.get(name).cloned()
	}
}

impl<F> CallableResolver for F
where
	F: Fn(&str) -> Option<Callable> + Send + Sync,
{
	fn resolve_callable(&self, name: &str) -> Option<Callable> {
		self(name)
	}
}

/// Table of named callables.
#[derive(Debug, Clone, Default)]
pub struct CallableRegistry {
	entries: HashMap<String, Callable>,
}

impl CallableRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style registration.
	pub fn with(mut self, name: impl Into<String>, callable: Callable) -> Self {
		self.insert(name, callable);
		self
	}

	/// Binds `callable` to `name`, returning the previous binding.
	pub fn insert(&mut self, name: impl Into<String>, callable: Callable) -> Option<Callable> {
		self.entries.insert(name.into(), callable)
	}

	pub fn has(&self, name: &str) -> bool {
		self.entries.contains_key(name)
	}

	/// Registered names in sorted order.
	pub fn names(&self) -> Vec<String> {
		let mut names: Vec<String> = self.entries.keys().cloned().collect();
		names.sort();
		names
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl CallableResolver for CallableRegistry {
	fn resolve_callable(&self, name: &str) -> Option<Callable> {
		self.entries.get(name).cloned()
	}
}
