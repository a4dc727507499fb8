//! Specification records.
//!
//! A [`Spec`] is the raw, registered description of how to produce an
//! instance. It carries the three kind discriminators (constructor, function,
//! value) as independent optional fields; the classifier decides which kind
//! the record describes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::callable::{Callable, CallableRef};
use crate::value::Value;

/// Group used when none is supplied.
pub const DEFAULT_GROUP: &str = "default";

/// Fully qualified specification id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpecKey {
	group: String,
	id: String,
}

impl SpecKey {
	pub fn new(group: impl Into<String>, id: impl Into<String>) -> Self {
		Self {
			group: group.into(),
			id: id.into(),
		}
	}

	/// Key in the default group.
	pub fn in_default_group(id: impl Into<String>) -> Self {
		Self::new(DEFAULT_GROUP, id)
	}

	pub fn group(&self) -> &str {
		&self.group
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn is_default_group(&self) -> bool {
		self.group == DEFAULT_GROUP
	}
}

impl fmt::Display for SpecKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_default_group() {
			write!(f, "{}", self.id)
		} else {
			write!(f, "{} (group '{}')", self.id, self.group)
		}
	}
}

/// What a specification produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecKind {
	/// A freshly constructed, property-injected object.
	Class,
	/// A function, optionally with pre-bound arguments.
	Function,
	/// A stored value.
	Value,
}

impl fmt::Display for SpecKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Class => write!(f, "class"),
			Self::Function => write!(f, "function"),
			Self::Value => write!(f, "value"),
		}
	}
}

/// How long a resolved instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Lifecycle {
	/// One shared instance per group and id.
	#[default]
	#[serde(rename = "singleton")]
	Singleton,
	/// A fresh instance on every resolution.
	#[serde(rename = "prototype", alias = "per_request", alias = "per-request")]
	PerRequest,
}

impl fmt::Display for Lifecycle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Singleton => write!(f, "singleton"),
			Self::PerRequest => write!(f, "prototype"),
		}
	}
}

impl FromStr for Lifecycle {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"singleton" => Ok(Self::Singleton),
			"prototype" | "per_request" | "per-request" => Ok(Self::PerRequest),
			other => Err(format!("unknown lifecycle '{other}'")),
		}
	}
}

/// How a batch registration treats ids that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
	/// Reject the whole batch.
	#[default]
	Error,
	/// Keep the existing entry.
	Skip,
	/// Replace the existing entry.
	Overwrite,
}

impl fmt::Display for ConflictPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Error => write!(f, "error"),
			Self::Skip => write!(f, "skip"),
			Self::Overwrite => write!(f, "overwrite"),
		}
	}
}

/// Key of a property injected into a constructed object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
	/// Plain field assignment.
	Field(String),
	/// Setter call; holds the base name, e.g. `quantity` for `"quantity()"`.
	Setter(String),
}

impl PropertyKey {
	const CALL_SUFFIX: &'static str = "()";

	/// Parses a raw key, recognising the trailing `()` setter marker.
	pub fn parse(raw: &str) -> Self {
		match raw.strip_suffix(Self::CALL_SUFFIX) {
			Some(base) => Self::Setter(base.to_string()),
			None => Self::Field(raw.to_string()),
		}
	}

	/// Name of the setter this key invokes: `quantity()` becomes `setQuantity`.
	pub fn setter_name(&self) -> Option<String> {
		match self {
			Self::Field(_) => None,
			Self::Setter(base) => Some(setter_name(base)),
		}
	}
}

/// Derives a setter name from a property base name: `quantity` becomes
/// `setQuantity`.
pub fn setter_name(base: &str) -> String {
	let mut chars = base.chars();
	let capitalized: String = match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	};
	format!("set{capitalized}")
}

impl From<&str> for PropertyKey {
	fn from(raw: &str) -> Self {
		Self::parse(raw)
	}
}

impl From<String> for PropertyKey {
	fn from(raw: String) -> Self {
		Self::parse(&raw)
	}
}

impl fmt::Display for PropertyKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Field(name) => write!(f, "{name}"),
			Self::Setter(base) => write!(f, "{base}{}", Self::CALL_SUFFIX),
		}
	}
}

/// A registered specification.
///
/// # Examples
///
/// ```
/// use armory_factory::{Lifecycle, Spec, Value};
///
/// let spec = Spec::class("Confetti")
///     .with_args(vec![Value::from("pointy")])
///     .with_property("color", "red")
///     .with_property("quantity()", 20)
///     .with_lifecycle(Lifecycle::PerRequest);
///
/// assert!(spec.constructor().is_some());
/// assert_eq!(spec.properties().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Spec {
	constructor: Option<CallableRef>,
	function: Option<CallableRef>,
	value: Option<Value>,
	args: Option<Vec<Value>>,
	properties: Vec<(PropertyKey, Value)>,
	lifecycle: Option<Lifecycle>,
}

impl Spec {
	/// Empty record with no kind discriminator.
	pub fn new() -> Self {
		Self::default()
	}

	/// Class specification built by `constructor`.
	pub fn class(constructor: impl Into<CallableRef>) -> Self {
		Self::new().with_constructor(constructor)
	}

	/// Function specification.
	pub fn function(function: impl Into<CallableRef>) -> Self {
		Self::new().with_function(function)
	}

	/// Value specification.
	pub fn value(value: impl Into<Value>) -> Self {
		Self::new().with_value(value)
	}

	pub fn with_constructor(mut self, constructor: impl Into<CallableRef>) -> Self {
		self.constructor = Some(constructor.into());
		self
	}

	pub fn with_function(mut self, function: impl Into<CallableRef>) -> Self {
		self.function = Some(function.into());
		self
	}

	pub fn with_value(mut self, value: impl Into<Value>) -> Self {
		self.value = Some(value.into());
		self
	}

	/// Constructor arguments for class specs, weaving template for function
	/// specs.
	pub fn with_args(mut self, args: Vec<Value>) -> Self {
		self.args = Some(args);
		self
	}

	/// Appends a property; a key ending in `()` calls the derived setter.
	pub fn with_property(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
		self.properties.push((key.into(), value.into()));
		self
	}

	pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
		self.lifecycle = Some(lifecycle);
		self
	}

	pub fn constructor(&self) -> Option<&CallableRef> {
		self.constructor.as_ref()
	}

	pub fn function_ref(&self) -> Option<&CallableRef> {
		self.function.as_ref()
	}

	pub fn stored_value(&self) -> Option<&Value> {
		self.value.as_ref()
	}

	pub fn args(&self) -> Option<&[Value]> {
		self.args.as_deref()
	}

	/// Properties in declaration order.
	pub fn properties(&self) -> &[(PropertyKey, Value)] {
		&self.properties
	}

	/// Explicitly declared lifecycle, if any.
	pub fn lifecycle(&self) -> Option<Lifecycle> {
		self.lifecycle
	}
}

impl From<Callable> for Spec {
	fn from(function: Callable) -> Self {
		Self::function(function)
	}
}

/// Ordered batch of specifications keyed by id.
///
/// Inserting an id twice keeps the position of the first insertion and the
/// record of the last.
#[derive(Debug, Clone, Default)]
pub struct SpecSet {
	entries: Vec<(String, Spec)>,
}

impl SpecSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insertion.
	pub fn with(mut self, id: impl Into<String>, spec: Spec) -> Self {
		self.insert(id, spec);
		self
	}

	/// Inserts a record, returning the one it replaced.
	pub fn insert(&mut self, id: impl Into<String>, spec: Spec) -> Option<Spec> {
		let id = id.into();
		match self.entries.iter_mut().find(|(existing, _)| *existing == id) {
			Some((_, slot)) => Some(std::mem::replace(slot, spec)),
			None => {
				self.entries.push((id, spec));
				None
			}
		}
	}

	pub fn get(&self, id: &str) -> Option<&Spec> {
		self.entries
			.iter()
			.find(|(existing, _)| existing == id)
			.map(|(_, spec)| spec)
	}

	pub fn remove(&mut self, id: &str) -> Option<Spec> {
		let index = self.entries.iter().position(|(existing, _)| existing == id)?;
		Some(self.entries.remove(index).1)
	}

	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(id, _)| id.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Spec)> {
		self.entries.iter().map(|(id, spec)| (id.as_str(), spec))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K: Into<String>> FromIterator<(K, Spec)> for SpecSet {
	fn from_iter<I: IntoIterator<Item = (K, Spec)>>(iter: I) -> Self {
		let mut set = Self::new();
		for (id, spec) in iter {
			set.insert(id, spec);
		}
		set
	}
}

impl IntoIterator for SpecSet {
	type Item = (String, Spec);
	type IntoIter = std::vec::IntoIter<(String, Spec)>;

	fn into_iter(self) -> Self::IntoIter {
		self.entries.into_iter()
	}
}
