//! Dynamic values produced and consumed by the factory.
//!
//! Primitives (`Absent`, `Null`, booleans, numbers, strings) have value
//! semantics. Lists, objects and functions are composite: cloning a composite
//! [`Value`] clones a handle to the same shared data, so a singleton handed to
//! two callers is observed identically by both.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::callable::Callable;
use crate::error::FactoryResult;

/// A dynamically typed value.
#[derive(Clone)]
pub enum Value {
	/// Marker for a missing argument, e.g. an unfilled weaving placeholder.
	Absent,
	/// Explicit null.
	Null,
	/// Boolean.
	Bool(bool),
	/// Integral number.
	Int(i64),
	/// Floating point number.
	Float(f64),
	/// UTF-8 string.
	String(String),
	/// Shared, mutable list.
	List(List),
	/// Shared, mutable object.
	Object(Object),
	/// Callable function.
	Function(Callable),
}

impl Value {
	/// Returns true for values with value semantics.
	pub fn is_primitive(&self) -> bool {
		!self.is_composite()
	}

	/// Returns true for lists, objects and functions.
	pub fn is_composite(&self) -> bool {
		matches!(self, Self::List(_) | Self::Object(_) | Self::Function(_))
	}

	/// Returns true for the absent marker.
	pub fn is_absent(&self) -> bool {
		matches!(self, Self::Absent)
	}

	/// Returns true for null.
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}

	/// Short name of the value's shape, for diagnostics.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Absent => "absent",
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::List(_) => "list",
			Self::Object(_) => "object",
			Self::Function(_) => "function",
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Int(n) => Some(*n),
			_ => None,
		}
	}

	/// Numeric value of an `Int` or `Float`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Int(n) => Some(*n as f64),
			Self::Float(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&List> {
		match self {
			Self::List(list) => Some(list),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(object) => Some(object),
			_ => None,
		}
	}

	pub fn as_function(&self) -> Option<&Callable> {
		match self {
			Self::Function(callable) => Some(callable),
			_ => None,
		}
	}

	/// Identity comparison.
	///
	/// Composites are identical when they share storage; primitives fall back
	/// to equality.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::List(a), Self::List(b)) => a.ptr_eq(b),
			(Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
			(Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
			(a, b) if a.is_primitive() && b.is_primitive() => a == b,
			_ => false,
		}
	}

	/// Returns an independent copy.
	///
	/// Lists and objects are copied recursively; functions keep their identity.
	pub fn deep_copy(&self) -> Self {
		match self {
			Self::List(list) => Self::List(list.deep_copy()),
			Self::Object(object) => Self::Object(object.deep_copy()),
			other => other.clone(),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Absent, Self::Absent) | (Self::Null, Self::Null) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
			(Self::String(a), Self::String(b)) => a == b,
			(Self::List(a), Self::List(b)) => a == b,
			(Self::Object(a), Self::Object(b)) => a == b,
			(Self::Function(a), Self::Function(b)) => a.ptr_eq(b),
			_ => false,
		}
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Absent => write!(f, "Absent"),
			Self::Null => write!(f, "Null"),
			Self::Bool(b) => write!(f, "{b}"),
			Self::Int(n) => write!(f, "{n}"),
			Self::Float(n) => write!(f, "{n:?}"),
			Self::String(s) => write!(f, "{s:?}"),
			Self::List(list) => list.fmt(f),
			Self::Object(object) => object.fmt(f),
			Self::Function(callable) => callable.fmt(f),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(value.into())
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::String(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Self::List(List::from_vec(items))
	}
}

impl From<List> for Value {
	fn from(list: List) -> Self {
		Self::List(list)
	}
}

impl From<Object> for Value {
	fn from(object: Object) -> Self {
		Self::Object(object)
	}
}

impl From<Callable> for Value {
	fn from(callable: Callable) -> Self {
		Self::Function(callable)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Self::Null,
			serde_json::Value::Bool(b) => Self::Bool(b),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(int) => Self::Int(int),
				None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			serde_json::Value::String(s) => Self::String(s),
			serde_json::Value::Array(items) => {
				Self::List(items.into_iter().map(Value::from).collect())
			}
			serde_json::Value::Object(map) => {
				let object = Object::new();
				for (name, field) in map {
					object.set(name, Value::from(field));
				}
				Self::Object(object)
			}
		}
	}
}

/// Shared, mutable list of values.
#[derive(Clone, Default)]
pub struct List {
	items: Arc<RwLock<Vec<Value>>>,
}

impl List {
	/// Creates an empty list.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a list owning the given items.
	pub fn from_vec(items: Vec<Value>) -> Self {
		Self {
			items: Arc::new(RwLock::new(items)),
		}
	}

	pub fn len(&self) -> usize {
		self.items.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.read().is_empty()
	}

	/// Returns a clone of the item at `index`.
	pub fn get(&self, index: usize) -> Option<Value> {
		self.items.read().get(index).cloned()
	}

	/// Appends an item; visible through every handle to this list.
	pub fn push(&self, value: impl Into<Value>) {
		self.items.write().push(value.into());
	}

	/// Snapshot of the current items.
	pub fn to_vec(&self) -> Vec<Value> {
		self.items.read().clone()
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.items, &other.items)
	}

	/// Recursively copies the list into fresh storage.
	pub fn deep_copy(&self) -> Self {
		self.items.read().iter().map(Value::deep_copy).collect()
	}
}

impl FromIterator<Value> for List {
	fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
		Self::from_vec(iter.into_iter().collect())
	}
}

impl PartialEq for List {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other) || *self.items.read() == *other.items.read()
	}
}

impl fmt::Debug for List {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.items.read().iter()).finish()
	}
}

/// Shared, mutable object.
///
/// Fields holding a [`Value::Function`] double as methods: [`Object::call_method`]
/// invokes them with the object itself as receiver.
#[derive(Clone, Default)]
pub struct Object {
	fields: Arc<RwLock<HashMap<String, Value>>>,
}

impl Object {
	/// Creates a blank object.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style field assignment.
	pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.set(name, value);
		self
	}

	/// Returns a clone of the field's value.
	pub fn get(&self, name: &str) -> Option<Value> {
		self.fields.read().get(name).cloned()
	}

	/// Assigns a field, returning the previous value.
	pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.fields.write().insert(name.into(), value.into())
	}

	pub fn remove(&self, name: &str) -> Option<Value> {
		self.fields.write().remove(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.fields.read().contains_key(name)
	}

	/// Field names in sorted order.
	pub fn keys(&self) -> Vec<String> {
		let mut keys: Vec<String> = self.fields.read().keys().cloned().collect();
		keys.sort();
		keys
	}

	pub fn len(&self) -> usize {
		self.fields.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.read().is_empty()
	}

	/// Looks up a callable member.
	pub fn method(&self, name: &str) -> Option<Callable> {
		match self.get(name)? {
			Value::Function(callable) => Some(callable),
			_ => None,
		}
	}

	/// Invokes a callable member with this object as receiver.
	///
	/// Returns `None` when the object has no callable member of that name.
	pub fn call_method(&self, name: &str, args: Vec<Value>) -> Option<FactoryResult<Value>> {
		let method = self.method(name)?;
		Some(method.call(Some(self), args))
	}

	/// Installs a method that receives this object as its receiver.
	pub fn define_method<F>(&self, name: impl Into<String>, method: F)
	where
		F: Fn(&Object, Vec<Value>) -> FactoryResult<Value> + Send + Sync + 'static,
	{
		self.set(name, Callable::method(method));
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.fields, &other.fields)
	}

	/// Recursively copies the object into fresh storage.
	pub fn deep_copy(&self) -> Self {
		let fields = self
			.fields
			.read()
			.iter()
			.map(|(name, value)| (name.clone(), value.deep_copy()))
			.collect();
		Self {
			fields: Arc::new(RwLock::new(fields)),
		}
	}
}

impl PartialEq for Object {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other) || *self.fields.read() == *other.fields.read()
	}
}

impl fmt::Debug for Object {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let fields = self.fields.read();
		let mut names: Vec<&String> = fields.keys().collect();
		names.sort();
		f.debug_map()
			.entries(names.into_iter().map(|name| (name, &fields[name])))
			.finish()
	}
}
