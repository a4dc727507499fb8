//! Production of concrete instances from classified specifications.
//!
//! The instantiator neither reads nor writes the instance cache; caching is
//! the resolver's concern.

use crate::callable::{Callable, CallableRef, CallableResolver};
use crate::classifier::Classification;
use crate::error::{FactoryError, FactoryResult};
use crate::spec::{Lifecycle, PropertyKey, Spec, SpecKey, SpecKind, setter_name};
use crate::value::{Object, Value};
use crate::weave::weave_with;

/// Builds one instance per call.
pub struct Instantiator<'a> {
	callables: &'a dyn CallableResolver,
	placeholder: &'a str,
}

impl<'a> Instantiator<'a> {
	/// Creates an instantiator resolving names through `callables` and
	/// weaving with `placeholder`.
	pub fn new(callables: &'a dyn CallableResolver, placeholder: &'a str) -> Self {
		Self {
			callables,
			placeholder,
		}
	}

	/// Produces a fresh instance of the specification.
	pub fn instantiate(
		&self,
		key: &SpecKey,
		spec: &Spec,
		classification: Classification,
	) -> FactoryResult<Value> {
		tracing::trace!(
			key = %key,
			kind = %classification.kind,
			lifecycle = %classification.lifecycle,
			"instantiating specification"
		);
		match classification.kind {
			SpecKind::Class => self.construct(key, spec).map(Value::Object),
			SpecKind::Function => self.bind_function(key, spec).map(Value::Function),
			SpecKind::Value => stored_value(key, spec, classification.lifecycle),
		}
	}

	/// Runs the constructor against a blank object, then injects properties.
	fn construct(&self, key: &SpecKey, spec: &Spec) -> FactoryResult<Object> {
		let reference = spec
			.constructor()
			.ok_or_else(|| missing_field(key, "constructor"))?;
		let constructor = self.resolve(key, reference)?;

		let slate = Object::new();
		let args = spec.args().map(<[Value]>::to_vec).unwrap_or_default();
		constructor.call(Some(&slate), args)?;

		apply_properties(key, &slate, spec.properties())?;
		Ok(slate)
	}

	/// Returns the function itself, or a wrapper weaving pre-bound arguments.
	fn bind_function(&self, key: &SpecKey, spec: &Spec) -> FactoryResult<Callable> {
		let reference = spec
			.function_ref()
			.ok_or_else(|| missing_field(key, "function"))?;
		let function = self.resolve(key, reference)?;

		let Some(template) = spec.args() else {
			return Ok(function);
		};
		let template = template.to_vec();
		let placeholder = self.placeholder.to_string();
		Ok(Callable::new(move |receiver, args| {
			function.call(receiver, weave_with(&template, args, &placeholder))
		}))
	}

	fn resolve(&self, key: &SpecKey, reference: &CallableRef) -> FactoryResult<Callable> {
		match reference {
			CallableRef::Callable(callable) => Ok(callable.clone()),
			CallableRef::Name(name) => self.callables.resolve_callable(name).ok_or_else(|| {
				FactoryError::UnresolvedName {
					key: key.clone(),
					name: name.clone(),
				}
			}),
		}
	}
}

/// Assigns fields and invokes setters in declaration order.
fn apply_properties(
	key: &SpecKey,
	target: &Object,
	properties: &[(PropertyKey, Value)],
) -> FactoryResult<()> {
	for (property, value) in properties {
		match property {
			PropertyKey::Field(name) => {
				target.set(name.clone(), value.clone());
			}
			PropertyKey::Setter(base) => {
				let setter = setter_name(base);
				let method = target
					.method(&setter)
					.ok_or_else(|| FactoryError::MissingSetter {
						key: key.clone(),
						setter: setter.clone(),
					})?;
				method.call(Some(target), spread(value))?;
			}
		}
	}
	Ok(())
}

/// A list value becomes positional arguments, anything else a single one.
fn spread(value: &Value) -> Vec<Value> {
	match value {
		Value::List(list) => list.to_vec(),
		other => vec![other.clone()],
	}
}

fn stored_value(key: &SpecKey, spec: &Spec, lifecycle: Lifecycle) -> FactoryResult<Value> {
	let value = spec
		.stored_value()
		.ok_or_else(|| missing_field(key, "value"))?;
	Ok(match lifecycle {
		Lifecycle::Singleton => value.clone(),
		Lifecycle::PerRequest => value.deep_copy(),
	})
}

fn missing_field(key: &SpecKey, field: &str) -> FactoryError {
	FactoryError::Validation {
		key: key.clone(),
		message: format!("specification has no {field}"),
	}
}
