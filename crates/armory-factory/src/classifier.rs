//! Kind and lifecycle classification of specifications.

use crate::config::KindPolicy;
use crate::error::{FactoryError, FactoryResult};
use crate::spec::{Lifecycle, Spec, SpecKey, SpecKind};
use crate::value::Value;

/// Kind and lifecycle of a specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
	pub kind: SpecKind,
	pub lifecycle: Lifecycle,
}

/// Classifies kind and lifecycle in one step.
pub fn classify(key: &SpecKey, spec: &Spec, policy: KindPolicy) -> FactoryResult<Classification> {
	let kind = classify_kind(key, spec, policy)?;
	let lifecycle = classify_lifecycle(key, spec, kind)?;
	Ok(Classification { kind, lifecycle })
}

/// Determines which kind of instance the specification describes.
///
/// Exactly one discriminator is expected. With [`KindPolicy::Precedence`]
/// several discriminators resolve in the order class, function, value.
pub fn classify_kind(key: &SpecKey, spec: &Spec, policy: KindPolicy) -> FactoryResult<SpecKind> {
	let found: Vec<SpecKind> = [
		(spec.constructor().is_some(), SpecKind::Class),
		(spec.function_ref().is_some(), SpecKind::Function),
		(spec.stored_value().is_some(), SpecKind::Value),
	]
	.into_iter()
	.filter_map(|(present, kind)| present.then_some(kind))
	.collect();

	match (found.as_slice(), policy) {
		([], _) => Err(FactoryError::AmbiguousSpec {
			key: key.clone(),
			reason: "expected one of constructor, function or value".to_string(),
		}),
		([kind], _) | ([kind, ..], KindPolicy::Precedence) => Ok(*kind),
		(kinds, KindPolicy::Strict) => Err(FactoryError::AmbiguousSpec {
			key: key.clone(),
			reason: format!(
				"declares several kinds: {}",
				kinds
					.iter()
					.map(ToString::to_string)
					.collect::<Vec<_>>()
					.join(", ")
			),
		}),
	}
}

/// Determines the lifecycle of a specification of the given kind.
pub fn classify_lifecycle(key: &SpecKey, spec: &Spec, kind: SpecKind) -> FactoryResult<Lifecycle> {
	match kind {
		SpecKind::Class => Ok(spec.lifecycle().unwrap_or_default()),
		SpecKind::Function => match spec.lifecycle() {
			Some(Lifecycle::PerRequest) => Err(FactoryError::UnsupportedLifecycle { key: key.clone() }),
			_ => Ok(Lifecycle::Singleton),
		},
		SpecKind::Value => {
			if spec.lifecycle().is_some() {
				return Err(FactoryError::Validation {
					key: key.clone(),
					message: "value specs cannot declare lifecycle".to_string(),
				});
			}
			Ok(implicit_value_lifecycle(spec.stored_value()))
		}
	}
}

/// Composite values are shared, primitives are handed out by copy.
fn implicit_value_lifecycle(value: Option<&Value>) -> Lifecycle {
	if value.is_some_and(Value::is_composite) {
		Lifecycle::Singleton
	} else {
		Lifecycle::PerRequest
	}
}
