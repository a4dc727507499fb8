//! Factory error types.
//!
//! Every error raised while registering or resolving a specification names the
//! offending id and, when it is not the default group, its group.

use thiserror::Error;

use crate::spec::SpecKey;

/// Result type for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;

/// Errors raised by registration, classification and instantiation.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum FactoryError {
	/// An id is already registered and the batch used the `Error` policy.
	#[error("id conflict, {key} is already defined")]
	Conflict {
		/// Conflicting id.
		key: SpecKey,
	},

	/// No specification is registered under the id in this group.
	#[error("{key}: specification not found")]
	NotFound {
		/// Requested id.
		key: SpecKey,
	},

	/// The specification carries no kind discriminator, or several of them.
	#[error("{key}: ambiguous specification, {reason}")]
	AmbiguousSpec {
		/// Offending id.
		key: SpecKey,
		/// Which discriminators were (or were not) found.
		reason: String,
	},

	/// Per-request lifecycle was declared on a function specification.
	#[error("{key}: function per-request instantiation not supported")]
	UnsupportedLifecycle {
		/// Offending id.
		key: SpecKey,
	},

	/// The specification is structurally invalid.
	#[error("{key}: {message}")]
	Validation {
		/// Offending id.
		key: SpecKey,
		/// What is wrong with it.
		message: String,
	},

	/// A method-call property has no matching callable member on the target.
	#[error("{key}: does not have method {setter}")]
	MissingSetter {
		/// Id of the class specification being instantiated.
		key: SpecKey,
		/// Derived setter name, e.g. `setQuantity`.
		setter: String,
	},

	/// The host resolver has no callable bound to the name.
	#[error("{key}: no callable bound to name '{name}'")]
	UnresolvedName {
		/// Id of the specification referring to the name.
		key: SpecKey,
		/// Name that failed to resolve.
		name: String,
	},

	/// A host callable reported a failure.
	#[error("invocation failed: {0}")]
	Invocation(String),
}

impl FactoryError {
	/// Creates an [`FactoryError::Invocation`] error from any message.
	///
	/// Intended for use inside host callables.
	pub fn invocation(message: impl Into<String>) -> Self {
		Self::Invocation(message.into())
	}

	/// Returns the key of the specification the error refers to, if any.
	pub fn key(&self) -> Option<&SpecKey> {
		match self {
			Self::Conflict { key }
			| Self::NotFound { key }
			| Self::AmbiguousSpec { key, .. }
			| Self::UnsupportedLifecycle { key }
			| Self::Validation { key, .. }
			| Self::MissingSetter { key, .. }
			| Self::UnresolvedName { key, .. } => Some(key),
			Self::Invocation(_) => None,
		}
	}
}
