//! Factory configuration.

use serde::{Deserialize, Serialize};

use crate::spec::ConflictPolicy;

/// Placeholder token used by the weaver unless configured otherwise.
pub const DEFAULT_PLACEHOLDER: &str = "_";

/// How the classifier treats a specification carrying several kind
/// discriminators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindPolicy {
	/// Reject the specification as ambiguous.
	#[default]
	Strict,
	/// Pick the first match in the order class, function, value.
	Precedence,
}

/// Tunable behaviour of a [`Factory`](crate::Factory).
///
/// Every field has a default, so partial documents deserialize:
///
/// ```
/// use armory_factory::{ConflictPolicy, FactoryConfig, KindPolicy};
///
/// let config: FactoryConfig =
///     serde_json::from_str(r#"{ "default_policy": "skip" }"#).unwrap();
///
/// assert_eq!(config.default_policy, ConflictPolicy::Skip);
/// assert_eq!(config.kind_policy, KindPolicy::Strict);
/// assert_eq!(config.placeholder, "_");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryConfig {
	/// Policy applied by [`Factory::register`](crate::Factory::register).
	#[serde(default)]
	pub default_policy: ConflictPolicy,

	/// Handling of specifications with more than one kind discriminator.
	#[serde(default)]
	pub kind_policy: KindPolicy,

	/// Token marking a hole in a function specification's argument template.
	#[serde(default = "default_placeholder")]
	pub placeholder: String,

	/// Classify every incoming specification at registration time and reject
	/// the batch on the first error.
	#[serde(default)]
	pub eager_validation: bool,
}

fn default_placeholder() -> String {
	DEFAULT_PLACEHOLDER.to_string()
}

impl Default for FactoryConfig {
	fn default() -> Self {
		Self {
			default_policy: ConflictPolicy::default(),
			kind_policy: KindPolicy::default(),
			placeholder: default_placeholder(),
			eager_validation: false,
		}
	}
}

impl FactoryConfig {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_default_policy(mut self, policy: ConflictPolicy) -> Self {
		self.default_policy = policy;
		self
	}

	pub fn with_kind_policy(mut self, policy: KindPolicy) -> Self {
		self.kind_policy = policy;
		self
	}

	pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
		self.placeholder = placeholder.into();
		self
	}

	pub fn with_eager_validation(mut self, enabled: bool) -> Self {
		self.eager_validation = enabled;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_empty_document_yields_defaults() {
		let config: FactoryConfig = serde_json::from_value(json!({})).unwrap();
		assert_eq!(config, FactoryConfig::default());
	}

	#[rstest]
	fn test_full_document() {
		// Arrange
		let document = json!({
			"default_policy": "overwrite",
			"kind_policy": "precedence",
			"placeholder": "?",
			"eager_validation": true
		});

		// Act
		let config: FactoryConfig = serde_json::from_value(document).unwrap();

		// Assert
		assert_eq!(
			config,
			FactoryConfig::new()
				.with_default_policy(ConflictPolicy::Overwrite)
				.with_kind_policy(KindPolicy::Precedence)
				.with_placeholder("?")
				.with_eager_validation(true)
		);
	}

	#[rstest]
	fn test_unknown_policy_is_rejected() {
		let result = serde_json::from_value::<FactoryConfig>(json!({ "default_policy": "merge" }));
		assert!(result.is_err());
	}
}
