//! Specification document parsing.
//!
//! A document maps ids to records:
//!
//! ```json
//! {
//!   "celebratory_object": {
//!     "class": "Confetti",
//!     "args": ["pointy"],
//!     "lifecycle": "prototype",
//!     "props": { "color": "red", "quantity()": 20 }
//!   },
//!   "censor": { "function": "SimpleCensor", "args": ["_", ["darn", "dang"]] },
//!   "foo": { "value": 20 }
//! }
//! ```
//!
//! Wrapping such maps in `{ "groups": { "<group>": { ... } } }` places each
//! map in its own group. Constructor and function names are resolved by the
//! factory when the specification is first instantiated.

use std::path::Path;

use armory_factory::{DEFAULT_GROUP, Lifecycle, Spec, SpecSet, Value};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value as JsonValue};

use crate::error::{LoaderError, LoaderResult};
use crate::format::DocumentFormat;

const GROUPS_KEY: &str = "groups";

const RECORD_FIELDS: &[&str] = &[
	"class",
	"constructor",
	"function",
	"value",
	"args",
	"props",
	"properties",
	"lifecycle",
];

/// One record of a specification document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecRecord {
	/// Name of the constructor.
	#[serde(default, alias = "class")]
	pub constructor: Option<String>,

	/// Name of the function.
	#[serde(default)]
	pub function: Option<String>,

	/// Stored value; an explicit `null` is a value.
	#[serde(default, deserialize_with = "present")]
	pub value: Option<JsonValue>,

	/// Constructor arguments or weaving template.
	#[serde(default)]
	pub args: Option<Vec<JsonValue>>,

	/// Injected properties in document order.
	#[serde(default, alias = "props")]
	pub properties: Map<String, JsonValue>,

	/// Declared lifecycle.
	#[serde(default)]
	pub lifecycle: Option<Lifecycle>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
	D: Deserializer<'de>,
{
	JsonValue::deserialize(deserializer).map(Some)
}

impl SpecRecord {
	/// Converts the record into a factory specification.
	pub fn into_spec(self) -> Spec {
		let mut spec = Spec::new();
		if let Some(constructor) = self.constructor {
			spec = spec.with_constructor(constructor);
		}
		if let Some(function) = self.function {
			spec = spec.with_function(function);
		}
		if let Some(value) = self.value {
			spec = spec.with_value(value);
		}
		if let Some(args) = self.args {
			spec = spec.with_args(args.into_iter().map(Value::from).collect());
		}
		for (key, value) in self.properties {
			spec = spec.with_property(key, value);
		}
		if let Some(lifecycle) = self.lifecycle {
			spec = spec.with_lifecycle(lifecycle);
		}
		spec
	}
}

/// Parsed specification document: one [`SpecSet`] per group.
#[derive(Debug, Clone, Default)]
pub struct SpecDocument {
	groups: Vec<(String, SpecSet)>,
	source: Option<String>,
}

impl SpecDocument {
	/// Groups in document order.
	pub fn groups(&self) -> impl Iterator<Item = (&str, &SpecSet)> {
		self.groups.iter().map(|(group, specs)| (group.as_str(), specs))
	}

	pub fn group(&self, name: &str) -> Option<&SpecSet> {
		self.groups
			.iter()
			.find(|(group, _)| group == name)
			.map(|(_, specs)| specs)
	}

	/// Total number of specifications.
	pub fn len(&self) -> usize {
		self.groups.iter().map(|(_, specs)| specs.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Path of the file the document was read from.
	pub fn source(&self) -> Option<&str> {
		self.source.as_deref()
	}

	pub fn into_groups(self) -> Vec<(String, SpecSet)> {
		self.groups
	}
}

/// Parser for specification documents.
///
/// Supports JSON, and YAML with the `yaml` feature.
#[derive(Debug, Default)]
pub struct SpecParser;

impl SpecParser {
	pub fn new() -> Self {
		Self
	}

	/// Parses a document file, detecting the format from its extension.
	///
	/// # Errors
	///
	/// Returns an error if:
	/// - The file extension is not recognized
	/// - The file cannot be read
	/// - The content is not a valid document
	pub fn parse_file(&self, path: &Path) -> LoaderResult<SpecDocument> {
		let format = DocumentFormat::from_path(path).ok_or_else(|| {
			LoaderError::UnsupportedExtension(
				path.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("(none)")
					.to_string(),
			)
		})?;

		let content = std::fs::read_to_string(path).map_err(|e| {
			if e.kind() == std::io::ErrorKind::NotFound {
				LoaderError::FileNotFound(path.display().to_string())
			} else {
				LoaderError::Io(e)
			}
		})?;

		let mut document = self.parse_str(&content, format)?;
		document.source = Some(path.display().to_string());
		Ok(document)
	}

	/// Parses a document from a string.
	pub fn parse_str(&self, content: &str, format: DocumentFormat) -> LoaderResult<SpecDocument> {
		let root = match format {
			DocumentFormat::Json => serde_json::from_str(content)?,
			DocumentFormat::Yaml => self.parse_yaml(content)?,
		};
		self.parse_value(root)
	}

	/// Parses an already decoded document.
	pub fn parse_value(&self, root: JsonValue) -> LoaderResult<SpecDocument> {
		let JsonValue::Object(root) = root else {
			return Err(LoaderError::Parse(
				"expected a mapping of id to specification".to_string(),
			));
		};

		let groups = match grouped(&root) {
			Some(groups) => groups
				.iter()
				.map(|(group, records)| {
					let JsonValue::Object(records) = records else {
						return Err(LoaderError::Parse(format!(
							"group '{group}' must be a mapping of id to specification"
						)));
					};
					Ok((group.clone(), self.parse_records(records)?))
				})
				.collect::<LoaderResult<Vec<_>>>()?,
			None => vec![(DEFAULT_GROUP.to_string(), self.parse_records(&root)?)],
		};

		Ok(SpecDocument {
			groups,
			source: None,
		})
	}

	fn parse_records(&self, records: &Map<String, JsonValue>) -> LoaderResult<SpecSet> {
		records
			.iter()
			.map(|(id, record)| {
				self.validate_id(id)?;
				let record = SpecRecord::deserialize(record).map_err(|e| LoaderError::InvalidRecord {
					id: id.clone(),
					message: e.to_string(),
				})?;
				Ok((id.clone(), record.into_spec()))
			})
			.collect()
	}

	fn validate_id(&self, id: &str) -> LoaderResult<()> {
		if id.trim().is_empty() {
			return Err(LoaderError::InvalidRecord {
				id: id.to_string(),
				message: "id must not be empty".to_string(),
			});
		}
		Ok(())
	}

	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str) -> LoaderResult<JsonValue> {
		Ok(serde_yaml::from_str(content)?)
	}

	/// Stub for YAML parsing when the feature is not enabled.
	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str) -> LoaderResult<JsonValue> {
		Err(LoaderError::UnsupportedExtension(
			"YAML support requires the 'yaml' feature".to_string(),
		))
	}
}

/// Returns the group map of a grouped document.
///
/// A document is grouped when `groups` is its only key and the value under it
/// is not itself a record.
fn grouped(root: &Map<String, JsonValue>) -> Option<&Map<String, JsonValue>> {
	if root.len() != 1 {
		return None;
	}
	match root.get(GROUPS_KEY)? {
		JsonValue::Object(groups) if !groups.keys().any(|key| RECORD_FIELDS.contains(&key.as_str())) => {
			Some(groups)
		}
		_ => None,
	}
}
