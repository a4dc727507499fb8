//! Specification document formats.

use std::fmt;
use std::path::Path;

/// Serialization format of a specification document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
	/// JSON format (default).
	#[default]
	Json,

	/// YAML format (requires the `yaml` feature).
	Yaml,
}

impl DocumentFormat {
	/// Determines the format from a file extension.
	///
	/// ```
	/// # use armory_loader::DocumentFormat;
	/// assert_eq!(DocumentFormat::from_extension("json"), Some(DocumentFormat::Json));
	/// assert_eq!(DocumentFormat::from_extension("YML"), Some(DocumentFormat::Yaml));
	/// assert_eq!(DocumentFormat::from_extension("toml"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the format from a file path's extension.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}

	/// Canonical file extension.
	pub fn extension(&self) -> &'static str {
		match self {
			Self::Json => "json",
			Self::Yaml => "yaml",
		}
	}
}

impl fmt::Display for DocumentFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.extension())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::path::PathBuf;

	#[rstest]
	#[case("specs/app.json", Some(DocumentFormat::Json))]
	#[case("specs/app.yaml", Some(DocumentFormat::Yaml))]
	#[case("specs/app.yml", Some(DocumentFormat::Yaml))]
	#[case("specs/app", None)]
	#[case("specs/app.xml", None)]
	fn test_from_path(#[case] path: &str, #[case] expected: Option<DocumentFormat>) {
		assert_eq!(DocumentFormat::from_path(&PathBuf::from(path)), expected);
	}
}
