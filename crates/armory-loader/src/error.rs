//! Error types for specification loading.

use armory_factory::FactoryError;
use thiserror::Error;

/// Errors that can occur while parsing or loading specification documents.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoaderError {
	/// The document is not shaped like a specification document.
	#[error("Parse error: {0}")]
	Parse(String),

	/// A record could not be turned into a specification.
	#[error("Invalid record '{id}': {message}")]
	InvalidRecord {
		/// Id of the offending record.
		id: String,
		/// What is wrong with it.
		message: String,
	},

	/// The file extension names no supported format.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),

	/// Specification file not found.
	#[error("Specification file not found: {0}")]
	FileNotFound(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON syntax error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// YAML syntax error (when the yaml feature is enabled).
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	Yaml(#[from] serde_yaml::Error),

	/// Registering the parsed specifications failed.
	#[error(transparent)]
	Factory(#[from] FactoryError),
}

/// Result type alias for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;
