//! Loading specification documents into a factory.

use std::collections::HashSet;
use std::path::Path;

use armory_factory::{ConflictPolicy, Factory, FactoryError, RegistrationReport, SpecKey};

use crate::error::LoaderResult;
use crate::format::DocumentFormat;
use crate::parser::{SpecDocument, SpecParser};

/// Outcome of loading one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
	/// Registration outcome per group, in document order.
	pub groups: Vec<(String, RegistrationReport)>,
	/// File the document was read from.
	pub source: Option<String>,
}

impl LoadReport {
	/// Number of specifications added or replaced.
	pub fn stored(&self) -> usize {
		self.groups
			.iter()
			.map(|(_, report)| report.stored().count())
			.sum()
	}

	/// Number of specifications left out under [`ConflictPolicy::Skip`].
	pub fn skipped(&self) -> usize {
		self.groups.iter().map(|(_, report)| report.skipped.len()).sum()
	}
}

/// Registers specification documents with a [`Factory`].
///
/// One load call is one batch. Every document is parsed and, with eager
/// validation enabled, classified before anything is written. Under
/// [`ConflictPolicy::Error`] a conflict in any group of any document leaves
/// the factory unchanged.
///
/// # Examples
///
/// ```
/// use armory_factory::{Factory, Value};
/// use armory_loader::{DocumentFormat, SpecLoader};
///
/// let factory = Factory::new();
/// SpecLoader::new(&factory)
///     .load_str(r#"{ "foo": { "value": 20 } }"#, DocumentFormat::Json)
///     .unwrap();
///
/// assert_eq!(factory.resolve("foo").unwrap(), Value::Int(20));
/// ```
#[derive(Debug)]
pub struct SpecLoader<'a> {
	factory: &'a Factory,
	parser: SpecParser,
	policy: ConflictPolicy,
}

impl<'a> SpecLoader<'a> {
	/// Creates a loader using the factory's default conflict policy.
	pub fn new(factory: &'a Factory) -> Self {
		Self {
			factory,
			parser: SpecParser::new(),
			policy: factory.config().default_policy,
		}
	}

	pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
		self.policy = policy;
		self
	}

	pub fn policy(&self) -> ConflictPolicy {
		self.policy
	}

	/// Parses and registers a document held in memory.
	pub fn load_str(&self, content: &str, format: DocumentFormat) -> LoaderResult<LoadReport> {
		let document = self.parser.parse_str(content, format)?;
		self.load_document(document)
	}

	/// Parses and registers a document file.
	pub fn load_file(&self, path: &Path) -> LoaderResult<LoadReport> {
		let document = self.parse_file(path)?;
		self.load_document(document)
	}

	/// Parses and registers several files as one batch.
	///
	/// Every file is parsed and checked before the first is registered, so a
	/// parse error, a failed validation, or (under [`ConflictPolicy::Error`])
	/// a conflict in any file leaves the factory unchanged. Under `Error` an
	/// id repeated across the files is a conflict as well.
	pub fn load_files(&self, paths: &[&Path]) -> LoaderResult<Vec<LoadReport>> {
		let documents = paths
			.iter()
			.map(|path| self.parse_file(path))
			.collect::<LoaderResult<Vec<_>>>()?;
		self.check(&documents)?;
		documents
			.into_iter()
			.map(|document| self.register(document))
			.collect()
	}

	/// Registers an already parsed document.
	pub fn load_document(&self, document: SpecDocument) -> LoaderResult<LoadReport> {
		self.check(std::slice::from_ref(&document))?;
		self.register(document)
	}

	fn parse_file(&self, path: &Path) -> LoaderResult<SpecDocument> {
		let document = self.parser.parse_file(path)?;
		tracing::debug!(path = %path.display(), specs = document.len(), "parsed specification file");
		Ok(document)
	}

	/// Runs every check registration would make, without writing.
	fn check(&self, documents: &[SpecDocument]) -> Result<(), FactoryError> {
		let mut seen = HashSet::new();
		for document in documents {
			for (group, specs) in document.groups() {
				self.factory.validate(group, specs)?;
				if self.policy != ConflictPolicy::Error {
					continue;
				}
				for id in specs.ids() {
					let key = SpecKey::new(group, id);
					if self.factory.contains(group, id) || seen.contains(&key) {
						return Err(FactoryError::Conflict { key });
					}
					seen.insert(key);
				}
			}
		}
		Ok(())
	}

	fn register(&self, document: SpecDocument) -> LoaderResult<LoadReport> {
		let source = document.source().map(str::to_string);
		let mut report = LoadReport {
			groups: Vec::new(),
			source,
		};
		for (group, specs) in document.into_groups() {
			let registered = self.factory.register_in(&group, specs, self.policy)?;
			report.groups.push((group, registered));
		}

		tracing::debug!(
			source = report.source.as_deref().unwrap_or("(memory)"),
			policy = %self.policy,
			stored = report.stored(),
			skipped = report.skipped(),
			"loaded specification document"
		);
		Ok(report)
	}
}
