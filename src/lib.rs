//! # Armory
//!
//! A specification-driven object factory.
//!
//! Register declarative specifications under string ids, then resolve the ids
//! into constructed objects, partially applied functions or stored values.
//! Singleton instances are retained per group and id; per-request
//! specifications produce a fresh instance on every resolution.
//!
//! ## Feature Flags
//!
//! - `loader` (default) - JSON specification documents via [`loader`]
//! - `yaml` - YAML specification documents
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```
//! use armory::prelude::*;
//!
//! let factory = Factory::new();
//! factory
//!     .register(
//!         SpecSet::new()
//!             .with("settings", Spec::value(Object::new().with("debug", true)))
//!             .with("limit", Spec::value(400)),
//!     )
//!     .unwrap();
//!
//! let a = factory.resolve("settings").unwrap();
//! let b = factory.resolve("settings").unwrap();
//! assert!(a.ptr_eq(&b));
//! assert_eq!(factory.resolve("limit").unwrap(), Value::Int(400));
//! ```

pub use armory_factory as factory;

#[cfg(feature = "loader")]
pub use armory_loader as loader;

pub use armory_factory::{
	Callable, CallableRef, CallableRegistry, CallableResolver, ConflictPolicy, DEFAULT_GROUP,
	Factory, FactoryBuilder, FactoryConfig, FactoryError, FactoryResult, KindPolicy, Lifecycle,
	List, Object, PropertyKey, RegistrationReport, Spec, SpecKey, SpecKind, SpecSet, Value,
	weave,
};

#[cfg(feature = "loader")]
pub use armory_loader::{
	DocumentFormat, LoadReport, LoaderError, LoaderResult, SpecLoader, SpecParser,
};

/// Commonly used types.
pub mod prelude {
	pub use armory_factory::{
		Callable, CallableRegistry, ConflictPolicy, Factory, FactoryConfig, FactoryError,
		Lifecycle, Object, Spec, SpecSet, Value,
	};

	#[cfg(feature = "loader")]
	pub use armory_loader::{DocumentFormat, SpecLoader};
}
