//! # Armory Loader
//!
//! Declarative specification documents for [`armory_factory`].
//!
//! Documents are JSON (or YAML with the `yaml` feature) mappings of id to
//! record. Records name their constructor or function; the names are
//! resolved through the factory's callable resolver when the specification is
//! first instantiated.
//!
//! ## Example
//!
//! ```
//! use armory_factory::{Callable, Factory, Value};
//! use armory_loader::{DocumentFormat, SpecLoader};
//!
//! let factory = Factory::builder()
//!     .callable("Shout", Callable::from_fn(|args| {
//!         let text = args.first().and_then(Value::as_str).unwrap_or_default();
//!         Ok(Value::from(text.to_uppercase()))
//!     }))
//!     .build();
//!
//! SpecLoader::new(&factory)
//!     .load_str(
//!         r#"{
//!             "shout": { "function": "Shout" },
//!             "limit": { "value": 400 }
//!         }"#,
//!         DocumentFormat::Json,
//!     )
//!     .unwrap();
//!
//! let shout = factory.resolve("shout").unwrap();
//! let shouted = shout.as_function().unwrap().invoke(vec![Value::from("hi")]).unwrap();
//! assert_eq!(shouted, Value::from("HI"));
//! assert_eq!(factory.resolve("limit").unwrap(), Value::Int(400));
//! ```

pub mod error;
pub mod format;
pub mod loader;
pub mod parser;

pub use error::{LoaderError, LoaderResult};
pub use format::DocumentFormat;
pub use loader::{LoadReport, SpecLoader};
pub use parser::{SpecDocument, SpecParser, SpecRecord};
