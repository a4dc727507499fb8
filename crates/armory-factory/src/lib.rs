//! # Armory Factory
//!
//! A specification-driven object factory. Callers register declarative
//! specifications under string ids and later resolve those ids into
//! instances: constructed objects, functions with pre-bound arguments, or
//! stored values.
//!
//! ## Specification kinds
//!
//! - **Class**: a constructor invoked against a blank object, followed by
//!   property injection. Keys ending in `()` call the derived setter
//!   (`"quantity()"` calls `setQuantity`).
//! - **Function**: a callable, optionally wrapped so that each call weaves
//!   its arguments into a template holding `_` placeholders.
//! - **Value**: a stored value. Composites are shared, primitives copied.
//!
//! ## Lifecycles
//!
//! Singleton specifications are instantiated once per group and id and the
//! instance is retained until [`Factory::reset`]. Per-request specifications
//! produce a fresh instance on every resolution.
//!
//! ## Example
//!
//! ```
//! use armory_factory::{Callable, Factory, Lifecycle, Spec, SpecSet, Value};
//!
//! let confetti = Callable::method(|this, args| {
//!     this.set("shape", args.into_iter().next().unwrap_or(Value::Null));
//!     this.define_method("setQuantity", |this, args| {
//!         this.set("quantity", args.into_iter().next().unwrap_or(Value::Null));
//!         Ok(Value::Null)
//!     });
//!     Ok(Value::Null)
//! });
//!
//! let factory = Factory::builder().callable("Confetti", confetti).build();
//! factory
//!     .register(SpecSet::new().with(
//!         "celebratory_object",
//!         Spec::class("Confetti")
//!             .with_args(vec![Value::from("pointy")])
//!             .with_property("color", "red")
//!             .with_property("quantity()", 20)
//!             .with_lifecycle(Lifecycle::PerRequest),
//!     ))
//!     .unwrap();
//!
//! let first = factory.resolve("celebratory_object").unwrap();
//! let second = factory.resolve("celebratory_object").unwrap();
//!
//! assert!(!first.ptr_eq(&second));
//! let object = first.as_object().unwrap();
//! assert_eq!(object.get("quantity"), Some(Value::Int(20)));
//! assert_eq!(object.get("color"), Some(Value::from("red")));
//! ```

pub mod cache;
pub mod callable;
pub mod classifier;
pub mod config;
pub mod error;
pub mod factory;
pub mod instantiator;
pub mod spec;
pub mod store;
pub mod value;
pub mod weave;

pub use callable::{Callable, CallableRef, CallableRegistry, CallableResolver};
pub use classifier::Classification;
pub use config::{DEFAULT_PLACEHOLDER, FactoryConfig, KindPolicy};
pub use error::{FactoryError, FactoryResult};
pub use factory::{Factory, FactoryBuilder};
pub use spec::{
	ConflictPolicy, DEFAULT_GROUP, Lifecycle, PropertyKey, Spec, SpecKey, SpecKind, SpecSet,
};
pub use store::RegistrationReport;
pub use value::{List, Object, Value};
pub use weave::{weave, weave_with};
