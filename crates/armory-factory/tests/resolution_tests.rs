//! End-to-end resolution tests: lifecycles, injection, functions and values

use armory_factory::{
	Callable, Factory, FactoryError, Lifecycle, Object, Spec, SpecSet, Value,
};
use rstest::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Constructor recording its arguments and exposing `setQuantity`
fn confetti() -> Callable {
	Callable::method(|this, args| {
		this.set("shape", args.into_iter().next().unwrap_or(Value::Null));
		this.define_method("setQuantity", |this, args| {
			this.set("quantity", args.into_iter().next().unwrap_or(Value::Null));
			Ok(Value::Null)
		});
		Ok(Value::Null)
	})
}

/// Replaces every listed bad word in the first argument with `****`
fn simple_censor() -> Callable {
	Callable::from_fn(|args| {
		let mut args = args.into_iter();
		let mut text = args
			.next()
			.and_then(|value| value.as_str().map(str::to_string))
			.unwrap_or_default();
		let bad_words = args.next().and_then(|value| value.as_list().map(|list| list.to_vec()));
		for word in bad_words.unwrap_or_default() {
			if let Some(word) = word.as_str() {
				text = text.replace(word, "****");
			}
		}
		Ok(Value::from(text))
	})
}

#[fixture]
fn factory() -> Factory {
	Factory::builder()
		.callable("Confetti", confetti())
		.callable("SimpleCensor", simple_censor())
		.build()
}

fn celebratory_object(lifecycle: Lifecycle) -> Spec {
	Spec::class("Confetti")
		.with_args(vec![Value::from("pointy")])
		.with_property("color", "red")
		.with_property("quantity()", 20)
		.with_lifecycle(lifecycle)
}

/// Singleton class specs hand out one shared instance
#[rstest]
fn test_singleton_class_is_shared(factory: Factory) {
	// Arrange
	factory
		.register(SpecSet::new().with("confetti", celebratory_object(Lifecycle::Singleton)))
		.unwrap();

	// Act
	let first = factory.resolve("confetti").unwrap();
	let second = factory.resolve("confetti").unwrap();
	first.as_object().unwrap().set("color", "blue");

	// Assert
	assert!(first.ptr_eq(&second));
	assert_eq!(second.as_object().unwrap().get("color"), Some(Value::from("blue")));
}

/// Per-request class specs construct a new instance every time
#[rstest]
fn test_per_request_class_is_fresh(factory: Factory) {
	// Arrange
	factory
		.register(SpecSet::new().with("confetti", celebratory_object(Lifecycle::PerRequest)))
		.unwrap();

	// Act
	let first = factory.resolve("confetti").unwrap();
	let second = factory.resolve("confetti").unwrap();
	first.as_object().unwrap().set("color", "blue");

	// Assert
	assert!(!first.ptr_eq(&second));
	let second = second.as_object().unwrap();
	assert_eq!(second.get("color"), Some(Value::from("red")));
	assert_eq!(second.get("quantity"), Some(Value::Int(20)));
	assert_eq!(second.get("shape"), Some(Value::from("pointy")));
}

/// A target lacking the derived setter fails resolution
#[rstest]
fn test_missing_setter_fails_resolution(factory: Factory) {
	// Arrange
	let spec = Spec::class("Confetti").with_property("weight()", 3);
	factory.register(SpecSet::new().with("heavy", spec)).unwrap();

	// Act
	let error = factory.resolve("heavy").unwrap_err();

	// Assert
	assert_eq!(error.to_string(), "heavy: does not have method setWeight");
}

/// Properties are applied in declaration order
#[rstest]
fn test_properties_apply_in_order(factory: Factory) {
	// Arrange
	let spec = Spec::class("Confetti")
		.with_property("quantity", 1)
		.with_property("quantity()", 2);
	factory.register(SpecSet::new().with("ordered", spec)).unwrap();

	// Act
	let instance = factory.resolve("ordered").unwrap();

	// Assert
	assert_eq!(instance.as_object().unwrap().get("quantity"), Some(Value::Int(2)));
}

/// Function specs with a template weave call arguments into it
#[rstest]
fn test_censor_weaves_bad_words(factory: Factory) {
	// Arrange
	let bad_words = Value::from(vec![Value::from("darn"), Value::from("dang")]);
	let spec = Spec::function("SimpleCensor").with_args(vec![Value::from("_"), bad_words]);
	factory.register(SpecSet::new().with("censor", spec)).unwrap();

	// Act
	let censor = factory.resolve("censor").unwrap();
	let censored = censor
		.as_function()
		.unwrap()
		.invoke(vec![Value::from("That darn cat!")])
		.unwrap();

	// Assert
	assert_eq!(censored, Value::from("That **** cat!"));
}

/// Function specs are singletons, so state closed over is shared
#[rstest]
fn test_function_singleton_shares_state(factory: Factory) {
	// Arrange
	let count = Arc::new(AtomicI64::new(0));
	let counter = Arc::clone(&count);
	let sweet_counter =
		Callable::from_fn(move |_| Ok(Value::Int(counter.fetch_add(1, Ordering::SeqCst) + 1)));
	factory
		.register(SpecSet::new().with("counter", Spec::function(sweet_counter)))
		.unwrap();

	// Act
	let first = factory.resolve("counter").unwrap();
	let second = factory.resolve("counter").unwrap();
	first.as_function().unwrap().invoke(vec![]).unwrap();
	let latest = second.as_function().unwrap().invoke(vec![]).unwrap();

	// Assert
	assert!(first.ptr_eq(&second));
	assert_eq!(latest, Value::Int(2));
}

/// Per-request functions are rejected at resolution
#[rstest]
fn test_per_request_function_is_unsupported(factory: Factory) {
	// Arrange
	let spec = Spec::function("SimpleCensor").with_lifecycle(Lifecycle::PerRequest);
	factory.register(SpecSet::new().with("counter", spec)).unwrap();

	// Act
	let error = factory.resolve("counter").unwrap_err();

	// Assert
	assert!(matches!(error, FactoryError::UnsupportedLifecycle { .. }));
	assert_eq!(
		error.to_string(),
		"counter: function per-request instantiation not supported"
	);
}

/// Composite values are shared, primitives are copied
#[rstest]
fn test_value_semantics(factory: Factory) {
	// Arrange
	let settings = Object::new().with("debug", true);
	factory
		.register(
			SpecSet::new()
				.with("settings", Spec::value(settings.clone()))
				.with("limit", Spec::value(400))
				.with("name", Spec::value("armory")),
		)
		.unwrap();

	// Act
	let resolved = factory.resolve("settings").unwrap();
	resolved.as_object().unwrap().set("debug", false);

	// Assert
	assert_eq!(settings.get("debug"), Some(Value::Bool(false)));
	assert_eq!(factory.resolve("limit").unwrap(), Value::Int(400));
	assert_eq!(factory.resolve("name").unwrap(), Value::from("armory"));
	assert_eq!(factory.cached_instances(), 1);
}

/// Lifecycles on value specs are rejected
#[rstest]
fn test_value_lifecycle_is_a_validation_error(factory: Factory) {
	// Arrange
	let spec = Spec::value(20).with_lifecycle(Lifecycle::PerRequest);
	factory.register(SpecSet::new().with("foo", spec)).unwrap();

	// Act
	let error = factory.resolve("foo").unwrap_err();

	// Assert
	assert!(matches!(error, FactoryError::Validation { .. }));
}

/// Unknown ids are reported with their group when it is not the default
#[rstest]
fn test_not_found_names_group(factory: Factory) {
	let default = factory.resolve("ghost").unwrap_err();
	let grouped = factory.resolve_in("tests", "bar").unwrap_err();

	assert_eq!(default.to_string(), "ghost: specification not found");
	assert_eq!(grouped.to_string(), "bar (group 'tests'): specification not found");
}

/// Constructor failures propagate and leave nothing cached
#[rstest]
fn test_failed_construction_is_not_cached() {
	// Arrange
	let attempts = Arc::new(AtomicI64::new(0));
	let seen = Arc::clone(&attempts);
	let flaky = Callable::method(move |this, _| {
		if seen.fetch_add(1, Ordering::SeqCst) == 0 {
			return Err(FactoryError::invocation("not yet"));
		}
		this.set("ready", true);
		Ok(Value::Null)
	});
	let factory = Factory::new();
	factory.register(SpecSet::new().with("flaky", Spec::class(flaky))).unwrap();

	// Act
	let first = factory.resolve("flaky");
	let second = factory.resolve("flaky").unwrap();
	let third = factory.resolve("flaky").unwrap();

	// Assert
	assert!(matches!(first, Err(FactoryError::Invocation(_))));
	assert!(second.ptr_eq(&third));
	assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

/// Constructors may resolve other specifications through the same factory
#[rstest]
fn test_constructor_can_resolve_dependencies() {
	// Arrange
	let factory = Arc::new(Factory::new());
	let inner = Arc::downgrade(&factory);
	let party = Callable::method(move |this, _| {
		let factory = inner
			.upgrade()
			.ok_or_else(|| FactoryError::invocation("factory dropped"))?;
		this.set("decoration", factory.resolve("decoration")?);
		Ok(Value::Null)
	});
	factory
		.register(
			SpecSet::new()
				.with("decoration", Spec::class(Callable::method(|_, _| Ok(Value::Null))))
				.with("party", Spec::class(party)),
		)
		.unwrap();

	// Act
	let party = factory.resolve("party").unwrap();
	let decoration = factory.resolve("decoration").unwrap();

	// Assert
	let nested = party.as_object().unwrap().get("decoration").unwrap();
	assert!(nested.ptr_eq(&decoration));
}
