//! Registration tests: conflict policies, groups, eager validation and reset

use armory_factory::{
	ConflictPolicy, DEFAULT_GROUP, Factory, FactoryConfig, FactoryError, Lifecycle, Object, Spec,
	SpecSet, Value,
};
use rstest::*;

fn config_a() -> SpecSet {
	SpecSet::new().with("foo", Spec::value(20)).with("bar", Spec::value(400))
}

fn config_b() -> SpecSet {
	SpecSet::new().with("bar", Spec::value(8000)).with("baz", Spec::value(160000))
}

#[fixture]
fn factory() -> Factory {
	let factory = Factory::new();
	factory.register(config_a()).unwrap();
	factory
}

/// The error policy aborts the whole batch on the first existing id
#[rstest]
fn test_error_policy_abandons_batch(factory: Factory) {
	// Act
	let error = factory.register_with(config_b(), ConflictPolicy::Error).unwrap_err();

	// Assert
	assert!(matches!(error, FactoryError::Conflict { .. }));
	assert_eq!(error.to_string(), "id conflict, bar is already defined");
	assert!(matches!(factory.resolve("baz"), Err(FactoryError::NotFound { .. })));
	assert_eq!(factory.resolve("bar").unwrap(), Value::Int(400));
}

/// The skip policy only adds new ids
#[rstest]
fn test_skip_policy(factory: Factory) {
	// Act
	let report = factory.register_with(config_b(), ConflictPolicy::Skip).unwrap();

	// Assert
	assert_eq!(report.skipped, vec!["bar".to_string()]);
	assert_eq!(factory.resolve("bar").unwrap(), Value::Int(400));
	assert_eq!(factory.resolve("baz").unwrap(), Value::Int(160000));
}

/// The overwrite policy replaces existing ids
#[rstest]
fn test_overwrite_policy(factory: Factory) {
	// Act
	let report = factory.register_with(config_b(), ConflictPolicy::Overwrite).unwrap();

	// Assert
	assert_eq!(report.replaced, vec!["bar".to_string()]);
	assert_eq!(factory.resolve("bar").unwrap(), Value::Int(8000));
	assert_eq!(factory.resolve("foo").unwrap(), Value::Int(20));
}

/// Conflicts are detected per group
#[rstest]
fn test_groups_do_not_conflict(factory: Factory) {
	// Act
	factory.register_in("tests", config_b(), ConflictPolicy::Error).unwrap();

	// Assert
	assert_eq!(factory.resolve_in("tests", "bar").unwrap(), Value::Int(8000));
	assert_eq!(factory.resolve("bar").unwrap(), Value::Int(400));
	assert!(factory.contains("tests", "baz"));
	assert!(!factory.contains(DEFAULT_GROUP, "baz"));
	assert_eq!(factory.groups(), vec![DEFAULT_GROUP.to_string(), "tests".to_string()]);
}

/// Singletons are cached per group
#[rstest]
fn test_singletons_are_partitioned_by_group() {
	// Arrange
	let factory = Factory::new();
	let shared = Object::new();
	let batch = || SpecSet::new().with("shared", Spec::value(Object::new()));
	factory.register_in("one", batch(), ConflictPolicy::Error).unwrap();
	factory.register_in("two", batch(), ConflictPolicy::Error).unwrap();
	factory
		.register(SpecSet::new().with("shared", Spec::value(shared.clone())))
		.unwrap();

	// Act
	let one = factory.resolve_in("one", "shared").unwrap();
	let two = factory.resolve_in("two", "shared").unwrap();
	let default = factory.get("shared").unwrap();

	// Assert
	assert!(!one.ptr_eq(&two));
	assert!(default.as_object().unwrap().ptr_eq(&shared));
}

/// Eager validation turns resolution errors into registration errors
#[rstest]
#[case(Spec::value(20).with_lifecycle(Lifecycle::PerRequest))]
#[case(Spec::function("SimpleCensor").with_lifecycle(Lifecycle::PerRequest))]
#[case(Spec::new())]
#[case(Spec::function("f").with_value(1))]
fn test_eager_validation_rejects_invalid_specs(#[case] spec: Spec) {
	// Arrange
	let factory = Factory::with_config(FactoryConfig::new().with_eager_validation(true));
	let batch = SpecSet::new().with("foo", Spec::value(1)).with("broken", spec);

	// Act
	let error = factory.register(batch).unwrap_err();

	// Assert
	assert_eq!(error.key().map(|key| key.id()), Some("broken"));
	assert!(factory.is_empty());
}

/// Without eager validation invalid specs register and fail on resolution
#[rstest]
fn test_lazy_validation_defers_errors() {
	// Arrange
	let factory = Factory::new();
	let spec = Spec::value(20).with_lifecycle(Lifecycle::PerRequest);

	// Act
	factory.register(SpecSet::new().with("foo", spec)).unwrap();

	// Assert
	assert!(matches!(factory.resolve("foo"), Err(FactoryError::Validation { .. })));
}

/// Reset forgets specifications and cached instances
#[rstest]
fn test_reset(factory: Factory) {
	// Arrange
	factory
		.register(SpecSet::new().with("shared", Spec::value(Object::new())))
		.unwrap();
	let before = factory.resolve("shared").unwrap();

	// Act
	factory.reset();

	// Assert
	assert!(factory.is_empty());
	assert_eq!(factory.cached_instances(), 0);
	assert!(matches!(factory.resolve("foo"), Err(FactoryError::NotFound { .. })));

	factory
		.register(SpecSet::new().with("shared", Spec::value(Object::new())))
		.unwrap();
	let after = factory.resolve("shared").unwrap();
	assert!(!before.ptr_eq(&after));
}
