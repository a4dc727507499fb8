//! Argument weaving for partial application.
//!
//! A template such as `["_", "hello", "_", "day!"]` woven with the call
//! arguments `["oh", "good"]` yields `["oh", "hello", "good", "day!"]`.
//! Placeholders consume call arguments left to right; placeholders left over
//! become [`Value::Absent`] and surplus call arguments are dropped, so the
//! result is always as long as the template.

use crate::config::DEFAULT_PLACEHOLDER;
use crate::value::Value;

/// Weaves `call_args` into `template` using the default `_` placeholder.
pub fn weave(template: &[Value], call_args: Vec<Value>) -> Vec<Value> {
	weave_with(template, call_args, DEFAULT_PLACEHOLDER)
}

/// Weaves `call_args` into `template`, treating string elements equal to
/// `placeholder` as holes.
pub fn weave_with(template: &[Value], call_args: Vec<Value>, placeholder: &str) -> Vec<Value> {
	let mut call_args = call_args.into_iter();
	template
		.iter()
		.map(|element| {
			if is_placeholder(element, placeholder) {
				call_args.next().unwrap_or(Value::Absent)
			} else {
				element.clone()
			}
		})
		.collect()
}

fn is_placeholder(element: &Value, placeholder: &str) -> bool {
	element.as_str() == Some(placeholder)
}
