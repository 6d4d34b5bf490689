//! Number schema
//!
//! The working value is the input's own `serde_json::Number`, so an integer
//! input comes back out as the same integer. Comparisons are done in `f64`.

use serde_json::{Number, Value};
use std::any::Any;
use std::sync::Arc;

use crate::base::{Schema, SchemaBase, SchemaKind};
use crate::check::{Check, CheckResult};
use crate::issue::Issue;

fn expect_number(input: Option<&Value>) -> CheckResult<Number> {
    match input {
        Some(Value::Number(n)) => Ok(n.clone()),
        other => Err(Issue::invalid_type("number", other)),
    }
}

fn as_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

/// Schema accepting JSON numbers
#[derive(Debug, Clone)]
pub struct NumberSchema {
    base: SchemaBase<Number>,
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberSchema {
    /// Create an unconstrained number schema
    pub fn new() -> Self {
        Self {
            base: SchemaBase::new(SchemaKind::Number, expect_number),
        }
    }

    fn with_rule<P>(&self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(f64) -> bool + Send + Sync + 'static,
    {
        Self {
            base: self
                .base
                .with_check(Check::predicate(move |n: &Number| predicate(as_f64(n)), message)),
        }
    }

    /// Require a value strictly greater than `bound`
    pub fn gt(&self, bound: f64) -> Self {
        self.with_rule(
            move |n| n > bound,
            format!("number must be greater than {}", bound),
        )
    }

    /// Require a value greater than or equal to `bound`
    pub fn gte(&self, bound: f64) -> Self {
        self.with_rule(
            move |n| n >= bound,
            format!("number must be greater than or equal to {}", bound),
        )
    }

    /// Require a value strictly less than `bound`
    pub fn lt(&self, bound: f64) -> Self {
        self.with_rule(
            move |n| n < bound,
            format!("number must be less than {}", bound),
        )
    }

    /// Require a value less than or equal to `bound`
    pub fn lte(&self, bound: f64) -> Self {
        self.with_rule(
            move |n| n <= bound,
            format!("number must be less than or equal to {}", bound),
        )
    }

    /// Require a value above zero
    pub fn positive(&self) -> Self {
        self.with_rule(|n| n > 0.0, "number must be positive")
    }

    /// Require a value below zero
    pub fn negative(&self) -> Self {
        self.with_rule(|n| n < 0.0, "number must be negative")
    }

    /// Require a value at or below zero
    pub fn nonpositive(&self) -> Self {
        self.with_rule(|n| n <= 0.0, "number cannot be positive")
    }

    /// Require a value at or above zero
    pub fn nonnegative(&self) -> Self {
        self.with_rule(|n| n >= 0.0, "number cannot be negative")
    }

    /// Require a whole multiple of `step`
    pub fn multiple_of(&self, step: f64) -> Self {
        self.with_rule(
            move |n| n % step == 0.0,
            format!("number must be a multiple of {}", step),
        )
    }

    /// Add a custom rule
    pub fn refine<P>(&self, predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(f64) -> bool + Send + Sync + 'static,
    {
        self.with_rule(predicate, message)
    }
}

impl Schema for NumberSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Number
    }

    fn run(&self, input: Option<&Value>) -> CheckResult<Option<Value>> {
        self.base.run(input).map(|n| Some(Value::Number(n)))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn merge(&self, other: &dyn Schema) -> Option<Arc<dyn Schema>> {
        let other = other.as_any().downcast_ref::<Self>()?;
        Some(Arc::new(Self {
            base: self.base.concat(&other.base),
        }))
    }
}

/// Create a number schema
pub fn number() -> NumberSchema {
    NumberSchema::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(schema: &NumberSchema, input: Value) -> String {
        schema.safe_parse(&input).unwrap_err().to_string()
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(
            message(&number(), json!("hello")),
            "input must be of type number, received: string"
        );
        assert_eq!(number().parse(&json!(3)).unwrap(), json!(3));
    }

    #[test]
    fn test_integer_representation_is_kept() {
        let out = number().parse(&json!(42)).unwrap();
        assert!(out.is_i64());
        assert_eq!(out, json!(42));
        assert_eq!(number().parse(&json!(1.5)).unwrap(), json!(1.5));
    }

    #[test]
    fn test_gt() {
        assert_eq!(message(&number().gt(4.0), json!(3)), "number must be greater than 4");
        assert!(number().gt(4.0).safe_parse(&json!(4)).is_err());
        assert_eq!(number().gt(3.0).parse(&json!(5)).unwrap(), json!(5));
    }

    #[test]
    fn test_gte() {
        assert!(message(&number().gte(4.0), json!(3)).starts_with("number must be greater than or equal to"));
        assert_eq!(number().gte(3.0).parse(&json!(3)).unwrap(), json!(3));
    }

    #[test]
    fn test_lt() {
        assert_eq!(message(&number().lt(4.0), json!(5)), "number must be less than 4");
        assert!(number().lt(4.0).safe_parse(&json!(4)).is_err());
        assert_eq!(number().lt(3.0).parse(&json!(2)).unwrap(), json!(2));
    }

    #[test]
    fn test_lte() {
        assert!(message(&number().lte(4.0), json!(5)).starts_with("number must be less than or equal to"));
        assert_eq!(number().lte(3.0).parse(&json!(3)).unwrap(), json!(3));
    }

    #[test]
    fn test_sign_rules() {
        assert_eq!(message(&number().positive(), json!(0)), "number must be positive");
        assert_eq!(message(&number().negative(), json!(0)), "number must be negative");
        assert_eq!(number().nonpositive().parse(&json!(0)).unwrap(), json!(0));
        assert_eq!(message(&number().nonpositive(), json!(2)), "number cannot be positive");
        assert_eq!(number().nonnegative().parse(&json!(0)).unwrap(), json!(0));
        assert_eq!(message(&number().nonnegative(), json!(-2)), "number cannot be negative");
    }

    #[test]
    fn test_multiple_of() {
        assert_eq!(message(&number().multiple_of(2.0), json!(5)), "number must be a multiple of 2");
        assert_eq!(number().multiple_of(2.0).parse(&json!(4)).unwrap(), json!(4));
    }

    #[test]
    fn test_fractional_threshold_in_message() {
        assert_eq!(message(&number().gt(0.5), json!(0.25)), "number must be greater than 0.5");
    }

    #[test]
    fn test_refine() {
        let even = number().refine(|n| n % 2.0 == 0.0, "number must be even");
        assert_eq!(message(&even, json!(3)), "number must be even");
    }

    #[test]
    fn test_merge_keeps_both_check_lists() {
        let merged = number().gt(0.0).merge(&number().lt(3.0)).unwrap();
        assert_eq!(merged.safe_parse(&json!(0)).unwrap_err().to_string(), "number must be greater than 0");
        assert_eq!(merged.safe_parse(&json!(3)).unwrap_err().to_string(), "number must be less than 3");
        assert_eq!(merged.parse(&json!(2)).unwrap(), json!(2));
    }
}
