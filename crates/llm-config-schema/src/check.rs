//! Check pipeline
//!
//! A [`Check`] is one validation step over a value; a [`Pipeline`] runs an
//! ordered list of checks, handing each check the value produced by the
//! previous one and stopping at the first failure. Pipelines are immutable:
//! adding a check returns a new pipeline that shares the existing checks.

use std::fmt;
use std::sync::Arc;

use crate::issue::Issue;

/// Result of running a check or pipeline
pub type CheckResult<T> = Result<T, Issue>;

type CheckFn<T> = dyn Fn(T) -> CheckResult<T> + Send + Sync;

/// A single validation step
///
/// A check receives the current value and either passes it on (possibly
/// replaced) or fails with an [`Issue`].
pub struct Check<T> {
    apply: Arc<CheckFn<T>>,
}

impl<T> Clone for Check<T> {
    fn clone(&self) -> Self {
        Self {
            apply: Arc::clone(&self.apply),
        }
    }
}

impl<T> fmt::Debug for Check<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Check")
    }
}

impl<T: 'static> Check<T> {
    /// Create a check from a function that may replace the value
    pub fn new<F>(apply: F) -> Self
    where
        F: Fn(T) -> CheckResult<T> + Send + Sync + 'static,
    {
        Self {
            apply: Arc::new(apply),
        }
    }

    /// Create a gate-only check that fails with a fixed message
    pub fn predicate<P>(predicate: P, message: impl Into<String>) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        Self::new(move |value| {
            if predicate(&value) {
                Ok(value)
            } else {
                Err(Issue::rule(message.as_str()))
            }
        })
    }

    /// Apply the check to a value
    pub fn apply(&self, value: T) -> CheckResult<T> {
        (self.apply)(value)
    }
}

/// An ordered sequence of checks
pub struct Pipeline<T> {
    checks: Vec<Check<T>>,
}

impl<T> Default for Pipeline<T> {
    fn default() -> Self {
        Self { checks: Vec::new() }
    }
}

impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Self {
            checks: self.checks.clone(),
        }
    }
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("checks", &self.checks.len())
            .finish()
    }
}

impl<T: 'static> Pipeline<T> {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of checks
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Check if the pipeline has no checks
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Return a copy of this pipeline with one more check at the end
    pub fn with(&self, check: Check<T>) -> Self {
        let mut checks = self.checks.clone();
        checks.push(check);
        Self { checks }
    }

    /// Return a copy of this pipeline followed by the checks of `other`
    pub fn concat(&self, other: &Pipeline<T>) -> Self {
        let mut checks = self.checks.clone();
        checks.extend(other.checks.iter().cloned());
        Self { checks }
    }

    /// Run every check in order, stopping at the first failure
    pub fn run(&self, value: T) -> CheckResult<T> {
        self.checks.iter().try_fold(value, |value, check| check.apply(value))
    }
}
