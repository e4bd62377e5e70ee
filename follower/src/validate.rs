//! Configuration error types and the field checks shared by every component.
//!
//! Each check reports at most one violation per field so that a single bad value never
//! produces a cascade of follow-on errors.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A single broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `geometry.track_width`.
    pub field: String,

    /// Human readable description of the invariant that was broken.
    pub reason: String,
}

/// Collects violations for the fields of one component.
///
/// Field names are prefixed with the component's scope.
pub(crate) struct Checker<'a> {
    scope: String,
    violations: &'a mut Vec<Violation>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised while validating or assembling a controller configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration, {} violation(s):{}", .violations.len(), ViolationList(.violations))]
    InvalidConfiguration { violations: Vec<Violation> },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Violation {
    pub fn new<F: Into<String>, R: Into<String>>(field: F, reason: R) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl ConfigError {
    /// The violations carried by this error.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ConfigError::InvalidConfiguration { violations } => violations,
        }
    }

    /// Turn a list of violations into a result, `Ok` only if the list is empty.
    pub(crate) fn check(violations: Vec<Violation>) -> Result<(), ConfigError> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::InvalidConfiguration { violations })
        }
    }
}

struct ViolationList<'a>(&'a [Violation]);

impl fmt::Display for ViolationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in self.0 {
            write!(f, "\n    - {}", v)?;
        }
        Ok(())
    }
}

impl<'a> Checker<'a> {
    pub(crate) fn new<S: Into<String>>(scope: S, violations: &'a mut Vec<Violation>) -> Self {
        Self {
            scope: scope.into(),
            violations,
        }
    }

    /// Create a checker for a nested scope, e.g. `translational` -> `translational.primary`.
    pub(crate) fn nested(&mut self, name: &str) -> Checker<'_> {
        Checker {
            scope: self.field(name),
            violations: &mut *self.violations,
        }
    }

    /// Full dotted name of a field within this scope.
    pub(crate) fn field(&self, name: &str) -> String {
        if self.scope.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.scope, name)
        }
    }

    /// Record a violation against a field in this scope.
    pub(crate) fn fail<R: Into<String>>(&mut self, name: &str, reason: R) {
        let field = self.field(name);
        self.violations.push(Violation::new(field, reason));
    }

    /// Check the value is neither NaN nor infinite.
    pub(crate) fn finite(&mut self, name: &str, value: f64) -> bool {
        if value.is_finite() {
            true
        } else {
            self.fail(name, format!("must be finite, found {}", value));
            false
        }
    }

    /// Check the value is finite and strictly greater than zero.
    pub(crate) fn positive(&mut self, name: &str, value: f64) {
        if self.finite(name, value) && value <= 0.0 {
            self.fail(name, format!("must be greater than zero, found {}", value));
        }
    }

    /// Check a required value has been set, and is finite and strictly greater than zero.
    pub(crate) fn required_positive(&mut self, name: &str, value: Option<f64>) {
        match value {
            Some(v) => self.positive(name, v),
            None => self.fail(name, "required, not set"),
        }
    }

    /// Check the value is finite and greater than or equal to zero.
    pub(crate) fn non_negative(&mut self, name: &str, value: f64) {
        if self.finite(name, value) && value < 0.0 {
            self.fail(name, format!("must not be negative, found {}", value));
        }
    }

    /// Check the value is finite and less than or equal to zero.
    pub(crate) fn non_positive(&mut self, name: &str, value: f64) {
        if self.finite(name, value) && value > 0.0 {
            self.fail(name, format!("must be zero or negative, found {}", value));
        }
    }

    /// Check the value is finite and lies within `(min, max]`.
    pub(crate) fn in_half_open(&mut self, name: &str, value: f64, min: f64, max: f64) {
        if self.finite(name, value) && !(value > min && value <= max) {
            self.fail(name, format!("must be in ({}, {}], found {}", min, max, value));
        }
    }

    /// Check the value is finite and lies within `[min, max]`.
    pub(crate) fn in_closed(&mut self, name: &str, value: f64, min: f64, max: f64) {
        if self.finite(name, value) && !(value >= min && value <= max) {
            self.fail(name, format!("must be in [{}, {}], found {}", min, max, value));
        }
    }

    /// Check a string identifier is not empty or whitespace.
    pub(crate) fn not_blank(&mut self, name: &str, value: &str) {
        if value.trim().is_empty() {
            self.fail(name, "must not be empty");
        }
    }
}
