//! Path completion constraints
//!
//! Tolerances and timeouts the controller runtime uses to decide that a path has been reached
//! or has timed out. Nothing here acts on them.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::validate::{Checker, ConfigError, Violation};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Constraints on path completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConstraints {
    /// Fraction of the path parameter that must be reached before the path can end.
    ///
    /// Range: `(0, 1]`
    pub t_value: f64,

    /// Velocity below which the robot is considered stopped.
    ///
    /// Units: distance/second
    pub velocity: f64,

    /// Position error below which the end point is considered reached.
    ///
    /// Units: distance
    pub translational: f64,

    /// Heading error below which the end heading is considered reached.
    ///
    /// Units: radians
    pub heading: f64,

    /// Time allowed to settle at the end of a path before it is abandoned.
    ///
    /// Units: milliseconds
    pub timeout_ms: f64,

    /// Scale factor applied to the braking response.
    pub braking_strength: f64,

    /// Number of iterations used when searching for the closest point on a curve.
    pub search_limit: u32,

    /// Multiplier on the stopping distance at which braking begins.
    pub braking_start: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PathConstraints {
    fn default() -> Self {
        Self::new(0.995, 0.1, 0.1, 0.007, 100.0, 4.0, 10, 1.0)
    }
}

impl PathConstraints {
    /// Create constraints from values in their conventional positional order.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        t_value: f64,
        velocity: f64,
        translational: f64,
        heading: f64,
        timeout_ms: f64,
        braking_strength: f64,
        search_limit: u32,
        braking_start: f64,
    ) -> Self {
        Self {
            t_value,
            velocity,
            translational,
            heading,
            timeout_ms,
            braking_strength,
            search_limit,
            braking_start,
        }
    }

    /// Validate these constraints on their own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations: Vec<Violation> = Vec::new();
        self.check(&mut Checker::new("path_constraints", &mut violations));
        ConfigError::check(violations)
    }

    pub(crate) fn check(&self, c: &mut Checker) {
        c.in_half_open("t_value", self.t_value, 0.0, 1.0);
        c.non_negative("velocity", self.velocity);
        c.non_negative("translational", self.translational);
        c.non_negative("heading", self.heading);
        c.non_negative("timeout_ms", self.timeout_ms);
        c.non_negative("braking_strength", self.braking_strength);
        if self.search_limit == 0 {
            c.fail("search_limit", "must be at least 1");
        }
        c.non_negative("braking_start", self.braking_start);
    }
}
