//! # Gain sets
//!
//! PIDF coefficients and the gain-scheduled sets built from them. One [`GainSet`] is held for
//! each control axis of the follower: translational, heading and drive velocity.
//!
//! ## Scheduling direction
//!
//! The primary coefficients are the gentle, coarse-approach gains used while the tracked error
//! is large. Once the error magnitude drops *below* the switch threshold the secondary (usually
//! stiffer) coefficients take over for fine correction. An error exactly equal to the threshold
//! still selects the primary set.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::validate::{Checker, ConfigError, Violation};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Proportional, integral, derivative and feedforward gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidfCoefficients {
    /// Proportional gain
    pub p: f64,

    /// Integral gain
    pub i: f64,

    /// Derivative gain
    pub d: f64,

    /// Feedforward gain
    pub f: f64,

    /// Derivative filter time constant, only present for filtered coefficients.
    ///
    /// This is the weight given to the previous filtered derivative, so `0` disables filtering
    /// and values approaching `1` filter heavily.
    ///
    /// Range: `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,
}

/// Gain-scheduled coefficients for one control axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainSet {
    /// Coefficients used while the error is large, and always when no secondary is set.
    pub primary: PidfCoefficients,

    /// Coefficients used once the error is below `switch_threshold`.
    #[serde(default)]
    pub secondary: Option<PidfCoefficients>,

    /// Error magnitude below which `secondary` is selected.
    ///
    /// Units: those of the axis error (inches for translational, radians for heading).
    #[serde(default)]
    pub switch_threshold: Option<f64>,
}

/// The three gain sets required by the follower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gains {
    /// Cross-track position correction.
    pub translational: GainSet,

    /// Heading correction.
    pub heading: GainSet,

    /// Along-track drive velocity correction.
    pub drive: GainSet,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PidfCoefficients {
    /// Create an unfiltered set of coefficients.
    pub const fn new(p: f64, i: f64, d: f64, f: f64) -> Self {
        Self { p, i, d, f, t: None }
    }

    /// Create a filtered set of coefficients.
    ///
    /// Argument order matches the usual `(P, I, D, T, F)` convention for filtered PIDF tuples.
    pub const fn filtered(p: f64, i: f64, d: f64, t: f64, f: f64) -> Self {
        Self {
            p,
            i,
            d,
            f,
            t: Some(t),
        }
    }

    /// Returns true if these coefficients carry a derivative filter.
    pub fn is_filtered(&self) -> bool {
        self.t.is_some()
    }

    pub(crate) fn check(&self, c: &mut Checker) {
        c.finite("p", self.p);
        c.finite("i", self.i);
        c.finite("d", self.d);
        c.finite("f", self.f);
        if let Some(t) = self.t {
            c.in_closed("t", t, 0.0, 1.0);
        }
    }
}

impl GainSet {
    /// Create a gain set which never switches.
    pub const fn new(primary: PidfCoefficients) -> Self {
        Self {
            primary,
            secondary: None,
            switch_threshold: None,
        }
    }

    /// Set the secondary coefficients.
    ///
    /// A switch threshold must also be set for the set to be valid.
    pub fn with_secondary(mut self, secondary: PidfCoefficients) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Set the error magnitude below which the secondary coefficients apply.
    pub fn with_switch_threshold(mut self, threshold: f64) -> Self {
        self.switch_threshold = Some(threshold);
        self
    }

    /// Returns true if this set will switch to secondary coefficients for small errors.
    pub fn is_scheduled(&self) -> bool {
        self.secondary.is_some() && self.switch_threshold.is_some()
    }

    /// Get the coefficients which apply for the given error.
    ///
    /// The sign of the error is ignored. A NaN error selects the primary set.
    pub fn effective_coefficients(&self, error: f64) -> PidfCoefficients {
        match (self.secondary, self.switch_threshold) {
            (Some(secondary), Some(threshold)) if error.abs() < threshold => secondary,
            _ => self.primary,
        }
    }

    /// Validate this gain set on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations: Vec<Violation> = Vec::new();
        self.check(&mut Checker::new("", &mut violations));
        ConfigError::check(violations)
    }

    pub(crate) fn check(&self, c: &mut Checker) {
        self.primary.check(&mut c.nested("primary"));

        if let Some(secondary) = &self.secondary {
            secondary.check(&mut c.nested("secondary"));
        }

        match (self.secondary, self.switch_threshold) {
            (Some(_), None) => c.fail(
                "switch_threshold",
                "required when secondary coefficients are set",
            ),
            (_, Some(threshold)) => c.non_negative("switch_threshold", threshold),
            (None, None) => (),
        }
    }
}

impl Gains {
    pub(crate) fn check(&self, violations: &mut Vec<Violation>) {
        self.translational
            .check(&mut Checker::new("translational", violations));
        self.heading.check(&mut Checker::new("heading", violations));
        self.drive.check(&mut Checker::new("drive", violations));
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const COARSE: PidfCoefficients = PidfCoefficients::new(0.03, 0.0, 0.0, 0.015);
    const FINE: PidfCoefficients = PidfCoefficients::new(0.4, 0.0, 0.03, 0.0006);

    #[test]
    fn test_unscheduled_always_primary() {
        let gains = GainSet::new(COARSE);

        for &x in &[0.0, 1e-9, 3.9, 4.0, 1e6, -12.5, std::f64::MAX] {
            assert_eq!(gains.effective_coefficients(x), COARSE);
        }
        assert!(!gains.is_scheduled());
    }

    #[test]
    fn test_secondary_below_threshold() {
        let gains = GainSet::new(COARSE)
            .with_secondary(FINE)
            .with_switch_threshold(4.0);

        assert_eq!(gains.effective_coefficients(0.0), FINE);
        assert_eq!(gains.effective_coefficients(3.999), FINE);
        assert_eq!(gains.effective_coefficients(-3.999), FINE);

        // Boundary belongs to the primary (coarse) regime
        assert_eq!(gains.effective_coefficients(4.0), COARSE);
        assert_eq!(gains.effective_coefficients(4.001), COARSE);
        assert_eq!(gains.effective_coefficients(100.0), COARSE);
        assert_eq!(gains.effective_coefficients(std::f64::NAN), COARSE);
    }

    #[test]
    fn test_zero_threshold_never_selects_secondary() {
        let gains = GainSet::new(COARSE)
            .with_secondary(FINE)
            .with_switch_threshold(0.0);

        assert!(gains.validate().is_ok());
        assert_eq!(gains.effective_coefficients(0.0), COARSE);
    }

    #[test]
    fn test_threshold_without_secondary_is_ignored() {
        let gains = GainSet::new(COARSE).with_switch_threshold(2.0);

        assert!(gains.validate().is_ok());
        assert_eq!(gains.effective_coefficients(1.0), COARSE);
    }

    #[test]
    fn test_secondary_without_threshold() {
        let gains = GainSet::new(COARSE).with_secondary(FINE);
        let err = gains.validate().unwrap_err();

        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field, "switch_threshold");

        // An unvalidated set never switches
        assert_eq!(gains.effective_coefficients(0.0), COARSE);
    }

    #[test]
    fn test_bad_threshold() {
        let negative = GainSet::new(COARSE)
            .with_secondary(FINE)
            .with_switch_threshold(-1.0);
        let infinite = GainSet::new(COARSE)
            .with_secondary(FINE)
            .with_switch_threshold(std::f64::INFINITY);

        assert_eq!(negative.validate().unwrap_err().violations().len(), 1);
        assert_eq!(infinite.validate().unwrap_err().violations().len(), 1);
    }

    #[test]
    fn test_non_finite_coefficients() {
        let gains = GainSet::new(PidfCoefficients::new(std::f64::NAN, 0.0, 0.0, 0.0))
            .with_secondary(PidfCoefficients::filtered(0.05, 0.0, std::f64::INFINITY, 0.6, 0.01))
            .with_switch_threshold(20.0);
        let err = gains.validate().unwrap_err();
        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();

        assert_eq!(fields, vec!["primary.p", "secondary.d"]);
    }

    #[test]
    fn test_filter_constant_range() {
        let ok = GainSet::new(PidfCoefficients::filtered(0.02, 0.000008, 0.0015, 0.6, 0.01));
        let bad = GainSet::new(PidfCoefficients::filtered(0.02, 0.0, 0.0, 1.2, 0.01));

        assert!(ok.validate().is_ok());
        assert!(ok.primary.is_filtered());
        assert_eq!(bad.validate().unwrap_err().violations()[0].field, "primary.t");
    }

    #[test]
    fn test_gains_scope_by_axis() {
        let good = GainSet::new(COARSE);
        let gains = Gains {
            translational: good,
            heading: GainSet::new(COARSE).with_secondary(FINE),
            drive: GainSet::new(COARSE).with_secondary(FINE),
        };
        let mut violations = Vec::new();
        gains.check(&mut violations);

        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["heading.switch_threshold", "drive.switch_threshold"]);
    }
}
