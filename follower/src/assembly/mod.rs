//! # Controller configuration assembly
//!
//! [`assemble`] is the only way to obtain a [`ControllerConfig`]. It validates every component,
//! collecting all violations so a caller sees every problem at once, and on success returns a
//! bundle the controller runtime can use without further checks.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod shared;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use serde::Serialize;

// Internal
use crate::drivetrain::DrivetrainGeometry;
use crate::gains::{GainSet, Gains};
use crate::localizer::LocalizerCalibration;
use crate::path_constraints::PathConstraints;
use crate::validate::{Checker, ConfigError, Violation};
pub use shared::SharedConfig;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Validated, immutable configuration for the path follower.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerConfig {
    gains: Gains,
    geometry: DrivetrainGeometry,
    localizer: LocalizerCalibration,
    path_constraints: PathConstraints,

    /// Units: kilograms
    mass: f64,

    /// Units: distance/second^2
    forward_zero_power_acceleration: f64,

    /// Units: distance/second^2
    lateral_zero_power_acceleration: f64,

    centripetal_scaling: f64,

    /// Cached from the localizer so the runtime never sees the unresolved form.
    ///
    /// Units: ticks per localizer unit
    ticks_per_unit: f64,
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Validate and assemble the controller configuration.
///
/// # Inputs
/// - `gains`: translational, heading and drive gain sets.
/// - `mass`: robot mass in kilograms, greater than zero.
/// - `forward_zero_power_acceleration`, `lateral_zero_power_acceleration`: deceleration of the
///   coasting robot, zero or negative.
/// - `centripetal_scaling`: curvature feedforward factor, zero or positive.
///
/// # Outputs
/// - On success the assembled configuration.
/// - Otherwise `ConfigError::InvalidConfiguration` listing every violation found.
#[allow(clippy::too_many_arguments)]
pub fn assemble(
    gains: Gains,
    geometry: DrivetrainGeometry,
    localizer: LocalizerCalibration,
    path_constraints: PathConstraints,
    mass: f64,
    forward_zero_power_acceleration: f64,
    lateral_zero_power_acceleration: f64,
    centripetal_scaling: f64,
) -> Result<ControllerConfig, ConfigError> {
    let mut violations: Vec<Violation> = Vec::new();

    gains.check(&mut violations);
    geometry.check(&mut Checker::new("geometry", &mut violations));
    localizer.check(&mut Checker::new("localizer", &mut violations));
    path_constraints.check(&mut Checker::new("path_constraints", &mut violations));

    {
        let mut c = Checker::new("", &mut violations);
        c.positive("mass", mass);
        c.non_positive(
            "forward_zero_power_acceleration",
            forward_zero_power_acceleration,
        );
        c.non_positive(
            "lateral_zero_power_acceleration",
            lateral_zero_power_acceleration,
        );
        c.non_negative("centripetal_scaling", centripetal_scaling);
    }

    if !violations.is_empty() {
        for v in violations.iter() {
            warn!("Configuration violation: {}", v);
        }
        return Err(ConfigError::InvalidConfiguration { violations });
    }

    // Validation above guarantees a resolution is available
    let ticks_per_unit = localizer.resolved_ticks_per_unit()?;

    debug!("Gains: {:?}", gains);
    debug!("Geometry: {:?}", geometry);
    debug!("Localizer: {:?}", localizer);
    debug!("Path constraints: {:?}", path_constraints);

    let config = ControllerConfig {
        gains,
        geometry,
        localizer,
        path_constraints,
        mass,
        forward_zero_power_acceleration,
        lateral_zero_power_acceleration,
        centripetal_scaling,
        ticks_per_unit,
    };

    info!(
        "Controller configuration assembled (mass {} kg, {:.4} ticks/{:?})",
        config.mass, config.ticks_per_unit, config.localizer.unit
    );

    Ok(config)
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ControllerConfig {
    pub fn gains(&self) -> &Gains {
        &self.gains
    }

    pub fn translational(&self) -> &GainSet {
        &self.gains.translational
    }

    pub fn heading(&self) -> &GainSet {
        &self.gains.heading
    }

    pub fn drive(&self) -> &GainSet {
        &self.gains.drive
    }

    pub fn geometry(&self) -> &DrivetrainGeometry {
        &self.geometry
    }

    pub fn localizer(&self) -> &LocalizerCalibration {
        &self.localizer
    }

    pub fn path_constraints(&self) -> &PathConstraints {
        &self.path_constraints
    }

    /// Units: kilograms
    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn forward_zero_power_acceleration(&self) -> f64 {
        self.forward_zero_power_acceleration
    }

    pub fn lateral_zero_power_acceleration(&self) -> f64 {
        self.lateral_zero_power_acceleration
    }

    pub fn centripetal_scaling(&self) -> f64 {
        self.centripetal_scaling
    }

    /// Resolved encoder resolution in ticks per localizer unit.
    pub fn ticks_per_unit(&self) -> f64 {
        self.ticks_per_unit
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
