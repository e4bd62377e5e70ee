//! # Follower parameters
//!
//! Unvalidated mirror of every input to [`assemble`], loadable from a TOML parameter file.
//! Fields the data model gives defaults for (`localizer`, `path_constraints`,
//! `geometry.max_power`) may be left out of the file.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::assembly::{assemble, ControllerConfig};
use crate::drivetrain::{DrivetrainGeometry, MotorDirection, WheelRole};
use crate::gains::{GainSet, Gains, PidfCoefficients};
use crate::localizer::{EncoderDirection, LocalizerCalibration};
use crate::path_constraints::PathConstraints;
use crate::validate::ConfigError;
use util::params::{self, LoadError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the path follower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowerParams {
    /// Robot mass.
    ///
    /// Units: kilograms
    pub mass: f64,

    /// Deceleration when coasting forward, zero or negative.
    ///
    /// Units: distance/second^2
    pub forward_zero_power_acceleration: f64,

    /// Deceleration when coasting sideways, zero or negative.
    ///
    /// Units: distance/second^2
    pub lateral_zero_power_acceleration: f64,

    /// Feedforward factor countering centripetal force on curves.
    pub centripetal_scaling: f64,

    pub gains: Gains,

    pub geometry: DrivetrainGeometry,

    #[serde(default)]
    pub localizer: LocalizerCalibration,

    #[serde(default)]
    pub path_constraints: PathConstraints,
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl FollowerParams {
    /// Load the parameters from a file in the params directory.
    pub fn load(param_file_path: &str) -> Result<Self, LoadError> {
        params::load(param_file_path)
    }

    /// Validate the parameters and assemble the controller configuration.
    pub fn assemble(self) -> Result<ControllerConfig, ConfigError> {
        assemble(
            self.gains,
            self.geometry,
            self.localizer,
            self.path_constraints,
            self.mass,
            self.forward_zero_power_acceleration,
            self.lateral_zero_power_acceleration,
            self.centripetal_scaling,
        )
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Parameters of the baseline competition robot.
///
/// `params/follower.toml` holds the same values.
pub fn baseline() -> FollowerParams {
    FollowerParams {
        mass: 16.2,
        forward_zero_power_acceleration: -25.934_693_131_367_959_8,
        lateral_zero_power_acceleration: -67.342_491_844_080_064,
        centripetal_scaling: 0.0005,
        gains: Gains {
            translational: GainSet::new(PidfCoefficients::new(0.03, 0.0, 0.0, 0.015))
                .with_secondary(PidfCoefficients::new(0.4, 0.0, 0.03, 0.0006))
                .with_switch_threshold(4.0),
            heading: GainSet::new(PidfCoefficients::new(0.8, 0.0, 0.0, 0.01))
                .with_secondary(PidfCoefficients::new(2.5, 0.0, 0.1, 0.0005))
                .with_switch_threshold(0.157_079_632_679_489_66),
            drive: GainSet::new(PidfCoefficients::filtered(0.02, 0.000_008, 0.0015, 0.6, 0.01))
                .with_secondary(PidfCoefficients::filtered(0.05, 0.0, 0.0004, 0.6, 0.01))
                .with_switch_threshold(20.0),
        },
        geometry: DrivetrainGeometry::builder(15.0, 13.5)
            .wheel(WheelRole::FrontLeft, "motor_lf", MotorDirection::Reverse)
            .wheel(WheelRole::RearLeft, "motor_lb", MotorDirection::Reverse)
            .wheel(WheelRole::FrontRight, "motor_rf", MotorDirection::Forward)
            .wheel(WheelRole::RearRight, "motor_rb", MotorDirection::Forward)
            .x_velocity(78.261_926_752_421_046_666_666_666_666_667)
            .y_velocity(61.494_551_922_189_565)
            .build(),
        localizer: LocalizerCalibration::default()
            .forward_pod_y(0.75)
            .strafe_pod_x(-6.6)
            .forward_pod_direction(EncoderDirection::Forward)
            .strafe_pod_direction(EncoderDirection::Reversed),
        path_constraints: PathConstraints::new(0.995, 0.1, 0.1, 0.007, 100.0, 4.0, 10, 1.0),
    }
}
