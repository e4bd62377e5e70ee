//! # Drivetrain geometry
//!
//! Describes the four wheels of a mecanum drivetrain: which motor drives each wheel, which way
//! round each motor is mounted, and the distances needed to mix a robot-frame velocity into
//! wheel commands.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod mixing;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};
use std::fmt;

// Internal
use crate::validate::{Checker, ConfigError, Violation};
pub use mixing::WheelCommands;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// The number of wheels on the drivetrain.
pub const NUM_WHEELS: usize = 4;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The position of a wheel on the robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelRole {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

/// The direction a motor turns for a positive command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorDirection {
    Forward,
    Reverse,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Assignment of a motor to a wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelAssignment {
    /// The wheel this motor drives
    pub role: WheelRole,

    /// Logical hardware name of the motor, e.g. `"motor_lf"`
    pub id: String,

    /// Mounting polarity of the motor
    pub direction: MotorDirection,
}

/// Mecanum drivetrain geometry.
///
/// Distances share one unit, the same one the localizer reports positions in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrivetrainGeometry {
    /// Motor assignments. A valid geometry has exactly one entry per [`WheelRole`].
    pub wheels: Vec<WheelAssignment>,

    /// Distance between the left and right wheel contact points.
    pub track_width: f64,

    /// Distance between the front and rear axles.
    pub wheel_base: f64,

    /// Measured top speed driving straight forward, required.
    ///
    /// Units: distance/second
    #[serde(default)]
    pub x_velocity: Option<f64>,

    /// Measured top speed strafing sideways, required.
    ///
    /// Units: distance/second
    #[serde(default)]
    pub y_velocity: Option<f64>,

    /// Largest wheel command magnitude the runtime may send.
    ///
    /// Range: `(0, 1]`
    #[serde(default = "default_max_power")]
    pub max_power: f64,
}

/// Builder for a [`DrivetrainGeometry`].
#[derive(Debug, Clone)]
pub struct DrivetrainGeometryBuilder {
    wheels: Vec<WheelAssignment>,
    track_width: f64,
    wheel_base: f64,
    x_velocity: Option<f64>,
    y_velocity: Option<f64>,
    max_power: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WheelRole {
    /// All wheel roles in command order.
    pub const ALL: [WheelRole; NUM_WHEELS] = [
        WheelRole::FrontLeft,
        WheelRole::FrontRight,
        WheelRole::RearLeft,
        WheelRole::RearRight,
    ];

    /// Index of this wheel in command arrays.
    pub fn index(self) -> usize {
        match self {
            WheelRole::FrontLeft => 0,
            WheelRole::FrontRight => 1,
            WheelRole::RearLeft => 2,
            WheelRole::RearRight => 3,
        }
    }
}

impl fmt::Display for WheelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WheelRole::FrontLeft => "front_left",
            WheelRole::FrontRight => "front_right",
            WheelRole::RearLeft => "rear_left",
            WheelRole::RearRight => "rear_right",
        };
        f.write_str(s)
    }
}

impl MotorDirection {
    /// Multiplier applied to a wheel command for this polarity.
    pub fn sign(self) -> f64 {
        match self {
            MotorDirection::Forward => 1.0,
            MotorDirection::Reverse => -1.0,
        }
    }
}

impl DrivetrainGeometry {
    /// Start building a geometry with the given track width and wheel base.
    pub fn builder(track_width: f64, wheel_base: f64) -> DrivetrainGeometryBuilder {
        DrivetrainGeometryBuilder {
            wheels: Vec::with_capacity(NUM_WHEELS),
            track_width,
            wheel_base,
            x_velocity: None,
            y_velocity: None,
            max_power: None,
        }
    }

    /// Get the motor assigned to a wheel.
    ///
    /// Always `Some` on a validated geometry.
    pub fn wheel(&self, role: WheelRole) -> Option<&WheelAssignment> {
        self.wheels.iter().find(|w| w.role == role)
    }

    /// Get the mounting polarity of a wheel's motor.
    ///
    /// Unassigned wheels are treated as `Forward`.
    pub fn direction(&self, role: WheelRole) -> MotorDirection {
        self.wheel(role)
            .map(|w| w.direction)
            .unwrap_or(MotorDirection::Forward)
    }

    /// Validate this geometry on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations: Vec<Violation> = Vec::new();
        self.check(&mut Checker::new("geometry", &mut violations));
        ConfigError::check(violations)
    }

    pub(crate) fn check(&self, c: &mut Checker) {
        // Role coverage is reported as one violation, a single mistyped role would otherwise
        // show up as both a duplicate and a missing wheel.
        let mut counts = [0usize; NUM_WHEELS];
        for wheel in self.wheels.iter() {
            counts[wheel.role.index()] += 1;
        }

        let mut problems: Vec<String> = Vec::new();
        for role in WheelRole::ALL.iter() {
            match counts[role.index()] {
                0 => problems.push(format!("no motor assigned to {}", role)),
                1 => (),
                n => problems.push(format!("{} is assigned {} times", role, n)),
            }
        }
        if !problems.is_empty() {
            c.fail("wheels", problems.join(", "));
        }

        let duplicated = |w: &WheelAssignment| counts[w.role.index()] > 1;

        for (i, wheel) in self.wheels.iter().enumerate() {
            c.not_blank(&format!("wheels.{}.id", wheel.role), &wheel.id);

            // A copied entry is already reported through its role
            let reused = !duplicated(wheel)
                && self.wheels[..i]
                    .iter()
                    .any(|w| !duplicated(w) && w.id == wheel.id);
            if reused && !wheel.id.trim().is_empty() {
                c.fail(
                    &format!("wheels.{}.id", wheel.role),
                    format!("hardware id \"{}\" is already used by another wheel", wheel.id),
                );
            }
        }

        c.positive("track_width", self.track_width);
        c.positive("wheel_base", self.wheel_base);
        c.required_positive("x_velocity", self.x_velocity);
        c.required_positive("y_velocity", self.y_velocity);
        c.in_half_open("max_power", self.max_power, 0.0, 1.0);
    }
}

impl DrivetrainGeometryBuilder {
    /// Assign a motor to a wheel.
    pub fn wheel<S: Into<String>>(
        mut self,
        role: WheelRole,
        id: S,
        direction: MotorDirection,
    ) -> Self {
        self.wheels.push(WheelAssignment {
            role,
            id: id.into(),
            direction,
        });
        self
    }

    pub fn x_velocity(mut self, x_velocity: f64) -> Self {
        self.x_velocity = Some(x_velocity);
        self
    }

    pub fn y_velocity(mut self, y_velocity: f64) -> Self {
        self.y_velocity = Some(y_velocity);
        self
    }

    pub fn max_power(mut self, max_power: f64) -> Self {
        self.max_power = Some(max_power);
        self
    }

    /// Finish building.
    ///
    /// The result is not validated, that happens in [`DrivetrainGeometry::validate`] or when
    /// the geometry is assembled into a controller configuration.
    pub fn build(self) -> DrivetrainGeometry {
        DrivetrainGeometry {
            wheels: self.wheels,
            track_width: self.track_width,
            wheel_base: self.wheel_base,
            x_velocity: self.x_velocity,
            y_velocity: self.y_velocity,
            max_power: self.max_power.unwrap_or_else(default_max_power),
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn default_max_power() -> f64 {
    1.0
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    pub(crate) fn geometry() -> DrivetrainGeometryBuilder {
        DrivetrainGeometry::builder(15.0, 13.5)
            .wheel(WheelRole::FrontLeft, "motor_lf", MotorDirection::Reverse)
            .wheel(WheelRole::RearLeft, "motor_lb", MotorDirection::Reverse)
            .wheel(WheelRole::FrontRight, "motor_rf", MotorDirection::Forward)
            .wheel(WheelRole::RearRight, "motor_rb", MotorDirection::Forward)
            .x_velocity(78.0)
            .y_velocity(61.5)
    }

    fn fields(err: ConfigError) -> Vec<String> {
        err.violations().iter().map(|v| v.field.clone()).collect()
    }

    #[test]
    fn test_valid_geometry() {
        let g = geometry().build();

        assert!(g.validate().is_ok());
        assert_eq!(g.max_power, 1.0);
        assert_eq!(g.x_velocity, Some(78.0));
        assert_eq!(g.wheel(WheelRole::RearLeft).unwrap().id, "motor_lb");
        assert_eq!(g.direction(WheelRole::FrontLeft), MotorDirection::Reverse);
        assert_eq!(g.direction(WheelRole::RearRight), MotorDirection::Forward);
    }

    #[test]
    fn test_missing_and_duplicate_roles() {
        let g = DrivetrainGeometry::builder(15.0, 13.5)
            .wheel(WheelRole::FrontLeft, "a", MotorDirection::Forward)
            .wheel(WheelRole::FrontLeft, "b", MotorDirection::Forward)
            .wheel(WheelRole::FrontRight, "c", MotorDirection::Forward)
            .wheel(WheelRole::RearLeft, "d", MotorDirection::Forward)
            .x_velocity(78.0)
            .y_velocity(61.5)
            .build();

        let err = g.validate().unwrap_err();
        let reasons: Vec<String> = err.violations().iter().map(|v| v.to_string()).collect();

        assert_eq!(
            reasons,
            vec!["geometry.wheels: front_left is assigned 2 times, no motor assigned to rear_right"]
        );
    }

    #[test]
    fn test_mistyped_role_reported_once() {
        // Front left entered as a second rear left, copying its id
        let g = DrivetrainGeometry::builder(15.0, 13.5)
            .wheel(WheelRole::RearLeft, "motor_lb", MotorDirection::Reverse)
            .wheel(WheelRole::RearLeft, "motor_lb", MotorDirection::Reverse)
            .wheel(WheelRole::FrontRight, "motor_rf", MotorDirection::Forward)
            .wheel(WheelRole::RearRight, "motor_rb", MotorDirection::Forward)
            .x_velocity(78.0)
            .y_velocity(61.5)
            .build();

        let err = g.validate().unwrap_err();

        assert_eq!(err.violations().len(), 1);
        assert_eq!(
            err.violations()[0].to_string(),
            "geometry.wheels: no motor assigned to front_left, rear_left is assigned 2 times"
        );
    }

    #[test]
    fn test_non_positive_distances() {
        let g = DrivetrainGeometry::builder(-15.0, 0.0)
            .wheel(WheelRole::FrontLeft, "motor_lf", MotorDirection::Reverse)
            .wheel(WheelRole::RearLeft, "motor_lb", MotorDirection::Reverse)
            .wheel(WheelRole::FrontRight, "motor_rf", MotorDirection::Forward)
            .wheel(WheelRole::RearRight, "motor_rb", MotorDirection::Forward)
            .x_velocity(78.0)
            .y_velocity(61.5)
            .build();

        assert_eq!(
            fields(g.validate().unwrap_err()),
            vec!["geometry.track_width", "geometry.wheel_base"]
        );
    }

    #[test]
    fn test_unset_velocities() {
        let g = DrivetrainGeometry::builder(15.0, 13.5)
            .wheel(WheelRole::FrontLeft, "motor_lf", MotorDirection::Reverse)
            .wheel(WheelRole::RearLeft, "motor_lb", MotorDirection::Reverse)
            .wheel(WheelRole::FrontRight, "motor_rf", MotorDirection::Forward)
            .wheel(WheelRole::RearRight, "motor_rb", MotorDirection::Forward)
            .build();

        let err = g.validate().unwrap_err();
        let reasons: Vec<String> = err.violations().iter().map(|v| v.to_string()).collect();

        assert_eq!(
            reasons,
            vec![
                "geometry.x_velocity: required, not set",
                "geometry.y_velocity: required, not set",
            ]
        );

        // Only the missing one is reported
        let g = geometry().build();
        let g = DrivetrainGeometry {
            y_velocity: None,
            ..g
        };
        assert_eq!(fields(g.validate().unwrap_err()), vec!["geometry.y_velocity"]);
    }

    #[test]
    fn test_non_positive_velocities() {
        for bad in [0.0, -61.5, std::f64::NAN].iter() {
            let g = geometry().x_velocity(*bad).build();
            assert_eq!(
                fields(g.validate().unwrap_err()),
                vec!["geometry.x_velocity"],
                "x_velocity = {}",
                bad
            );

            let g = geometry().y_velocity(*bad).build();
            assert_eq!(
                fields(g.validate().unwrap_err()),
                vec!["geometry.y_velocity"],
                "y_velocity = {}",
                bad
            );
        }
    }

    #[test]
    fn test_hardware_ids() {
        let g = DrivetrainGeometry::builder(15.0, 13.5)
            .wheel(WheelRole::FrontLeft, "motor", MotorDirection::Forward)
            .wheel(WheelRole::FrontRight, "motor", MotorDirection::Forward)
            .wheel(WheelRole::RearLeft, "", MotorDirection::Forward)
            .wheel(WheelRole::RearRight, "motor_rb", MotorDirection::Forward)
            .x_velocity(78.0)
            .y_velocity(61.5)
            .build();

        assert_eq!(
            fields(g.validate().unwrap_err()),
            vec!["geometry.wheels.front_right.id", "geometry.wheels.rear_left.id"]
        );
    }

    #[test]
    fn test_max_power_range() {
        assert!(geometry().max_power(0.8).build().validate().is_ok());
        assert_eq!(
            fields(geometry().max_power(0.0).build().validate().unwrap_err()),
            vec!["geometry.max_power"]
        );
        assert_eq!(
            fields(geometry().max_power(1.5).build().validate().unwrap_err()),
            vec!["geometry.max_power"]
        );
    }
}
