//! Mecanum wheel mixing
//!
//! Frame convention: x forward, y (strafe) positive to the left, rotation positive
//! counter-clockwise seen from above. With `k = (track_width + wheel_base) / 2`:
//!
//! ```text
//! front_left  = forward - strafe - k * rotate
//! front_right = forward + strafe + k * rotate
//! rear_left   = forward + strafe - k * rotate
//! rear_right  = forward - strafe + k * rotate
//! ```
//!
//! Each command is then negated if that wheel's motor is mounted `Reverse`, so the result is the
//! raw value to send to the motor.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Matrix4x3, Vector3, Vector4};
use serde::Serialize;

// Internal
use super::{DrivetrainGeometry, WheelRole, NUM_WHEELS};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Signed motor commands for each wheel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WheelCommands {
    pub front_left: f64,
    pub front_right: f64,
    pub rear_left: f64,
    pub rear_right: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl WheelCommands {
    /// Get the command for a wheel.
    pub fn get(&self, role: WheelRole) -> f64 {
        self.as_array()[role.index()]
    }

    /// Commands in [`WheelRole::ALL`] order.
    pub fn as_array(&self) -> [f64; NUM_WHEELS] {
        [
            self.front_left,
            self.front_right,
            self.rear_left,
            self.rear_right,
        ]
    }

    /// Largest command magnitude, or NaN if any command is NaN.
    pub fn max_abs(&self) -> f64 {
        self.as_array().iter().fold(0.0, |m: f64, c| {
            if c.is_nan() || m.is_nan() {
                std::f64::NAN
            } else {
                m.max(c.abs())
            }
        })
    }

    fn from_vector(v: Vector4<f64>) -> Self {
        Self {
            front_left: v[0],
            front_right: v[1],
            rear_left: v[2],
            rear_right: v[3],
        }
    }
}

impl DrivetrainGeometry {
    /// Rotational lever arm `k` used in the mixing matrix.
    pub fn rotation_lever(&self) -> f64 {
        (self.track_width + self.wheel_base) / 2.0
    }

    /// Map a robot-frame velocity to motor commands, polarity applied.
    ///
    /// `forward` and `strafe` are in distance/second, `rotate` in radians/second. The result is
    /// in wheel surface distance/second.
    ///
    /// Inputs are expected to be finite. A NaN input makes the affected commands NaN, they are
    /// not clamped or zeroed.
    pub fn wheel_commands(&self, forward: f64, strafe: f64, rotate: f64) -> WheelCommands {
        let mix = self.mixing_matrix() * Vector3::new(forward, strafe, rotate);

        let polarity = Vector4::from_iterator(
            WheelRole::ALL.iter().map(|r| self.direction(*r).sign()),
        );

        WheelCommands::from_vector(mix.component_mul(&polarity))
    }

    /// As [`wheel_commands`](Self::wheel_commands) but scaled down, preserving ratios, so that no
    /// command exceeds `max_power`.
    ///
    /// Inputs here are normalised demands rather than physical velocities, and must be finite. A
    /// NaN input makes every command NaN rather than passing a partly scaled set to the motors.
    pub fn wheel_commands_normalised(&self, forward: f64, strafe: f64, rotate: f64) -> WheelCommands {
        let cmds = self.wheel_commands(forward, strafe, rotate);
        let max = cmds.max_abs();

        if max <= self.max_power {
            return cmds;
        }

        let scale = self.max_power / max;
        WheelCommands {
            front_left: cmds.front_left * scale,
            front_right: cmds.front_right * scale,
            rear_left: cmds.rear_left * scale,
            rear_right: cmds.rear_right * scale,
        }
    }

    /// Rows are wheels in [`WheelRole::ALL`] order, columns are (forward, strafe, rotate).
    fn mixing_matrix(&self) -> Matrix4x3<f64> {
        let k = self.rotation_lever();

        #[rustfmt::skip]
        let m = Matrix4x3::new(
            1.0, -1.0, -k,
            1.0,  1.0,  k,
            1.0,  1.0, -k,
            1.0, -1.0,  k,
        );
        m
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
