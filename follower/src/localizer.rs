//! # Localizer calibration
//!
//! Calibration for a two-pod odometry computer: where the forward and strafe tracking wheels sit
//! relative to the robot's centre of rotation, which way their encoders count, and how many
//! ticks make up one distance unit.
//!
//! The calibration is only held and validated here, fusion is done by the controller runtime.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use crate::validate::{Checker, ConfigError, Violation};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Unit used to interpret pod offsets and custom resolutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceUnit {
    Millimetre,
    Centimetre,
    Metre,
    Inch,
}

/// Counting direction of an odometry pod encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderDirection {
    Forward,
    Reversed,
}

/// Known odometry pod models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OdometryPod {
    /// goBILDA 4-bar odometry pod
    FourBarPod,

    /// goBILDA swingarm odometry pod
    SwingarmPod,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Odometry computer calibration.
///
/// Built from [`Default`] with consuming setters:
///
/// ```
/// use follower_lib::localizer::{EncoderDirection, LocalizerCalibration};
///
/// let cal = LocalizerCalibration::default()
///     .forward_pod_y(0.75)
///     .strafe_pod_x(-6.6)
///     .forward_pod_direction(EncoderDirection::Forward)
///     .strafe_pod_direction(EncoderDirection::Reversed);
///
/// assert!(cal.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizerCalibration {
    /// Lateral offset of the forward pod from the centre of rotation, left positive.
    ///
    /// Units: `unit`
    pub forward_pod_y: f64,

    /// Longitudinal offset of the strafe pod from the centre of rotation, forward positive.
    ///
    /// Units: `unit`
    pub strafe_pod_x: f64,

    /// Unit of the offsets and of `custom_resolution`.
    pub unit: DistanceUnit,

    /// Logical hardware name of the odometry computer.
    pub hardware_id: String,

    /// Override for the sensor's own yaw calibration, `None` to keep the sensor's value.
    pub yaw_scalar: Option<f64>,

    /// Pod model used to look up the encoder resolution.
    pub resolution: Option<OdometryPod>,

    /// Explicit encoder resolution, takes precedence over `resolution`.
    ///
    /// Units: ticks per `unit`
    pub custom_resolution: Option<f64>,

    pub forward_pod_direction: EncoderDirection,

    pub strafe_pod_direction: EncoderDirection,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DistanceUnit {
    /// Number of millimetres in one unit.
    pub fn mm_per_unit(self) -> f64 {
        match self {
            DistanceUnit::Millimetre => 1.0,
            DistanceUnit::Centimetre => 10.0,
            DistanceUnit::Metre => 1000.0,
            DistanceUnit::Inch => 25.4,
        }
    }
}

impl OdometryPod {
    /// Encoder resolution of the pod.
    ///
    /// Units: ticks/millimetre
    pub fn ticks_per_mm(self) -> f64 {
        match self {
            OdometryPod::FourBarPod => 19.894_367_89,
            OdometryPod::SwingarmPod => 13.262_911_92,
        }
    }
}

impl Default for LocalizerCalibration {
    fn default() -> Self {
        Self {
            forward_pod_y: 1.0,
            strafe_pod_x: -2.5,
            unit: DistanceUnit::Inch,
            hardware_id: String::from("pinpoint"),
            yaw_scalar: None,
            resolution: Some(OdometryPod::FourBarPod),
            custom_resolution: None,
            forward_pod_direction: EncoderDirection::Reversed,
            strafe_pod_direction: EncoderDirection::Forward,
        }
    }
}

impl LocalizerCalibration {
    pub fn forward_pod_y(mut self, forward_pod_y: f64) -> Self {
        self.forward_pod_y = forward_pod_y;
        self
    }

    pub fn strafe_pod_x(mut self, strafe_pod_x: f64) -> Self {
        self.strafe_pod_x = strafe_pod_x;
        self
    }

    pub fn unit(mut self, unit: DistanceUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn hardware_id<S: Into<String>>(mut self, hardware_id: S) -> Self {
        self.hardware_id = hardware_id.into();
        self
    }

    pub fn yaw_scalar(mut self, yaw_scalar: f64) -> Self {
        self.yaw_scalar = Some(yaw_scalar);
        self
    }

    pub fn clear_yaw_scalar(mut self) -> Self {
        self.yaw_scalar = None;
        self
    }

    pub fn resolution(mut self, pod: OdometryPod) -> Self {
        self.resolution = Some(pod);
        self
    }

    pub fn clear_resolution(mut self) -> Self {
        self.resolution = None;
        self
    }

    pub fn custom_resolution(mut self, ticks_per_unit: f64) -> Self {
        self.custom_resolution = Some(ticks_per_unit);
        self
    }

    pub fn clear_custom_resolution(mut self) -> Self {
        self.custom_resolution = None;
        self
    }

    pub fn forward_pod_direction(mut self, direction: EncoderDirection) -> Self {
        self.forward_pod_direction = direction;
        self
    }

    pub fn strafe_pod_direction(mut self, direction: EncoderDirection) -> Self {
        self.strafe_pod_direction = direction;
        self
    }

    /// Reset every field to its default value.
    pub fn defaults(&mut self) {
        *self = Self::default();
    }

    /// Encoder resolution in ticks per `unit`.
    ///
    /// The custom resolution is returned verbatim when set. Otherwise the pod model's
    /// resolution is converted from ticks/mm into ticks per `unit`.
    pub fn resolved_ticks_per_unit(&self) -> Result<f64, ConfigError> {
        match (self.custom_resolution, self.resolution) {
            (Some(custom), _) => Ok(custom),
            (None, Some(pod)) => Ok(pod.ticks_per_mm() * self.unit.mm_per_unit()),
            (None, None) => Err(ConfigError::InvalidConfiguration {
                violations: vec![Violation::new(
                    "localizer.resolution",
                    "neither a pod model nor a custom resolution is set",
                )],
            }),
        }
    }

    /// Validate this calibration on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations: Vec<Violation> = Vec::new();
        self.check(&mut Checker::new("localizer", &mut violations));
        ConfigError::check(violations)
    }

    pub(crate) fn check(&self, c: &mut Checker) {
        c.finite("forward_pod_y", self.forward_pod_y);
        c.finite("strafe_pod_x", self.strafe_pod_x);
        c.not_blank("hardware_id", &self.hardware_id);

        if let Some(yaw_scalar) = self.yaw_scalar {
            c.positive("yaw_scalar", yaw_scalar);
        }

        match (self.custom_resolution, self.resolution) {
            (Some(custom), _) => c.positive("custom_resolution", custom),
            (None, Some(_)) => (),
            (None, None) => c.fail(
                "resolution",
                "neither a pod model nor a custom resolution is set",
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
