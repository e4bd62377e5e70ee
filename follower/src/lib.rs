//! # Follower configuration library
//!
//! Parameter and calibration model for a path-following controller driving a mecanum
//! drivetrain with two-pod odometry. Components are built from literals or a parameter file,
//! then validated together by [`assembly::assemble`] into the immutable
//! [`assembly::ControllerConfig`] handed to the controller runtime.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Assembly - validates every component and produces the controller configuration
pub mod assembly;

/// Drivetrain geometry - wheel assignments, polarity and mecanum mixing
pub mod drivetrain;

/// Gain sets - PIDF coefficients and gain scheduling per control axis
pub mod gains;

/// Localizer calibration - odometry pod offsets, directions and resolution
pub mod localizer;

/// Follower parameters - parameter file mirror and the baseline robot
pub mod params;

/// Path constraints - completion tolerances and timeouts
pub mod path_constraints;

/// Validation errors
pub mod validate;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use assembly::{assemble, ControllerConfig, SharedConfig};
pub use validate::{ConfigError, Violation};
