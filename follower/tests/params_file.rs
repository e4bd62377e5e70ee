//! The shipped parameter file must describe the baseline robot.

use follower_lib::params::{baseline, FollowerParams};

const FOLLOWER_TOML: &str = include_str!("../../params/follower.toml");

#[test]
fn test_param_file_matches_baseline() {
    let params: FollowerParams = util::params::load_str(FOLLOWER_TOML).unwrap();

    assert_eq!(params, baseline());
}

#[test]
fn test_param_file_assembles() {
    let params: FollowerParams = util::params::load_str(FOLLOWER_TOML).unwrap();
    let cfg = params.assemble().unwrap();

    assert_eq!(cfg.mass(), 16.2);
    assert!(cfg.heading().is_scheduled());
}

#[test]
fn test_param_file_errors_surface_all_violations() {
    let broken = FOLLOWER_TOML
        .replace("mass = 16.2", "mass = -1.0")
        .replace("track_width = 15.0", "track_width = 0.0");
    let params: FollowerParams = util::params::load_str(&broken).unwrap();

    let err = params.assemble().unwrap_err();
    let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();

    assert_eq!(fields, vec!["geometry.track_width", "mass"]);
}

#[test]
fn test_geometry_table_named_like_violations() {
    let params: FollowerParams = util::params::load_str(FOLLOWER_TOML).unwrap();
    assert_eq!(params.geometry.track_width, 15.0);

    // The table name is the prefix of its violations, the old name is not accepted
    let renamed = FOLLOWER_TOML
        .replace("[geometry]", "[drivetrain]")
        .replace("[[geometry.wheels]]", "[[drivetrain.wheels]]");
    assert!(util::params::load_str::<FollowerParams>(&renamed).is_err());
}

#[test]
fn test_param_file_missing_velocity() {
    let broken: String = FOLLOWER_TOML
        .lines()
        .filter(|l| !l.starts_with("y_velocity"))
        .collect::<Vec<_>>()
        .join("\n");
    let params: FollowerParams = util::params::load_str(&broken).unwrap();

    assert_eq!(params.geometry.y_velocity, None);

    let err = params.assemble().unwrap_err();
    assert_eq!(err.violations().len(), 1);
    assert_eq!(
        err.violations()[0].to_string(),
        "geometry.y_velocity: required, not set"
    );
}
