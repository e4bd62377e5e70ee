//! # Follower configuration executable
//!
//! Loads the follower parameters, assembles them into a controller configuration and reports
//! the result. Run before a control session to check a calibration:
//!
//!     follower_exec [PARAM_FILE]
//!
//! `PARAM_FILE` defaults to `follower.toml` in the params directory. The assembled configuration
//! is saved as `controller_config.json` in the session directory.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, error, info};
use std::env;
use std::path::PathBuf;

// Internal
use follower_lib::{drivetrain::WheelRole, params::FollowerParams};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Parameter file used when none is given on the command line.
const DEFAULT_PARAM_FILE: &str = "follower.toml";

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    let session =
        Session::new("follower_exec", "sessions").wrap_err("Failed to create the session")?;

    logger_init(
        LevelFilter::Info,
        &[("follower_lib", LevelFilter::Debug)],
        &session,
    )
    .wrap_err("Failed to initialise logging")?;

    info!("Follower Configuration Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let args: Vec<String> = env::args().collect();
    debug!("CLI arguments: {:?}", args);

    let params: FollowerParams = match args.len() {
        1 => FollowerParams::load(DEFAULT_PARAM_FILE)
            .wrap_err_with(|| format!("Could not load {}", DEFAULT_PARAM_FILE))?,
        2 => util::params::load_path(PathBuf::from(&args[1]))
            .wrap_err_with(|| format!("Could not load {}", args[1]))?,
        n => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                n - 1
            ))
        }
    };

    info!("Parameters loaded");

    // ---- ASSEMBLE ----

    let config = match params.assemble() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return Err(Report::new(e).wrap_err("Configuration rejected"));
        }
    };

    // ---- REPORT ----

    for (name, gains) in [
        ("translational", config.translational()),
        ("heading", config.heading()),
        ("drive", config.drive()),
    ]
    .iter()
    {
        match gains.switch_threshold.filter(|_| gains.is_scheduled()) {
            Some(t) => info!("{} gains switch to secondary below {}", name, t),
            None => info!("{} gains are not scheduled", name),
        }
    }

    let geometry = config.geometry();
    for (label, cmd) in [
        ("forward", geometry.wheel_commands_normalised(1.0, 0.0, 0.0)),
        ("strafe", geometry.wheel_commands_normalised(0.0, 1.0, 0.0)),
        ("rotate", geometry.wheel_commands_normalised(0.0, 0.0, 1.0)),
    ]
    .iter()
    {
        info!("Unit {} command:", label);
        for role in WheelRole::ALL.iter() {
            let id = geometry.wheel(*role).map(|w| w.id.as_str()).unwrap_or("?");
            info!("    {:<12} {:<10} {:+.4}", role.to_string(), id, cmd.get(*role));
        }
    }

    session
        .save("controller_config.json", &config)
        .wrap_err("Failed to save the controller configuration")?;

    info!("Configuration valid");

    Ok(())
}
