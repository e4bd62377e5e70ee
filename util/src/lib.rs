//! Utility library for the follower software
//!
//! Provides the ambient services shared by every crate in the workspace: host information,
//! parameter file loading, session management and logging.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod host;
pub mod logger;
pub mod params;
pub mod session;
pub mod time;
