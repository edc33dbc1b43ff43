pub mod actions;
pub mod commands;
pub mod dispatch;
pub mod telemetry;

use anyhow::Result;

use crate::cli::actions::Action;

/// Parses the command line, initialises telemetry, and returns the action to run.
///
/// # Errors
///
/// Returns an error if telemetry cannot be initialised or the arguments are
/// inconsistent.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    telemetry::init(dispatch::verbosity(&matches))?;

    dispatch::handler(&matches)
}
