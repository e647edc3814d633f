//! Command dispatch: bridges CLI args -> `Monitor` calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod dashboard;
pub mod ehr;
pub mod hospitals;
pub mod predict;
pub mod public;
pub mod util;
pub mod watch;

use bedwatch_core::Monitor;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    monitor: &Monitor,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(monitor, args, profile_name, global).await,
        Command::Logout => {
            auth::logout(monitor, global);
            Ok(())
        }
        Command::Hospitals(args) => hospitals::handle(monitor, args, global).await,
        Command::Ehr(args) => ehr::handle(monitor, args, global).await,
        Command::Predict(args) => predict::handle(monitor, args, global).await,
        Command::Dashboard(args) => dashboard::handle(monitor, args, global).await,
        Command::Watch(args) => watch::handle(monitor, args, global).await,
        Command::Public(args) => public::handle(monitor, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "local command reached backend dispatch".into(),
        )),
    }
}
