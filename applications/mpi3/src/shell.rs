//! Settings-menu shell actions

use mpi3_navigation::ShellAction;
use std::process::{Command, Stdio};
use tracing::{info, warn};

/// Run `action` through `sh -c`, waiting for it to finish
///
/// Best-effort: failures are logged and reported as `false`.
pub fn run(action: &ShellAction) -> bool {
    info!(label = %action.label, command = %action.command, "Running shell action");
    match Command::new("sh")
        .arg("-c")
        .arg(&action.command)
        .stdin(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => true,
        Ok(status) => {
            warn!(label = %action.label, %status, "Shell action failed");
            false
        }
        Err(e) => {
            warn!(label = %action.label, error = %e, "Shell action could not start");
            false
        }
    }
}
