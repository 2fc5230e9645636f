use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use nix::unistd::setsid;

use crate::{
    purple_error,
    utils::errors::{PurpleError, PurpleErrorType},
};

/// Starts `cmd[0]` with the remaining entries as arguments and returns the
/// child's pid. The child is never waited on.
pub fn spawn_engine(cmd: &[String], detach: bool) -> Result<u32, PurpleError> {
    let raw_command = cmd.join(" ");
    let mut parts = cmd.iter();
    let mut command = Command::new(parts.next().ok_or_else(|| {
        purple_error!(
            PurpleErrorType::CommandExecutionError(raw_command.clone()),
            "Failed to get first base command"
        )
    })?);
    command.args(parts);
    if detach {
        detach_command(&mut command);
    }

    log::info!(r#"Spawning command "{}""#, raw_command);
    match command.spawn() {
        Ok(child) => {
            let pid = child.id();
            log::info!("Process started: {} (pid {}).", raw_command, pid);
            Ok(pid)
        }
        Err(e) => {
            log::warn!("Failed to spawn command: {}\nError: {}", raw_command, e);
            Err(purple_error!(
                PurpleErrorType::CommandExecutionError(raw_command),
                e.to_string()
            ))
        }
    }
}

/// New session for the child, stdio redirected to /dev/null.
fn detach_command(command: &mut Command) {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    // SAFETY: setsid is async-signal-safe and touches no parent state.
    unsafe {
        command.pre_exec(|| {
            setsid().map_err(std::io::Error::from)?;
            Ok(())
        });
    }
}
