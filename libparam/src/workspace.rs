//! File and command helpers for run directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::error::WorkspaceError;

/// Create (or truncate) `file_name` holding `content`, or nothing when
/// `content` is `None`.
///
/// With `at`, the file goes into that directory, which is created along with
/// its parents when missing. Returns the path of the file.
pub fn make_file(
    file_name: &str,
    content: Option<&str>,
    at: Option<&Path>,
) -> Result<PathBuf, WorkspaceError> {
    let path = match at {
        Some(dir) if !dir.as_os_str().is_empty() => {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(WorkspaceError::io(dir))?;
            }
            dir.join(file_name)
        }
        _ => PathBuf::from(file_name),
    };
    fs::write(&path, content.unwrap_or("")).map_err(WorkspaceError::io(&path))?;
    Ok(path)
}

/// Remove every file in `results_root/result_id`. A missing directory is
/// not an error. Returns the number of files removed.
pub fn clean_files(results_root: &Path, result_id: &str) -> Result<usize, WorkspaceError> {
    let dir = results_root.join(result_id);
    if !dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(&dir).map_err(WorkspaceError::io(&dir))? {
        let path = entry.map_err(WorkspaceError::io(&dir))?.path();
        fs::remove_file(&path).map_err(WorkspaceError::io(&path))?;
        removed += 1;
    }
    info!(dir = %dir.display(), removed, "cleaned result files");
    Ok(removed)
}

/// Run shell commands one after another with `directory` as their working
/// directory. The working directory of this process is left alone. Stops at
/// the first command that cannot start or exits unsuccessfully.
pub fn run_in_dir<S: AsRef<str>>(directory: &Path, commands: &[S]) -> Result<(), WorkspaceError> {
    for command in commands {
        let command = command.as_ref();
        debug!(dir = %directory.display(), command, "running command");
        let status = shell(command)
            .current_dir(directory)
            .status()
            .map_err(|source| WorkspaceError::Spawn {
                command: command.to_string(),
                source,
            })?;
        if !status.success() {
            return Err(WorkspaceError::CommandFailed {
                command: command.to_string(),
                status,
            });
        }
    }
    Ok(())
}

#[cfg(not(windows))]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}
