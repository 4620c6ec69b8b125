//! Process execution utilities with timeout and cancellation support
//!
//! Provides helpers for running external processes (ffmpeg, yt-dlp)
//! with configurable timeouts so a hung process cannot block a request
//! forever, and with a shutdown token so Ctrl-C stops running children.

use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::core::error::AppError;

/// Default timeout for version checks (`yt-dlp --version`, `ffmpeg -version`)
pub const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(15);

/// Run an async Command with a timeout and a cancellation token.
///
/// On unix the child becomes the leader of its own process group. When the
/// timeout fires or the token is cancelled the whole group is killed, so
/// helpers the tool started itself (yt-dlp runs ffmpeg for merging and
/// HLS/DASH) die with it. `kill_on_drop` still covers the direct child.
/// `name` is only used in error messages.
pub async fn run_with_timeout(
    name: &str,
    cmd: &mut Command,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Output, AppError> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let child = cmd.spawn()?;
    let pid = child.id();

    tokio::select! {
        result = tokio::time::timeout(timeout, child.wait_with_output()) => match result {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(AppError::Io(e)),
            Err(_) => {
                log::error!("{} timed out after {:?}, killing", name, timeout);
                kill_process_group(name, pid);
                Err(AppError::Timeout {
                    process: name.to_string(),
                    after: timeout,
                })
            }
        },
        _ = cancel.cancelled() => {
            log::warn!("{} cancelled by shutdown, killing", name);
            kill_process_group(name, pid);
            Err(AppError::Cancelled(name.to_string()))
        }
    }
}

/// SIGKILL to the process group led by `pid`.
#[cfg(unix)]
fn kill_process_group(name: &str, pid: Option<u32>) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    let Some(pgid) = pid.and_then(|pid| i32::try_from(pid).ok()) else {
        return;
    };
    if let Err(e) = killpg(Pid::from_raw(pgid), Signal::SIGKILL) {
        if e != nix::errno::Errno::ESRCH {
            log::warn!("Failed to kill {} process group {}: {}", name, pgid, e);
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_name: &str, _pid: Option<u32>) {}

/// Last non-empty line of a process stream, lossily decoded.
pub fn last_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Truncate process stderr for log lines
pub fn stderr_preview(stderr: &[u8], max_chars: usize) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}…", head)
    }
}
