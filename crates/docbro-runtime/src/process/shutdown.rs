//! Forced termination of a timed-out child with SIGTERM → SIGKILL escalation.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;

#[cfg(unix)]
use nix::sys::signal::{self, Signal};
#[cfg(unix)]
use nix::unistd::Pid;
#[cfg(unix)]
use tokio::time::timeout;

/// How long a child gets to honour SIGTERM before it is killed.
pub const DEFAULT_TERM_GRACE: Duration = Duration::from_millis(500);

/// Terminate a child and reap it.
///
/// 1. Send SIGTERM and wait up to `grace` for exit
/// 2. If still running, SIGKILL
/// 3. Wait for reaping so no zombie is left behind
///
/// On non-Unix platforms the child is killed immediately.
pub async fn terminate_child(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    #[cfg(unix)]
    {
        terminate_unix(child, grace).await
    }

    #[cfg(not(unix))]
    {
        let _ = grace;
        child.kill().await?;
        child.wait().await
    }
}

#[cfg(unix)]
async fn terminate_unix(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    let Some(pid) = child.id() else {
        // Already reaped
        return child.wait().await;
    };
    let pid = i32::try_from(pid)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "child PID out of range"))?;

    if let Err(e) = signal::kill(Pid::from_raw(pid), Signal::SIGTERM) {
        if e == nix::errno::Errno::ESRCH {
            return child.wait().await;
        }
        return Err(io::Error::other(e));
    }

    if let Ok(result) = timeout(grace, child.wait()).await {
        return result;
    }

    // Child::kill sends SIGKILL and waits
    child.kill().await?;
    child.wait().await
}
