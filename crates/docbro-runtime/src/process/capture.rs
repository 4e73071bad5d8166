//! Buffered stdout/stderr capture for short-lived CLI children.

use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::debug;

/// Background readers draining a child's piped output.
#[derive(Debug)]
pub struct OutputCapture {
    stdout: Option<JoinHandle<String>>,
    stderr: Option<JoinHandle<String>>,
}

/// Take the child's stdout/stderr pipes and drain them on background tasks.
///
/// Draining concurrently keeps a chatty child from blocking on a full pipe
/// while we wait for it to exit.
pub fn capture_output(child: &mut Child) -> OutputCapture {
    OutputCapture {
        stdout: child.stdout.take().map(|s| tokio::spawn(read_all(s))),
        stderr: child.stderr.take().map(|s| tokio::spawn(read_all(s))),
    }
}

impl OutputCapture {
    /// Collect whatever was read. A reader still blocked after `grace`
    /// (e.g. a grandchild kept the pipe open) is aborted and yields the
    /// empty string.
    pub async fn finish(self, grace: Duration) -> (String, String) {
        let stdout = join(self.stdout, grace).await;
        let stderr = join(self.stderr, grace).await;
        (stdout, stderr)
    }
}

async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> String {
    let mut buf = Vec::new();
    if let Err(e) = reader.read_to_end(&mut buf).await {
        debug!(error = %e, "Output pipe read failed");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

async fn join(handle: Option<JoinHandle<String>>, grace: Duration) -> String {
    let Some(mut handle) = handle else {
        return String::new();
    };
    match tokio::time::timeout(grace, &mut handle).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            debug!(error = %e, "Output reader task failed");
            String::new()
        }
        Err(_) => {
            handle.abort();
            String::new()
        }
    }
}
