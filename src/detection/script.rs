// src/detection/script.rs
use crate::errors::ProbeError;
use log::debug;
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// Runs `cmd` and returns its trimmed stdout, killing it once `timeout`
/// elapses. Empty output or a non-zero exit counts as unavailable.
#[cfg_attr(
    not(target_os = "macos"),
    allow(dead_code, reason = "only the macOS probe shells out")
)]
pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<String, ProbeError> {
    cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::null());

    let mut child = cmd
        .spawn()
        .map_err(|e| ProbeError::Unavailable(format!("spawn failed: {e}")))?;

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            debug!("Subprocess exceeded {:?}; killed.", timeout);
            return Err(ProbeError::Timeout(timeout));
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ProbeError::Unavailable(format!("wait failed: {e}")));
        }
    };

    // Small outputs (a URL) fit the pipe buffer, so reading after exit is safe.
    let mut stdout = String::new();
    if let Some(mut pipe) = child.stdout.take() {
        pipe.read_to_string(&mut stdout)
            .map_err(|e| ProbeError::Unavailable(format!("reading output failed: {e}")))?;
    }

    if !status.success() {
        return Err(ProbeError::Unavailable(format!("exited with {status}")));
    }

    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Err(ProbeError::Unavailable("empty output".to_string()));
    }
    Ok(trimmed.to_string())
}
