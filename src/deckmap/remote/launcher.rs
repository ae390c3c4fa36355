//! Starting Anki when the bridge does not answer.
//!
//! `ensure_running` probes the bridge once; if it is down, it runs the platform's launch
//! command (or the configured override) and polls until the bridge answers or the timeout
//! elapses.

use super::{NoteClient, ANKI_CONNECT_CODE};
use crate::error::{DeckmapError, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct LaunchSettings {
    /// Shell command that starts Anki. `None` uses the platform default.
    pub command: Option<String>,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    AlreadyRunning,
    Launched,
}

pub fn default_launch_command() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some("open -a Anki")
    } else if cfg!(target_os = "windows") {
        Some(r#"Start-Process "$env:LocalAppData\Programs\Anki\anki.exe""#)
    } else {
        None
    }
}

fn install_hint() -> &'static str {
    if cfg!(target_os = "macos") {
        "Please ensure Anki is installed in /Applications."
    } else if cfg!(target_os = "windows") {
        "Please ensure Anki is installed at the default location."
    } else {
        "Set launch-command in the deckmap config to the command that starts Anki."
    }
}

/// Run the launch command to completion. The command must return once Anki is started
/// (`open -a`, `Start-Process`, or a backgrounded `anki &`).
async fn launch(command: &str) -> Result<()> {
    let mut process = if cfg!(target_os = "windows") {
        let mut c = Command::new("powershell");
        c.args(["-NoProfile", "-Command", command]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", command]);
        c
    };

    let status = process
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map_err(|e| launch_failed(&e.to_string()))?;

    if !status.success() {
        return Err(launch_failed(&format!("`{}` exited with {}", command, status)));
    }
    Ok(())
}

fn launch_failed(reason: &str) -> DeckmapError {
    DeckmapError::Launch(format!("Failed to launch Anki: {}. {}", reason, install_hint()))
}

/// Poll `is_reachable` every `interval` until it answers or `timeout` elapses.
pub async fn wait_until_reachable<C: NoteClient + ?Sized>(
    client: &C,
    timeout: Duration,
    interval: Duration,
) -> bool {
    let started = Instant::now();
    loop {
        if client.is_reachable().await {
            return true;
        }
        if started.elapsed() >= timeout {
            return false;
        }
        sleep(interval).await;
    }
}

pub async fn ensure_running<C: NoteClient + ?Sized>(
    client: &C,
    settings: &LaunchSettings,
) -> Result<LaunchOutcome> {
    if client.is_reachable().await {
        return Ok(LaunchOutcome::AlreadyRunning);
    }

    let command = settings
        .command
        .as_deref()
        .or_else(|| default_launch_command())
        .ok_or_else(|| {
            DeckmapError::Launch(format!("Don't know how to start Anki here. {}", install_hint()))
        })?;

    info!(command, "starting Anki");
    launch(command).await?;

    if wait_until_reachable(client, settings.timeout, settings.poll_interval).await {
        debug!("AnkiConnect answered after launch");
        Ok(LaunchOutcome::Launched)
    } else {
        warn!(timeout = ?settings.timeout, "AnkiConnect did not answer after launch");
        Err(DeckmapError::Launch(format!(
            "Anki started but AnkiConnect did not respond. Please ensure the AnkiConnect plugin is installed (code: {}).",
            ANKI_CONNECT_CODE
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::mock::MockClient;

    fn settings(command: &str, timeout_ms: u64) -> LaunchSettings {
        LaunchSettings {
            command: Some(command.to_string()),
            timeout: Duration::from_millis(timeout_ms),
            poll_interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn wait_returns_once_reachable() {
        let client = MockClient::reachable_after(3);
        let ok =
            wait_until_reachable(&client, Duration::from_secs(5), Duration::from_millis(1)).await;
        assert!(ok);
        assert_eq!(client.calls().len(), 4);
    }

    #[tokio::test]
    async fn wait_gives_up_after_timeout() {
        let client = MockClient::unreachable();
        let ok =
            wait_until_reachable(&client, Duration::from_millis(20), Duration::from_millis(5))
                .await;
        assert!(!ok);
    }

    #[tokio::test]
    async fn already_running_skips_launch() {
        let client = MockClient::new();
        let outcome = ensure_running(&client, &settings("exit 1", 10)).await.unwrap();
        assert_eq!(outcome, LaunchOutcome::AlreadyRunning);
        assert_eq!(client.calls(), vec!["is_reachable"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn launches_and_waits_for_bridge() {
        let client = MockClient::reachable_after(2);
        let outcome = ensure_running(&client, &settings("true", 1000)).await.unwrap();
        assert_eq!(outcome, LaunchOutcome::Launched);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_is_reported_before_polling() {
        let client = MockClient::unreachable();
        let started = std::time::Instant::now();

        let err = ensure_running(&client, &settings("exit 1", 10_000))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to launch Anki"));
        assert!(err.to_string().contains("exited with"));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(client.calls(), vec!["is_reachable"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_mentions_plugin_code() {
        let client = MockClient::unreachable();
        let err = ensure_running(&client, &settings("true", 10)).await.unwrap_err();
        assert!(err.to_string().contains(ANKI_CONNECT_CODE));
    }
}
