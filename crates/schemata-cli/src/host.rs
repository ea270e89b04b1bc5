//! Host integration: clipboard and browser

use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use schemata::{Result, SchemataError};
use tracing::debug;

#[cfg(feature = "clipboard")]
use arboard::Clipboard as ArboardClipboard;

/// Side effects a row action may need from the host system
pub trait Host {
    /// Place text on the clipboard
    fn copy(&mut self, text: &str) -> Result<()>;

    /// Open a URL in the default browser
    fn open(&mut self, url: &str) -> Result<()>;
}

/// The real desktop host
///
/// Keeps the clipboard handle alive for the whole session; on X11 the
/// contents vanish once the owning handle is dropped.
#[derive(Default)]
pub struct SystemHost {
    #[cfg(feature = "clipboard")]
    clipboard: Option<ArboardClipboard>,
}

impl SystemHost {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Host for SystemHost {
    #[cfg(feature = "clipboard")]
    fn copy(&mut self, text: &str) -> Result<()> {
        if self.clipboard.is_none() {
            let clipboard =
                ArboardClipboard::new().map_err(|e| SchemataError::Clipboard(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or_else(|| SchemataError::Clipboard("clipboard unavailable".to_string()))?;
        clipboard
            .set_text(text.to_string())
            .map_err(|e| SchemataError::Clipboard(e.to_string()))?;
        debug!(bytes = text.len(), "copied to clipboard");
        Ok(())
    }

    #[cfg(not(feature = "clipboard"))]
    fn copy(&mut self, _text: &str) -> Result<()> {
        Err(SchemataError::Clipboard(
            "clipboard support is disabled in this build".to_string(),
        ))
    }

    fn open(&mut self, url: &str) -> Result<()> {
        check_web_url(url)?;
        spawn_reaped(opener_command(url))?;
        debug!(%url, "opened in browser");
        Ok(())
    }
}

/// Spawn a detached command and wait for it on a background thread
///
/// The opener usually exits right after handing off to the browser; the
/// waiting thread collects its exit status.
fn spawn_reaped(mut cmd: Command) -> Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| SchemataError::Browser(e.to_string()))?;
    std::thread::Builder::new()
        .name("opener-reaper".into())
        .spawn(move || match child.wait() {
            Ok(status) => {
                debug!(%status, "opener exited");
                Some(status)
            }
            Err(e) => {
                debug!(error = %e, "could not wait for opener");
                None
            }
        })
        .map_err(|e| SchemataError::Browser(e.to_string()))
}

/// Only http(s) URLs are handed to the platform opener
fn check_web_url(url: &str) -> Result<()> {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        Ok(())
    } else {
        Err(SchemataError::Browser(format!("not a web URL: {url}")))
    }
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
