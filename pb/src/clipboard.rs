//! Clipboard helper
//!
//! Copies a card's unescaped content and drives the copy button's transient
//! "Copied" state. Each button owns its pending revert; a new copy aborts the
//! previous revert instead of racing it.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::notify::{Notice, Notifier};
use crate::render::{COPIED_LABEL, COPY_LABEL};

/// Errors writing to the clipboard
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("No clipboard tool available (tried {0})")]
    Unavailable(String),

    #[error("Clipboard tool '{tool}' failed: {message}")]
    Tool { tool: String, message: String },

    #[error("Clipboard access denied")]
    Denied,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Asynchronous write-text clipboard
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard via the platform's copy tool
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    tools: Vec<(&'static str, &'static [&'static str])>,
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self {
            tools: vec![
                ("pbcopy", &[]),
                ("wl-copy", &[]),
                ("xclip", &["-selection", "clipboard"]),
                ("xsel", &["--clipboard", "--input"]),
                ("clip.exe", &[]),
            ],
        }
    }
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the copy tools tried, in order
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|(name, _)| *name).collect()
    }

    /// First copy tool found on `PATH`
    pub fn available_tool(&self) -> Option<&'static str> {
        self.tools.iter().map(|(name, _)| *name).find(|name| is_on_path(name))
    }
}

/// Whether a file named `program` exists in one of the `PATH` directories
pub fn is_on_path(program: &str) -> bool {
    std::env::var_os("PATH")
        .map(|paths| std::env::split_paths(&paths).any(|dir: PathBuf| dir.join(program).is_file()))
        .unwrap_or(false)
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        for (tool, args) in &self.tools {
            debug!(%tool, "SystemClipboard::write_text: trying tool");
            let mut child = match Command::new(tool)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .spawn()
            {
                Ok(child) => child,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(text.as_bytes()).await?;
                // Dropping stdin closes the pipe so the tool can finish
            }

            let output = child.wait_with_output().await?;
            if output.status.success() {
                info!(%tool, bytes = text.len(), "Copied to clipboard");
                return Ok(());
            }
            return Err(ClipboardError::Tool {
                tool: tool.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Err(ClipboardError::Unavailable(self.tool_names().join(", ")))
    }
}

/// In-process clipboard
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
    deny: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard that refuses every write
    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::default()
        }
    }

    pub fn last(&self) -> Option<String> {
        self.writes.lock().ok().and_then(|w| w.last().cloned())
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|w| w.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if self.deny {
            return Err(ClipboardError::Denied);
        }
        if let Ok(mut writes) = self.writes.lock() {
            writes.push(text.to_string());
        }
        Ok(())
    }
}

/// Visual state of a copy button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerState {
    #[default]
    Idle,
    Copied,
}

impl TriggerState {
    pub fn label(&self) -> &'static str {
        match self {
            TriggerState::Idle => COPY_LABEL,
            TriggerState::Copied => COPIED_LABEL,
        }
    }
}

/// One copy button and its pending revert timer
#[derive(Debug)]
pub struct CopyTrigger {
    state: Arc<Mutex<TriggerState>>,
    revert: Option<JoinHandle<()>>,
    feedback: Duration,
}

impl CopyTrigger {
    pub fn new(feedback: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(TriggerState::Idle)),
            revert: None,
            feedback,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state.lock().map(|s| *s).unwrap_or_default()
    }

    fn set_state(&self, next: TriggerState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    fn cancel_revert(&mut self) {
        if let Some(handle) = self.revert.take() {
            handle.abort();
        }
    }

    /// Show "Copied" and schedule the revert, replacing any pending one
    pub fn show_copied(&mut self) {
        self.cancel_revert();
        self.set_state(TriggerState::Copied);

        let state = Arc::clone(&self.state);
        let feedback = self.feedback;
        self.revert = Some(tokio::spawn(async move {
            tokio::time::sleep(feedback).await;
            if let Ok(mut state) = state.lock() {
                *state = TriggerState::Idle;
            }
        }));
    }

    /// Back to idle right away
    pub fn reset(&mut self) {
        self.cancel_revert();
        self.set_state(TriggerState::Idle);
    }
}

impl Drop for CopyTrigger {
    fn drop(&mut self) {
        self.cancel_revert();
    }
}

/// Copy `text` and update `trigger`; failures are logged and shown through `notifier`
pub async fn copy_to_clipboard(
    text: &str,
    clipboard: &dyn Clipboard,
    trigger: &mut CopyTrigger,
    notifier: &dyn Notifier,
) -> Result<(), ClipboardError> {
    debug!(bytes = text.len(), "copy_to_clipboard: called");
    match clipboard.write_text(text).await {
        Ok(()) => {
            trigger.show_copied();
            Ok(())
        }
        Err(e) => {
            error!(%e, "Failed to copy");
            trigger.reset();
            notifier.notify(&Notice::CopyFailed(e.to_string()));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    const SHORT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_copy_writes_exact_text() {
        let clipboard = MemoryClipboard::new();
        let notifier = RecordingNotifier::new();
        let mut trigger = CopyTrigger::new(SHORT);

        copy_to_clipboard("line1\nline2", &clipboard, &mut trigger, &notifier)
            .await
            .unwrap();

        assert_eq!(clipboard.last().as_deref(), Some("line1\nline2"));
        assert_eq!(trigger.state(), TriggerState::Copied);
        assert_eq!(trigger.state().label(), "Copied");
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_copied_state_reverts() {
        let clipboard = MemoryClipboard::new();
        let notifier = RecordingNotifier::new();
        let mut trigger = CopyTrigger::new(SHORT);

        copy_to_clipboard("x", &clipboard, &mut trigger, &notifier).await.unwrap();
        tokio::time::sleep(SHORT * 4).await;
        assert_eq!(trigger.state(), TriggerState::Idle);
        assert_eq!(trigger.state().label(), "Copy");
    }

    #[tokio::test]
    async fn test_second_copy_cancels_first_revert() {
        let clipboard = MemoryClipboard::new();
        let notifier = RecordingNotifier::new();
        let mut trigger = CopyTrigger::new(Duration::from_millis(300));

        copy_to_clipboard("a", &clipboard, &mut trigger, &notifier).await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        copy_to_clipboard("b", &clipboard, &mut trigger, &notifier).await.unwrap();

        // The first revert would have fired by now
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(trigger.state(), TriggerState::Copied);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(trigger.state(), TriggerState::Idle);
        assert_eq!(clipboard.write_count(), 2);
    }

    #[tokio::test]
    async fn test_failure_notifies_and_stays_idle() {
        let clipboard = MemoryClipboard::denied();
        let notifier = RecordingNotifier::new();
        let mut trigger = CopyTrigger::new(SHORT);

        let err = copy_to_clipboard("x", &clipboard, &mut trigger, &notifier).await.unwrap_err();
        assert!(matches!(err, ClipboardError::Denied));
        assert_eq!(trigger.state(), TriggerState::Idle);
        assert_eq!(notifier.notices(), vec![Notice::CopyFailed("Clipboard access denied".to_string())]);
    }

    #[tokio::test]
    async fn test_failure_after_success_reverts_immediately() {
        let notifier = RecordingNotifier::new();
        let mut trigger = CopyTrigger::new(Duration::from_secs(60));

        copy_to_clipboard("x", &MemoryClipboard::new(), &mut trigger, &notifier).await.unwrap();
        assert_eq!(trigger.state(), TriggerState::Copied);

        let _ = copy_to_clipboard("x", &MemoryClipboard::denied(), &mut trigger, &notifier).await;
        assert_eq!(trigger.state(), TriggerState::Idle);
    }

    #[test]
    fn test_system_clipboard_tool_order() {
        assert_eq!(
            SystemClipboard::new().tool_names(),
            vec!["pbcopy", "wl-copy", "xclip", "xsel", "clip.exe"]
        );
    }
}
