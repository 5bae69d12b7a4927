//! Blocking user acknowledgments (save confirmations, failure alerts)

use std::sync::Mutex;

use colored::*;

/// Something the user must acknowledge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A prompt was stored locally
    Saved,
    /// Writing the local collection failed
    SaveFailed(String),
    /// The clipboard refused the text
    CopyFailed(String),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::Saved => "Prompt saved (stored on this machine only)".to_string(),
            Notice::SaveFailed(reason) => format!("Failed to save prompt: {}", reason),
            Notice::CopyFailed(_) => "Copy failed".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Notice::Saved)
    }
}

/// Shows notices to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Prints notices to the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        if notice.is_error() {
            eprintln!("{} {}", "✗".red(), notice.message());
        } else {
            println!("{} {}", "✓".green(), notice.message());
        }
    }
}

/// Keeps notices for later inspection
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_messages() {
        assert!(Notice::Saved.message().contains("this machine only"));
        assert!(!Notice::Saved.is_error());
        assert!(Notice::SaveFailed("quota".to_string()).message().contains("quota"));
        assert!(Notice::CopyFailed("denied".to_string()).is_error());
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.notify(&Notice::Saved);
        notifier.notify(&Notice::CopyFailed("x".to_string()));
        assert_eq!(notifier.notices(), vec![Notice::Saved, Notice::CopyFailed("x".to_string())]);
    }
}
