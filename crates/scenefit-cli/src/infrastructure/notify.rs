//! User-facing notifications.
//!
//! The original host runtime rendered these as transient toasts; the CLI
//! prints them to the terminal.  Keeping the seam as a trait lets the
//! pipeline tests assert exactly which notifications were surfaced (and
//! that abort paths never notify success).

use std::sync::Mutex;

/// A user-visible notification sink.
pub trait Notifier: Send + Sync {
    /// Reports a successful outcome.
    fn success(&self, message: &str);

    /// Reports a failure the user is expected to act on or at least see.
    fn failure(&self, message: &str);
}

/// Prints notifications to the terminal: successes to stdout, failures to
/// stderr (mirrored into the log).
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        tracing::info!("{message}");
        println!("{message}");
    }

    fn failure(&self, message: &str) {
        tracing::error!("{message}");
        eprintln!("{message}");
    }
}

// ── Mock implementation (always compiled for tests) ───────────────────────────

/// Records every notification for later assertion.
#[derive(Default)]
pub struct MockNotifier {
    successes: Mutex<Vec<String>>,
    failures: Mutex<Vec<String>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn success(&self, message: &str) {
        self.successes.lock().unwrap().push(message.to_string());
    }

    fn failure(&self, message: &str) {
        self.failures.lock().unwrap().push(message.to_string());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
