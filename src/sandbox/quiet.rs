//! Scoped silencing of the process's stdout and stderr.

use gag::Gag;
use tracing::debug;

/// Redirects stdout and stderr to the null device until dropped.
///
/// Redirection is process-wide and only one holder can have it at a time.
/// If it cannot be acquired the guard is inert and output flows as usual.
pub struct QuietGuard {
    stdout: Option<Gag>,
    stderr: Option<Gag>,
}

impl QuietGuard {
    /// Silences stdout and stderr as far as possible.
    pub fn acquire() -> Self {
        let stdout = Gag::stdout()
            .inspect_err(|e| debug!(error = %e, "Could not silence stdout"))
            .ok();
        let stderr = Gag::stderr()
            .inspect_err(|e| debug!(error = %e, "Could not silence stderr"))
            .ok();
        Self { stdout, stderr }
    }

    /// Guard that silences nothing.
    pub fn inert() -> Self {
        Self {
            stdout: None,
            stderr: None,
        }
    }

    /// Returns true if at least one stream is silenced.
    pub fn is_active(&self) -> bool {
        self.stdout.is_some() || self.stderr.is_some()
    }
}

impl Drop for QuietGuard {
    fn drop(&mut self) {
        // stderr first so the debug line below is visible
        self.stderr.take();
        if self.stdout.take().is_some() {
            debug!("Restored agent console output");
        }
    }
}
