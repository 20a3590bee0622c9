//! Terminal notifier.

use std::sync::atomic::{AtomicUsize, Ordering};

use platter_client::{Notice, NoticeLevel, Notifier};

/// Prints notices to stderr so stdout stays clean for `--json` output.
///
/// Counts the error notices it has seen; the command runner uses that to
/// avoid printing a failure twice.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    quiet: bool,
    errors: AtomicUsize,
}

impl ConsoleNotifier {
    pub fn new(quiet: bool) -> Self {
        ConsoleNotifier {
            quiet,
            errors: AtomicUsize::new(0),
        }
    }

    pub fn render(notice: &Notice) -> String {
        match notice.level {
            NoticeLevel::Success => format!("✓ {}", notice.message),
            NoticeLevel::Error => format!("✗ {}", notice.message),
        }
    }

    /// Number of error notices printed so far.
    pub fn errors_shown(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        if self.quiet {
            return;
        }
        if notice.is_error() {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        eprintln!("{}", Self::render(&notice));
    }
}
