//! User-visible, non-fatal error reporting

use ticktally_domain::TickTallyError;
use tracing::warn;

/// Surfaces transient failures to the user (a toast, a status line...).
///
/// Implementations must not block; they are called from inside timer
/// transitions.
pub trait UserNotifier: Send + Sync {
    fn notify_error(&self, action: &str, error: &TickTallyError);
}

/// Default notifier that only writes a warning to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn notify_error(&self, action: &str, error: &TickTallyError) {
        warn!(action, kind = error.label(), error = %error, "user-visible failure");
    }
}
