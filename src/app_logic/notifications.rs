/*
 * User-visible, non-fatal messages raised by the session. The host dequeues
 * them and shows them however it shows toasts or status lines.
 */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationSeverity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub severity: NotificationSeverity,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Notification {
            severity: NotificationSeverity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notification {
            severity: NotificationSeverity::Warning,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            NotificationSeverity::Warning => "warning",
            NotificationSeverity::Error => "error",
        };
        write!(f, "[{label}] {}", self.message)
    }
}
