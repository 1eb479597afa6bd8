use crate::intake::session::{NotificationKind, Notifier};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&mut self, message: &str, kind: NotificationKind) {
        match kind {
            NotificationKind::Error => tracing::warn!("❌ {}", message),
            NotificationKind::Success => tracing::info!("✅ {}", message),
            NotificationKind::Info => tracing::info!("{}", message),
        }
    }
}

/// Collects notifications so they can be returned to an API client.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    notifications: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str, kind: NotificationKind) {
        tracing::debug!("Notification ({:?}): {}", kind, message);
        self.notifications.push(Notification {
            message: message.to_string(),
            kind,
        });
    }
}
