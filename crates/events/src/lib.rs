//! Notification primitives handed to the presentation layer.
//!
//! Domain operations describe their outcome as a [`Notification`] and pass it
//! to an injected [`Notifier`]. Rendering is left to whoever implements the
//! sink.

use std::sync::{Mutex, PoisonError};

use libris_kernel::CoreError;
use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Destructive,
}

/// A user-facing outcome message: title, description, and severity.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Notification {
    fn new(severity: Severity, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            description: description.into(),
            severity,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Success, title, description)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(Severity::Destructive, title, description)
    }

    /// Describe a failed operation for display.
    pub fn from_error(error: &CoreError) -> Self {
        match error {
            CoreError::NotFound { entity, id } => {
                Self::destructive("Not found", format!("No {entity} with id \"{id}\""))
            }
            CoreError::InvalidCredentials => {
                Self::destructive("Login failed", "Invalid email or password")
            }
            CoreError::EmailInUse { .. } => {
                Self::destructive("Signup failed", "Email already in use")
            }
            CoreError::Validation { message, .. } => {
                Self::destructive("Invalid input", message.clone())
            }
            CoreError::Storage { message } => Self::destructive("Session error", message.clone()),
            CoreError::Unauthenticated => {
                Self::destructive("Sign in required", "Log in to manage the library")
            }
        }
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Collects notifications in memory until the caller drains them.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.lock().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove and return everything recorded so far, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notification>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.lock().push(notification);
    }
}

/// Forwards notifications to the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Success => tracing::info!(
                target: "libris-events",
                notification_id = %notification.id,
                title = %notification.title,
                "{}",
                notification.description
            ),
            Severity::Destructive => tracing::warn!(
                target: "libris-events",
                notification_id = %notification.id,
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}
