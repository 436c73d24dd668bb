//! Parse notification / diagnostic system
//!
//! Non-fatal issues encountered while marshaling (unconsumed tags,
//! dangling cross-references resolved to a fallback) are collected as
//! `Notification` items rather than being silently dropped or causing
//! hard errors.  After a load pass the caller can inspect the
//! collection to see what was encountered.

use crate::tags::DxfTag;
use std::fmt;

/// Severity level of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationType {
    /// Tag matched no descriptor in the subclass schema
    UnprocessedTag,
    /// Non-fatal warning (e.g. dangling handle replaced by a default)
    Warning,
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnprocessedTag => write!(f, "UnprocessedTag"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// A single notification produced during a load or export pass
#[derive(Debug, Clone)]
pub struct Notification {
    /// The severity / category
    pub notification_type: NotificationType,
    /// A human-readable description of the issue
    pub message: String,
}

impl Notification {
    /// Create a new notification
    pub fn new(notification_type: NotificationType, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.notification_type, self.message)
    }
}

/// Collects notifications during a load/export pass
#[derive(Debug, Clone, Default)]
pub struct NotificationCollection {
    items: Vec<Notification>,
}

impl NotificationCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Record a notification
    pub fn notify(&mut self, notification_type: NotificationType, message: impl Into<String>) {
        self.items.push(Notification::new(notification_type, message));
    }

    /// Record an unconsumed tag with its subclass context
    pub fn unprocessed_tag(&mut self, subclass: Option<&str>, tag: &DxfTag) {
        let message = match subclass {
            Some(name) => format!(
                "ignored tag ({}, '{}') in subclass {}",
                tag.code, tag.value, name
            ),
            None => format!("ignored tag ({}, '{}')", tag.code, tag.value),
        };
        self.notify(NotificationType::UnprocessedTag, message);
    }

    /// Check if there are any notifications
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of notifications
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all notifications
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.items.iter()
    }

    /// Get all notifications of a specific type
    pub fn of_type(&self, nt: NotificationType) -> Vec<&Notification> {
        self.items
            .iter()
            .filter(|n| n.notification_type == nt)
            .collect()
    }

    /// Check whether any notification of the given type exists
    pub fn has_type(&self, nt: NotificationType) -> bool {
        self.items.iter().any(|n| n.notification_type == nt)
    }
}

impl<'a> IntoIterator for &'a NotificationCollection {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
