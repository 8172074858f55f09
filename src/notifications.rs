//! Notification center.
//!
//! Holds the short-lived messages shown after user actions. When backed by
//! a file, the full list is rewritten on every change; there is no schema
//! version. Auto-dismissal is driven by calling `expire` with the current
//! time rather than by timers.

use chrono::{DateTime, Duration, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::PortalError;
use crate::models::{Notification, NotificationKind};

#[derive(Debug)]
pub struct NotificationCenter {
    items: Vec<Notification>,
    ttl: Duration,
    path: Option<PathBuf>,
}

impl NotificationCenter {
    /// Center that is not persisted anywhere.
    pub fn in_memory(ttl: Duration) -> Self {
        NotificationCenter {
            items: Vec::new(),
            ttl,
            path: None,
        }
    }

    /// Open a file-backed center. A missing file starts an empty list.
    pub fn open(path: &Path, ttl: Duration) -> Result<Self, PortalError> {
        let items: Vec<Notification> = if path.exists() {
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str(&text)?
        } else {
            Vec::new()
        };

        debug!(path = %path.display(), count = items.len(), "Loaded notifications");
        Ok(NotificationCenter {
            items,
            ttl,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, message: impl Into<String>, kind: NotificationKind) -> Result<Uuid, PortalError> {
        self.push_at(message, kind, Local::now())
    }

    pub fn push_at(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        now: DateTime<Local>,
    ) -> Result<Uuid, PortalError> {
        let id = self.record(message.into(), kind, now);
        self.persist()?;
        Ok(id)
    }

    /// Push as a side effect of another action. A failed write is logged
    /// and the notification is still kept in memory.
    pub fn notify(&mut self, message: impl Into<String>, kind: NotificationKind) -> Uuid {
        self.notify_at(message, kind, Local::now())
    }

    pub fn notify_at(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        now: DateTime<Local>,
    ) -> Uuid {
        let id = self.record(message.into(), kind, now);
        if let Err(e) = self.persist() {
            warn!(%id, error = %e, "Could not save notifications");
        }
        id
    }

    fn record(&mut self, message: String, kind: NotificationKind, now: DateTime<Local>) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message,
            kind,
            created_at: now,
        };
        let id = notification.id;
        debug!(%id, ?kind, "Notification pushed");
        self.items.push(notification);
        id
    }

    /// Remove one notification. Returns false if it was already gone.
    pub fn dismiss(&mut self, id: Uuid) -> Result<bool, PortalError> {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Drop notifications older than the TTL. Returns how many were dropped.
    pub fn expire(&mut self, now: DateTime<Local>) -> Result<usize, PortalError> {
        let ttl = self.ttl;
        let before = self.items.len();
        self.items.retain(|n| now - n.created_at < ttl);
        let dropped = before - self.items.len();
        if dropped > 0 {
            debug!(dropped, "Notifications expired");
            self.persist()?;
        }
        Ok(dropped)
    }

    pub fn clear(&mut self) -> Result<(), PortalError> {
        self.items.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), PortalError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.items)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
