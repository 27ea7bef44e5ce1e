//! Best-effort audit trail.
//!
//! Recording an entry never blocks and never fails the caller: entries are
//! pushed onto a channel and a background task appends them to
//! `platform_activity_log`. Write failures are logged and dropped.

use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::db::activity as activity_db;

pub const QUOTE_CREATED: &str = "quote_created";
pub const QUOTE_RESPONDED: &str = "quote_responded";
pub const QUOTE_ACCEPTED: &str = "quote_accepted";
pub const QUOTE_REJECTED: &str = "quote_rejected";
pub const QUOTE_REVISION_REQUESTED: &str = "quote_revision_requested";
pub const CONTACT_UNLOCKED: &str = "contact_unlocked";
pub const CONTACT_EXPIRED: &str = "contact_expired";

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub entity_type: String,
    pub entity_id: String,
    pub action_type: String,
    pub actor_user_id: Option<Uuid>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn quote(quote_id: Uuid, action: &str, actor: Uuid, at: DateTime<Utc>) -> Self {
        Self {
            entity_type: "quote".to_string(),
            entity_id: quote_id.to_string(),
            action_type: action.to_string(),
            actor_user_id: Some(actor),
            metadata: None,
            created_at: at,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Destination for activity entries. Implementations must not block and must
/// swallow their own failures.
pub trait ActivitySink: Send + Sync {
    fn record(&self, entry: ActivityEntry);
}

/// Channel-backed sink draining into the database.
#[derive(Clone)]
pub struct ActivityLog {
    sender: mpsc::UnboundedSender<ActivityEntry>,
}

impl ActivityLog {
    /// Spawn the writer task. Must be called from within a Tokio runtime.
    pub fn spawn(db: DatabaseConnection) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::unbounded_channel::<ActivityEntry>();

        let handle = tokio::spawn(async move {
            while let Some(entry) = receiver.recv().await {
                let action = entry.action_type.clone();
                if let Err(e) = activity_db::insert_entry(&db, entry).await {
                    tracing::warn!(%action, "Failed to write activity log entry: {e}");
                }
            }
            tracing::debug!("Activity log writer stopped");
        });

        (Self { sender }, handle)
    }
}

impl ActivitySink for ActivityLog {
    fn record(&self, entry: ActivityEntry) {
        if self.sender.send(entry).is_err() {
            tracing::warn!("Activity log writer is gone; entry dropped");
        }
    }
}
