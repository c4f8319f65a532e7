use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use shared::domain::{ItemKind, Roadmap, TaskRecord, TaskStatus};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GrowthPathRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phase: i32,
    pub roadmap: Value,
    pub generated_at: DateTime<Utc>,
    pub is_active: bool,
}

impl GrowthPathRow {
    pub fn roadmap(&self) -> Roadmap {
        serde_json::from_value(self.roadmap.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProgressRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: String,
    pub item_type: String,
    pub item_name: String,
    pub status: String,
    pub completion_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub encouragement_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ProgressRow {
    pub fn status(&self) -> TaskStatus {
        self.status.parse().unwrap_or_default()
    }

    pub fn item_kind(&self) -> ItemKind {
        // Unknown kinds should not occur; treat them as projects rather than fail.
        self.item_type.parse().unwrap_or(ItemKind::Project)
    }

    pub fn into_record(self) -> TaskRecord {
        let status = self.status();
        let item_type = self.item_kind();
        TaskRecord {
            item_id: self.item_id,
            item_type,
            item_name: self.item_name,
            status,
            completion_date: self.completion_date,
            notes: self.notes,
            encouragement_message: self.encouragement_message,
        }
    }
}
