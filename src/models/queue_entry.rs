//! Queue entry model - one row per hostname/IP pair admitted to the
//! frontier (spec §3 "QueueEntry").

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QueueEntry {
    pub id: i64,
    pub hostname: String,
    pub ip_address: String,
    pub is_processing: bool,
    pub is_processed: bool,
    pub added_at: NaiveDateTime,
    pub processed_at: Option<NaiveDateTime>,
}
