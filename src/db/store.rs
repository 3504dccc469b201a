//! The Inventory Store: the authoritative admission gate and device
//! repository backing the frontier (spec §4.C "Inventory Store").
//!
//! All dedup decisions are made here under a single connection pool;
//! `admit_if_absent` is the one operation that must be atomic with respect
//! to concurrent workers racing to enqueue the same neighbor.

use anyhow::Context;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::error::CrawlError;
use crate::models::{DeviceProjection, DeviceRecord, QueueEntry};

#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// True if `hostname` or `ip_address` appears in either the devices or
    /// queue tables (spec §4.C "exists").
    pub async fn exists(&self, hostname: &str, ip_address: Option<&str>) -> Result<bool, CrawlError> {
        let hit = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM devices WHERE hostname = ?1 OR ip_address = ?2
             UNION ALL
             SELECT COUNT(*) FROM queue WHERE hostname = ?1 OR ip_address = ?2",
        )
        .bind(hostname)
        .bind(ip_address.unwrap_or(""))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CrawlError::StoreError(e.into()))?;

        Ok(hit.into_iter().any(|count| count > 0))
    }

    /// Insert `(hostname, ip_address)` into the queue iff neither is already
    /// known, as a single atomic check-then-insert (spec §4.C, §8 "frontier
    /// admission is exactly-once"). Returns `true` if this call admitted it.
    pub async fn admit_if_absent(&self, hostname: &str, ip_address: &str) -> Result<bool, CrawlError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CrawlError::StoreError(e.into()))?;

        let already: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM devices WHERE hostname = ?1 OR ip_address = ?2",
        )
        .bind(hostname)
        .bind(ip_address)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| CrawlError::StoreError(e.into()))?;

        let already_queued: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM queue WHERE hostname = ?1 OR ip_address = ?2",
        )
        .bind(hostname)
        .bind(ip_address)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| CrawlError::StoreError(e.into()))?;

        if already > 0 || already_queued > 0 {
            tx.commit().await.map_err(|e| CrawlError::StoreError(e.into()))?;
            return Ok(false);
        }

        let now = Utc::now().naive_utc();
        sqlx::query(
            "INSERT INTO queue (hostname, ip_address, is_processing, is_processed, added_at)
             VALUES (?1, ?2, 0, 0, ?3)",
        )
        .bind(hostname)
        .bind(ip_address)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| CrawlError::StoreError(e.into()))?;

        tx.commit().await.map_err(|e| CrawlError::StoreError(e.into()))?;
        Ok(true)
    }

    /// True if this hostname's queue entry is already in-flight or done, or
    /// a Device row already exists for it — the worker loop's duplicate
    /// filter for items that linger in the Frontier after another worker
    /// has already claimed them (spec §4.E step 2).
    pub async fn already_claimed(&self, hostname: &str) -> Result<bool, CrawlError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM queue WHERE hostname = ?1 AND (is_processing = 1 OR is_processed = 1)
             UNION ALL
             SELECT COUNT(*) FROM devices WHERE hostname = ?1",
        )
        .bind(hostname)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CrawlError::StoreError(e.into()))?
        .into_iter()
        .sum();
        Ok(count > 0)
    }

    pub async fn mark_processing(&self, hostname: &str) -> Result<(), CrawlError> {
        sqlx::query("UPDATE queue SET is_processing = 1 WHERE hostname = ?1")
            .bind(hostname)
            .execute(&self.pool)
            .await
            .map_err(|e| CrawlError::StoreError(e.into()))?;
        Ok(())
    }

    pub async fn mark_processed(&self, hostname: &str) -> Result<(), CrawlError> {
        let now = Utc::now().naive_utc();
        sqlx::query(
            "UPDATE queue SET is_processing = 0, is_processed = 1, processed_at = ?2
             WHERE hostname = ?1",
        )
        .bind(hostname)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| CrawlError::StoreError(e.into()))?;
        Ok(())
    }

    /// Persist a fully-identified device. A unique-constraint violation on
    /// `ip_address` (another hostname already claims this address) surfaces
    /// as `CrawlError::StoreError` rather than panicking (spec §7).
    pub async fn save_device(&self, device: &DeviceProjection) -> Result<(), CrawlError> {
        let now = Utc::now().naive_utc();
        sqlx::query(
            r#"INSERT INTO devices (hostname, ip_address, platform, serial_number, device_type, discovered_at, last_updated)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
               ON CONFLICT(hostname) DO UPDATE SET
                   ip_address = excluded.ip_address,
                   platform = excluded.platform,
                   serial_number = excluded.serial_number,
                   device_type = excluded.device_type,
                   last_updated = excluded.last_updated"#,
        )
        .bind(&device.hostname)
        .bind(&device.ip_address)
        .bind(&device.platform)
        .bind(&device.serial_number)
        .bind(&device.device_type)
        .bind(now)
        .execute(&self.pool)
        .await
        .with_context(|| format!("saving device {}", device.hostname))
        .map_err(CrawlError::StoreError)?;
        Ok(())
    }

    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, CrawlError> {
        sqlx::query_as::<_, DeviceRecord>("SELECT * FROM devices ORDER BY hostname")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| CrawlError::StoreError(e.into()))
    }

    /// Queue rows that are neither processing nor processed — the engine's
    /// startup seed set plus anything left over from a prior run (spec §4.C
    /// "unprocessed_entries").
    pub async fn unprocessed_entries(&self) -> Result<Vec<QueueEntry>, CrawlError> {
        sqlx::query_as::<_, QueueEntry>(
            "SELECT * FROM queue WHERE is_processed = 0 AND is_processing = 0 ORDER BY added_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CrawlError::StoreError(e.into()))
    }

    /// Reset any row left mid-flight from a process that died without
    /// calling `mark_processed` (spec §4.C "crash recovery"). Called once at
    /// startup before the engine begins pulling from the frontier.
    pub async fn clear_stale_processing(&self) -> Result<u64, CrawlError> {
        let result = sqlx::query(
            "UPDATE queue SET is_processing = 0 WHERE is_processing = 1 AND is_processed = 0",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| CrawlError::StoreError(e.into()))?;
        Ok(result.rows_affected())
    }
}
