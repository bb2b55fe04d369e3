//! Append-only ledger of login attempts.
//!
//! Records are kept in memory for the lifetime of the process. Id assignment
//! and insertion happen under a single lock so ids stay strictly increasing
//! under concurrent writers.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Timezone used for the human-readable `localTime` field.
pub const LOCAL_TIMEZONE: Tz = chrono_tz::Asia::Shanghai;

/// A captured login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRecord {
    pub id: u64,
    pub username: String,
    /// bcrypt hash of the submitted password.
    pub password_hash: String,
    /// ISO-8601 UTC instant, millisecond precision.
    pub timestamp: String,
    /// Same instant in [`LOCAL_TIMEZONE`], `YYYY/M/D HH:MM:SS`.
    pub local_time: String,
    pub success: bool,
}

/// Aggregate view over the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginStats {
    pub total_attempts: usize,
    pub unique_users: usize,
    /// Attempt count per username.
    pub user_stats: BTreeMap<String, usize>,
    pub first_attempt: Option<LoginRecord>,
    pub last_attempt: Option<LoginRecord>,
}

/// In-memory login attempt ledger.
#[derive(Debug, Default)]
pub struct LoginLedger {
    records: Mutex<Vec<LoginRecord>>,
}

impl LoginLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LoginRecord>> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append a record stamped with the current time.
    pub fn record(&self, username: &str, password_hash: String) -> LoginRecord {
        self.record_at(username, password_hash, Utc::now())
    }

    /// Append a record stamped with `at`.
    ///
    /// The id equals the ledger length after insertion. Every record is marked
    /// successful: the ledger captures attempts, it does not check them.
    pub fn record_at(
        &self,
        username: &str,
        password_hash: String,
        at: DateTime<Utc>,
    ) -> LoginRecord {
        let mut records = self.lock();
        let record = LoginRecord {
            id: records.len() as u64 + 1,
            username: username.to_string(),
            password_hash,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            local_time: at
                .with_timezone(&LOCAL_TIMEZONE)
                .format("%Y/%-m/%-d %H:%M:%S")
                .to_string(),
            success: true,
        };
        records.push(record.clone());
        record
    }

    /// All records in insertion order.
    pub fn list_all(&self) -> Vec<LoginRecord> {
        self.lock().clone()
    }

    /// Up to `count` records, newest first.
    pub fn list_recent(&self, count: usize) -> Vec<LoginRecord> {
        self.lock().iter().rev().take(count).cloned().collect()
    }

    pub fn stats(&self) -> LoginStats {
        let records = self.lock();
        let mut user_stats = BTreeMap::new();
        for record in records.iter() {
            *user_stats.entry(record.username.clone()).or_insert(0) += 1;
        }
        LoginStats {
            total_attempts: records.len(),
            unique_users: user_stats.len(),
            user_stats,
            first_attempt: records.first().cloned(),
            last_attempt: records.last().cloned(),
        }
    }

    /// Remove every record, returning how many were dropped.
    pub fn clear(&self) -> usize {
        let mut records = self.lock();
        let count = records.len();
        records.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
