//! Ban entity - the canonical, source-attributed ban record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BanSource, JobBan};
use crate::value_objects::CKey;

/// Ban scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum BanType {
    /// Banned from the whole server
    #[default]
    Server = 0,
    /// Banned from one or more jobs
    Job = 1,
}

impl BanType {
    /// Get the numeric value
    #[inline]
    #[must_use]
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}

impl From<i16> for BanType {
    fn from(value: i16) -> Self {
        match value {
            1 => Self::Job,
            _ => Self::Server, // Default for 0 and unknown values
        }
    }
}

impl From<BanType> for i16 {
    fn from(bt: BanType) -> Self {
        bt as i16
    }
}

/// Natural identity of a ban whose source reports stable ids
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey {
    pub source: String,
    pub ban_id: String,
}

/// Canonical ban record
///
/// Built fresh from remote data on every crawl. Two bans are structurally equal
/// when every field matches, which is the only identity available for sources
/// without stable ban ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ban {
    /// Identifier as reported by the source, if it has stable ids
    pub ban_id: Option<String>,
    pub source: BanSource,
    pub ckey: CKey,
    pub banned_on: DateTime<Utc>,
    pub banned_by: String,
    pub ban_type: BanType,
    pub expires: Option<DateTime<Utc>>,
    pub reason: String,
    pub unbanned_by: Option<String>,
    /// Sorted, without duplicates
    pub job_bans: Vec<JobBan>,
}

impl Ban {
    /// Create a server ban with required fields
    pub fn new(
        source: BanSource,
        ckey: CKey,
        banned_on: DateTime<Utc>,
        banned_by: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            ban_id: None,
            source,
            ckey,
            banned_on,
            banned_by: banned_by.into(),
            ban_type: BanType::Server,
            expires: None,
            reason: reason.into(),
            unbanned_by: None,
            job_bans: Vec::new(),
        }
    }

    /// Set the source-reported ban id
    pub fn with_ban_id(mut self, ban_id: impl Into<String>) -> Self {
        self.ban_id = Some(ban_id.into());
        self
    }

    /// Set the expiry; `None` means permanent
    pub fn with_expires(mut self, expires: Option<DateTime<Utc>>) -> Self {
        self.expires = expires;
        self
    }

    /// Record who lifted the ban
    pub fn with_unbanned_by(mut self, unbanned_by: Option<String>) -> Self {
        self.unbanned_by = unbanned_by;
        self
    }

    /// Attach job bans, turning this into a job ban when any are given
    pub fn with_job_bans(mut self, job_bans: impl IntoIterator<Item = JobBan>) -> Self {
        let mut jobs: Vec<JobBan> = job_bans.into_iter().collect();
        jobs.sort();
        jobs.dedup();
        self.ban_type = if jobs.is_empty() {
            BanType::Server
        } else {
            BanType::Job
        };
        self.job_bans = jobs;
        self
    }

    /// Get the `(source, ban_id)` key, if this ban has a stable id
    pub fn dedup_key(&self) -> Option<DedupKey> {
        self.ban_id.as_ref().map(|ban_id| DedupKey {
            source: self.source.name.clone(),
            ban_id: ban_id.clone(),
        })
    }

    /// Check if the ban is an unexpired, unlifted ban at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        if self.unbanned_by.is_some() {
            return false;
        }
        self.expires.map_or(true, |expires| expires > now)
    }

    /// Check if the ban never expires
    #[inline]
    pub fn is_permanent(&self) -> bool {
        self.expires.is_none()
    }
}

/// A ban as persisted, paired with its storage row id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBan {
    pub id: i64,
    pub ban: Ban,
}
