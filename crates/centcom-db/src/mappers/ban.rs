//! Ban entity <-> model mapper

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use centcom_core::entities::{Ban, BanSource, JobBan, StoredBan};
use centcom_core::error::DomainError;
use centcom_core::value_objects::{CKey, RoleplayLevel};

use crate::models::{BanModel, JobBanModel};

/// Build a StoredBan from its joined row and job ban names
pub fn stored_ban_from_model(model: BanModel, jobs: Vec<String>) -> Result<StoredBan, DomainError> {
    let source = BanSource {
        name: model.source_name,
        display: model.source_display,
        roleplay_level: RoleplayLevel::try_from(model.source_roleplay_level)?,
    };

    let mut ban = Ban::new(
        source,
        CKey::parse(&model.ckey)?,
        model.banned_on,
        model.banned_by,
        model.reason,
    )
    .with_expires(model.expires)
    .with_unbanned_by(model.unbanned_by)
    .with_job_bans(jobs.into_iter().map(JobBan::new));
    ban.ban_id = model.ban_id;
    // ban_type is derived from the job ban children rather than read from the row

    Ok(StoredBan { id: model.id, ban })
}

/// Group job ban rows by parent ban row id
pub fn group_job_bans(rows: Vec<JobBanModel>) -> HashMap<i64, Vec<String>> {
    let mut grouped: HashMap<i64, Vec<String>> = HashMap::new();
    for row in rows {
        grouped.entry(row.parent_ban_id).or_default().push(row.job);
    }
    grouped
}

/// Ban entity reference prepared for insertion or update
pub struct BanInsert<'a> {
    pub source_name: &'a str,
    pub ban_id: Option<&'a str>,
    pub ckey: &'a str,
    pub banned_on: DateTime<Utc>,
    pub banned_by: &'a str,
    pub ban_type: i16,
    pub expires: Option<DateTime<Utc>>,
    pub reason: &'a str,
    pub unbanned_by: Option<&'a str>,
    pub jobs: Vec<String>,
}

impl<'a> BanInsert<'a> {
    pub fn new(ban: &'a Ban) -> Self {
        Self {
            source_name: &ban.source.name,
            ban_id: ban.ban_id.as_deref(),
            ckey: ban.ckey.as_str(),
            banned_on: ban.banned_on,
            banned_by: &ban.banned_by,
            ban_type: ban.ban_type.as_i16(),
            expires: ban.expires,
            reason: &ban.reason,
            unbanned_by: ban.unbanned_by.as_deref(),
            jobs: ban.job_bans.iter().map(|j| j.job.clone()).collect(),
        }
    }
}
