//! Bubberstation parser: one sub-source, stable numeric ban ids

use async_trait::async_trait;

use centcom_core::{Ban, BanSource, CKey, JobBan, RoleplayLevel};

use super::models::{BubberBan, BubberRecord};
use super::service::BubberBanService;
use crate::error::{FetchError, NormalizeError, RegistryError};
use crate::parser::BanParser;
use crate::registry::SourceRegistry;
use crate::sources::parse_timestamp;

const SOURCE_KEY: &str = "bubberstation";

/// Role name the API uses for server-wide bans
const SERVER_ROLE: &str = "Server";

pub struct BubberBanParser {
    service: BubberBanService,
    sources: SourceRegistry,
}

impl BubberBanParser {
    pub fn new(service: BubberBanService) -> Result<Self, RegistryError> {
        let source = BanSource::new(SOURCE_KEY, "Bubberstation", RoleplayLevel::Medium);
        Ok(Self {
            service,
            sources: SourceRegistry::single(SOURCE_KEY, source)?,
        })
    }

    pub fn service(&self) -> &BubberBanService {
        &self.service
    }
}

#[async_trait]
impl BanParser for BubberBanParser {
    type Record = BubberRecord;

    fn name(&self) -> &str {
        "Bubberstation"
    }

    fn supports_ban_ids(&self) -> bool {
        true
    }

    fn sources(&self) -> &SourceRegistry {
        &self.sources
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<BubberRecord>, FetchError> {
        self.service.get_bans(page).await
    }

    fn normalize(&self, record: BubberRecord, source: &BanSource) -> Result<Ban, NormalizeError> {
        match record {
            BubberRecord::Parsed(raw) => normalize_ban(raw, source),
            BubberRecord::Malformed(reason) => Err(NormalizeError::Malformed(reason)),
        }
    }
}

fn normalize_ban(raw: BubberBan, source: &BanSource) -> Result<Ban, NormalizeError> {
    let ban_id = raw.ban_id();

    let raw_ckey = raw.ckey.as_deref().ok_or(NormalizeError::MissingField("ckey"))?;
    let ckey = CKey::parse(raw_ckey).map_err(|_| NormalizeError::InvalidCKey(raw_ckey.to_string()))?;

    let bantime = raw.bantime.as_deref().ok_or(NormalizeError::MissingField("bantime"))?;
    let banned_on = parse_timestamp(bantime).ok_or_else(|| NormalizeError::InvalidTimestamp {
        field: "bantime",
        value: bantime.to_string(),
    })?;

    // A bad expiry must not silently turn a temporary ban permanent
    let expires = match raw.expiration_time.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(value) => Some(parse_timestamp(value).ok_or_else(|| {
            NormalizeError::InvalidTimestamp {
                field: "expiration_time",
                value: value.to_string(),
            }
        })?),
    };

    let jobs: Vec<JobBan> = raw
        .roles()
        .into_iter()
        .map(str::trim)
        .filter(|role| !role.is_empty() && !role.eq_ignore_ascii_case(SERVER_ROLE))
        .map(JobBan::new)
        .collect();

    let unbanned_by = raw.unbanned_ckey.filter(|admin| !admin.trim().is_empty());

    let mut ban = Ban::new(
        source.clone(),
        ckey,
        banned_on,
        raw.a_ckey.unwrap_or_default(),
        raw.reason.unwrap_or_default(),
    )
    .with_expires(expires)
    .with_unbanned_by(unbanned_by)
    .with_job_bans(jobs);

    if let Some(id) = ban_id {
        ban = ban.with_ban_id(id);
    }
    Ok(ban)
}
