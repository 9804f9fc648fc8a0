//! Raw Bubberstation API records

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One ban as reported by `/api/bans`
///
/// Fields of the wrong JSON type read as absent, so one odd value does not
/// cost the whole record. Whether an absent field is fatal is decided during
/// normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BubberBan {
    /// Numeric or string row id
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ckey: Option<String>,
    /// Banning admin
    #[serde(default, deserialize_with = "lenient_string")]
    pub a_ckey: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub bantime: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub expiration_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reason: Option<String>,
    #[serde(default, deserialize_with = "lenient_roles")]
    pub roles: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: Option<String>,
    /// Admin who lifted the ban, if any
    #[serde(default, deserialize_with = "lenient_string")]
    pub unbanned_ckey: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// A list of role names, or a bare string naming one role
fn lenient_roles<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        Value::String(role) => Some(vec![role]),
        _ => None,
    })
}

impl BubberBan {
    /// Row id as a string, if present and non-empty
    pub fn ban_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Banned roles, accepting either the list or the single-role field
    pub fn roles(&self) -> Vec<&str> {
        match (&self.roles, &self.role) {
            (Some(roles), _) => roles.iter().map(String::as_str).collect(),
            (None, Some(role)) => vec![role.as_str()],
            (None, None) => Vec::new(),
        }
    }
}

/// A page element, decoded independently of its neighbours
#[derive(Debug, Clone)]
pub enum BubberRecord {
    Parsed(BubberBan),
    /// Element that did not match the record shape, with the decode error
    Malformed(String),
}

impl From<Value> for BubberRecord {
    fn from(value: Value) -> Self {
        if !value.is_object() {
            return Self::Malformed(format!("expected a ban object, got {value}"));
        }
        match serde_json::from_value(value) {
            Ok(ban) => Self::Parsed(ban),
            Err(e) => Self::Malformed(e.to_string()),
        }
    }
}
