//! Activity Log Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::{first_text, lenient_string, parse_timestamp};

/// Actor embedded in a log entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityActorRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub profile_pic: Option<String>,
}

/// Log entry as the API sends it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityRecord {
    #[serde(rename = "_id", deserialize_with = "lenient_string")]
    pub object_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub action: Option<String>,
    pub user: Option<ActivityActorRecord>,
    #[serde(deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

/// Broad class of an action, as the log view colours it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    /// Created, logged in, scanned
    Positive,
    Deleted,
    Updated,
    Other,
}

impl ActionKind {
    pub fn classify(action: &str) -> Self {
        if ["Created", "Logged In", "Scanned"]
            .iter()
            .any(|k| action.contains(k))
        {
            ActionKind::Positive
        } else if action.contains("Deleted") {
            ActionKind::Deleted
        } else if action.contains("Updated") {
            ActionKind::Updated
        } else {
            ActionKind::Other
        }
    }
}

/// Canonical log entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: Option<String>,
    pub action: String,
    pub kind: ActionKind,
    /// "Unknown User" when the actor was deleted
    pub actor: String,
    pub actor_photo: Option<String>,
    pub at: Option<DateTime<Utc>>,
}

impl From<ActivityRecord> for ActivityEntry {
    fn from(r: ActivityRecord) -> Self {
        let action = first_text([r.action]).unwrap_or_else(|| "Unknown".to_string());
        let (actor, actor_photo) = match r.user {
            Some(u) => (first_text([u.name, u.full_name]), first_text([u.profile_pic])),
            None => (None, None),
        };
        Self {
            id: first_text([r.object_id, r.id]),
            kind: ActionKind::classify(&action),
            action,
            actor: actor.unwrap_or_else(|| "Unknown User".to_string()),
            actor_photo,
            at: r.created_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// Activity log filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    /// Exact action label, e.g. "Employee Created"
    pub action: Option<String>,
    /// Free-form range label understood by the backend, e.g. "Last 30 Days"
    pub date_range: String,
}

impl Default for ActivityQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: crate::pagination::DEFAULT_PAGE_SIZE,
            search: None,
            action: None,
            date_range: "Last 30 Days".to_string(),
        }
    }
}

impl ActivityQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(action) = self.action.as_deref().filter(|a| !a.is_empty()) {
            params.push(("action", action.to_string()));
        }
        params.push(("dateRange", self.date_range.clone()));
        params
    }
}
