//! Admin User Model

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{RecordError, RecordResult};
use crate::util::{
    first_text, generate_temp_password, lenient_bool, lenient_string, parse_timestamp,
};

const ENTITY: &str = "user";

/// Named permission toggles (`addEmployees`, `generateQRCodes`, ...)
pub type Permissions = BTreeMap<String, bool>;

/// Permissions a new Manager starts with
pub fn manager_permissions() -> Permissions {
    [
        ("addEmployees", true),
        ("editEmployees", true),
        ("deactivateEmployees", false),
        ("viewEmployees", true),
        ("generateQRCodes", true),
        ("revokeQRCodes", false),
        ("manageUsers", false),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// User role
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    Administrator,
    Manager,
    Viewer,
    Other(String),
}

impl From<String> for UserRole {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "administrator" | "admin" => UserRole::Administrator,
            "manager" => UserRole::Manager,
            "viewer" => UserRole::Viewer,
            _ => UserRole::Other(s.trim().to_string()),
        }
    }
}

impl From<UserRole> for String {
    fn from(r: UserRole) -> Self {
        r.to_string()
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Administrator => f.write_str("Administrator"),
            UserRole::Manager => f.write_str("Manager"),
            UserRole::Viewer => f.write_str("Viewer"),
            UserRole::Other(s) => f.write_str(s),
        }
    }
}

/// User as the API sends it
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id", deserialize_with = "lenient_string")]
    pub object_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub job_title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub role: Option<String>,
    pub roles: Option<Vec<String>>,
    pub permissions: Option<Permissions>,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub profile_pic: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub last_login: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

/// Canonical admin user
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub job_title: Option<String>,
    pub roles: Vec<UserRole>,
    pub permissions: Permissions,
    pub active: bool,
    pub photo: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn has_role(&self, role: &UserRole) -> bool {
        self.roles.contains(role)
    }

    pub fn can(&self, permission: &str) -> bool {
        self.permissions.get(permission).copied().unwrap_or(false)
    }
}

impl TryFrom<UserRecord> for User {
    type Error = RecordError;

    fn try_from(r: UserRecord) -> RecordResult<Self> {
        let id = first_text([r.object_id, r.id]).ok_or(RecordError::missing(ENTITY, "id"))?;

        let joined = match (first_text([r.first_name]), first_text([r.last_name])) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (first, last) => first.or(last),
        };
        let full_name = first_text([r.full_name, r.name, joined, r.username.clone()])
            .ok_or(RecordError::missing(ENTITY, "name"))?;

        let mut roles: Vec<UserRole> = Vec::new();
        for role in r.roles.unwrap_or_default().into_iter().chain(r.role) {
            if role.trim().is_empty() {
                continue;
            }
            let role = UserRole::from(role);
            if !roles.contains(&role) {
                roles.push(role);
            }
        }

        let active = match (r.is_active, r.status.as_deref()) {
            (Some(flag), _) => flag,
            (None, Some(s)) => s.trim().eq_ignore_ascii_case("active"),
            (None, None) => true,
        };

        Ok(Self {
            id,
            full_name,
            email: first_text([r.email]),
            username: first_text([r.username]),
            job_title: first_text([r.job_title]),
            roles,
            permissions: r.permissions.unwrap_or_default(),
            active,
            photo: first_text([r.profile_pic]),
            last_login: r.last_login.as_deref().and_then(parse_timestamp),
            created_at: r.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

/// New-user form
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    #[validate(length(min = 1, max = 100, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "last name is required"))]
    pub last_name: String,
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub job_title: Option<String>,
    pub role: UserRole,
    pub force_password_change: bool,
    pub permissions: Permissions,
    pub temp_password: String,
}

impl UserDraft {
    /// Manager with default permissions and a fresh temporary password
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            job_title: None,
            role: UserRole::Manager,
            force_password_change: true,
            permissions: manager_permissions(),
            temp_password: generate_temp_password(),
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn check(&self) -> RecordResult<()> {
        self.validate()?;
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(RecordError::Validation(
                "first name and last name are required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Partial user update
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<UserRole>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// User list filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: crate::pagination::DEFAULT_PAGE_SIZE,
            search: None,
        }
    }
}

impl UserQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        params
    }
}
