//! Employee Model
//!
//! Backends in the field have used several names for the same column
//! (`name`/`fullName`, `cargo`/`jobTitle`, `phone`/`phoneNumber`, ...).
//! [`EmployeeRecord`] accepts all of them; [`Employee`] is the only shape the
//! rest of the code reads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{RecordError, RecordResult};
use crate::util::{first_text, lenient_bool, lenient_string, parse_date, parse_timestamp};

const ENTITY: &str = "employee";

/// Employee as the API sends it (every historical field name)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmployeeRecord {
    #[serde(rename = "_id", deserialize_with = "lenient_string")]
    pub object_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub employee_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub full_name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub job_title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub cargo: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone_number: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub mobile: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub mobile_number: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub department: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub office_location: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub profile_pic: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub photo: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub qr_code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub id_card_expiration: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

/// Active / inactive badge holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::Inactive => "Inactive",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EmployeeStatus::Active)
    }

    /// Active unless the record explicitly says otherwise
    fn from_wire(is_active: Option<bool>, status: Option<&str>) -> Self {
        if is_active == Some(false) {
            return EmployeeStatus::Inactive;
        }
        match status.map(str::trim) {
            Some(s)
                if s.eq_ignore_ascii_case("inactive")
                    || s.eq_ignore_ascii_case("suspended")
                    || s.eq_ignore_ascii_case("disabled") =>
            {
                EmployeeStatus::Inactive
            }
            _ => EmployeeStatus::Active,
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = RecordError;

    fn from_str(s: &str) -> RecordResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(EmployeeStatus::Active),
            "inactive" => Ok(EmployeeStatus::Inactive),
            other => Err(RecordError::Validation(format!(
                "unknown employee status '{other}'"
            ))),
        }
    }
}

/// Whether a record carries its badge code yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeState {
    /// Identifier known, image absent
    CodeAbsent,
    /// Identifier known, image stored on the record
    CodePresent,
}

/// Which record field goes into the verification URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierSource {
    /// Server-assigned record id (known only after insert)
    #[default]
    RecordId,
    /// Human-chosen employee code
    EmployeeCode,
}

impl FromStr for IdentifierSource {
    type Err = RecordError;

    fn from_str(s: &str) -> RecordResult<Self> {
        match s.trim() {
            "record-id" | "id" => Ok(IdentifierSource::RecordId),
            "employee-code" | "code" => Ok(IdentifierSource::EmployeeCode),
            other => Err(RecordError::Validation(format!(
                "unknown identifier source '{other}'"
            ))),
        }
    }
}

/// Canonical employee
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub employee_code: Option<String>,
    pub full_name: String,
    pub job_title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub department: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
    pub office_location: Option<String>,
    pub status: EmployeeStatus,
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
    pub card_expiration: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn badge_state(&self) -> BadgeState {
        match self.qr_code.as_deref() {
            Some(code) if !code.trim().is_empty() => BadgeState::CodePresent,
            _ => BadgeState::CodeAbsent,
        }
    }

    /// The identifier to embed in the badge, if the record has one
    pub fn identifier(&self, source: IdentifierSource) -> Option<&str> {
        match source {
            IdentifierSource::RecordId => Some(self.id.as_str()),
            IdentifierSource::EmployeeCode => self.employee_code.as_deref(),
        }
    }

    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            name: self.full_name.clone(),
            title: self.job_title.clone(),
            company: self.company.clone(),
            department: self.department.clone(),
            category: self.category.clone(),
            status: self.status,
            photo: self.photo.clone(),
            card_expiration: self.card_expiration,
        }
    }
}

impl TryFrom<EmployeeRecord> for Employee {
    type Error = RecordError;

    fn try_from(r: EmployeeRecord) -> RecordResult<Self> {
        let id = first_text([r.object_id, r.id]).ok_or(RecordError::missing(ENTITY, "id"))?;
        let full_name =
            first_text([r.full_name, r.name]).ok_or(RecordError::missing(ENTITY, "name"))?;

        Ok(Self {
            id,
            employee_code: first_text([r.employee_id]),
            full_name,
            job_title: first_text([r.job_title, r.cargo, r.title]),
            email: first_text([r.email]),
            phone: first_text([r.phone, r.phone_number]),
            mobile: first_text([r.mobile, r.mobile_number]),
            department: first_text([r.department]),
            category: first_text([r.category]),
            company: first_text([r.company]),
            office_location: first_text([r.office_location]),
            status: EmployeeStatus::from_wire(r.is_active, r.status.as_deref()),
            photo: first_text([r.profile_pic, r.photo]),
            qr_code: first_text([r.qr_code]),
            card_expiration: r.id_card_expiration.as_deref().and_then(parse_date),
            created_at: r.created_at.as_deref().and_then(parse_timestamp),
        })
    }
}

/// What a scanned badge shows without signing in
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub category: Option<String>,
    pub status: EmployeeStatus,
    pub photo: Option<String>,
    pub card_expiration: Option<NaiveDate>,
}

impl PublicProfile {
    /// Public payloads may omit the id; a name is still required.
    pub fn from_record(r: EmployeeRecord) -> RecordResult<Self> {
        let name =
            first_text([r.full_name, r.name]).ok_or(RecordError::missing(ENTITY, "name"))?;
        Ok(Self {
            name,
            title: first_text([r.job_title, r.cargo, r.title]),
            company: first_text([r.company]),
            department: first_text([r.department]),
            category: first_text([r.category]),
            status: EmployeeStatus::from_wire(r.is_active, r.status.as_deref()),
            photo: first_text([r.profile_pic, r.photo]),
            card_expiration: r.id_card_expiration.as_deref().and_then(parse_date),
        })
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// New-employee form
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDraft {
    #[validate(
        custom(function = "not_blank", message = "full name is required"),
        length(max = 200)
    )]
    pub full_name: String,
    #[validate(
        custom(function = "not_blank", message = "job title is required"),
        length(max = 200)
    )]
    pub job_title: String,
    #[validate(
        custom(function = "not_blank", message = "department is required"),
        length(max = 200)
    )]
    pub department: String,
    #[validate(
        custom(function = "not_blank", message = "category is required"),
        length(max = 200)
    )]
    pub category: String,
    /// Left empty to have one generated
    #[serde(rename = "employeeId", skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub employee_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "email is not valid"))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub mobile_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 200))]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub office_location: Option<String>,
    #[serde(default)]
    pub status: EmployeeStatus,
    /// Photo as a data URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl EmployeeDraft {
    pub fn new(
        full_name: impl Into<String>,
        job_title: impl Into<String>,
        department: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            job_title: job_title.into(),
            department: department.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_employee_code(mut self, code: impl Into<String>) -> Self {
        self.employee_code = Some(code.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Field checks run before anything is sent
    pub fn check(&self) -> RecordResult<()> {
        self.validate().map_err(Into::into)
    }

    /// Blank codes count as absent
    pub fn employee_code(&self) -> Option<&str> {
        self.employee_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Partial update; only set fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EmployeeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

impl EmployeeUpdate {
    /// Body that stores a badge image and nothing else
    pub fn qr_code(data_url: impl Into<String>) -> Self {
        Self {
            qr_code: Some(data_url.into()),
            ..Default::default()
        }
    }

    /// Sets both status spellings the backends understand
    pub fn with_status(mut self, status: EmployeeStatus) -> Self {
        self.is_active = Some(status.is_active());
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Employee list filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub company: Option<String>,
}

impl Default for EmployeeQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: crate::pagination::DEFAULT_PAGE_SIZE,
            search: None,
            status: None,
            company: None,
        }
    }
}

impl EmployeeQuery {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn status(mut self, status: EmployeeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    /// Query-string pairs; unset filters are omitted
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(company) = self.company.as_deref().filter(|s| !s.is_empty()) {
            params.push(("company", company.to_string()));
        }
        params
    }

    /// Same filters applied locally, for backends that ignore them
    pub fn matches(&self, employee: &Employee) -> bool {
        if let Some(status) = self.status
            && employee.status != status
        {
            return false;
        }
        if let Some(company) = self.company.as_deref().filter(|s| !s.is_empty())
            && !employee
                .company
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(company))
        {
            return false;
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hay = [
                Some(employee.full_name.as_str()),
                employee.employee_code.as_deref(),
                employee.email.as_deref(),
                employee.department.as_deref(),
                employee.job_title.as_deref(),
            ];
            return hay
                .into_iter()
                .flatten()
                .any(|h| h.to_lowercase().contains(&needle));
        }
        true
    }
}
