//! Badge verification endpoint

use serde::Serialize;
use shared::models::{EmployeeRecord, PublicProfile};
use smartpass_qr::{encode_path_segment, validate_identifier};

use super::{Envelope, SmartPassClient};
use crate::error::{ClientError, ClientResult};

const EMPLOYEES_PUBLIC: &str = "/api/employees/public";

/// Outcome of looking up a scanned identifier
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", content = "profile", rename_all = "camelCase")]
pub enum Resolution {
    Found(PublicProfile),
    NotFound,
}

impl Resolution {
    pub fn profile(&self) -> Option<&PublicProfile> {
        match self {
            Resolution::Found(p) => Some(p),
            Resolution::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

impl SmartPassClient {
    /// Public profile behind a badge identifier.
    ///
    /// No credentials are sent. A 404, an identifier no badge could carry and
    /// a record without a name all resolve to [`Resolution::NotFound`];
    /// transport and server failures are errors.
    pub async fn resolve(&self, identifier: &str) -> ClientResult<Resolution> {
        if let Err(e) = validate_identifier(identifier) {
            tracing::debug!(error = %e, "identifier cannot belong to a badge");
            return Ok(Resolution::NotFound);
        }

        let path = format!("{EMPLOYEES_PUBLIC}/{}", encode_path_segment(identifier));
        let record = match self
            .http
            .get_public::<Option<Envelope<EmployeeRecord>>>(&path)
            .await
        {
            Ok(Some(record)) => record.into_inner(),
            Ok(None) | Err(ClientError::NotFound(_)) => {
                tracing::info!(identifier = %identifier, "badge not found");
                return Ok(Resolution::NotFound);
            }
            Err(e) => return Err(e),
        };

        match PublicProfile::from_record(record) {
            Ok(profile) => Ok(Resolution::Found(profile)),
            Err(e) => {
                tracing::warn!(identifier = %identifier, error = %e, "incomplete public profile");
                Ok(Resolution::NotFound)
            }
        }
    }
}
