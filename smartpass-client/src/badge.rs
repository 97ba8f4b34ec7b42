//! Badge lifecycle
//!
//! Connects the codec to the REST client: a record moves from "code absent"
//! to "code present" by encoding its identifier and storing the image on it.
//! The two steps are not atomic. When storing fails the rendered image rides
//! along in [`BadgeError::Persistence`] so it can be resubmitted with
//! [`BadgeIssuer::persist`] instead of being recomputed.

use shared::models::{Employee, EmployeeDraft, IdentifierSource};
use shared::util::{generate_employee_code, now_millis};
use smartpass_qr::{QrCodec, QrError, QrImage, validate_identifier};
use thiserror::Error;

use crate::api::SmartPassClient;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Why a badge was not issued
#[derive(Debug, Error)]
pub enum BadgeError {
    /// Identifier can never be a badge; nothing was sent
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Code could not be rendered. `saved` is the record when it was
    /// already created, which then exists without a code.
    #[error("Could not generate code: {source}")]
    Encoding {
        saved: Option<Box<Employee>>,
        #[source]
        source: QrError,
    },

    /// Code rendered but not stored on the record
    #[error("Code for '{identifier}' generated but not saved: {source}")]
    Persistence {
        identifier: String,
        image: QrImage,
        #[source]
        source: ClientError,
    },

    /// The record itself could not be read or written
    #[error(transparent)]
    Api(#[from] ClientError),
}

impl BadgeError {
    /// Whether the same call may succeed later.
    /// A persistence failure keeps its image either way; only network and
    /// server faults are worth resubmitting it for.
    pub fn is_retryable(&self) -> bool {
        match self {
            BadgeError::Persistence { source, .. } | BadgeError::Api(source) => {
                source.is_retryable()
            }
            BadgeError::InvalidIdentifier(_) | BadgeError::Encoding { .. } => false,
        }
    }

    /// The record that now exists without a badge code, if any
    pub fn saved_without_code(&self) -> Option<&Employee> {
        match self {
            BadgeError::Encoding { saved, .. } => saved.as_deref(),
            _ => None,
        }
    }

    /// Image that still has to be stored
    pub fn pending_image(&self) -> Option<(&str, &QrImage)> {
        match self {
            BadgeError::Persistence {
                identifier, image, ..
            } => Some((identifier, image)),
            _ => None,
        }
    }

    fn from_codec(source: QrError, saved: Option<Employee>) -> Self {
        match source {
            QrError::InvalidIdentifier(msg) if saved.is_none() => BadgeError::InvalidIdentifier(msg),
            source => BadgeError::Encoding {
                saved: saved.map(Box::new),
                source,
            },
        }
    }
}

/// Result type for badge operations
pub type BadgeResult<T> = Result<T, BadgeError>;

/// A created record and the badge now stored on it
#[derive(Debug, Clone)]
pub struct Enrollment {
    pub employee: Employee,
    pub image: QrImage,
}

/// Issues and re-issues employee badges
#[derive(Debug, Clone)]
pub struct BadgeIssuer {
    client: SmartPassClient,
    codec: QrCodec,
    source: IdentifierSource,
}

impl BadgeIssuer {
    pub fn new(client: SmartPassClient, codec: QrCodec, source: IdentifierSource) -> Self {
        Self {
            client,
            codec,
            source,
        }
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let codec = config
            .build_codec()
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self::new(config.build_client()?, codec, config.identifier_source))
    }

    pub fn client(&self) -> &SmartPassClient {
        &self.client
    }

    pub fn codec(&self) -> &QrCodec {
        &self.codec
    }

    pub fn identifier_source(&self) -> IdentifierSource {
        self.source
    }

    /// Create an employee and give them a badge.
    ///
    /// With [`IdentifierSource::EmployeeCode`] the code is known up front (a
    /// blank one is generated), so the image is rendered first and goes out
    /// with the record in one request. With [`IdentifierSource::RecordId`]
    /// the record is created, then its server-assigned id is encoded and
    /// stored with a second request.
    pub async fn enroll(&self, mut draft: EmployeeDraft) -> BadgeResult<Enrollment> {
        draft.check().map_err(ClientError::from)?;

        match self.source {
            IdentifierSource::EmployeeCode => {
                let code = match draft.employee_code() {
                    Some(code) => code.to_string(),
                    None => generate_employee_code(now_millis()),
                };
                validate_identifier(&code).map_err(|e| BadgeError::from_codec(e, None))?;
                let image = self
                    .codec
                    .encode(&code)
                    .map_err(|e| BadgeError::from_codec(e, None))?;
                draft.employee_code = Some(code);

                let data_url = image.data_url();
                let mut employee = self
                    .client
                    .create_employee_with_code(&draft, Some(&data_url))
                    .await?;
                employee.qr_code = Some(data_url);
                tracing::info!(id = %employee.id, code = ?employee.employee_code, "employee enrolled");
                Ok(Enrollment { employee, image })
            }
            IdentifierSource::RecordId => {
                let mut employee = self.client.create_employee(&draft).await?;
                let identifier = employee.id.clone();
                let image = match self.codec.encode(&identifier) {
                    Ok(image) => image,
                    Err(e) => {
                        tracing::error!(id = %identifier, error = %e, "employee saved without a badge code");
                        return Err(BadgeError::from_codec(e, Some(employee)));
                    }
                };
                self.persist(&identifier, &image).await?;
                employee.qr_code = Some(image.data_url());
                tracing::info!(id = %employee.id, "employee enrolled");
                Ok(Enrollment { employee, image })
            }
        }
    }

    /// Re-render the badge for an existing record and store it
    pub async fn regenerate(&self, identifier: &str) -> BadgeResult<QrImage> {
        let image = self
            .codec
            .regenerate(identifier)
            .map_err(|e| BadgeError::from_codec(e, None))?;
        self.persist(identifier, &image).await?;
        Ok(image)
    }

    /// Badge for an employee record, addressed by the configured identifier
    pub async fn regenerate_for(&self, employee: &Employee) -> BadgeResult<QrImage> {
        let identifier = employee.identifier(self.source).ok_or_else(|| {
            BadgeError::InvalidIdentifier(format!("employee {} has no employee code", employee.id))
        })?;
        self.regenerate(identifier).await
    }

    /// Store an already rendered image; no re-encoding
    pub async fn persist(&self, identifier: &str, image: &QrImage) -> BadgeResult<()> {
        match self.client.save_qr_code(identifier, &image.data_url()).await {
            Ok(()) => {
                tracing::info!(identifier = %identifier, "badge code saved");
                Ok(())
            }
            Err(source) => {
                tracing::warn!(identifier = %identifier, error = %source, "badge code generated but not saved");
                Err(BadgeError::Persistence {
                    identifier: identifier.to_string(),
                    image: image.clone(),
                    source,
                })
            }
        }
    }

    /// Regenerate many badges. Rendering runs on the blocking pool; saves
    /// go out one at a time. Every identifier gets its own outcome.
    pub async fn regenerate_many(
        &self,
        identifiers: Vec<String>,
    ) -> Vec<(String, BadgeResult<QrImage>)> {
        let codec = self.codec.clone();
        let batch = identifiers.clone();
        let rendered = tokio::task::spawn_blocking(move || {
            batch
                .iter()
                .map(|id| codec.regenerate(id))
                .collect::<Vec<_>>()
        })
        .await;

        let rendered = match rendered {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::error!(error = %e, "badge rendering task failed");
                return identifiers
                    .into_iter()
                    .map(|id| {
                        let source = QrError::EncodingFailure(format!("render task failed: {e}"));
                        (id, Err(BadgeError::Encoding { saved: None, source }))
                    })
                    .collect();
            }
        };

        let mut outcomes = Vec::with_capacity(identifiers.len());
        for (identifier, result) in identifiers.into_iter().zip(rendered) {
            let outcome = match result {
                Ok(image) => self.persist(&identifier, &image).await.map(|()| image),
                Err(e) => Err(BadgeError::from_codec(e, None)),
            };
            outcomes.push((identifier, outcome));
        }

        let failed = outcomes.iter().filter(|(_, r)| r.is_err()).count();
        tracing::info!(total = outcomes.len(), failed, "batch regeneration finished");
        outcomes
    }
}
