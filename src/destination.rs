use crate::audience_client::{AudienceService, MetaAudienceClient};
use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::hashing::hash_user_row;
use crate::models::{FieldSpec, FieldType, ProtocolSchema, RunResult, UserRow, ValidationResult};

/// Hashing scheme declared to the audience-matching service: SHA-256 over
/// the lowercased email address.
pub const EMAIL_HASH_SCHEMA: &str = "email-hash";

/// Identifier fields the Custom Audience API can nominally match on.
/// Only `email` feeds the current hashing logic; the rest are a documented
/// extension point (see `UserRow`).
pub const USER_IDENTIFIER_FIELDS: [&str; 8] = [
    "email",
    "phone",
    "first_name",
    "last_name",
    "city",
    "state",
    "country_code",
    "zip_code",
];

/// Meta Custom Audiences destination connector.
///
/// Transforms rows of user data into hashed email identifiers and submits
/// them to the bound custom audience in one call per batch. Generic over
/// the remote capability so tests can swap in a fake service.
pub struct Destination<C = MetaAudienceClient> {
    config: Config,
    client: C,
}

impl Destination<MetaAudienceClient> {
    /// Creates a connector bound to the audience named in `config`.
    ///
    /// Client construction failure propagates; it is not caught here.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client =
            MetaAudienceClient::new(&config).context("Initializing audience API client")?;
        Ok(Self::with_client(config, client))
    }
}

impl<C: AudienceService> Destination<C> {
    /// Advisory rows-per-invocation for the calling framework. The connector
    /// does not subdivide a larger input itself.
    pub const DEFAULT_BATCH_SIZE: usize = 1000;

    /// Creates a connector over an externally supplied audience service.
    pub fn with_client(config: Config, client: C) -> Self {
        Self { config, client }
    }

    /// Builds the hashed payload and sends it to the audience service.
    ///
    /// Row-level failures (missing/invalid email) are collected without
    /// aborting the batch. A submission-level failure marks the entire
    /// batch as failed: `successful_hits` is reset to 0 and `failed_hits`
    /// to the full row count, discarding the per-row split. Partial
    /// submission success is deliberately not tracked.
    pub async fn send_data(&self, input_data: &[UserRow], dry_run: bool) -> RunResult {
        if input_data.is_empty() {
            tracing::info!("No rows of user data to send, exiting out of destination");
            return RunResult::new(dry_run, 0, 0);
        }

        let mut user_data = Vec::with_capacity(input_data.len());
        let mut failures = Vec::new();

        tracing::info!("Processing {} user records", input_data.len());
        for (index, row) in input_data.iter().enumerate() {
            match hash_user_row(row) {
                Ok(digest) => user_data.push(digest),
                Err(reason) => {
                    let err_msg = format!("Could not process data at row '{}': {}", index, reason);
                    tracing::warn!("{}", err_msg);
                    failures.push(err_msg);
                }
            }
        }

        tracing::info!(
            "There were '{}' user rows that couldn't be processed",
            failures.len()
        );

        if dry_run {
            tracing::info!("Running as a dry run, so skipping upload steps");
            return RunResult {
                dry_run: true,
                successful_hits: user_data.len(),
                failed_hits: failures.len(),
                error_messages: failures,
            };
        }

        match self.client.add_users(EMAIL_HASH_SCHEMA, &user_data).await {
            Ok(response) => {
                tracing::info!(
                    "Successfully added {} users to the audience",
                    response.num_received
                );
                RunResult {
                    dry_run: false,
                    successful_hits: response.num_received as usize,
                    failed_hits: failures.len(),
                    error_messages: failures,
                }
            }
            Err(e) => {
                let error_msg = format!("Failed to add users to audience: {}", e);
                tracing::error!("{}", error_msg);
                failures.push(error_msg);
                RunResult {
                    dry_run: false,
                    successful_hits: 0,
                    failed_hits: input_data.len(),
                    error_messages: failures,
                }
            }
        }
    }

    /// Validates the provided config.
    ///
    /// Presence check only; no live credential check against the service.
    pub fn validate(&self) -> ValidationResult {
        let missing_fields = self.config.missing_fields();

        if missing_fields.is_empty() {
            ValidationResult::valid()
        } else {
            ValidationResult::invalid(format!(
                "Missing required fields: {}",
                missing_fields.join(", ")
            ))
        }
    }

    /// Returns the required batch size for the underlying destination API.
    pub fn batch_size(&self) -> usize {
        Self::DEFAULT_BATCH_SIZE
    }

    /// Returns the required metadata for this destination config.
    pub fn schema() -> ProtocolSchema {
        ProtocolSchema {
            name: "META_CUSTOM_AUDIENCE",
            fields: vec![
                FieldSpec {
                    name: "access_token",
                    field_type: FieldType::String,
                    description: "Meta API Access Token",
                },
                FieldSpec {
                    name: "app_secret",
                    field_type: FieldType::String,
                    description: "Meta App Secret",
                },
                FieldSpec {
                    name: "app_id",
                    field_type: FieldType::String,
                    description: "Meta App ID",
                },
                FieldSpec {
                    name: "audience_id",
                    field_type: FieldType::String,
                    description: "Custom Audience ID",
                },
            ],
        }
    }
}
