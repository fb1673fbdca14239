use crate::config::Config;
use crate::errors::AppError;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::time::Duration;

/// Production Graph API endpoint; overridable via config for tests/staging.
pub const DEFAULT_GRAPH_BASE_URL: &str = "https://graph.facebook.com/v19.0";

/// Successful response from the audience-matching service.
#[derive(Debug, Clone, Deserialize)]
pub struct AddUsersResponse {
    pub num_received: u64,
}

/// Narrow capability over the remote audience-matching call.
///
/// The connector only ever needs "add these hashed identifiers to the bound
/// audience, under this hashing scheme"; keeping the seam this small lets
/// tests substitute a fake without any HTTP involved.
pub trait AudienceService {
    fn add_users(
        &self,
        schema: &str,
        hashes: &[String],
    ) -> impl Future<Output = Result<AddUsersResponse, AppError>> + Send;
}

/// HTTP client for the Meta Custom Audience users endpoint.
///
/// Holds the session credentials and the bound audience ID; one instance per
/// connector, used sequentially by a single logical caller.
#[derive(Clone)]
pub struct MetaAudienceClient {
    client: Client,
    base_url: String,
    access_token: String,
    app_secret: String,
    app_id: String,
    audience_id: String,
}

impl MetaAudienceClient {
    /// Creates a new `MetaAudienceClient` from the connector config.
    ///
    /// Credential *presence* is the job of `Destination::validate`; here the
    /// fields are taken as-is so a connector over an incomplete config can
    /// still be constructed, validated, and dry-run.
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create audience client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config
                .graph_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string()),
            access_token: config.access_token.clone().unwrap_or_default(),
            app_secret: config.app_secret.clone().unwrap_or_default(),
            app_id: config.app_id.clone().unwrap_or_default(),
            audience_id: config.audience_id.clone().unwrap_or_default(),
        })
    }

    /// The audience this client is bound to.
    pub fn audience_id(&self) -> &str {
        &self.audience_id
    }

    /// The app this session was initialized for.
    #[allow(dead_code)]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }
}

impl AudienceService for MetaAudienceClient {
    /// Adds hashed users to the bound custom audience in a single call.
    async fn add_users(
        &self,
        schema: &str,
        hashes: &[String],
    ) -> Result<AddUsersResponse, AppError> {
        // Build URL with proper parameter encoding; the secret proves app
        // identity alongside the user token.
        let url = reqwest::Url::parse_with_params(
            &format!("{}/{}/users", self.base_url, self.audience_id),
            &[
                ("access_token", self.access_token.as_str()),
                ("app_secret", self.app_secret.as_str()),
            ],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        let payload = json!({
            "schema": schema,
            "data": hashes,
        });

        tracing::info!(
            "Adding {} hashed users to audience {} (schema: {})",
            hashes.len(),
            self.audience_id,
            schema
        );
        // Redact credentials from logs to prevent exposure
        tracing::debug!(
            "Audience API URL: {}/{}/users?access_token=[REDACTED]&app_secret=[REDACTED]",
            self.base_url,
            self.audience_id
        );

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Audience API request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Audience API returned error {}: {}", status, error_text);
            return Err(AppError::ExternalApiError(format!(
                "Audience API returned status {}: {}",
                status, error_text
            )));
        }

        let result: AddUsersResponse = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse Audience API response: {}", e))
        })?;

        tracing::info!(
            "Audience API accepted {} of {} users",
            result.num_received,
            hashes.len()
        );
        Ok(result)
    }
}
