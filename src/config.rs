use serde::Deserialize;

/// Config fields the connector requires before a live send, in the order
/// they are checked by `Destination::validate`.
pub const REQUIRED_CONFIG_FIELDS: [&str; 4] =
    ["access_token", "app_secret", "app_id", "audience_id"];

/// Connector configuration.
///
/// All credential fields are optional at construction time so that
/// `Destination::validate` can report exactly which ones are missing;
/// a live send with an incomplete config fails at the API boundary.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub access_token: Option<String>,
    pub app_secret: Option<String>,
    pub app_id: Option<String>,
    pub audience_id: Option<String>,
    /// Override for the Graph API base URL (tests, staging). Optional.
    pub graph_base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let read = |name: &str| {
            std::env::var(name)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let config = Self {
            access_token: read("META_ACCESS_TOKEN"),
            app_secret: read("META_APP_SECRET"),
            app_id: read("META_APP_ID"),
            audience_id: read("META_AUDIENCE_ID"),
            graph_base_url: read("META_GRAPH_BASE_URL").map(|url| {
                url.trim_end_matches('/').to_string()
            }),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Access token present: {}", config.access_token.is_some());
        tracing::debug!("App ID present: {}", config.app_id.is_some());
        if let Some(ref audience_id) = config.audience_id {
            tracing::debug!("Audience ID: {}", audience_id);
        }
        if let Some(ref base_url) = config.graph_base_url {
            tracing::info!("Graph base URL override configured: {}", base_url);
        }

        Ok(config)
    }

    /// Looks up a required field by name. Empty/blank values count as absent.
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "access_token" => self.access_token.as_deref(),
            "app_secret" => self.app_secret.as_deref(),
            "app_id" => self.app_id.as_deref(),
            "audience_id" => self.audience_id.as_deref(),
            _ => None,
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    /// Names of required fields absent from this config, in check order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        REQUIRED_CONFIG_FIELDS
            .iter()
            .copied()
            .filter(|name| self.field(name).is_none())
            .collect()
    }
}
