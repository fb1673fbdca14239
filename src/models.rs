use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of user data to be matched against the audience.
///
/// The full identifier set mirrors what the Custom Audience API can match
/// on; only `email` is consumed by the current hashing logic. The other
/// fields are an extension point, kept so callers can pass them through
/// today and multi-key schemas can be added without changing the input
/// contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRow {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country_code: Option<String>,
    pub zip_code: Option<String>,
    /// Unrecognized input columns, tolerated and ignored.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl UserRow {
    /// Convenience constructor for a row carrying only an email address.
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }
}

/// Outcome of one `send_data` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub dry_run: bool,
    pub successful_hits: usize,
    pub failed_hits: usize,
    pub error_messages: Vec<String>,
}

impl RunResult {
    pub fn new(dry_run: bool, successful_hits: usize, failed_hits: usize) -> Self {
        Self {
            dry_run,
            successful_hits,
            failed_hits,
            error_messages: Vec::new(),
        }
    }
}

/// Outcome of a config validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error_message: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error_message: Some(message.into()),
        }
    }
}

/// Primitive type expected for a config field, for configuration tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Boolean,
}

/// One config field descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub description: &'static str,
}

/// Static declaration of the connector's required config fields,
/// consumed by external configuration-validation/UI tooling.
#[derive(Debug, Clone, Serialize)]
pub struct ProtocolSchema {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
}
