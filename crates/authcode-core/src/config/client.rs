use redact::Secret;
use serde::{Deserialize, Serialize, Serializer};

/// Confidential client registration as loaded from configuration.
///
/// Every field is optional here so that a missing value surfaces as a
/// [`ConfigurationError`](crate::ConfigurationError) with a precise message
/// instead of a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    pub id: Option<String>,
    #[serde(default, serialize_with = "redact_optional_secret")]
    pub secret: Option<Secret<String>>,
    pub redirect_url: Option<String>,
}

fn redact_optional_secret<S>(secret: &Option<Secret<String>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match secret {
        Some(_) => serializer.serialize_str("[REDACTED]"),
        None => serializer.serialize_none(),
    }
}
