use serde::{Deserialize, Serialize};
use url::Url;

/// How a successful exchange is handed back to the caller.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(tag = "mode")]
pub enum ResponseMode {
    /// `200 OK` with the token fields as a JSON body.
    #[default]
    #[serde(rename = "json")]
    Json,
    /// `302 Found` to `target`, token fields carried in the URL fragment.
    #[serde(rename = "redirect")]
    Redirect { target: Url },
}
