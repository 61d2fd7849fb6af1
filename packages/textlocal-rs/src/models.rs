use serde::{Deserialize, Serialize};

/// Response from the Textlocal send endpoint.
///
/// API-level failures come back with HTTP 200 and `status: "failure"`
/// plus an `errors` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendSmsResponse {
    pub status: String,
    #[serde(default)]
    pub num_messages: Option<u32>,
    #[serde(default)]
    pub cost: Option<u32>,
    #[serde(default)]
    pub messages: Vec<SentMessage>,
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentMessage {
    pub id: String,
    pub recipient: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}
