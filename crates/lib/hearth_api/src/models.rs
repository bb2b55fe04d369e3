//! Request and response bodies of the HTTP API.

use hearth_core::ledger::LoginRecord;
use hearth_core::preferences::Preferences;
use serde::{Deserialize, Serialize};

/// Error body returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `POST /api/chat` response. Both fields carry the same text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub response: String,
}

/// `POST /api/preferences` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceUpdateRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreferenceUpdateResponse {
    pub success: bool,
    pub preferences: Preferences,
}

/// `POST /api/login` request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub record_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRecordsResponse {
    pub total: usize,
    pub records: Vec<LoginRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentLoginRecordsResponse {
    pub showing: usize,
    pub total: usize,
    pub records: Vec<LoginRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearLoginRecordsResponse {
    pub success: bool,
    pub message: String,
}
