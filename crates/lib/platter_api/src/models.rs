//! Wire models: the response envelope and the request/response bodies.
//!
//! Every endpoint answers with the same `{httpStatusCode, message, data}`
//! envelope, for success and failure alike. Field names follow the client's
//! camelCase convention; `chatID` is an exact legacy spelling.

use serde::{Deserialize, Serialize};

use platter_core::restaurants::Restaurant;

/// Uniform response wrapper. `data` is `null` on errors.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub http_status_code: u16,
    pub message: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// A 200 envelope around `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            http_status_code: 200,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl Envelope<()> {
    /// An error envelope with no payload.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            http_status_code: status,
            message: message.into(),
            data: None,
        }
    }
}

/// `POST /chat` success payload.
#[derive(Debug, Serialize)]
pub struct SessionData {
    #[serde(rename = "chatID")]
    pub chat_id: i64,
    #[serde(rename = "placeList")]
    pub place_list: Vec<Restaurant>,
}

/// `POST /chat/chatting` request body.
#[derive(Debug, Deserialize)]
pub struct ChatTurnRequest {
    #[serde(rename = "chatID")]
    pub chat_id: i64,
    pub category: Option<Category>,
    pub chat: Option<String>,
}

/// Optional category metadata on a chat turn.
#[derive(Debug, Deserialize)]
pub struct Category {
    pub main: Option<String>,
    pub keywords: Option<String>,
}

/// `POST /chat/chatting` success payload.
#[derive(Debug, Serialize)]
pub struct ChatTurnData {
    pub chat: String,
    #[serde(rename = "placeList")]
    pub place_list: Vec<Restaurant>,
}

/// `GET /api/health` response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub db_connected: bool,
    pub version: String,
}
