//! Request and response bodies shared by the HTTP service and its clients.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// `POST /message` body. Both fields default to empty so a missing author
/// is reported as invalid input rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub message: String,
}

/// `PUT /message/update/{id}` body. The field is optional so a missing
/// value is reported as invalid input rather than a parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    #[serde(default)]
    pub new_message: Option<String>,
}

/// Plain acknowledgement, e.g. `{"message":"reset"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
}

impl StatusResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response of the diagnostic dump. Carries a fixed token that is not a
/// usable cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllMessagesResponse {
    pub messages: Vec<Message>,
    pub pagination_token: String,
}
