use parley_common::MessageId;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a usable response.
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("message {0} not found")]
    NotFound(MessageId),

    #[error("server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    #[error("chat client has shut down")]
    Closed,
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}
