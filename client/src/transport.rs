//! Request/response seam between [`crate::ChatClient`] and the server.

use std::future::Future;

use parley_common::api::{EditRequest, ErrorResponse, SendRequest};
use parley_common::{Cursor, MessageId, Page};
use reqwest::{StatusCode, Url};

use crate::error::ClientError;

/// Abstraction over how the client reaches the message service.
///
/// Every call is a single stateless request; no session is negotiated.
pub trait ChatTransport: Send + Sync + 'static {
    /// Fetch one page at `cursor`.
    fn fetch_page(&self, cursor: Cursor)
        -> impl Future<Output = Result<Page, ClientError>> + Send;

    /// Append a message. Resolves to the newest page after the insert.
    fn send(
        &self,
        author: &str,
        body: &str,
    ) -> impl Future<Output = Result<Page, ClientError>> + Send;

    fn edit(
        &self,
        id: MessageId,
        body: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn delete(&self, id: MessageId) -> impl Future<Output = Result<(), ClientError>> + Send;
}

/// [`ChatTransport`] over the HTTP routes served by `parley-server`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejected cannot-be-a-base urls, so segments are always editable.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Map a non-2xx response onto [`ClientError`].
async fn check(
    resp: reqwest::Response,
    id: Option<MessageId>,
) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
        return Err(ClientError::NotFound(id));
    }
    let message = match resp.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}

impl ChatTransport for HttpTransport {
    async fn fetch_page(&self, cursor: Cursor) -> Result<Page, ClientError> {
        let url = match cursor {
            Cursor::Empty => self.endpoint(&["messages", "get"]),
            other => {
                let token = other.encode();
                self.endpoint(&["messages", "get", token.as_str()])
            }
        };
        let resp = check(self.client.get(url).send().await?, None).await?;
        Ok(resp.json().await?)
    }

    async fn send(&self, author: &str, body: &str) -> Result<Page, ClientError> {
        let req = SendRequest {
            user: author.to_string(),
            message: body.to_string(),
        };
        let resp = self
            .client
            .post(self.endpoint(&["message"]))
            .json(&req)
            .send()
            .await?;
        Ok(check(resp, None).await?.json().await?)
    }

    async fn edit(&self, id: MessageId, body: &str) -> Result<(), ClientError> {
        let req = EditRequest {
            new_message: Some(body.to_string()),
        };
        let id_segment = id.to_string();
        let resp = self
            .client
            .put(self.endpoint(&["message", "update", id_segment.as_str()]))
            .json(&req)
            .send()
            .await?;
        check(resp, Some(id)).await?;
        Ok(())
    }

    async fn delete(&self, id: MessageId) -> Result<(), ClientError> {
        let id_segment = id.to_string();
        let resp = self
            .client
            .delete(self.endpoint(&["messages", "delete", id_segment.as_str()]))
            .send()
            .await?;
        check(resp, Some(id)).await?;
        Ok(())
    }
}
