use serde::{Deserialize, Serialize};

use crate::cursor::Cursor;
use crate::message::Message;

/// Messages per page. Server and client must agree on this value because
/// cursor semantics are defined in terms of it.
pub const PAGE_SIZE: usize = 10;

/// A newest-first slice of messages plus the cursor for the next older slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub messages: Vec<Message>,
    #[serde(rename = "paginationToken")]
    pub next: Cursor,
}

impl Page {
    /// A page with no successor.
    pub fn end(messages: Vec<Message>) -> Self {
        Self {
            messages,
            next: Cursor::End,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next.is_end()
    }
}
