//! Authoritative, newest-first message collection.
//!
//! Index 0 always holds the newest message and ids strictly decrease
//! towards the back. Ids come from a counter that only moves forward
//! (until [`MessageStore::reset`]), so a deleted id never reappears.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parley_common::{Cursor, Message, MessageId, Page, PAGE_SIZE};

#[derive(Debug, Clone)]
struct Entry {
    message: Message,
    /// Last edit time. Kept server-side only.
    edited_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct MessageStore {
    entries: VecDeque<Entry>,
    next_id: MessageId,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assign the next id and put the message at the head.
    pub fn append(&mut self, author: impl Into<String>, body: impl Into<String>) -> Message {
        let message = Message {
            id: self.next_id,
            author: author.into(),
            body: body.into(),
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.entries.push_front(Entry {
            message: message.clone(),
            edited_at: None,
        });
        message
    }

    pub fn delete_by_id(&mut self, id: MessageId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the body in place. `id` and `created_at` are untouched.
    pub fn edit_by_id(&mut self, id: MessageId, body: impl Into<String>) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let entry = &mut self.entries[index];
        entry.message.body = body.into();
        entry.edited_at = Some(Utc::now());
        true
    }

    /// Read one page starting at `cursor`.
    ///
    /// An anchored cursor whose message no longer exists yields an empty
    /// final page instead of an error.
    pub fn page(&self, cursor: &Cursor) -> Page {
        match *cursor {
            Cursor::End => Page::end(Vec::new()),
            Cursor::Empty => self.slice_from(0),
            Cursor::Anchored(id) => match self.position(id) {
                Some(index) => self.slice_from(index),
                None => {
                    tracing::debug!(anchor = id, "cursor anchor not found, ending pagination");
                    Page::end(Vec::new())
                }
            },
        }
    }

    /// Every message, newest first.
    pub fn all(&self) -> Vec<Message> {
        self.entries.iter().map(|e| e.message.clone()).collect()
    }

    /// Drop all messages and restart ids at 0.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.next_id = 0;
    }

    fn slice_from(&self, start: usize) -> Page {
        let stop = (start + PAGE_SIZE).min(self.entries.len());
        let messages = self
            .entries
            .range(start..stop)
            .map(|e| e.message.clone())
            .collect();
        // Only a full page can have a successor.
        let next = match self.entries.get(stop) {
            Some(entry) => Cursor::Anchored(entry.message.id),
            None => Cursor::End,
        };
        Page { messages, next }
    }

    fn position(&self, id: MessageId) -> Option<usize> {
        // Descending order: an entry with a larger id sorts before `id`.
        self.entries
            .binary_search_by(|e| id.cmp(&e.message.id))
            .ok()
    }
}
