//! Client-side merge of poll and page results into one ordered view.
//!
//! The view is newest-first, strictly ordered by id, without duplicates.
//! Incoming messages can only extend it at either end: anything whose id
//! falls inside the known range is treated as already present. Edits and
//! deletes are applied by id and never go through the insertion rule.

use std::collections::VecDeque;

use parley_common::{Cursor, Message, MessageId};

/// Where [`Reconciler::insert`] put a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The view was empty.
    First,
    /// Prepended, newer than anything known.
    Newest,
    /// Appended, older than anything known.
    Oldest,
    /// Within the known range, ignored.
    Duplicate,
}

impl Insertion {
    pub fn is_inserted(self) -> bool {
        self != Insertion::Duplicate
    }
}

#[derive(Debug, Default)]
pub struct Reconciler {
    view: VecDeque<Message>,
    /// Smallest id ever offered, duplicates included.
    earliest_id: Option<MessageId>,
    older_available: bool,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Messages newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.view.iter()
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.view.iter().cloned().collect()
    }

    pub fn newest_id(&self) -> Option<MessageId> {
        self.view.front().map(|m| m.id)
    }

    pub fn oldest_id(&self) -> Option<MessageId> {
        self.view.back().map(|m| m.id)
    }

    /// Set once a message has been appended behind the known range.
    pub fn older_available(&self) -> bool {
        self.older_available
    }

    pub fn insert(&mut self, message: Message) -> Insertion {
        let id = message.id;
        self.earliest_id = Some(self.earliest_id.map_or(id, |e| e.min(id)));

        let (Some(newest), Some(oldest)) = (self.newest_id(), self.oldest_id()) else {
            self.view.push_back(message);
            return Insertion::First;
        };

        if id > newest {
            self.view.push_front(message);
            Insertion::Newest
        } else if id < oldest {
            self.view.push_back(message);
            self.older_available = true;
            Insertion::Oldest
        } else {
            Insertion::Duplicate
        }
    }

    /// Insert a batch of messages. Returns how many were new.
    ///
    /// Ids above the current head go in ascending order so each one
    /// becomes the new head in turn; the rest go in descending order so
    /// each one extends the tail.
    pub fn merge(&mut self, messages: impl IntoIterator<Item = Message>) -> usize {
        let mut batch: Vec<Message> = messages.into_iter().collect();
        batch.sort_unstable_by(|a, b| b.id.cmp(&a.id));

        let newer = match self.newest_id() {
            Some(head) => batch.iter().take_while(|m| m.id > head).count(),
            None => 0,
        };
        let older = batch.split_off(newer);

        batch
            .into_iter()
            .rev()
            .chain(older)
            .map(|m| self.insert(m))
            .filter(|outcome| outcome.is_inserted())
            .count()
    }

    /// Cursor for the next older page.
    ///
    /// Anchors one below the earliest id ever seen, so deleting the tail of
    /// the view does not move it. The anchor must still exist on the
    /// server, otherwise the server answers with an empty final page.
    pub fn older_cursor(&self) -> Cursor {
        match self.earliest_id {
            None => Cursor::Empty,
            Some(0) => Cursor::End,
            Some(earliest) => Cursor::Anchored(earliest - 1),
        }
    }

    pub fn apply_edit(&mut self, id: MessageId, body: impl Into<String>) -> bool {
        match self.view.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.body = body.into();
                true
            }
            None => false,
        }
    }

    pub fn apply_delete(&mut self, id: MessageId) -> bool {
        let before = self.view.len();
        self.view.retain(|m| m.id != id);
        self.view.len() != before
    }
}
