//! Pagination cursor and its string token form.
//!
//! On the wire a cursor is an opaque string. Three shapes exist:
//!
//! - `""` asks for the newest page.
//! - `"__0000000042__"` resumes at message 42 (inclusive) and walks older.
//! - `"__END__"` means there is nothing older.
//!
//! Decoding never fails. A token that is neither sentinel nor a well-formed
//! anchor decodes to [`Cursor::End`], the same outcome as an anchor whose
//! message has since been deleted.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::message::MessageId;

/// Delimiter wrapped around the anchor digits.
pub const CURSOR_DELIMITER: &str = "__";

/// Minimum width of the zero-padded anchor id.
pub const CURSOR_DIGITS: usize = 10;

/// Token for "no more older messages".
pub const END_TOKEN: &str = "__END__";

/// Token attached to the diagnostic dump of the whole store. Not a cursor.
pub const DEBUG_TOKEN: &str = "__TEST_DISABLE_IN_PRODUCTION__";

/// Resume point in the store's newest-to-oldest ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
    /// Newest page.
    #[default]
    Empty,
    /// Start at the message with this id, if it still exists.
    Anchored(MessageId),
    /// Pagination finished.
    End,
}

impl Cursor {
    pub fn encode(&self) -> String {
        match self {
            Cursor::Empty => String::new(),
            Cursor::Anchored(id) => format!(
                "{CURSOR_DELIMITER}{id:0width$}{CURSOR_DELIMITER}",
                width = CURSOR_DIGITS
            ),
            Cursor::End => END_TOKEN.to_string(),
        }
    }

    pub fn decode(token: &str) -> Self {
        if token.is_empty() {
            return Cursor::Empty;
        }
        if token == END_TOKEN {
            return Cursor::End;
        }

        let digits = token
            .strip_prefix(CURSOR_DELIMITER)
            .and_then(|rest| rest.strip_suffix(CURSOR_DELIMITER));
        match digits {
            Some(d) if !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()) => d
                .parse::<MessageId>()
                .map(Cursor::Anchored)
                .unwrap_or(Cursor::End),
            _ => Cursor::End,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Cursor::End)
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl Serialize for Cursor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token: String = Deserialize::deserialize(deserializer)?;
        Ok(Cursor::decode(&token))
    }
}
