pub mod api;
pub mod cursor;
pub mod message;
pub mod page;

pub use cursor::Cursor;
pub use message::{Message, MessageId};
pub use page::{Page, PAGE_SIZE};
