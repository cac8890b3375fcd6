use parley_common::{Cursor, Message, Page};
use rand::seq::SliceRandom;

pub mod harness;

pub use harness::TestServer;

const PHRASES: [&str; 8] = [
    "Hello World",
    "This is a test",
    "This is a test of the emergency broadcast system",
    "This is only a test",
    "Had this been an actual emergency",
    "You would have been instructed",
    "Where to tune in your area",
    "This concludes this test of the emergency broadcast system",
];

const USERS: [&str; 8] = ["Jose", "Bob", "Sally", "Jane", "Joe", "John", "Mary", "Sue"];

/// A random (user, message) pair from the canned test corpus.
pub fn random_message() -> (&'static str, &'static str) {
    let mut rng = rand::thread_rng();
    let user = USERS.choose(&mut rng).copied().unwrap_or("Jose");
    let message = PHRASES.choose(&mut rng).copied().unwrap_or("Hello World");
    (user, message)
}

/// Outcome of walking every page from the newest one.
#[derive(Debug, Default)]
pub struct FetchResult {
    pub messages: Vec<Message>,
    pub rounds: usize,
}

impl FetchResult {
    pub fn total(&self) -> usize {
        self.messages.len()
    }
}

/// Follow pagination tokens from the newest page until the end sentinel
/// (or an empty page). `get_page` fetches one page for a token.
pub async fn walk_pages<F, Fut>(mut get_page: F) -> FetchResult
where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = Page>,
{
    let mut result = FetchResult::default();
    let mut token = String::new();
    loop {
        let page = get_page(token).await;
        if page.messages.is_empty() {
            break;
        }
        result.rounds += 1;
        result.messages.extend(page.messages);
        if page.next == Cursor::End {
            break;
        }
        token = page.next.encode();
    }
    tracing::info!(
        "{} messages fetched in {} steps",
        result.total(),
        result.rounds
    );
    result
}

/// Panic unless ids strictly decrease.
pub fn assert_newest_first(messages: &[Message]) {
    for pair in messages.windows(2) {
        assert!(
            pair[0].id > pair[1].id,
            "expected newest first, got {} before {}",
            pair[0].id,
            pair[1].id
        );
    }
}
