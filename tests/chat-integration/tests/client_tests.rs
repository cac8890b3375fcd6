//! The polling client against a live server.

use std::time::Duration;

use parley_client::{ChatClient, ClientConfig, ClientError};
use parley_integration::TestServer;

fn config_for(server: &TestServer, poll_interval: Duration) -> ClientConfig {
    ClientConfig {
        server_url: server.base_url(),
        poll_interval,
        ..ClientConfig::default()
    }
}

#[tokio::test]
async fn sees_messages_from_other_senders() {
    let server = TestServer::start().await;
    let client = ChatClient::connect(&config_for(&server, Duration::from_secs(3600))).unwrap();

    server.send("Bob", "from elsewhere").await;
    client.poll_now().await.unwrap();

    let view = client.view();
    assert_eq!(view.messages.len(), 1);
    assert_eq!(view.messages[0].body, "from elsewhere");
    client.shutdown().await;
}

#[tokio::test]
async fn timer_poll_delivers_without_user_action() {
    let server = TestServer::start().await;
    let client = ChatClient::connect(&config_for(&server, Duration::from_millis(50))).unwrap();
    let mut updates = client.subscribe();

    server.send("Sally", "ping from the timer").await;
    tokio::time::timeout(Duration::from_secs(5), async {
        while updates.borrow_and_update().messages.is_empty() {
            updates.changed().await.unwrap();
        }
    })
    .await
    .expect("poll never delivered the message");

    client.shutdown().await;
}

#[tokio::test]
async fn full_history_through_client() {
    let server = TestServer::start().await;
    server.send_random(51).await;

    let client = ChatClient::connect(&config_for(&server, Duration::from_secs(3600))).unwrap();
    client.poll_now().await.unwrap();
    while client.load_older().await.unwrap() > 0 {}

    let ids: Vec<_> = client.view().messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, (0..51).rev().collect::<Vec<_>>());
    client.shutdown().await;
}

#[tokio::test]
async fn send_edit_delete_round_trip() {
    let server = TestServer::start().await;
    let client = ChatClient::connect(&config_for(&server, Duration::from_secs(3600))).unwrap();

    client.send("Jose", "first").await.unwrap();
    client.send("Jose", "second").await.unwrap();
    client.edit(0, "first, edited").await.unwrap();
    client.delete(1).await.unwrap();

    let view = client.view();
    assert_eq!(view.messages.len(), 1);
    assert_eq!(view.messages[0].body, "first, edited");

    let page = server.get_page("").await;
    assert_eq!(page.messages.len(), 1);
    assert_eq!(page.messages[0].body, "first, edited");

    assert!(matches!(
        client.delete(1).await,
        Err(ClientError::NotFound(1))
    ));
    assert!(matches!(
        client.edit(7, "nope").await,
        Err(ClientError::NotFound(7))
    ));
    client.shutdown().await;
}

#[tokio::test]
async fn unreachable_server_skips_polls() {
    // Bind and drop a listener to get a port nobody serves.
    let port = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = ClientConfig {
        server_url: format!("http://127.0.0.1:{port}"),
        poll_interval: Duration::from_secs(3600),
        ..ClientConfig::default()
    };
    let client = ChatClient::connect(&config).unwrap();

    assert!(matches!(
        client.poll_now().await,
        Err(ClientError::Transport(_))
    ));
    assert!(client.view().messages.is_empty());
    client.shutdown().await;
}
