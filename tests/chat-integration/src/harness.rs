use std::net::SocketAddr;
use std::sync::Arc;

use parley_common::api::StatusResponse;
use parley_common::Page;
use parley_server::{router, AppState};
use reqwest::Response;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::{random_message, walk_pages, FetchResult};

/// A parley server on an ephemeral localhost port, stopped on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    pub http: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    _task: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        tracing_subscriber::fmt::try_init().ok();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let app = router(Arc::new(AppState::default()));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        Self {
            addr,
            http: reqwest::Client::new(),
            shutdown: Some(shutdown_tx),
            _task: task,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url())
    }

    pub async fn get(&self, path: &str) -> Response {
        self.http
            .get(self.url(path))
            .send()
            .await
            .unwrap_or_else(|e| panic!("GET {path} failed: {e}"))
    }

    pub async fn ping(&self) -> bool {
        let resp = self.get("/ping").await;
        resp.status().is_success()
            && resp
                .json::<StatusResponse>()
                .await
                .is_ok_and(|s| s.message == "pong")
    }

    pub async fn reset(&self) {
        let resp = self.get("/reset").await;
        assert!(resp.status().is_success(), "reset failed: {}", resp.status());
    }

    /// URL of the path-segment send route, as the browser client builds it.
    pub fn send_url(&self, user: &str, message: &str) -> reqwest::Url {
        let mut url = reqwest::Url::parse(&self.base_url()).expect("base url");
        url.path_segments_mut()
            .expect("http url has a path")
            .pop_if_empty()
            .extend(["message", user, message]);
        url
    }

    pub async fn send(&self, user: &str, message: &str) -> Page {
        let resp = self
            .http
            .get(self.send_url(user, message))
            .send()
            .await
            .expect("send failed");
        assert!(resp.status().is_success(), "send failed: {}", resp.status());
        resp.json().await.expect("send response is a page")
    }

    /// Send `n` random messages concurrently.
    pub async fn send_random(&self, n: usize) {
        let mut set = tokio::task::JoinSet::new();
        for _ in 0..n {
            let (user, message) = random_message();
            let request = self.http.get(self.send_url(user, message));
            set.spawn(async move {
                let resp = request.send().await.expect("send failed");
                assert!(resp.status().is_success(), "send failed: {}", resp.status());
            });
        }
        while let Some(joined) = set.join_next().await {
            joined.expect("send task panicked");
        }
    }

    pub async fn get_page(&self, token: &str) -> Page {
        let resp = self.get(&format!("/messages/get/{token}")).await;
        assert!(resp.status().is_success(), "get page failed: {}", resp.status());
        resp.json().await.expect("page body")
    }

    pub async fn fetch_all(&self) -> FetchResult {
        walk_pages(|token| async move { self.get_page(&token).await }).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}
