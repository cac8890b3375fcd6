//! Polling chat client.
//!
//! One task owns the [`Reconciler`]. It wakes on a fixed interval to fetch
//! the newest page and otherwise serves commands from [`ChatClient`]
//! handles, one at a time, so merges never interleave. View changes are
//! published on a watch channel.

use std::time::Duration;

use parley_common::{Cursor, Message, MessageId};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::reconciler::Reconciler;
use crate::transport::{ChatTransport, HttpTransport};

type Reply<T> = oneshot::Sender<Result<T, ClientError>>;

enum Command {
    PollNow(Reply<usize>),
    LoadOlder(Reply<usize>),
    Send {
        author: String,
        body: String,
        reply: Reply<usize>,
    },
    Edit {
        id: MessageId,
        body: String,
        reply: Reply<()>,
    },
    Delete {
        id: MessageId,
        reply: Reply<()>,
    },
}

/// What the client currently shows, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub messages: Vec<Message>,
    pub older_available: bool,
}

/// Handle to a running client task.
///
/// Dropping the handle stops the task. A response still in flight at that
/// point is discarded, never applied.
pub struct ChatClient {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<ViewSnapshot>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl ChatClient {
    /// Start a client against the HTTP server named in `config`.
    pub fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(&config.server_url)?;
        Ok(Self::spawn(transport, config))
    }

    /// Start the client task on the current tokio runtime. The first poll
    /// runs immediately.
    pub fn spawn<T: ChatTransport>(transport: T, config: &ClientConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (view_tx, view_rx) = watch::channel(ViewSnapshot::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let driver = Driver {
            transport,
            reconciler: Reconciler::new(),
            view: view_tx,
        };
        let task = tokio::spawn(driver.run(command_rx, shutdown_rx, config.poll_interval));

        Self {
            commands: command_tx,
            view: view_rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn view(&self) -> ViewSnapshot {
        self.view.borrow().clone()
    }

    /// Receiver that is notified whenever the view changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.view.clone()
    }

    /// Send a message and merge the newest page the server answers with.
    /// Resolves to the number of messages added to the view.
    pub async fn send(
        &self,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<usize, ClientError> {
        let (author, body) = (author.into(), body.into());
        self.request(|reply| Command::Send { author, body, reply })
            .await
    }

    /// Fetch the page just below the earliest message seen.
    pub async fn load_older(&self) -> Result<usize, ClientError> {
        self.request(Command::LoadOlder).await
    }

    /// Run a newest-page poll now instead of waiting for the timer.
    pub async fn poll_now(&self) -> Result<usize, ClientError> {
        self.request(Command::PollNow).await
    }

    /// Edit on the server, then in the view once acknowledged.
    pub async fn edit(&self, id: MessageId, body: impl Into<String>) -> Result<(), ClientError> {
        let body = body.into();
        self.request(|reply| Command::Edit { id, body, reply }).await
    }

    /// Delete on the server, then from the view once acknowledged.
    pub async fn delete(&self, id: MessageId) -> Result<(), ClientError> {
        self.request(|reply| Command::Delete { id, reply }).await
    }

    /// Stop the task and wait for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!("chat client task ended abnormally: {e}");
            }
        }
    }

    async fn request<R>(
        &self,
        make: impl FnOnce(Reply<R>) -> Command,
    ) -> Result<R, ClientError> {
        request(&self.commands, make).await
    }
}

/// Hand a command to the task and wait for its reply. A task that stops
/// before replying drops the reply sender, which reads as `Closed`.
async fn request<R>(
    commands: &mpsc::Sender<Command>,
    make: impl FnOnce(Reply<R>) -> Command,
) -> Result<R, ClientError> {
    let (tx, rx) = oneshot::channel();
    commands
        .send(make(tx))
        .await
        .map_err(|_| ClientError::Closed)?;
    rx.await.map_err(|_| ClientError::Closed)?
}

struct Driver<T> {
    transport: T,
    reconciler: Reconciler,
    view: watch::Sender<ViewSnapshot>,
}

impl<T: ChatTransport> Driver<T> {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut shutdown: oneshot::Receiver<()>,
        poll_interval: Duration,
    ) {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => break,
                        result = self.poll_newest() => {
                            if let Err(e) = result {
                                tracing::warn!("poll failed, skipping cycle: {e}");
                            }
                        }
                    }
                }
                cmd = commands.recv() => {
                    let Some(cmd) = cmd else { break };
                    tokio::select! {
                        biased;
                        _ = &mut shutdown => break,
                        _ = self.handle(cmd) => {}
                    }
                }
            }
        }
        tracing::debug!("chat client stopped");
    }

    async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::PollNow(reply) => {
                let _ = reply.send(self.poll_newest().await);
            }
            Command::LoadOlder(reply) => {
                let _ = reply.send(self.load_older().await);
            }
            Command::Send {
                author,
                body,
                reply,
            } => {
                let result = self
                    .transport
                    .send(&author, &body)
                    .await
                    .map(|page| self.absorb(page.messages));
                let _ = reply.send(result);
            }
            Command::Edit { id, body, reply } => {
                let result = self.transport.edit(id, &body).await.map(|()| {
                    if self.reconciler.apply_edit(id, body) {
                        self.publish();
                    }
                });
                let _ = reply.send(result);
            }
            Command::Delete { id, reply } => {
                let result = self.transport.delete(id).await.map(|()| {
                    if self.reconciler.apply_delete(id) {
                        self.publish();
                    }
                });
                let _ = reply.send(result);
            }
        }
    }

    /// Fetch the newest page and merge it. When more than a page arrived
    /// since the last poll, keep following cursors until the fetched
    /// pages reach the view's head so no gap opens up.
    async fn poll_newest(&mut self) -> Result<usize, ClientError> {
        let head = self.reconciler.newest_id();
        let mut page = self.transport.fetch_page(Cursor::Empty).await?;
        let mut batch = std::mem::take(&mut page.messages);

        if let Some(head) = head {
            while !page.next.is_end() && batch.last().is_some_and(|m| m.id > head) {
                tracing::debug!(next = %page.next, "catching up on missed messages");
                page = self.transport.fetch_page(page.next).await?;
                batch.append(&mut page.messages);
            }
        }
        Ok(self.absorb(batch))
    }

    async fn load_older(&mut self) -> Result<usize, ClientError> {
        let cursor = self.reconciler.older_cursor();
        if cursor.is_end() {
            return Ok(0);
        }
        let page = self.transport.fetch_page(cursor).await?;
        Ok(self.absorb(page.messages))
    }

    fn absorb(&mut self, messages: Vec<Message>) -> usize {
        let added = self.reconciler.merge(messages);
        if added > 0 {
            self.publish();
        }
        added
    }

    fn publish(&self) {
        self.view.send_replace(ViewSnapshot {
            messages: self.reconciler.snapshot(),
            older_available: self.reconciler.older_available(),
        });
    }
}
