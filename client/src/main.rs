//! Line-mode chat client.
//!
//! Plain lines are sent as messages. `/older` pulls the next page of
//! history, `/edit <id> <text>` and `/delete <id>` change a message,
//! `/quit` exits.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use parley_client::config::{DEFAULT_POLL_INTERVAL, DEFAULT_SERVER_URL};
use parley_client::{ChatClient, ClientConfig, ViewSnapshot};
use parley_common::MessageId;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parley", about = "Parley polling chat client")]
struct Cli {
    /// Name shown next to your messages.
    #[arg(long)]
    author: String,

    /// Base URL of the parley server.
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Milliseconds between polls for new messages.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL.as_millis() as u64)]
    poll_ms: u64,

    /// Log client activity to stderr. `RUST_LOG` takes precedence.
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Say(String),
    Older,
    Edit(MessageId, String),
    Delete(MessageId),
    Quit,
    Unknown(String),
}

fn parse_input(line: &str) -> Option<Input> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Some(Input::Say(line.to_string()));
    };

    let (name, rest) = command.split_once(' ').unwrap_or((command, ""));
    let rest = rest.trim();
    let input = match name {
        "older" => Input::Older,
        "quit" | "exit" => Input::Quit,
        "delete" => match rest.parse() {
            Ok(id) => Input::Delete(id),
            Err(_) => Input::Unknown(line.to_string()),
        },
        "edit" => match rest.split_once(' ') {
            Some((id, text)) if !text.trim().is_empty() => match id.parse() {
                Ok(id) => Input::Edit(id, text.trim().to_string()),
                Err(_) => Input::Unknown(line.to_string()),
            },
            _ => Input::Unknown(line.to_string()),
        },
        _ => Input::Unknown(line.to_string()),
    };
    Some(input)
}

/// Transcript order: oldest first, newest at the bottom.
fn render(view: &ViewSnapshot) -> String {
    let mut out = String::new();
    for m in view.messages.iter().rev() {
        out.push_str(&format!(
            "[{:>4}] {} {}: {}\n",
            m.id,
            m.created_at.format("%H:%M:%S"),
            m.author,
            m.body
        ));
    }
    if view.older_available {
        out.push_str("(older history loaded; /older for more)\n");
    }
    out
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ClientConfig {
        server_url: cli.server,
        poll_interval: Duration::from_millis(cli.poll_ms.max(1)),
        ..ClientConfig::default()
    };
    let client = ChatClient::connect(&config).context("failed to start client")?;

    let mut updates = client.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let view = updates.borrow_and_update().clone();
            println!("\n{}", render(&view));
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let Some(input) = parse_input(&line) else {
            continue;
        };
        let result = match input {
            Input::Say(text) => client.send(cli.author.as_str(), text).await.map(drop),
            Input::Older => client.load_older().await.map(|n| {
                if n == 0 {
                    println!("(no older messages)");
                }
            }),
            Input::Edit(id, text) => client.edit(id, text).await,
            Input::Delete(id) => client.delete(id).await,
            Input::Quit => break,
            Input::Unknown(line) => {
                println!("unknown command: {line}");
                println!("commands: /older, /edit <id> <text>, /delete <id>, /quit");
                Ok(())
            }
        };
        if let Err(e) = result {
            println!("error: {e}");
        }
    }

    client.shutdown().await;
    printer.abort();
    Ok(())
}
