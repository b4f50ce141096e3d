use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use lan_core::chat::{ChatReceiver, ChatSender};
use lan_core::{ChatConfig, Event};

/// Two-person UDP chat: every console line goes out as one datagram, every
/// datagram received on the same port is printed with its sender's address.
#[derive(Parser)]
#[command(name = "lan-chat", version)]
struct Args {
    /// Peer host to send to
    host: String,
    /// Send destination port, also the local receive port
    port: u16,
    /// Display name
    name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = ChatConfig::new(args.host, args.port, args.name);

    let receiver = ChatReceiver::bind(config.port, config.buffer_size).await?;
    let sender = ChatSender::new(config.clone());

    println!("{} 已上线（{}:{}）", config.name, config.host, config.port);

    let cancel = CancellationToken::new();
    let (event_tx, mut event_rx) = mpsc::channel::<Event>(64);

    let recv_cancel = cancel.clone();
    let recv_task = tokio::spawn(async move {
        receiver.run(event_tx, recv_cancel).await;
    });

    let print_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if let Event::ChatMessage { from, text } = event {
                println!("\n{}说：{}", from, text);
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(msg) => {
                    match sender.send(&msg).await {
                        Ok(()) => println!("我说：{}", msg),
                        Err(e) => tracing::error!("send failed: {}", e),
                    }
                }
                // stdin closed
                None => break,
            },
        }
    }

    cancel.cancel();
    let _ = recv_task.await;
    let _ = print_task.await;
    Ok(())
}
