use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use lan_core::transfer::{FileSink, TextListener, run_dispatch, send_text};
use lan_core::{Event, TransferConfig};

/// File-transfer assistant. Type a remote path to request the file (or a
/// directory listing); incoming requests are answered automatically from the
/// local filesystem.
#[derive(Parser)]
#[command(name = "lan-trans", version)]
struct Args {
    /// Peer host for outgoing requests
    remote_host: String,
    /// Port carrying text requests and listings
    text_port: u16,
    /// Port carrying raw file bytes
    file_port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = TransferConfig::new(args.remote_host, args.text_port, args.file_port);

    // Bind both listeners up front so startup fails loudly on a taken port.
    let text_listener = TextListener::bind(config.text_port, config.buffer_size).await?;
    let file_sink = FileSink::bind(config.file_port, config.buffer_size).await?;

    let cancel = CancellationToken::new();
    let (event_tx, mut event_rx) = mpsc::channel::<Event>(64);
    let (name_tx, name_rx) = watch::channel::<Option<PathBuf>>(None);

    let dispatch_config = config.clone();
    let dispatch_tx = event_tx.clone();
    let dispatch_cancel = cancel.clone();
    let dispatch_task = tokio::spawn(async move {
        run_dispatch(&dispatch_config, &text_listener, dispatch_tx, dispatch_cancel).await;
    });

    let sink_cancel = cancel.clone();
    let sink_task = tokio::spawn(async move {
        file_sink.run(event_tx, name_rx, sink_cancel).await;
    });

    let print_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                Event::RemoteText { text } => println!("\n{}", text),
                // sends and stores are already logged by the core loops
                _ => {}
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        println!("请输入请求：");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line? {
                Some(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    // If the request names a file, the peer streams it back
                    // to our file port; the stored copy takes the basename
                    // of the trimmed path. The request itself goes out
                    // exactly as typed.
                    if let Some(name) = Path::new(line.trim()).file_name() {
                        let _ = name_tx.send(Some(PathBuf::from(name)));
                    }

                    if let Err(e) = send_text(&config.remote_host, config.text_port, &line).await {
                        tracing::error!("request send failed: {}", e);
                    }
                }
                // stdin closed
                None => break,
            },
        }
    }

    cancel.cancel();
    let _ = dispatch_task.await;
    let _ = sink_task.await;
    let _ = print_task.await;
    Ok(())
}
