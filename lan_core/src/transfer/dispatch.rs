//! Request dispatch for the text channel.
//!
//! There is no protocol field saying what a message means. The receiving
//! side probes the local filesystem with the text itself: an existing file
//! is a request to send that file back, an existing directory is a request
//! for a listing, anything else is content to display. The path is used
//! verbatim, with no normalization or sandboxing.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::TransferConfig;
use crate::error::NetError;
use crate::{EMPTY_FOLDER_PLACEHOLDER, Event};

use super::file::send_file;
use super::text::{TextListener, send_text};

/// What a received text resolves to on the local filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    File,
    Directory,
    Text,
}

pub async fn classify(text: &str) -> RequestKind {
    match fs::metadata(text).await {
        Ok(meta) if meta.is_file() => RequestKind::File,
        Ok(meta) if meta.is_dir() => RequestKind::Directory,
        _ => RequestKind::Text,
    }
}

/// Immediate children's names, each followed by a newline, plus the entry
/// count. An empty directory yields the fixed placeholder.
pub async fn directory_listing(path: &Path) -> Result<(String, usize), NetError> {
    let mut entries = fs::read_dir(path).await.map_err(|source| NetError::File {
        path: path.to_path_buf(),
        source,
    })?;

    let mut listing = String::new();
    let mut count = 0;
    while let Some(entry) = entries.next_entry().await.map_err(|source| NetError::File {
        path: path.to_path_buf(),
        source,
    })? {
        listing.push_str(&entry.file_name().to_string_lossy());
        listing.push('\n');
        count += 1;
    }

    if count == 0 {
        listing = EMPTY_FOLDER_PLACEHOLDER.to_string();
    }

    Ok((listing, count))
}

/// Receive loop of the text channel: accept one request, act on it, repeat.
///
/// No state is kept between iterations; the reply target is whatever peer
/// the request came from. Failures are logged and the loop continues.
pub async fn run_dispatch(
    config: &TransferConfig,
    listener: &TextListener,
    event_tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
) {
    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("dispatch loop stopping");
                return;
            }
            result = listener.accept_text() => result,
        };

        match received {
            Ok((peer, text)) => {
                if let Err(e) = handle_request(config, peer, &text, &event_tx).await {
                    tracing::error!("request from {} failed: {}", peer, e);
                }
            }
            Err(e) => {
                tracing::error!("text receive error: {}", e);
            }
        }
    }
}

async fn handle_request(
    config: &TransferConfig,
    peer: IpAddr,
    text: &str,
    event_tx: &mpsc::Sender<Event>,
) -> Result<(), NetError> {
    match classify(text).await {
        RequestKind::File => {
            let path = PathBuf::from(text);
            let bytes = send_file(
                &peer.to_string(),
                config.file_port,
                &path,
                config.buffer_size,
            )
            .await?;
            let _ = event_tx.send(Event::FileSent { path, bytes }).await;
        }
        RequestKind::Directory => {
            let path = PathBuf::from(text);
            let (listing, entries) = directory_listing(&path).await?;
            send_text(&peer.to_string(), config.text_port, &listing).await?;
            let _ = event_tx.send(Event::ListingSent { path, entries }).await;
        }
        RequestKind::Text => {
            // Not a local path, so this is the peer's answer to one of our
            // requests (a listing or any other message).
            let _ = event_tx
                .send(Event::RemoteText {
                    text: text.to_string(),
                })
                .await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn classify_distinguishes_file_dir_and_text() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("note.txt");
        tokio::fs::write(&file_path, b"hi").await.unwrap();

        assert_eq!(
            classify(file_path.to_str().unwrap()).await,
            RequestKind::File
        );
        assert_eq!(
            classify(dir.path().to_str().unwrap()).await,
            RequestKind::Directory
        );
        assert_eq!(
            classify("definitely/not/a/real/path").await,
            RequestKind::Text
        );
    }

    #[tokio::test]
    async fn listing_of_empty_directory_is_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let (listing, entries) = directory_listing(dir.path()).await.unwrap();
        assert_eq!(listing, EMPTY_FOLDER_PLACEHOLDER);
        assert_eq!(entries, 0);
    }

    #[tokio::test]
    async fn listing_joins_child_names_with_newlines() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.txt"), b"").await.unwrap();
        tokio::fs::write(dir.path().join("b.txt"), b"").await.unwrap();
        tokio::fs::create_dir(dir.path().join("sub")).await.unwrap();

        let (listing, entries) = directory_listing(dir.path()).await.unwrap();
        assert_eq!(entries, 3);

        let mut names: Vec<&str> = listing.lines().collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a.txt", "b.txt", "sub"]);
        assert!(listing.ends_with('\n'));
    }
}
