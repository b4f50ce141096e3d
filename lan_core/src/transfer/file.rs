use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use crate::Event;
use crate::error::NetError;

/// Fallback output name when the operator has not supplied one before the
/// peer connects.
const FALLBACK_FILE_NAME: &str = "received.bin";

/// Stream a local file's bytes to the peer's file port.
///
/// Reads through a fixed-size buffer until EOF, half-closes, and returns the
/// number of bytes sent. No metadata travels with the bytes; the receiver
/// names the file itself.
pub async fn send_file(
    host: &str,
    port: u16,
    path: &Path,
    buffer_size: usize,
) -> Result<u64, NetError> {
    let mut stream = TcpStream::connect((host, port))
        .await
        .map_err(|source| NetError::Connect {
            addr: format!("{}:{}", host, port),
            source,
        })?;

    let mut file = File::open(path).await.map_err(|source| NetError::File {
        path: path.to_path_buf(),
        source,
    })?;

    let mut buf = vec![0u8; buffer_size];
    let mut sent: u64 = 0;
    loop {
        let n = file.read(&mut buf).await.map_err(|source| NetError::File {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        stream
            .write_all(&buf[..n])
            .await
            .map_err(|source| NetError::Send {
                addr: format!("{}:{}", host, port),
                source,
            })?;
        sent += n as u64;
    }

    stream
        .shutdown()
        .await
        .map_err(|source| NetError::Send {
            addr: format!("{}:{}", host, port),
            source,
        })?;

    tracing::info!("sent {} ({} bytes) to {}:{}", path.display(), sent, host, port);
    Ok(sent)
}

/// Long-lived listener that writes inbound file bytes to disk.
///
/// One connection per loop iteration; the output name for the next transfer
/// arrives over a watch channel from the console loop.
pub struct FileSink {
    listener: TcpListener,
    buffer_size: usize,
}

impl FileSink {
    pub async fn bind(port: u16, buffer_size: usize) -> Result<Self, NetError> {
        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|source| NetError::BindTcp { port, source })?;

        Ok(Self {
            listener,
            buffer_size,
        })
    }

    /// The port actually bound (useful when constructed with port 0).
    pub fn local_port(&self) -> std::io::Result<u16> {
        self.listener.local_addr().map(|addr| addr.port())
    }

    /// Accept loop: store each inbound connection's bytes under the name
    /// currently held by `name_rx`, forever.
    pub async fn run(
        &self,
        event_tx: mpsc::Sender<Event>,
        name_rx: watch::Receiver<Option<PathBuf>>,
        cancel: CancellationToken,
    ) {
        loop {
            let accepted = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("file sink stopping");
                    return;
                }
                result = self.listener.accept() => result,
            };

            let (stream, peer) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::error!("file accept error: {}", e);
                    continue;
                }
            };

            let output = name_rx.borrow().clone().unwrap_or_else(|| {
                tracing::warn!(
                    "no output name set before transfer from {}, using {}",
                    peer,
                    FALLBACK_FILE_NAME
                );
                PathBuf::from(FALLBACK_FILE_NAME)
            });

            match self.store(stream, &output).await {
                Ok(bytes) => {
                    tracing::info!("stored {} ({} bytes) from {}", output.display(), bytes, peer);
                    if event_tx
                        .send(Event::FileStored {
                            path: output,
                            bytes,
                        })
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
                Err(e) => {
                    tracing::error!("file receive error: {}", e);
                }
            }
        }
    }

    /// Drain one connection into `output` until the peer half-closes.
    async fn store(&self, mut stream: TcpStream, output: &Path) -> Result<u64, NetError> {
        let mut file = File::create(output).await.map_err(|source| NetError::File {
            path: output.to_path_buf(),
            source,
        })?;

        let mut buf = vec![0u8; self.buffer_size];
        let mut written: u64 = 0;
        loop {
            let n = stream.read(&mut buf).await.map_err(NetError::Recv)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])
                .await
                .map_err(|source| NetError::File {
                    path: output.to_path_buf(),
                    source,
                })?;
            written += n as u64;
        }

        file.flush().await.map_err(|source| NetError::File {
            path: output.to_path_buf(),
            source,
        })?;

        Ok(written)
    }
}
