use std::net::IpAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::NetError;

/// Send one text message over a fresh connection.
///
/// The host may be a name or a v4/v6 literal. The payload carries no length
/// prefix; the write-side shutdown is the message boundary.
pub async fn send_text(host: &str, port: u16, content: &str) -> Result<(), NetError> {
    let mut stream = TcpStream::connect((host, port))
        .await
        .map_err(|source| NetError::Connect {
            addr: format!("{}:{}", host, port),
            source,
        })?;

    stream
        .write_all(content.as_bytes())
        .await
        .map_err(|source| NetError::Send {
            addr: format!("{}:{}", host, port),
            source,
        })?;
    stream
        .shutdown()
        .await
        .map_err(|source| NetError::Send {
            addr: format!("{}:{}", host, port),
            source,
        })?;

    Ok(())
}

/// Long-lived listener for the text channel.
///
/// Bound once; each `accept_text` call serves exactly one connection.
pub struct TextListener {
    listener: TcpListener,
    buffer_size: usize,
}

impl TextListener {
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

    /// Accept one connection, read until the peer half-closes, and return
    /// the peer's IP with the decoded text.
    ///
    /// The peer IP is what the dispatch loop replies to.
    pub async fn accept_text(&self) -> Result<(IpAddr, String), NetError> {
        let (mut stream, peer) = self.listener.accept().await.map_err(NetError::Accept)?;

        let mut data = Vec::new();
        let mut buf = vec![0u8; self.buffer_size];
        loop {
            let n = stream.read(&mut buf).await.map_err(NetError::Recv)?;
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
        }

        Ok((peer.ip(), String::from_utf8_lossy(&data).into_owned()))
    }
}
