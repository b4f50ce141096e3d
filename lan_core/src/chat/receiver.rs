use std::net::SocketAddr;

use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::Event;
use crate::error::NetError;

/// Receives chat datagrams on a fixed port.
pub struct ChatReceiver {
    socket: UdpSocket,
    buffer_size: usize,
}

impl ChatReceiver {
    /// Bind the receive socket once; the run loop reuses it for every
    /// datagram.
    pub async fn bind(port: u16, buffer_size: usize) -> Result<Self, NetError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| NetError::BindUdp { port, source })?;

        Ok(Self {
            socket,
            buffer_size,
        })
    }

    /// The port actually bound (useful when constructed with port 0).
    pub fn local_port(&self) -> std::io::Result<u16> {
        self.socket.local_addr().map(|addr| addr.port())
    }

    /// Block until one datagram arrives and decode it.
    ///
    /// Bytes beyond the buffer capacity are truncated by the OS; invalid
    /// UTF-8 decodes with replacement characters rather than failing.
    pub async fn receive(&self) -> Result<(SocketAddr, String), NetError> {
        let mut buf = vec![0u8; self.buffer_size];
        let (len, from) = self
            .socket
            .recv_from(&mut buf)
            .await
            .map_err(NetError::Recv)?;

        Ok((from, String::from_utf8_lossy(&buf[..len]).into_owned()))
    }

    /// Receive loop: one `Event::ChatMessage` per datagram, forever.
    ///
    /// A failed receive is logged and the loop keeps going; nothing is ever
    /// reported as message payload on error.
    pub async fn run(&self, event_tx: mpsc::Sender<Event>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("chat receiver stopping");
                    return;
                }
                result = self.receive() => match result {
                    Ok((from, text)) => {
                        if event_tx.send(Event::ChatMessage { from, text }).await.is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::error!("chat receive error: {}", e);
                    }
                },
            }
        }
    }
}
