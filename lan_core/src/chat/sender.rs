use std::io;

use tokio::net::{UdpSocket, lookup_host};

use crate::config::ChatConfig;
use crate::error::NetError;

/// Sends chat messages to the configured peer.
pub struct ChatSender {
    config: ChatConfig,
}

impl ChatSender {
    pub fn new(config: ChatConfig) -> Self {
        Self { config }
    }

    /// Send one message as a single datagram.
    ///
    /// The host may be a name or a v4/v6 literal. A fresh socket is bound
    /// per call, so the source port is ephemeral and the receiver tags each
    /// message with it. UDP loss is silent.
    pub async fn send(&self, msg: &str) -> Result<(), NetError> {
        let host = self.config.host.as_str();
        let target = lookup_host((host, self.config.port))
            .await
            .map_err(|source| NetError::Send {
                addr: format!("{}:{}", host, self.config.port),
                source,
            })?
            .next()
            .ok_or_else(|| NetError::Send {
                addr: format!("{}:{}", host, self.config.port),
                source: io::Error::other("hostname resolved to no addresses"),
            })?;

        // The socket family has to match the resolved target.
        let bind_addr = if target.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|source| NetError::BindUdp { port: 0, source })?;

        socket
            .send_to(msg.as_bytes(), target)
            .await
            .map_err(|source| NetError::Send {
                addr: target.to_string(),
                source,
            })?;

        Ok(())
    }
}
