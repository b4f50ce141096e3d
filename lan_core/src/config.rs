use crate::DEFAULT_BUFFER_SIZE;

/// Settings for the UDP chat tool.
///
/// Immutable once built; both the send and receive loops read from the same
/// value, so there is no cross-task mutation to coordinate.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Peer host the sender targets.
    pub host: String,
    /// Port used both as the send destination and the local receive port.
    pub port: u16,
    /// Display name, shown in the startup banner.
    pub name: String,
    /// Datagram receive buffer capacity.
    pub buffer_size: usize,
}

impl ChatConfig {
    pub fn new(host: impl Into<String>, port: u16, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            name: name.into(),
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Settings for the TCP file-transfer tool.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Default peer for outgoing requests typed at the console.
    pub remote_host: String,
    /// Port carrying text requests and listings.
    pub text_port: u16,
    /// Port carrying raw file bytes.
    pub file_port: u16,
    /// Chunk size for the file streaming loops.
    pub buffer_size: usize,
}

impl TransferConfig {
    pub fn new(remote_host: impl Into<String>, text_port: u16, file_port: u16) -> Self {
        Self {
            remote_host: remote_host.into(),
            text_port,
            file_port,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}
