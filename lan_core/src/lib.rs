use std::net::SocketAddr;
use std::path::PathBuf;

pub mod chat;
pub mod config;
pub mod error;
pub mod transfer;

pub use config::{ChatConfig, TransferConfig};
pub use error::NetError;

/// Receive buffer capacity used when none is configured (bytes).
pub const DEFAULT_BUFFER_SIZE: usize = 16384;

/// Placeholder sent back when a requested directory has no children.
pub const EMPTY_FOLDER_PLACEHOLDER: &str = "（空文件夹）\n";

/// Report from the core loops to whoever owns the console.
///
/// Core code never prints payload itself; the binaries render these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One chat datagram arrived.
    ChatMessage { from: SocketAddr, text: String },

    /// The peer sent plain text (a directory listing or any other message
    /// that resolves to nothing on the local filesystem).
    RemoteText { text: String },

    /// A requested local file was streamed back to the peer.
    FileSent { path: PathBuf, bytes: u64 },

    /// An inbound file finished and was written locally.
    FileStored { path: PathBuf, bytes: u64 },

    /// A directory listing was sent back to the peer.
    ListingSent { path: PathBuf, entries: usize },
}
