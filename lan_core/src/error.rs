use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from the socket and file operations in this crate.
///
/// Run loops log these and keep going; one-shot operations hand them to the
/// caller.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("failed to bind UDP port {port}")]
    BindUdp {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("failed to bind TCP port {port}")]
    BindTcp {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("failed to connect to {addr}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("send to {addr} failed")]
    Send {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("receive failed")]
    Recv(#[source] io::Error),

    #[error("failed to accept connection")]
    Accept(#[source] io::Error),

    #[error("file operation on {} failed", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
