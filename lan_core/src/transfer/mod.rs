//! TCP-based file/directory transfer.
//!
//! Two channels, both carrying raw bytes with no framing:
//! - text channel: one connection is one UTF-8 request or listing, the
//!   message boundary is the sender's write-close
//! - file channel: one connection is one file
//!
//! What happens to a received text is decided by probing the local
//! filesystem, see [`dispatch`].

pub mod dispatch;
pub mod file;
pub mod text;

pub use dispatch::{RequestKind, classify, run_dispatch};
pub use file::{FileSink, send_file};
pub use text::{TextListener, send_text};
