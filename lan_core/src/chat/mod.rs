//! UDP-based two-person chat.
//!
//! One datagram carries one message, raw UTF-8, no framing. The sender and
//! receiver run as independent loops and share nothing but the config.

pub mod receiver;
pub mod sender;

pub use receiver::ChatReceiver;
pub use sender::ChatSender;
