use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use lan_core::chat::{ChatReceiver, ChatSender};
use lan_core::{ChatConfig, DEFAULT_BUFFER_SIZE, Event};

const WAIT: Duration = Duration::from_secs(5);

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();
}

#[tokio::test]
async fn message_round_trips_byte_for_byte() -> Result<()> {
    let receiver = ChatReceiver::bind(0, DEFAULT_BUFFER_SIZE).await?;
    let port = receiver.local_port()?;
    let sender = ChatSender::new(ChatConfig::new("127.0.0.1", port, "Alice"));

    sender.send("hello").await?;

    let (from, text) = timeout(WAIT, receiver.receive()).await??;
    assert_eq!(text, "hello");
    assert!(from.ip().is_loopback());
    Ok(())
}

#[tokio::test]
async fn multibyte_utf8_survives_the_trip() -> Result<()> {
    let receiver = ChatReceiver::bind(0, DEFAULT_BUFFER_SIZE).await?;
    let port = receiver.local_port()?;
    let sender = ChatSender::new(ChatConfig::new("127.0.0.1", port, "小明"));

    let msg = "你好，世界！🦀";
    sender.send(msg).await?;

    let (_, text) = timeout(WAIT, receiver.receive()).await??;
    assert_eq!(text, msg);
    Ok(())
}

#[tokio::test]
async fn consecutive_sends_arrive_in_order() -> Result<()> {
    let receiver = ChatReceiver::bind(0, DEFAULT_BUFFER_SIZE).await?;
    let port = receiver.local_port()?;
    let sender = ChatSender::new(ChatConfig::new("127.0.0.1", port, "Alice"));

    sender.send("one").await?;
    let (first, text) = timeout(WAIT, receiver.receive()).await??;
    assert_eq!(text, "one");
    assert!(first.ip().is_loopback());

    sender.send("two").await?;
    let (_, text) = timeout(WAIT, receiver.receive()).await??;
    assert_eq!(text, "two");
    Ok(())
}

#[tokio::test]
async fn message_reaches_an_ipv6_literal_host() -> Result<()> {
    let socket = tokio::net::UdpSocket::bind("[::1]:0").await?;
    let port = socket.local_addr()?.port();
    let sender = ChatSender::new(ChatConfig::new("::1", port, "Alice"));

    sender.send("hello over v6").await?;

    let mut buf = [0u8; 64];
    let (len, from) = timeout(WAIT, socket.recv_from(&mut buf)).await??;
    assert_eq!(&buf[..len], b"hello over v6");
    assert!(from.ip().is_loopback());
    Ok(())
}

#[tokio::test]
async fn receive_loop_emits_one_event_per_datagram_and_cancels() -> Result<()> {
    init_logging();

    let receiver = ChatReceiver::bind(0, DEFAULT_BUFFER_SIZE).await?;
    let port = receiver.local_port()?;
    let sender = ChatSender::new(ChatConfig::new("127.0.0.1", port, "Alice"));

    let (event_tx, mut event_rx) = mpsc::channel::<Event>(8);
    let cancel = CancellationToken::new();
    let loop_cancel = cancel.clone();
    let task = tokio::spawn(async move {
        receiver.run(event_tx, loop_cancel).await;
    });

    sender.send("first").await?;
    sender.send("second").await?;

    for expected in ["first", "second"] {
        let event = timeout(WAIT, event_rx.recv())
            .await?
            .expect("event channel closed early");
        match event {
            Event::ChatMessage { text, .. } => assert_eq!(text, expected),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    cancel.cancel();
    timeout(WAIT, task).await??;
    Ok(())
}
