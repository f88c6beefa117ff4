//! Outbound side of a live map session.

use anyhow::{Context, Result};
#[cfg(feature = "mock")]
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Delivers named custom messages to the browser runtime of a session.
///
/// Implementations must not block: a send either queues the message or fails
/// immediately. Messages sent through one transport are delivered in order.
#[cfg_attr(feature = "mock", automock)]
pub trait SessionTransport {
    fn send_custom_message(&self, name: &str, payload: Value) -> Result<()>;
}

/// A custom message as queued for delivery.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CustomMessage {
    #[serde(rename = "type")]
    pub name: String,
    pub message: Value,
}

/// In-process transport queuing messages on an unbounded channel.
///
/// The receiving half is drained by whatever owns the session connection,
/// e.g. [`crate::centrifugo::CentrifugoPublisher`].
#[derive(Clone, Debug)]
pub struct ChannelTransport {
    tx: UnboundedSender<CustomMessage>,
}

pub fn channel() -> (ChannelTransport, UnboundedReceiver<CustomMessage>) {
    let (tx, rx) = unbounded_channel();
    (ChannelTransport { tx }, rx)
}

impl SessionTransport for ChannelTransport {
    fn send_custom_message(&self, name: &str, payload: Value) -> Result<()> {
        self.tx
            .send(CustomMessage {
                name: name.to_string(),
                message: payload,
            })
            .ok()
            .context("failed to queue message: session closed")
    }
}

impl<T: SessionTransport + ?Sized> SessionTransport for std::sync::Arc<T> {
    fn send_custom_message(&self, name: &str, payload: Value) -> Result<()> {
        (**self).send_custom_message(name, payload)
    }
}
