//! The pending/live split every builder call goes through.

use crate::{config_tree::PendingConfig, error::MapError, transport::SessionTransport};
use log::{debug, error, warn};
use serde::Serialize;
use serde_valid::Validate;

/// One builder call, described as data.
///
/// The same value either becomes the payload of a custom message for a
/// rendered map, or is folded into the configuration of a map that has not
/// been rendered yet.
pub trait MapOperation: Serialize + Validate {
    /// Name of the custom message the browser runtime listens for.
    fn message(&self) -> &'static str;

    /// Fold the operation into a pending configuration.
    fn apply(self, config: &mut PendingConfig);
}

/// Report an operation that only makes sense on a rendered map.
pub(crate) fn live_only(operation: &'static str) {
    warn!("{}", MapError::UnsupportedContext { operation });
}

/// Wire envelope: the target widget id first, then the operation's fields.
#[derive(Serialize)]
struct Envelope<'a, O> {
    id: &'a str,
    #[serde(flatten)]
    operation: &'a O,
}

/// A rendered map reachable through a session transport.
#[derive(Clone, Copy)]
pub struct LiveHandle<'a> {
    pub map_id: &'a str,
    pub transport: &'a dyn SessionTransport,
}

impl LiveHandle<'_> {
    /// Send an operation as a custom message. Fire-and-forget: failures are
    /// logged, never returned.
    pub fn send<O: MapOperation>(&self, operation: &O) {
        let message = operation.message();
        let envelope = Envelope {
            id: self.map_id,
            operation,
        };

        let payload = match serde_json::to_value(&envelope) {
            Ok(payload) => payload,
            Err(e) => {
                error!("failed to serialize {message} for {}: {e}", self.map_id);
                return;
            }
        };

        debug!("{message} -> {}", self.map_id);

        if let Err(e) = self.transport.send_custom_message(message, payload) {
            error!("failed to send {message} to {}: {e:#}", self.map_id);
        }
    }
}

pub enum Target<'a> {
    Pending(&'a mut PendingConfig),
    Live(LiveHandle<'a>),
}

/// Anything a builder call can be aimed at.
pub trait MapTarget {
    fn map_id(&self) -> &str;

    fn target(&mut self) -> Target<'_>;

    /// Validate an operation, then send it or fold it into the pending
    /// configuration. Returns `self` unchanged for chaining.
    fn dispatch<O: MapOperation>(&mut self, operation: O) -> &mut Self {
        if let Err(errors) = operation.validate() {
            error!(
                "{}",
                MapError::invalid_input(format!("{}: {errors}", operation.message()))
            );
            return self;
        }

        match self.target() {
            Target::Live(live) => live.send(&operation),
            Target::Pending(config) => operation.apply(config),
        }

        self
    }
}
