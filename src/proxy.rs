//! Maps that are already rendered in a browser session.

use crate::{
    target::{LiveHandle, MapTarget, Target},
    transport::SessionTransport,
};

/// Handle on a rendered map. Holds no map state: every builder call becomes
/// one custom message on the session transport.
#[derive(Clone, Debug)]
pub struct MapProxy<T> {
    map_id: String,
    transport: T,
}

impl<T: SessionTransport> MapProxy<T> {
    pub fn new(map_id: impl Into<String>, transport: T) -> Self {
        Self {
            map_id: map_id.into(),
            transport,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: SessionTransport> MapTarget for MapProxy<T> {
    fn map_id(&self) -> &str {
        &self.map_id
    }

    fn target(&mut self) -> Target<'_> {
        Target::Live(LiveHandle {
            map_id: &self.map_id,
            transport: &self.transport,
        })
    }
}
