//! Server-side builder for browser map widgets.
//!
//! The same chain of [`MapBuilder`] calls configures a [`MapWidget`] before
//! first render or updates an already rendered map through a [`MapProxy`].

pub mod builder;
pub mod centrifugo;
pub mod command;
pub mod config;
pub mod config_tree;
pub mod control;
pub mod error;
pub mod expression;
pub mod feature;
pub mod filter;
pub mod operations;
pub mod proxy;
pub mod target;
pub mod transport;
pub mod widget;

pub use builder::MapBuilder;
pub use command::MapCommand;
pub use config_tree::{MapOptions, PendingConfig};
pub use error::MapError;
pub use proxy::MapProxy;
pub use target::{MapTarget, Target};
pub use widget::{MapWidget, WidgetPayload};
