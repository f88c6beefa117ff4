//! One serializable descriptor per outbound message.
//!
//! Each type implements [`crate::target::MapOperation`]: its fields are the
//! message payload (camelCase on the wire) and `apply` folds it into a
//! pending configuration.

pub mod controls;
pub mod export;
pub mod layers;
pub mod panels;
pub mod routes;
pub mod sources;
pub mod view;
