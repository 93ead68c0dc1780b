//! Domain model, typed API and polling engine for Häfele Connect Mesh.
//!
//! This crate sits between `connect-mesh-api` (HTTP and wire types) and
//! whatever embeds it (the `connect-mesh` CLI, or a home-automation host):
//!
//! - **[`MeshApi`]**: Typed operations over a shared `MeshClient`.
//!   Converts wire records into domain models and checks device
//!   capabilities and parameter ranges before any request is sent.
//!
//! - **[`DeviceCoordinator`]**: Owns one device's refresh lifecycle: a
//!   primary status poll on a fixed interval plus single-flight
//!   device-detail and discovery subtasks. State is published through a
//!   `tokio::sync::watch` channel as [`PollSnapshot`]s.
//!
//! - **[`NetworkSession`]**: One coordinator per device of a network,
//!   sharing a [`DeviceRegistry`] and a [`MeshHost`], started and stopped
//!   together.
//!
//! - **[`MeshHost`]**: The port an embedder implements: registry renames,
//!   entity creation, reauthentication.
//!
//! - **Domain model** ([`model`]) and value-scale conversions ([`scale`]).

pub mod api;
pub mod config;
pub mod convert;
pub mod coordinator;
pub mod error;
pub mod host;
pub mod model;
pub mod scale;
pub mod session;
pub mod status;
pub mod store;

#[cfg(test)]
mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use api::MeshApi;
pub use config::SessionConfig;
pub use coordinator::{DeviceCoordinator, PollOutcome, PollSnapshot};
pub use error::CoreError;
pub use host::{EntityKind, EntityRequest, MeshHost};
pub use scale::RangeError;
pub use session::NetworkSession;
pub use status::DeviceStatus;
pub use store::DeviceRegistry;

pub use connect_mesh_api::{CommandOptions, MeshClient, RetryPolicy, TransportConfig};

pub use model::{
    Capabilities, Device, DeviceType, Element, Gateway, Group, Manufacturer, MeshConfiguration,
    Network, Scene,
};
