// connect-mesh-api: Async Rust client for the Häfele Connect Mesh cloud API

pub mod client;
pub mod devices;
pub mod error;
pub mod groups;
pub mod models;
pub mod networks;
pub mod rate_limit;
pub mod retry;
pub mod scenes;
pub mod transport;

pub use client::{BASE_URL, MeshClient};
pub use devices::STATUS_MIN_INTERVAL;
pub use error::Error;
pub use models::{
    CommandOptions, DeviceRecord, DeviceStatusRecord, ElementRecord, GatewayRecord,
    GroupEntryRecord, GroupRecord, NetworkRecord, PowerState, SceneRecord,
};
pub use rate_limit::RateLimiter;
pub use retry::{RequestExecutor, RetryPolicy};
pub use transport::TransportConfig;
