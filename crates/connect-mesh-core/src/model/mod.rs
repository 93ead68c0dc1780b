// ── Domain model ──

pub mod device;
pub mod device_type;
pub mod gateway;
pub mod group;
pub mod mesh;
pub mod network;

pub use device::{Device, Element, Touchstamp};
pub use device_type::{Capabilities, DeviceType, Manufacturer};
pub use gateway::{Gateway, Scene};
pub use group::Group;
pub use mesh::{
    AddressRange, ApplicationKey, GroupAddress, MeshConfiguration, NetworkKey, Provisioner,
    SceneRange,
};
pub use network::Network;
