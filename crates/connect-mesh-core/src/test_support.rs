// Shared fixtures for unit tests.

use connect_mesh_api::{DeviceRecord, ElementRecord};

use crate::model::Device;

pub(crate) fn device_record(id: &str, network_id: &str, device_type: &str) -> DeviceRecord {
    DeviceRecord {
        network_id: network_id.into(),
        unicast_address: 2,
        id: format!("obj-{id}"),
        name: format!("Device {id}"),
        description: None,
        ble_address: "aabbccddeeff".into(),
        mac_bytes: "qrvM3e7/".into(),
        bootloader_version: "1.0.0".into(),
        device_type: device_type.into(),
        unique_id: id.into(),
        device_key: "key".into(),
        elements: vec![ElementRecord {
            device_id: format!("obj-{id}"),
            unicast_address: 2,
            models: vec![4096],
        }],
    }
}

pub(crate) fn device(id: &str, network_id: &str, device_type: &str) -> Device {
    Device::try_from(device_record(id, network_id, device_type)).expect("known device type")
}
