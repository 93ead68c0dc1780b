// ── Device domain types ──

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use super::device_type::{Capabilities, DeviceType, Manufacturer};

/// One addressable element of a mesh node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub device_id: String,
    pub unicast_address: u16,
    pub models: Vec<u32>,
}

/// Wall-clock instant that only moves forward.
///
/// Stored as Unix milliseconds so it can be advanced through `&self` from
/// several tasks; `touch` uses `fetch_max`, so a late writer carrying an
/// older time cannot move it backwards.
#[derive(Debug)]
pub struct Touchstamp(AtomicI64);

impl Touchstamp {
    pub fn now() -> Self {
        Self(AtomicI64::new(Utc::now().timestamp_millis()))
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        Self(AtomicI64::new(time.timestamp_millis()))
    }

    /// Advance to the current time.
    pub fn touch(&self) {
        self.advance_to(Utc::now());
    }

    pub fn advance_to(&self, time: DateTime<Utc>) {
        self.0.fetch_max(time.timestamp_millis(), Ordering::AcqRel);
    }

    pub fn get(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.0.load(Ordering::Acquire)).unwrap_or_default()
    }
}

impl Clone for Touchstamp {
    fn clone(&self) -> Self {
        Self(AtomicI64::new(self.0.load(Ordering::Acquire)))
    }
}

impl Serialize for Touchstamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

/// A mesh node, as known to the cloud.
///
/// `id` is the API's `uniqueId`, the key used by status and command
/// endpoints. Capabilities are looked up once from the type when the value
/// is built and never change afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    pub(crate) id: String,
    pub(crate) object_id: String,
    pub(crate) network_id: String,
    pub(crate) unicast_address: u16,
    pub(crate) name: String,
    pub(crate) description: Option<String>,
    pub(crate) ble_address: String,
    pub(crate) mac_bytes: String,
    pub(crate) bootloader_version: String,
    pub(crate) device_type: DeviceType,
    pub(crate) capabilities: Capabilities,
    #[serde(skip_serializing)]
    pub(crate) device_key: String,
    pub(crate) elements: Vec<Element>,
    pub(crate) last_updated: Touchstamp,
}

impl Device {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Mesh-internal object id (not accepted by the command endpoints).
    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn network_id(&self) -> &str {
        &self.network_id
    }

    pub fn unicast_address(&self) -> u16 {
        self.unicast_address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn ble_address(&self) -> &str {
        &self.ble_address
    }

    /// `aabbccddeeff` rendered as `AA:BB:CC:DD:EE:FF`.
    pub fn bluetooth_address(&self) -> String {
        let hex: Vec<char> = self
            .ble_address
            .chars()
            .filter(char::is_ascii_hexdigit)
            .collect();
        hex.chunks(2)
            .map(|pair| pair.iter().collect::<String>().to_uppercase())
            .collect::<Vec<_>>()
            .join(":")
    }

    pub fn mac_bytes(&self) -> &str {
        &self.mac_bytes
    }

    pub fn bootloader_version(&self) -> &str {
        &self.bootloader_version
    }

    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn device_key(&self) -> &str {
        &self.device_key
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn manufacturer(&self) -> Manufacturer {
        self.device_type.manufacturer()
    }

    pub fn model_name(&self) -> &'static str {
        self.device_type.model_name()
    }

    // ── Capabilities ─────────────────────────────────────────────────

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn is_light(&self) -> bool {
        self.capabilities.is_light
    }

    pub fn is_socket(&self) -> bool {
        self.capabilities.is_socket
    }

    /// Sockets are exposed as on/off switches.
    pub fn is_switch(&self) -> bool {
        self.capabilities.is_socket
    }

    pub fn is_sensor(&self) -> bool {
        self.capabilities.is_sensor
    }

    pub fn supports_color_temp(&self) -> bool {
        self.capabilities.supports_color_temp
    }

    pub fn supports_hsl(&self) -> bool {
        self.capabilities.supports_hsl
    }

    // ── Freshness ────────────────────────────────────────────────────

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated.get()
    }

    /// Mark the device as just contacted. Never moves the stamp backwards.
    pub fn touch(&self) {
        self.last_updated.touch();
    }

    pub fn last_updated_age(&self) -> Duration {
        (Utc::now() - self.last_updated()).to_std().unwrap_or_default()
    }

    /// Pull the freshness stamp up to at least `previous`'s.
    pub(crate) fn carry_stamp_from(&self, previous: &Device) {
        self.last_updated.advance_to(previous.last_updated());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn touchstamp_never_goes_backwards() {
        let later = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let stamp = Touchstamp::at(later);
        stamp.touch();
        assert_eq!(stamp.get(), later);

        let earlier = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let stamp = Touchstamp::at(earlier);
        stamp.touch();
        assert!(stamp.get() > earlier);
    }

    #[test]
    fn touchstamp_serializes_as_datetime() {
        let at = Utc.with_ymd_and_hms(2024, 10, 17, 13, 59, 36).unwrap();
        let json = serde_json::to_value(Touchstamp::at(at)).unwrap();
        assert_eq!(json, serde_json::json!("2024-10-17T13:59:36Z"));
    }
}
