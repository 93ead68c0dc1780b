// ── Device status normalization ──
//
// The status endpoint returns a free-form `state` object whose keys depend
// on the device class. This module turns it into a fixed snapshot shape:
// `power` always, lightness only for lights, temperature when reported.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::model::Device;
use crate::scale;

/// Normalized state of one device, as of the last successful poll.
///
/// Levels are on the 0–65535 mesh scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub power: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lightness: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_lightness: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<u16>,
}

impl DeviceStatus {
    /// Build a snapshot from a raw `state` object.
    ///
    /// `power` may be a bool, `"on"`/`"off"`, or `1`/`0`; anything else is a
    /// validation error. Optional levels that cannot be read are dropped.
    pub fn from_state(state: &Map<String, Value>, device: &Device) -> Result<Self, CoreError> {
        let power = state
            .get("power")
            .and_then(parse_power)
            .ok_or_else(|| {
                CoreError::validation(format!(
                    "status for device {} has no usable power value",
                    device.id()
                ))
            })?;

        let (lightness, last_lightness) = if device.is_light() {
            (
                state.get("lightness").and_then(parse_level),
                state.get("lastLightness").and_then(parse_level),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            power,
            lightness,
            last_lightness,
            temperature: state.get("temperature").and_then(parse_level),
        })
    }

    /// Current lightness on the 0–255 brightness scale.
    pub fn brightness(&self) -> Option<u8> {
        self.lightness
            .and_then(|l| scale::mesh_to_brightness(i64::from(l)).ok())
    }

    /// Lightness to restore when turning the light back on.
    pub fn last_brightness(&self) -> Option<u8> {
        self.last_lightness
            .and_then(|l| scale::mesh_to_brightness(i64::from(l)).ok())
    }

    pub fn temperature_mireds(&self) -> Option<u16> {
        self.temperature
            .and_then(|t| scale::mesh_to_mireds(i64::from(t)).ok())
    }

    pub fn temperature_kelvin(&self) -> Option<u16> {
        self.temperature
            .and_then(|t| scale::mesh_to_kelvin(i64::from(t)).ok())
    }
}

fn parse_power(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(on) => Some(*on),
        Value::String(s) if s.eq_ignore_ascii_case("on") => Some(true),
        Value::String(s) if s.eq_ignore_ascii_case("off") => Some(false),
        Value::Number(n) => match n.as_u64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Integers are mesh-scale; fractions in `[0, 1]` are API lightness.
fn parse_level(value: &Value) -> Option<u16> {
    if let Some(n) = value.as_u64() {
        return u16::try_from(n).ok();
    }
    let f = value.as_f64()?;
    scale::api_to_mesh(f).ok()
}
