// ── Device type vocabulary ──
//
// The API tags each node with a reverse-DNS product string. The set is
// closed: anything not listed here is rejected at parse time. Capabilities
// come from a fixed lookup table keyed by variant.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Every product tag the cloud API is known to emit.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    IntoStaticStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum DeviceType {
    // LEDVANCE / Jung
    #[strum(serialize = "de.ledvance.socket")]
    #[serde(rename = "de.ledvance.socket")]
    LedvanceSocket,
    #[strum(serialize = "de.jung.socket")]
    #[serde(rename = "de.jung.socket")]
    JungSocket,

    // Nimbus
    #[strum(serialize = "de.nimbus.lighting.pad.direct")]
    #[serde(rename = "de.nimbus.lighting.pad.direct")]
    NimbusPadDirect,
    #[strum(serialize = "de.nimbus.lighting.pad.indirect")]
    #[serde(rename = "de.nimbus.lighting.pad.indirect")]
    NimbusPadIndirect,
    #[strum(serialize = "de.nimbus.leggera")]
    #[serde(rename = "de.nimbus.leggera")]
    NimbusLeggera,
    #[strum(serialize = "de.nimbus.q.classic.multiwhite")]
    #[serde(rename = "de.nimbus.q.classic.multiwhite")]
    NimbusQClassicMultiwhite,
    #[strum(serialize = "de.nimbus.q.cubic.multiwhite")]
    #[serde(rename = "de.nimbus.q.cubic.multiwhite")]
    NimbusQCubicMultiwhite,
    #[strum(serialize = "de.nimbus.q.four.multiwhite")]
    #[serde(rename = "de.nimbus.q.four.multiwhite")]
    NimbusQFourMultiwhite,
    #[strum(serialize = "de.nimbus.zen")]
    #[serde(rename = "de.nimbus.zen")]
    NimbusZen,

    // Häfele furniture fittings
    #[strum(serialize = "com.haefele.tvlift")]
    #[serde(rename = "com.haefele.tvlift")]
    HaefeleTvLift,
    #[strum(serialize = "com.haefele.motor")]
    #[serde(rename = "com.haefele.motor")]
    HaefeleMotor,
    #[strum(serialize = "com.haefele.lift.wardrobe")]
    #[serde(rename = "com.haefele.lift.wardrobe")]
    HaefeleWardrobeLift,
    #[strum(serialize = "com.haefele.pushlock")]
    #[serde(rename = "com.haefele.pushlock")]
    HaefelePushlock,
    #[strum(serialize = "com.haefele.pushlock.5s")]
    #[serde(rename = "com.haefele.pushlock.5s")]
    HaefelePushlock5s,

    // Häfele lighting
    #[strum(serialize = "com.haefele.led.rgb")]
    #[serde(rename = "com.haefele.led.rgb")]
    HaefeleLedRgb,
    #[strum(serialize = "com.haefele.led.rgb.spot")]
    #[serde(rename = "com.haefele.led.rgb.spot")]
    HaefeleLedRgbSpot,
    #[strum(serialize = "com.haefele.led.multiwhite.spot")]
    #[serde(rename = "com.haefele.led.multiwhite.spot")]
    HaefeleLedMultiwhiteSpot,
    #[strum(serialize = "com.haefele.led.multiwhite.2200K")]
    #[serde(rename = "com.haefele.led.multiwhite.2200K")]
    HaefeleLedMultiwhite2200K,
    #[strum(serialize = "com.haefele.led.multiwhite.2700K")]
    #[serde(rename = "com.haefele.led.multiwhite.2700K")]
    HaefeleLedMultiwhite2700K,
    #[strum(serialize = "com.haefele.led.multiwhite.2wire.monochrome.spot")]
    #[serde(rename = "com.haefele.led.multiwhite.2wire.monochrome.spot")]
    HaefeleLed2WireMonochromeSpot,
    #[strum(serialize = "com.haefele.led.multiwhite.2wire.monochrome.stripe")]
    #[serde(rename = "com.haefele.led.multiwhite.2wire.monochrome.stripe")]
    HaefeleLed2WireMonochromeStripe,
    #[strum(serialize = "com.haefele.led.multiwhite.2wire.mw.spot")]
    #[serde(rename = "com.haefele.led.multiwhite.2wire.mw.spot")]
    HaefeleLed2WireMultiwhiteSpot,
    #[strum(serialize = "com.haefele.led.multiwhite.2wire.mw.stripe")]
    #[serde(rename = "com.haefele.led.multiwhite.2wire.mw.stripe")]
    HaefeleLed2WireMultiwhiteStripe,
    #[strum(serialize = "com.haefele.led.white")]
    #[serde(rename = "com.haefele.led.white")]
    HaefeleLedWhite,
    #[strum(serialize = "com.haefele.led.white.strip")]
    #[serde(rename = "com.haefele.led.white.strip")]
    HaefeleLedWhiteStrip,

    // Häfele other
    #[strum(serialize = "com.haefele.socket")]
    #[serde(rename = "com.haefele.socket")]
    HaefeleSocket,
    #[strum(serialize = "com.haefele.motion.sensor")]
    #[serde(rename = "com.haefele.motion.sensor")]
    HaefeleMotionSensor,
    #[strum(serialize = "com.haefele.furniture.sensor.mains")]
    #[serde(rename = "com.haefele.furniture.sensor.mains")]
    HaefeleFurnitureSensorMains,
    #[strum(serialize = "com.haefele.furniture.sensor.battery")]
    #[serde(rename = "com.haefele.furniture.sensor.battery")]
    HaefeleFurnitureSensorBattery,
    #[strum(serialize = "com.haefele.wallcontroller.actuator")]
    #[serde(rename = "com.haefele.wallcontroller.actuator")]
    HaefeleWallController,
    #[strum(serialize = "com.haefele.q.dev.multiwhite")]
    #[serde(rename = "com.haefele.q.dev.multiwhite")]
    HaefeleQDevMultiwhite,
    #[strum(serialize = "com.haefele.q.dev.monochrome")]
    #[serde(rename = "com.haefele.q.dev.monochrome")]
    HaefeleQDevMonochrome,

    // Generic
    #[strum(serialize = "com.generic.led.multiwhite")]
    #[serde(rename = "com.generic.led.multiwhite")]
    GenericLedMultiwhite,
    #[strum(serialize = "com.generic.led.white")]
    #[serde(rename = "com.generic.led.white")]
    GenericLedWhite,
    #[strum(serialize = "com.generic.led.rgb")]
    #[serde(rename = "com.generic.led.rgb")]
    GenericLedRgb,
    #[strum(serialize = "com.generic.level")]
    #[serde(rename = "com.generic.level")]
    GenericLevel,
    #[strum(serialize = "com.nordic.devkit.level")]
    #[serde(rename = "com.nordic.devkit.level")]
    NordicDevkitLevel,
}

/// What a device type can do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Capabilities {
    pub is_light: bool,
    pub is_socket: bool,
    pub is_sensor: bool,
    pub supports_color_temp: bool,
    pub supports_hsl: bool,
}

impl Capabilities {
    const NONE: Self = Self {
        is_light: false,
        is_socket: false,
        is_sensor: false,
        supports_color_temp: false,
        supports_hsl: false,
    };
    const LIGHT: Self = Self {
        is_light: true,
        ..Self::NONE
    };
    const TUNABLE_LIGHT: Self = Self {
        supports_color_temp: true,
        ..Self::LIGHT
    };
    const COLOR_LIGHT: Self = Self {
        supports_hsl: true,
        ..Self::LIGHT
    };
    const SOCKET: Self = Self {
        is_socket: true,
        ..Self::NONE
    };
    const SENSOR: Self = Self {
        is_sensor: true,
        ..Self::NONE
    };
    const TUNABLE: Self = Self {
        supports_color_temp: true,
        ..Self::NONE
    };
}

/// Product family, derived from the tag's vendor prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Manufacturer {
    #[strum(serialize = "LEDVANCE")]
    Ledvance,
    #[strum(serialize = "JUNG")]
    Jung,
    #[strum(serialize = "Nimbus")]
    Nimbus,
    #[strum(serialize = "Häfele")]
    Haefele,
    #[strum(serialize = "Generic")]
    Generic,
    #[strum(serialize = "Unknown")]
    Unknown,
}

impl DeviceType {
    /// Capability lookup table.
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::LedvanceSocket | Self::JungSocket | Self::HaefeleSocket => Capabilities::SOCKET,

            Self::NimbusPadDirect
            | Self::NimbusPadIndirect
            | Self::NimbusLeggera
            | Self::NimbusZen
            | Self::HaefeleLedWhite
            | Self::HaefeleLedWhiteStrip
            | Self::GenericLedWhite => Capabilities::LIGHT,

            Self::NimbusQClassicMultiwhite
            | Self::NimbusQCubicMultiwhite
            | Self::NimbusQFourMultiwhite
            | Self::HaefeleLedMultiwhiteSpot
            | Self::HaefeleLedMultiwhite2200K
            | Self::HaefeleLedMultiwhite2700K
            | Self::HaefeleLed2WireMonochromeSpot
            | Self::HaefeleLed2WireMonochromeStripe
            | Self::HaefeleLed2WireMultiwhiteSpot
            | Self::HaefeleLed2WireMultiwhiteStripe
            | Self::GenericLedMultiwhite => Capabilities::TUNABLE_LIGHT,

            Self::HaefeleLedRgb | Self::HaefeleLedRgbSpot | Self::GenericLedRgb => {
                Capabilities::COLOR_LIGHT
            }

            Self::HaefeleMotionSensor
            | Self::HaefeleFurnitureSensorMains
            | Self::HaefeleFurnitureSensorBattery => Capabilities::SENSOR,

            // Development boards report color temperature without being
            // classified as lights.
            Self::HaefeleQDevMultiwhite => Capabilities::TUNABLE,

            Self::HaefeleTvLift
            | Self::HaefeleMotor
            | Self::HaefeleWardrobeLift
            | Self::HaefelePushlock
            | Self::HaefelePushlock5s
            | Self::HaefeleWallController
            | Self::HaefeleQDevMonochrome
            | Self::GenericLevel
            | Self::NordicDevkitLevel => Capabilities::NONE,
        }
    }

    pub fn manufacturer(self) -> Manufacturer {
        let tag: &'static str = self.into();
        if tag.starts_with("de.ledvance.") {
            Manufacturer::Ledvance
        } else if tag.starts_with("de.jung.") {
            Manufacturer::Jung
        } else if tag.starts_with("de.nimbus.") {
            Manufacturer::Nimbus
        } else if tag.starts_with("com.haefele.") {
            Manufacturer::Haefele
        } else if tag.starts_with("com.generic.") {
            Manufacturer::Generic
        } else {
            Manufacturer::Unknown
        }
    }

    /// The tag without its two-segment vendor prefix, e.g. `led.rgb.spot`.
    pub fn model_name(self) -> &'static str {
        let tag: &'static str = self.into();
        tag.splitn(3, '.').nth(2).unwrap_or(tag)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_tag_round_trips_through_strings() {
        for ty in DeviceType::iter() {
            let tag = ty.to_string();
            assert_eq!(DeviceType::from_str(&tag).unwrap(), ty);
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{tag}\""));
        }
        assert_eq!(DeviceType::iter().count(), 37);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(DeviceType::from_str("com.haefele.toaster").is_err());
    }

    #[test]
    fn table_agrees_with_vendor_prefixes() {
        const LIGHT: [&str; 3] = ["com.haefele.led", "com.generic.led", "de.nimbus"];
        const COLOR_TEMP: [&str; 4] = [
            "com.haefele.led.multiwhite",
            "de.nimbus.q",
            "com.haefele.q.dev.multiwhite",
            "com.generic.led.multiwhite",
        ];
        const HSL: [&str; 2] = ["com.haefele.led.rgb", "com.generic.led.rgb"];
        const SOCKET: [&str; 3] = ["de.ledvance.socket", "com.haefele.socket", "de.jung.socket"];

        for ty in DeviceType::iter() {
            let tag = ty.as_ref();
            let caps = ty.capabilities();
            let any = |prefixes: &[&str]| prefixes.iter().any(|p| tag.starts_with(p));
            assert_eq!(caps.is_light, any(&LIGHT), "{tag} is_light");
            assert_eq!(caps.supports_color_temp, any(&COLOR_TEMP), "{tag} color temp");
            assert_eq!(caps.supports_hsl, any(&HSL), "{tag} hsl");
            assert_eq!(caps.is_socket, any(&SOCKET), "{tag} socket");
            assert_eq!(caps.is_sensor, tag.contains(".sensor"), "{tag} sensor");
        }
    }

    #[test]
    fn manufacturer_and_model() {
        assert_eq!(DeviceType::LedvanceSocket.manufacturer(), Manufacturer::Ledvance);
        assert_eq!(DeviceType::NimbusZen.manufacturer(), Manufacturer::Nimbus);
        assert_eq!(DeviceType::HaefeleLedRgbSpot.manufacturer().to_string(), "Häfele");
        assert_eq!(DeviceType::NordicDevkitLevel.manufacturer(), Manufacturer::Unknown);
        assert_eq!(DeviceType::HaefeleLedRgbSpot.model_name(), "led.rgb.spot");
        assert_eq!(DeviceType::JungSocket.model_name(), "socket");
    }
}
