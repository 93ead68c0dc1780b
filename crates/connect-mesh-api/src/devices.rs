// Device endpoints
//
// Listing, detail, status and the four per-device commands. Status
// reads are throttled to one per second per device.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::client::MeshClient;
use crate::error::Error;
use crate::models::{
    CommandBody, CommandOptions, CommandTarget, DeviceRecord, DeviceStatusRecord, OneOrMany,
    PowerState,
};

/// Minimum spacing between two status reads of the same device.
pub const STATUS_MIN_INTERVAL: Duration = Duration::from_secs(1);

impl MeshClient {
    /// List every device visible to the token, across all networks.
    ///
    /// `GET /devices`
    pub async fn list_devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        self.list_devices_within(None).await
    }

    /// [`list_devices`](Self::list_devices) with a per-request timeout
    /// overriding the client default.
    pub async fn list_devices_within(
        &self,
        timeout: Option<Duration>,
    ) -> Result<Vec<DeviceRecord>, Error> {
        debug!("listing devices");
        let devices: OneOrMany<DeviceRecord> = self.get("devices", timeout).await?;
        Ok(devices.into())
    }

    /// Fetch one device by its unique id.
    ///
    /// `GET /devices/{id}`
    pub async fn get_device(&self, unique_id: &str) -> Result<DeviceRecord, Error> {
        self.get_device_within(unique_id, None).await
    }

    pub async fn get_device_within(
        &self,
        unique_id: &str,
        timeout: Option<Duration>,
    ) -> Result<DeviceRecord, Error> {
        debug!(device_id = unique_id, "fetching device details");
        self.get(&format!("devices/{unique_id}"), timeout).await
    }

    /// Fetch the live status of a device.
    ///
    /// `GET /devices/{id}/status`. The reply must be a JSON object with a
    /// `state` object inside it; anything else is [`Error::Validation`].
    pub async fn get_device_status(&self, unique_id: &str) -> Result<DeviceStatusRecord, Error> {
        self.get_device_status_within(unique_id, None).await
    }

    pub async fn get_device_status_within(
        &self,
        unique_id: &str,
        timeout: Option<Duration>,
    ) -> Result<DeviceStatusRecord, Error> {
        self.limiter()
            .acquire(&format!("device_status:{unique_id}"), STATUS_MIN_INTERVAL)
            .await;

        debug!(device_id = unique_id, "fetching device status");
        let raw: Value = self
            .get(&format!("devices/{unique_id}/status"), timeout)
            .await?;

        let Value::Object(mut map) = raw else {
            return Err(Error::Validation(format!(
                "invalid status response format for device {unique_id}"
            )));
        };
        let state = match map.remove("state") {
            Some(Value::Object(state)) => state,
            Some(_) => {
                return Err(Error::Validation(format!(
                    "state is not an object in status response for device {unique_id}"
                )));
            }
            None => {
                return Err(Error::Validation(format!(
                    "missing state data in status response for device {unique_id}"
                )));
            }
        };

        Ok(DeviceStatusRecord { state, extra: map })
    }

    /// `PUT /devices/power`
    pub async fn set_power(
        &self,
        unique_id: &str,
        on: bool,
        opts: CommandOptions,
    ) -> Result<(), Error> {
        let power = PowerState::from(on);
        debug!(device_id = unique_id, ?power, "setting power");
        self.command(
            "devices/power",
            CommandTarget::Device { unique_id },
            &CommandBody::Power { power },
            opts,
        )
        .await
    }

    /// `PUT /devices/lightness` with `lightness` in `[0, 1]`.
    pub async fn set_lightness(
        &self,
        unique_id: &str,
        lightness: f64,
        opts: CommandOptions,
    ) -> Result<(), Error> {
        debug!(device_id = unique_id, lightness, "setting lightness");
        self.command(
            "devices/lightness",
            CommandTarget::Device { unique_id },
            &CommandBody::Lightness { lightness },
            opts,
        )
        .await
    }

    /// `PUT /devices/temperature` with a mesh-scale temperature.
    pub async fn set_temperature(
        &self,
        unique_id: &str,
        temperature: u16,
        opts: CommandOptions,
    ) -> Result<(), Error> {
        debug!(device_id = unique_id, temperature, "setting temperature");
        self.command(
            "devices/temperature",
            CommandTarget::Device { unique_id },
            &CommandBody::Temperature { temperature },
            opts,
        )
        .await
    }

    /// `PUT /devices/hsl`
    pub async fn set_hsl(
        &self,
        unique_id: &str,
        hue: f64,
        saturation: f64,
        lightness: f64,
        opts: CommandOptions,
    ) -> Result<(), Error> {
        debug!(device_id = unique_id, hue, saturation, lightness, "setting hsl");
        self.command(
            "devices/hsl",
            CommandTarget::Device { unique_id },
            &CommandBody::Hsl {
                hue,
                saturation,
                lightness,
            },
            opts,
        )
        .await
    }
}
