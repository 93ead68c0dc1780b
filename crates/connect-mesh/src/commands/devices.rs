//! Device command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;

use connect_mesh_core::{Device, DeviceStatus, MeshApi};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::or_dash;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Features")]
    features: String,
}

impl From<&Arc<Device>> for DeviceRow {
    fn from(d: &Arc<Device>) -> Self {
        Self {
            id: d.id().to_owned(),
            name: d.name().to_owned(),
            dtype: d.device_type().to_string(),
            network: d.network_id().to_owned(),
            address: format!("0x{:04x}", d.unicast_address()),
            features: features(d),
        }
    }
}

fn features(d: &Device) -> String {
    let mut parts = Vec::new();
    if d.is_light() {
        parts.push("light");
    }
    if d.is_socket() {
        parts.push("socket");
    }
    if d.is_sensor() {
        parts.push("sensor");
    }
    if d.supports_color_temp() {
        parts.push("ct");
    }
    if d.supports_hsl() {
        parts.push("hsl");
    }
    if parts.is_empty() {
        "-".into()
    } else {
        parts.join(",")
    }
}

fn detail(d: &Device) -> String {
    let mut lines = vec![
        format!("ID:           {}", d.id()),
        format!("Name:         {}", d.name()),
        format!("Type:         {}", d.device_type()),
        format!("Manufacturer: {}", d.manufacturer()),
        format!("Model:        {}", d.model_name()),
        format!("Network:      {}", d.network_id()),
        format!("Unicast:      0x{:04x}", d.unicast_address()),
        format!("Bluetooth:    {}", d.bluetooth_address()),
        format!("Bootloader:   {}", d.bootloader_version()),
        format!("Elements:     {}", d.element_count()),
        format!("Features:     {}", features(d)),
    ];
    if let Some(desc) = d.description() {
        lines.push(format!("Description:  {desc}"));
    }
    lines.join("\n")
}

// ── Status view ─────────────────────────────────────────────────────

#[derive(Serialize)]
struct StatusView<'a> {
    device_id: &'a str,
    #[serde(flatten)]
    status: DeviceStatus,
    brightness: Option<u8>,
    temperature_kelvin: Option<u16>,
}

fn status_detail(view: &StatusView<'_>, color: bool) -> String {
    [
        format!("Device:      {}", view.device_id),
        format!("Power:       {}", output::power_label(view.status.power, color)),
        format!("Brightness:  {}", or_dash(view.brightness)),
        format!(
            "Temperature: {}",
            view.temperature_kelvin
                .map_or_else(|| "-".into(), |k| format!("{k}K"))
        ),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    api: &MeshApi,
    args: DevicesArgs,
    network: Option<&str>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let devices = match network {
                Some(id) => api.list_devices_for_network(id).await?,
                None => api.list_devices().await?,
            };
            let out = output::render_list(global.output, &devices, |x| DeviceRow::from(x), |d| {
                d.id().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let device = api.get_device(&device).await?;
            let out = output::render_single(global.output, &device, detail, |d| {
                d.id().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Status { device } => {
            let device = api.get_device(&device).await?;
            let status = api.get_device_status(&device).await?;
            let view = StatusView {
                device_id: device.id(),
                status,
                brightness: status.brightness(),
                temperature_kelvin: status.temperature_kelvin(),
            };
            let color = output::should_color(global.color);
            let out = output::render_single(
                global.output,
                &view,
                |v| status_detail(v, color),
                |v| output::power_label(v.status.power, false),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
