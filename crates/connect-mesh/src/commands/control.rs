//! Device command handlers: power, brightness, color temperature, HSL.
//!
//! Each handler fetches the device first so capability and range checks
//! happen before anything is sent to the mesh.

use connect_mesh_core::{MeshApi, scale};

use crate::cli::{GlobalOpts, PowerArg, TemperatureArgs};
use crate::error::CliError;
use crate::output;

use super::util;

fn done(global: &GlobalOpts, message: &str) {
    output::print_success(message, output::should_color(global.color), global.quiet);
}

pub async fn power(
    api: &MeshApi,
    device_id: &str,
    state: PowerArg,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = api.get_device(device_id).await?;
    api.set_power(&device, state.is_on(), util::command_options(global))
        .await?;
    done(
        global,
        &format!("{} switched {}", device.name(), output::power_label(state.is_on(), false)),
    );
    Ok(())
}

pub async fn brightness(
    api: &MeshApi,
    device_id: &str,
    value: i64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let lightness = scale::brightness_to_api(value)?;
    let device = api.get_device(device_id).await?;
    api.set_lightness(&device, lightness, util::command_options(global))
        .await?;
    done(global, &format!("{} brightness set to {value}", device.name()));
    Ok(())
}

pub async fn temperature(
    api: &MeshApi,
    args: TemperatureArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (mesh, label) = match (args.kelvin, args.mireds) {
        (Some(kelvin), _) => (scale::kelvin_to_mesh(kelvin), format!("{kelvin}K")),
        (None, Some(mireds)) => (scale::mireds_to_mesh(mireds), format!("{mireds} mireds")),
        (None, None) => {
            return Err(CliError::Validation {
                field: "temperature".into(),
                reason: "pass --kelvin or --mireds".into(),
            });
        }
    };
    let mesh = mesh?;

    let device = api.get_device(&args.device).await?;
    api.set_temperature(&device, i64::from(mesh), util::command_options(global))
        .await?;
    done(global, &format!("{} temperature set to {label}", device.name()));
    Ok(())
}

pub async fn hsl(
    api: &MeshApi,
    device_id: &str,
    (hue, saturation, lightness): (f64, f64, f64),
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = api.get_device(device_id).await?;
    api.set_hsl(
        &device,
        hue,
        saturation,
        lightness,
        util::command_options(global),
    )
    .await?;
    done(
        global,
        &format!("{} color set to hsl({hue}, {saturation}, {lightness})", device.name()),
    );
    Ok(())
}
