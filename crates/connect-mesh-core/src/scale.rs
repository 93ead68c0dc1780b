// ── Scale conversions ──
//
// Pure conversions between the value scales in play:
//
// - brightness: 0–255 (UI convention)
// - lightness:  0.0–1.0 (what command endpoints accept)
// - mesh:       0–65535 (what the mesh radio carries, and what status reports)
// - mireds:     153–500 (color temperature, reciprocal megakelvin)
// - kelvin:     2000–6500 (color temperature range of the supported fixtures)
//
// Every function range-checks its input and returns `RangeError` instead of
// clamping. Rounding is half away from zero.

use thiserror::Error;

pub const BRIGHTNESS_MAX: u16 = 255;
pub const MESH_MAX: u16 = u16::MAX;
pub const MIN_MIREDS: u16 = 153;
pub const MAX_MIREDS: u16 = 500;
pub const MIN_KELVIN: u16 = 2000;
pub const MAX_KELVIN: u16 = 6500;

/// A value handed to a conversion was outside that conversion's domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{quantity} must be between {min} and {max}, got {value}")]
pub struct RangeError {
    pub quantity: &'static str,
    pub value: String,
    pub min: String,
    pub max: String,
}

impl RangeError {
    pub(crate) fn new(quantity: &'static str, value: impl ToString, min: impl ToString, max: impl ToString) -> Self {
        Self {
            quantity,
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }
}

pub(crate) fn check_int(quantity: &'static str, value: i64, min: u16, max: u16) -> Result<u16, RangeError> {
    u16::try_from(value)
        .ok()
        .filter(|v| (min..=max).contains(v))
        .ok_or_else(|| RangeError::new(quantity, value, min, max))
}

pub(crate) fn check_float(quantity: &'static str, value: f64, min: f64, max: f64) -> Result<f64, RangeError> {
    if value.is_nan() || value < min || value > max {
        return Err(RangeError::new(quantity, value, min, max));
    }
    Ok(value)
}

/// Round a value already known to lie in `[0, 65535]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
fn round_u16(value: f64) -> u16 {
    value.round() as u16
}

// ── Brightness / lightness / mesh ───────────────────────────────────

/// `brightness / 255`
pub fn brightness_to_api(brightness: i64) -> Result<f64, RangeError> {
    let b = check_int("brightness", brightness, 0, BRIGHTNESS_MAX)?;
    Ok(f64::from(b) / f64::from(BRIGHTNESS_MAX))
}

/// `round(api * 255)`
pub fn api_to_brightness(lightness: f64) -> Result<u8, RangeError> {
    let l = check_float("lightness", lightness, 0.0, 1.0)?;
    Ok(to_u8(round_u16(l * f64::from(BRIGHTNESS_MAX))))
}

/// `round(brightness / 255 * 65535)`
pub fn brightness_to_mesh(brightness: i64) -> Result<u16, RangeError> {
    let b = check_int("brightness", brightness, 0, BRIGHTNESS_MAX)?;
    Ok(round_u16(
        f64::from(b) / f64::from(BRIGHTNESS_MAX) * f64::from(MESH_MAX),
    ))
}

/// `round(mesh / 65535 * 255)`
pub fn mesh_to_brightness(mesh: i64) -> Result<u8, RangeError> {
    let m = check_int("mesh value", mesh, 0, MESH_MAX)?;
    Ok(to_u8(round_u16(
        f64::from(m) / f64::from(MESH_MAX) * f64::from(BRIGHTNESS_MAX),
    )))
}

/// `round(api * 65535)`
pub fn api_to_mesh(lightness: f64) -> Result<u16, RangeError> {
    let l = check_float("lightness", lightness, 0.0, 1.0)?;
    Ok(round_u16(l * f64::from(MESH_MAX)))
}

/// `mesh / 65535`
pub fn mesh_to_api(mesh: i64) -> Result<f64, RangeError> {
    let m = check_int("mesh value", mesh, 0, MESH_MAX)?;
    Ok(f64::from(m) / f64::from(MESH_MAX))
}

/// Percentage (0–100) to brightness (0–255).
pub fn percent_to_brightness(percent: f64) -> Result<u8, RangeError> {
    let p = check_float("percentage", percent, 0.0, 100.0)?;
    Ok(to_u8(round_u16(p / 100.0 * f64::from(BRIGHTNESS_MAX))))
}

/// Brightness (0–255) to percentage (0–100).
pub fn brightness_to_percent(brightness: i64) -> Result<f64, RangeError> {
    Ok(brightness_to_api(brightness)? * 100.0)
}

// ── Color temperature ───────────────────────────────────────────────

/// Linear map of the mesh range onto 153–500 mireds.
pub fn mesh_to_mireds(mesh: i64) -> Result<u16, RangeError> {
    let m = check_int("mesh value", mesh, 0, MESH_MAX)?;
    let span = f64::from(MAX_MIREDS - MIN_MIREDS);
    Ok(round_u16(
        f64::from(MIN_MIREDS) + f64::from(m) / f64::from(MESH_MAX) * span,
    ))
}

/// Inverse of [`mesh_to_mireds`].
pub fn mireds_to_mesh(mireds: i64) -> Result<u16, RangeError> {
    let m = check_int("mireds", mireds, MIN_MIREDS, MAX_MIREDS)?;
    let span = f64::from(MAX_MIREDS - MIN_MIREDS);
    Ok(round_u16(
        f64::from(m - MIN_MIREDS) / span * f64::from(MESH_MAX),
    ))
}

/// Linear map of 2000–6500 K onto the mesh range.
pub fn kelvin_to_mesh(kelvin: i64) -> Result<u16, RangeError> {
    let k = check_int("kelvin", kelvin, MIN_KELVIN, MAX_KELVIN)?;
    let span = f64::from(MAX_KELVIN - MIN_KELVIN);
    Ok(round_u16(
        f64::from(k - MIN_KELVIN) / span * f64::from(MESH_MAX),
    ))
}

/// Inverse of [`kelvin_to_mesh`].
pub fn mesh_to_kelvin(mesh: i64) -> Result<u16, RangeError> {
    let m = check_int("mesh value", mesh, 0, MESH_MAX)?;
    let span = f64::from(MAX_KELVIN - MIN_KELVIN);
    Ok(round_u16(
        f64::from(MIN_KELVIN) + f64::from(m) / f64::from(MESH_MAX) * span,
    ))
}

/// `round(1_000_000 / kelvin)`, defined over 2000–6500 K.
pub fn kelvin_to_mireds(kelvin: i64) -> Result<u16, RangeError> {
    let k = check_int("kelvin", kelvin, MIN_KELVIN, MAX_KELVIN)?;
    Ok(round_u16(1_000_000.0 / f64::from(k)))
}

/// `round(1_000_000 / mireds)`, defined over 153–500 mireds.
pub fn mireds_to_kelvin(mireds: i64) -> Result<u16, RangeError> {
    let m = check_int("mireds", mireds, MIN_MIREDS, MAX_MIREDS)?;
    Ok(round_u16(1_000_000.0 / f64::from(m)))
}

fn to_u8(value: u16) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}
