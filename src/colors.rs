//! Color helpers.
//!
//! Strips take 8-bit `Srgb<u8>` values. Hue math goes through palette's
//! `Hsv` so the rainbow uses the same conversion as every other palette user.

use palette::{FromColor, Hsv, Srgb};

/// All channels off.
pub const COLOR_OFF: Srgb<u8> = Srgb::new(0, 0, 0);

/// All channels at full intensity.
pub const FULL_BRIGHT: Srgb<u8> = Srgb::new(255, 255, 255);

/// One full turn of the 16-bit color wheel.
pub const WHEEL_SIZE: u32 = 65_536;

/// Creates an 8-bit RGB color from HSV components (hue in degrees).
#[inline]
pub fn hsv(hue: f32, saturation: f32, value: f32) -> Srgb<u8> {
    let hsv: Hsv = Hsv::new(hue, saturation, value);
    Srgb::<f32>::from_color(hsv).into_format()
}

/// Fully saturated color at a position on the 16-bit wheel.
///
/// Positions past one turn wrap around.
#[inline]
pub fn wheel(position: u32) -> Srgb<u8> {
    let degrees = (position % WHEEL_SIZE) as f32 * 360.0 / WHEEL_SIZE as f32;
    hsv(degrees, 1.0, 1.0)
}
