use glam::DVec3;
use palette::{FromColor, IntoColor, Oklab, Srgb};

pub type RGBTuple = (u8, u8, u8);

/// Parses `#rrggbb` (either case) into an 8-bit triple.
pub fn hex_to_rgb_tuple(text: &str) -> Option<RGBTuple> {
    if text.len() != 7
        || !text.starts_with('#')
        || !text.chars().skip(1).all(|c: char| c.is_ascii_hexdigit())
    {
        return None;
    }
    let r: u8 = u8::from_str_radix(&text[1..3], 16).ok()?;
    let g: u8 = u8::from_str_radix(&text[3..5], 16).ok()?;
    let b: u8 = u8::from_str_radix(&text[5..7], 16).ok()?;
    Some((r, g, b))
}

/// Normalizes an 8-bit triple to [0, 1] per channel.
pub fn rgb_tuple_to_unit(rgb: RGBTuple) -> DVec3 {
    DVec3::new(rgb.0 as f64, rgb.1 as f64, rgb.2 as f64) / 255.0
}

/// Parses `#rrggbb` straight into unit RGB.
pub fn hex_to_unit_rgb(text: &str) -> Option<DVec3> {
    hex_to_rgb_tuple(text).map(rgb_tuple_to_unit)
}

/// Formats unit RGB as `#rrggbb`, clipping out-of-gamut channels first.
pub fn unit_rgb_to_hex(rgb: DVec3) -> String {
    let rgb: DVec3 = rgb.clamp(DVec3::ZERO, DVec3::ONE) * 255.0;
    format!(
        "#{:02x}{:02x}{:02x}",
        rgb.x.round() as u8,
        rgb.y.round() as u8,
        rgb.z.round() as u8
    )
}

// Perceptual coordinates are Oklab: x = lightness in [0, 1], y/z = a/b chroma axes.

/// Converts gamma-encoded sRGB in [0, 1] to perceptual coordinates.
pub fn rgb_to_perceptual(rgb: DVec3) -> DVec3 {
    let lab: Oklab<f64> = Srgb::new(rgb.x, rgb.y, rgb.z).into_color();
    DVec3::new(lab.l, lab.a, lab.b)
}

/// Converts perceptual coordinates back to sRGB, clipped to [0, 1].
pub fn perceptual_to_rgb(col: DVec3) -> DVec3 {
    let rgb: Srgb<f64> = Srgb::from_color(Oklab::new(col.x, col.y, col.z));
    DVec3::new(rgb.red, rgb.green, rgb.blue).clamp(DVec3::ZERO, DVec3::ONE)
}

pub fn perceptual_to_hex(col: DVec3) -> String {
    unit_rgb_to_hex(perceptual_to_rgb(col))
}
