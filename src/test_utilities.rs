use crate::colors::RGBTuple;
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

// Fixture writers for tests that need real files in an asset directory

/// A 16x16 texture of a single opaque color.
pub fn write_solid_texture(dir: &Path, name: &str, rgb: RGBTuple) -> PathBuf {
    let image = RgbaImage::from_pixel(16, 16, Rgba([rgb.0, rgb.1, rgb.2, 255]));
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

/// A 16x16 checkerboard of opaque `rgb` and fully transparent cells.
pub fn write_checker_texture(dir: &Path, name: &str, rgb: RGBTuple) -> PathBuf {
    let first = Rgba([rgb.0, rgb.1, rgb.2, 255]);
    let second = Rgba([0, 0, 0, 0]);
    let image = RgbaImage::from_fn(16, 16, |x, y| if (x + y) % 2 == 0 { first } else { second });
    let path = dir.join(name);
    image.save(&path).unwrap();
    path
}

pub fn write_definitions(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("biome_blocks.txt");
    fs::write(&path, text).unwrap();
    path
}
