//! Static plot of the optimized biome colors.
//!
//! Three orthographic projections of the perceptual space (L-a, L-b, a-b) are
//! drawn side by side. Each biome is a marker in its own final color labelled
//! with its numeric id. The path it took during optimization is drawn in the
//! color it started with over a black under-stroke.

use crate::bresenham::bresenham_line;
use crate::colors::perceptual_to_rgb;
use crate::error::Result;
use crate::registry::BiomeRegistry;
use glam::{DVec2, DVec3};
use image::{Rgb, RgbImage};
use itertools::Itertools;
use std::path::Path;

const PANEL_SIZE: u32 = 360;
const MARGIN: f64 = 16.0;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const FRAME: Rgb<u8> = Rgb([200, 200, 200]);
const OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);

/// 3x5 bitmaps, one row per entry, high bit on the left.
const GLYPH_WIDTH: i32 = 3;
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];
const MINUS: [u8; 5] = [0b000, 0b000, 0b111, 0b000, 0b000];

/// Axis pairs for the panels, as indices into (L, a, b).
const PROJECTIONS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

fn to_pixel_color(col: DVec3) -> Rgb<u8> {
    let rgb: DVec3 = perceptual_to_rgb(col) * 255.0;
    Rgb([
        rgb.x.round() as u8,
        rgb.y.round() as u8,
        rgb.z.round() as u8,
    ])
}

/// Maps one projection of perceptual space onto a panel.
struct Panel {
    axes: (usize, usize),
    offset_x: u32,
    min: DVec2,
    scale: DVec2,
}

impl Panel {
    fn new(index: usize, axes: (usize, usize), points: &[DVec3]) -> Self {
        let project = |p: &DVec3| DVec2::new(p[axes.0], p[axes.1]);
        let (min_x, max_x) = points
            .iter()
            .map(|p| project(p).x)
            .minmax()
            .into_option()
            .unwrap_or((0.0, 1.0));
        let (min_y, max_y) = points
            .iter()
            .map(|p| project(p).y)
            .minmax()
            .into_option()
            .unwrap_or((0.0, 1.0));

        let inner: f64 = PANEL_SIZE as f64 - 2.0 * MARGIN;
        let span = DVec2::new((max_x - min_x).max(1e-6), (max_y - min_y).max(1e-6));
        Self {
            axes,
            offset_x: index as u32 * PANEL_SIZE,
            min: DVec2::new(min_x, min_y),
            scale: DVec2::splat(inner) / span,
        }
    }

    fn pixel(&self, p: DVec3) -> (i32, i32) {
        let q: DVec2 = (DVec2::new(p[self.axes.0], p[self.axes.1]) - self.min) * self.scale;
        // Image rows grow downwards
        (
            self.offset_x as i32 + (MARGIN + q.x).round() as i32,
            (PANEL_SIZE as f64 - MARGIN - q.y).round() as i32,
        )
    }

    fn draw_frame(&self, img: &mut RgbImage) {
        let left: i32 = self.offset_x as i32;
        let right: i32 = left + PANEL_SIZE as i32 - 1;
        let bottom: i32 = PANEL_SIZE as i32 - 1;
        for (a, b) in [
            ((left, 0), (right, 0)),
            ((right, 0), (right, bottom)),
            ((right, bottom), (left, bottom)),
            ((left, bottom), (left, 0)),
        ] {
            draw_line(img, a, b, FRAME);
        }
    }
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn draw_line(img: &mut RgbImage, from: (i32, i32), to: (i32, i32), color: Rgb<u8>) {
    for (x, y) in bresenham_line(from.0, from.1, to.0, to.1) {
        put(img, x, y, color);
    }
}

/// A line in `color` with a one pixel black border on every side.
fn draw_trail(img: &mut RgbImage, from: (i32, i32), to: (i32, i32), color: Rgb<u8>) {
    for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
        draw_line(img, (from.0 + dx, from.1 + dy), (to.0 + dx, to.1 + dy), OUTLINE);
    }
    draw_line(img, from, to, color);
}

fn draw_marker(img: &mut RgbImage, center: (i32, i32), color: Rgb<u8>) {
    for dy in -3i32..=3 {
        for dx in -3i32..=3 {
            let edge: bool = dx.abs() == 3 || dy.abs() == 3;
            put(
                img,
                center.0 + dx,
                center.1 + dy,
                if edge { OUTLINE } else { color },
            );
        }
    }
}

fn glyph(c: char) -> Option<[u8; 5]> {
    match c {
        '-' => Some(MINUS),
        _ => c.to_digit(10).map(|d| DIGITS[d as usize]),
    }
}

/// Writes `text` with its top-left corner at `origin`. Unknown characters are skipped.
fn draw_label(img: &mut RgbImage, origin: (i32, i32), text: &str, color: Rgb<u8>) {
    let mut x: i32 = origin.0;
    for rows in text.chars().filter_map(glyph) {
        for (dy, row) in rows.iter().enumerate() {
            for dx in 0..GLYPH_WIDTH {
                if row & (1 << (GLYPH_WIDTH - 1 - dx)) != 0 {
                    put(img, x + dx, origin.1 + dy as i32, color);
                }
            }
        }
        x += GLYPH_WIDTH + 1;
    }
}

pub fn render_plot(registry: &BiomeRegistry) -> RgbImage {
    let mut img = RgbImage::from_pixel(PANEL_SIZE * PROJECTIONS.len() as u32, PANEL_SIZE, BACKGROUND);

    let points: Vec<DVec3> = registry
        .iter()
        .flat_map(|(_, biome)| biome.history().iter().copied().chain([biome.color()]))
        .collect();

    for (index, axes) in PROJECTIONS.into_iter().enumerate() {
        let panel = Panel::new(index, axes, &points);
        panel.draw_frame(&mut img);

        for (_, biome) in registry.iter() {
            let Some(start) = biome.history().first() else {
                continue;
            };
            let trail_color: Rgb<u8> = to_pixel_color(*start);
            for (a, b) in biome
                .history()
                .iter()
                .copied()
                .chain([biome.color()])
                .tuple_windows()
            {
                draw_trail(&mut img, panel.pixel(a), panel.pixel(b), trail_color);
            }
        }

        // Markers on top of every trail
        for (_, biome) in registry.iter() {
            let center: (i32, i32) = panel.pixel(biome.color());
            draw_marker(&mut img, center, to_pixel_color(biome.color()));
            draw_label(
                &mut img,
                (center.0 + 5, center.1 - 2),
                &biome.id().to_string(),
                OUTLINE,
            );
        }
    }

    img
}

pub fn save_plot(registry: &BiomeRegistry, path: &Path) -> Result<()> {
    render_plot(registry).save(path)?;
    log::info!("Plot written to {}", path.display());
    Ok(())
}
