//! Temporary asset directories and image helpers.

use image::{ImageBuffer, Rgba, RgbaImage};
use report_common::{PanelKind, RenderConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An asset directory on disk that is removed when dropped.
pub struct TempAssets {
    dir: TempDir,
}

impl TempAssets {
    /// Empty asset directory: every resource lookup misses.
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    /// Asset directory with a background and one icon per panel.
    pub fn complete() -> Self {
        let assets = Self::empty();
        assets.write_background(320, 240);
        for kind in PanelKind::ORDER {
            assets.write_icon(kind, 64);
        }
        assets
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a solid dark-teal `background.png`.
    pub fn write_background(&self, width: u32, height: u32) -> PathBuf {
        let path = self.dir.path().join("background.png");
        solid_image(width, height, Rgba([10, 80, 90, 255]))
            .save(&path)
            .expect("failed to write background");
        path
    }

    /// Write a half-transparent circle icon for a panel.
    pub fn write_icon(&self, kind: PanelKind, size: u32) -> PathBuf {
        let icons = self.dir.path().join("icons");
        std::fs::create_dir_all(&icons).expect("failed to create icons dir");
        let path = icons.join(format!("{}.png", kind.icon_name()));
        circle_icon(size).save(&path).expect("failed to write icon");
        path
    }

    /// Write bytes that are not a valid image under `relative`.
    pub fn write_garbage(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&path, b"definitely not a png").expect("failed to write garbage");
        path
    }

    /// A render configuration pointing at this directory with no usable fonts.
    pub fn config(&self) -> RenderConfig {
        RenderConfig {
            asset_dir: self.dir.path().to_path_buf(),
            font_candidates: vec![self.dir.path().join("fonts/missing.ttf")],
            ..RenderConfig::default()
        }
    }
}

/// Image filled with one color.
pub fn solid_image(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
    ImageBuffer::from_pixel(width, height, color)
}

/// Opaque red disc on a transparent square.
pub fn circle_icon(size: u32) -> RgbaImage {
    let r = size as f32 / 2.0;
    ImageBuffer::from_fn(size, size, |x, y| {
        let dx = x as f32 + 0.5 - r;
        let dy = y as f32 + 0.5 - r;
        if dx * dx + dy * dy <= r * r {
            Rgba([220, 40, 40, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

/// Decode PNG bytes, panicking with a useful message on failure.
pub fn decode_png(bytes: &[u8]) -> RgbaImage {
    assert!(bytes.starts_with(&[137, 80, 78, 71, 13, 10, 26, 10]), "not a PNG signature");
    image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
        .expect("PNG should decode")
        .to_rgba8()
}

/// Number of distinct RGBA colors in an image.
pub fn count_colors(img: &RgbaImage) -> usize {
    let mut colors: Vec<[u8; 4]> = img.pixels().map(|p| p.0).collect();
    colors.sort_unstable();
    colors.dedup();
    colors.len()
}
