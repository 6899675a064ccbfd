//! Font resolution with a guaranteed fallback.
//!
//! Candidate TrueType files are tried in order and the first one that reads
//! and parses wins. If none do, text is drawn with the built-in bitmap font,
//! so resolving a font never fails.

pub mod bitmap;

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use rusttype::{point, Font, Scale};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};

pub use bitmap::BitmapFont;

/// A font ready to draw at one pixel size.
#[derive(Clone)]
pub enum FontHandle {
    TrueType { font: Arc<Font<'static>>, scale: Scale },
    Bitmap(BitmapFont),
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontHandle::TrueType { scale, .. } => {
                f.debug_struct("TrueType").field("size", &scale.y).finish()
            }
            FontHandle::Bitmap(font) => f.debug_tuple("Bitmap").field(font).finish(),
        }
    }
}

impl FontHandle {
    pub fn is_bitmap(&self) -> bool {
        matches!(self, FontHandle::Bitmap(_))
    }

    /// Advance width of `text` in pixels.
    pub fn text_width(&self, text: &str) -> i32 {
        match self {
            FontHandle::TrueType { font, scale } => {
                let v_metrics = font.v_metrics(*scale);
                font.layout(text, *scale, point(0.0, v_metrics.ascent))
                    .filter_map(|g| g.pixel_bounding_box())
                    .map(|bb| bb.max.x)
                    .max()
                    .unwrap_or(0)
            }
            FontHandle::Bitmap(font) => font.text_width(text) as i32,
        }
    }

    pub fn line_height(&self) -> i32 {
        match self {
            FontHandle::TrueType { scale, .. } => scale.y.ceil() as i32,
            FontHandle::Bitmap(font) => font.line_height() as i32,
        }
    }

    /// Draw `text` with its top-left corner at (x, y).
    pub fn draw_text(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        match self {
            FontHandle::TrueType { font, scale } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text);
            }
            FontHandle::Bitmap(font) => font.draw_text(canvas, color, x, y, text),
        }
    }
}

/// Ordered font lookup with a per-size handle cache.
pub struct FontCascade {
    candidates: Vec<PathBuf>,
    loaded: OnceLock<Option<Arc<Font<'static>>>>,
    handles: RwLock<HashMap<u32, FontHandle>>,
}

impl std::fmt::Debug for FontCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCascade")
            .field("candidates", &self.candidates)
            .field("loaded", &self.loaded.get().map(|font| font.is_some()))
            .finish()
    }
}

impl FontCascade {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            loaded: OnceLock::new(),
            handles: RwLock::new(HashMap::new()),
        }
    }

    /// A cascade with no candidates; always resolves to the bitmap font.
    pub fn bitmap_only() -> Self {
        Self::new(Vec::new())
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Resolve a font for `pixel_size`. Never fails.
    pub fn resolve(&self, pixel_size: f32) -> FontHandle {
        let pixel_size = if pixel_size.is_finite() {
            pixel_size.max(1.0)
        } else {
            12.0
        };
        let key = pixel_size.round() as u32;

        if let Ok(handles) = self.handles.read() {
            if let Some(handle) = handles.get(&key) {
                return handle.clone();
            }
        }

        let handle = match self.truetype() {
            Some(font) => FontHandle::TrueType {
                font,
                scale: Scale::uniform(key as f32),
            },
            None => FontHandle::Bitmap(BitmapFont::for_pixel_size(key as f32)),
        };

        // A poisoned cache only costs a re-resolve next time
        if let Ok(mut handles) = self.handles.write() {
            handles.insert(key, handle.clone());
        }

        handle
    }

    /// Whether any TrueType candidate loaded.
    pub fn has_truetype(&self) -> bool {
        self.truetype().is_some()
    }

    fn truetype(&self) -> Option<Arc<Font<'static>>> {
        self.loaded
            .get_or_init(|| {
                let font = self.candidates.iter().find_map(|path| load_font(path));
                if font.is_none() {
                    tracing::warn!(
                        candidates = self.candidates.len(),
                        "No TrueType font could be loaded, using built-in bitmap font"
                    );
                }
                font.map(Arc::new)
            })
            .clone()
    }
}

fn load_font(path: &Path) -> Option<Font<'static>> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Font candidate unavailable");
            return None;
        }
    };

    match Font::try_from_vec(bytes) {
        Some(font) => {
            tracing::info!(path = %path.display(), "Loaded font");
            Some(font)
        }
        None => {
            tracing::debug!(path = %path.display(), "Font candidate is not a valid TrueType font");
            None
        }
    }
}
