//! Path utilities for locating optional test resources.

use std::path::PathBuf;

/// Searches for an installed TrueType font.
///
/// Checks `TEST_FONT` first, then common system locations.
pub fn find_system_font() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(font) = std::env::var("TEST_FONT") {
        candidates.push(PathBuf::from(font));
    }

    candidates.extend(
        [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/Library/Fonts/Arial.ttf",
        ]
        .iter()
        .map(PathBuf::from),
    );

    candidates.into_iter().find(|p| p.exists())
}
