//! Shared test utilities for the site-report workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Well-known request fixtures
//! - Temporary asset directories with generated icons and backgrounds
//! - PNG decoding helpers
//! - Skip macros for tests that need a system TrueType font
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod assets;
pub mod fixtures;
pub mod paths;

pub use assets::*;
pub use fixtures::*;
pub use paths::*;

/// Macro to skip a test if no TrueType font is installed.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_system_font;
///
/// #[test]
/// fn test_truetype_text() {
///     let font_path = require_system_font!();
///     // Test code using font_path...
/// }
/// ```
#[macro_export]
macro_rules! require_system_font {
    () => {{
        match $crate::find_system_font() {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: No TrueType font found. Set TEST_FONT to a .ttf file.");
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}
