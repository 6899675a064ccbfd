//! Lossless PNG encoding for composed reports.
//!
//! The encoder picks the smallest exact representation:
//! - **Indexed (color type 3)** when the image has at most 256 distinct colors
//! - **Truecolor (color type 2)** when every pixel is opaque
//! - **RGBA (color type 6)** otherwise

use image::RgbaImage;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::Write;
use thiserror::Error;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for an indexed PNG
const MAX_PALETTE_SIZE: usize = 256;

/// Pixel count above which palette extraction runs on the rayon pool
const PARALLEL_THRESHOLD: usize = 4096;

/// Pixels per parallel chunk. Fixed so the palette order does not depend on
/// the thread count.
const CHUNK_PIXELS: usize = 16 * 1024;

#[derive(Debug, Error)]
pub enum PngError {
    #[error("Cannot encode empty {width}x{height} image")]
    EmptyImage { width: u32, height: u32 },

    #[error("IDAT compression failed: {0}")]
    Compression(#[from] std::io::Error),
}

/// PNG color type chosen for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngColorType {
    Indexed,
    Truecolor,
    TruecolorAlpha,
}

impl PngColorType {
    fn code(&self) -> u8 {
        match self {
            PngColorType::Truecolor => 2,
            PngColorType::Indexed => 3,
            PngColorType::TruecolorAlpha => 6,
        }
    }
}

/// Encode `img` as PNG, choosing the color type automatically.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, PngError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(PngError::EmptyImage { width, height });
    }

    let pixels = img.as_raw();
    let palette = if (width as usize) * (height as usize) > PARALLEL_THRESHOLD {
        extract_palette_parallel(pixels)
    } else {
        extract_palette_sequential(pixels)
    };

    if let Some(palette) = palette {
        return encode_indexed(width, height, &palette);
    }

    if pixels.chunks_exact(4).all(|p| p[3] == 255) {
        let rgb: Vec<u8> = pixels
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect();
        encode_raw(width, height, PngColorType::Truecolor, &rgb, 3)
    } else {
        encode_raw(width, height, PngColorType::TruecolorAlpha, pixels, 4)
    }
}

/// Color type `encode_png` would pick for `img`.
pub fn select_color_type(img: &RgbaImage) -> PngColorType {
    let distinct: HashSet<u32> = img.pixels().map(|p| pack(p.0)).collect();
    if distinct.len() <= MAX_PALETTE_SIZE {
        PngColorType::Indexed
    } else if img.pixels().all(|p| p[3] == 255) {
        PngColorType::Truecolor
    } else {
        PngColorType::TruecolorAlpha
    }
}

/// Palette entries in first-seen order plus one index per pixel.
struct Palette {
    colors: Vec<[u8; 4]>,
    indices: Vec<u8>,
}

#[inline(always)]
fn pack(c: [u8; 4]) -> u32 {
    u32::from_le_bytes(c)
}

fn extract_palette_sequential(pixels: &[u8]) -> Option<Palette> {
    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut colors = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for p in pixels.chunks_exact(4) {
        let c = [p[0], p[1], p[2], p[3]];
        let index = match lookup.get(&pack(c)) {
            Some(&i) => i,
            None => {
                if colors.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let i = colors.len() as u8;
                colors.push(c);
                lookup.insert(pack(c), i);
                i
            }
        };
        indices.push(index);
    }

    Some(Palette { colors, indices })
}

/// Two parallel passes: collect distinct colors per chunk, then map pixels.
fn extract_palette_parallel(pixels: &[u8]) -> Option<Palette> {
    let per_chunk: Vec<Option<HashSet<u32>>> = pixels
        .par_chunks(CHUNK_PIXELS * 4)
        .map(|chunk| {
            let mut seen = HashSet::with_capacity(MAX_PALETTE_SIZE);
            for p in chunk.chunks_exact(4) {
                seen.insert(pack([p[0], p[1], p[2], p[3]]));
                if seen.len() > MAX_PALETTE_SIZE {
                    return None;
                }
            }
            Some(seen)
        })
        .collect();

    let mut lookup: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut colors = Vec::with_capacity(MAX_PALETTE_SIZE);
    for seen in per_chunk {
        let mut seen: Vec<u32> = seen?.into_iter().collect();
        seen.sort_unstable();
        for packed in seen {
            if lookup.contains_key(&packed) {
                continue;
            }
            if colors.len() >= MAX_PALETTE_SIZE {
                return None;
            }
            lookup.insert(packed, colors.len() as u8);
            colors.push(packed.to_le_bytes());
        }
    }

    let indices = pixels
        .par_chunks_exact(4)
        .map(|p| lookup.get(&pack([p[0], p[1], p[2], p[3]])).copied().unwrap_or(0))
        .collect();

    Some(Palette { colors, indices })
}

fn encode_indexed(width: u32, height: u32, palette: &Palette) -> Result<Vec<u8>, PngError> {
    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, PngColorType::Indexed));

    let plte: Vec<u8> = palette.colors.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    // tRNS may stop after the last non-opaque entry
    if let Some(last) = palette.colors.iter().rposition(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.colors[..=last].iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(&palette.indices, width as usize, height as usize)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn encode_raw(
    width: u32,
    height: u32,
    color_type: PngColorType,
    samples: &[u8],
    bytes_per_pixel: usize,
) -> Result<Vec<u8>, PngError> {
    let mut png = Vec::new();
    png.extend_from_slice(&SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, color_type));

    let idat = deflate_scanlines(samples, width as usize * bytes_per_pixel, height as usize)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);
    Ok(png)
}

fn ihdr(width: u32, height: u32, color_type: PngColorType) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[0..4].copy_from_slice(&width.to_be_bytes());
    data[4..8].copy_from_slice(&height.to_be_bytes());
    data[8] = 8; // bit depth
    data[9] = color_type.code();
    // compression, filter and interlace methods stay 0
    data
}

/// Prefix every row with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize, rows: usize) -> Result<Vec<u8>, PngError> {
    let mut raw = Vec::with_capacity(rows * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes).take(rows) {
        raw.push(0);
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&raw)?;
    Ok(encoder.finish()?)
}

fn write_chunk(png: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(kind);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(kind);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
