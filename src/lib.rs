//! Extract a small palette of representative colors from an image.
//!
//! Pixels are resampled to a fixed 150×150 grid, clustered with seeded
//! k-means in RGB space, and the rounded, deduplicated centroids are returned
//! as [`Color`] records (`rgb` triple plus lowercase `#rrggbb` hex).
//!
//! ```no_run
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let image = image_palette_wasm::decode_upload(&bytes).unwrap();
//! for color in image_palette_wasm::extract(&image, 5).unwrap() {
//!     println!("{} {:?}", color.hex(), color.rgb());
//! }
//! ```

use wasm_bindgen::prelude::*;
use js_sys::{Array, Object, Reflect};

mod color;
mod error;
mod extract;
mod input;

pub use crate::color::Color;
pub use crate::error::{PaletteError, Result};
pub use crate::extract::{
    DEFAULT_COLOR_COUNT, DEFAULT_CONVERGENCE, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED,
    MAX_COLOR_COUNT, PaletteExtractor, SAMPLE_SIZE, extract,
};
pub use crate::input::{MAX_UPLOAD_BYTES, decode_raw_rgb, decode_upload, decode_upload_with_limit};

/// Decode an uploaded image and extract up to `n_colors` colors from it.
pub fn extract_palette_bytes(input: &[u8], n_colors: usize) -> Result<Vec<Color>> {
    let image = decode_upload(input)?;
    extract(&image, n_colors)
}

/// Extract a palette from encoded image bytes.
///
/// Returns an array of `{ rgb: [r, g, b], hex: "#rrggbb" }` objects. Failures
/// are reported as the error's message only.
#[wasm_bindgen(js_name = extractColors)]
pub fn extract_colors(input: Vec<u8>, n_colors: Option<u32>) -> std::result::Result<Array, JsValue> {
    let n_colors = n_colors.map_or(DEFAULT_COLOR_COUNT, |n| n as usize);
    let palette = extract_palette_bytes(&input, n_colors)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    let colors = Array::new();
    for color in &palette {
        let rgb = Array::new();
        for channel in color.rgb() {
            rgb.push(&JsValue::from(channel));
        }

        let entry = Object::new();
        Reflect::set(&entry, &JsValue::from_str("rgb"), &rgb)?;
        Reflect::set(&entry, &JsValue::from_str("hex"), &JsValue::from_str(color.hex()))?;
        colors.push(&entry);
    }

    Ok(colors)
}
