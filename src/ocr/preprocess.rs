//! Frame normalization for character recognition.
//!
//! Camera captures of printed cards are low-contrast; the local engine does
//! much better on a hard black/white image. Each pixel goes through
//! luminance (ITU-R BT.601), a contrast stretch around the midpoint, and a
//! snap to pure black or white.

use image::{ImageBuffer, Luma};

use crate::capture::Frame;

/// Contrast-stretches a raw luminance value around the midpoint, clamped to
/// the valid range.
fn stretch(luma: f32) -> f32 {
    ((luma - 128.0) * 2.0 + 128.0).clamp(0.0, 255.0)
}

/// Snaps a contrast-stretched value to black or white.
///
/// Above 200 is clearly background, below 50 clearly ink; the mid-band
/// falls to whichever side of 128 it lies on.
fn snap(stretched: f32) -> u8 {
    if stretched > 200.0 {
        255
    } else if stretched < 50.0 {
        0
    } else if stretched > 128.0 {
        255
    } else {
        0
    }
}

/// Binarizes a frame in place.
///
/// Every pixel ends up pure black or pure white in all three color
/// channels; alpha is left untouched.
pub fn binarize(frame: &mut Frame) {
    for pixel in frame.pixels_mut() {
        let luma =
            0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32;
        let value = snap(stretch(luma));
        pixel[0] = value;
        pixel[1] = value;
        pixel[2] = value;
    }
}

/// Extracts the luma plane of a binarized frame for the engine.
///
/// After `binarize` the three color channels are identical, so the red
/// channel is the binary image.
pub fn luma_plane(frame: &Frame) -> ImageBuffer<Luma<u8>, Vec<u8>> {
    ImageBuffer::from_fn(frame.width(), frame.height(), |x, y| {
        Luma([frame.get_pixel(x, y)[0]])
    })
}
