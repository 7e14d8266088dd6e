//! Convert RGBA frames to grayscale for the decoder
//! Y = 0.299*R + 0.587*G + 0.114*B
//! Uses fast integer arithmetic: Y = (76*R + 150*G + 29*B) >> 8
//!
//! The alpha channel is ignored.

/// Coefficients for grayscale conversion: Y = (76*R + 150*G + 29*B) >> 8
const COEF_R: u32 = 76;
const COEF_G: u32 = 150;
const COEF_B: u32 = 29;

#[inline(always)]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32) >> 8).min(255) as u8
}

/// Convert an RGBA image to grayscale, allocating the output
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut gray = Vec::with_capacity(width * height);
    rgba_to_grayscale_into(rgba, width, height, &mut gray);
    gray
}

/// Convert an RGBA image to grayscale into a reusable buffer.
///
/// `gray` is cleared and refilled with `width * height` bytes. Pixels past
/// the end of a short `rgba` slice are left out.
pub fn rgba_to_grayscale_into(rgba: &[u8], width: usize, height: usize, gray: &mut Vec<u8>) {
    let pixel_count = width * height;
    gray.clear();
    gray.reserve(pixel_count);

    let pixels = &rgba[..(pixel_count * 4).min(rgba.len() - rgba.len() % 4)];

    // Process 8 pixels at a time
    let mut blocks = pixels.chunks_exact(32);
    for block in &mut blocks {
        for px in block.chunks_exact(4) {
            gray.push(luma(px[0], px[1], px[2]));
        }
    }

    // Process remaining pixels
    for px in blocks.remainder().chunks_exact(4) {
        gray.push(luma(px[0], px[1], px[2]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_colours() {
        let rgba = [
            255, 0, 0, 255, // red
            0, 255, 0, 255, // green
            0, 0, 255, 255, // blue
            0, 0, 0, 0, // black, transparent
        ];
        assert_eq!(rgba_to_grayscale(&rgba, 4, 1), vec![75, 149, 28, 0]);
    }

    #[test]
    fn test_alpha_is_ignored() {
        let opaque = rgba_to_grayscale(&[120, 120, 120, 255], 1, 1);
        let clear = rgba_to_grayscale(&[120, 120, 120, 0], 1, 1);
        assert_eq!(opaque, clear);
    }

    #[test]
    fn test_remainder_pixels() {
        // 11 pixels: one block of 8 plus 3 leftovers
        let rgba: Vec<u8> = (0..11u8).flat_map(|v| [v * 10, v * 10, v * 10, 255]).collect();
        let gray = rgba_to_grayscale(&rgba, 11, 1);
        assert_eq!(gray.len(), 11);
        assert_eq!(gray[10], luma(100, 100, 100));
    }

    #[test]
    fn test_buffer_is_reused() {
        let mut gray = Vec::with_capacity(16);
        rgba_to_grayscale_into(&[255; 16], 2, 2, &mut gray);
        rgba_to_grayscale_into(&[0; 4], 1, 1, &mut gray);
        assert_eq!(gray, vec![0]);
        assert!(gray.capacity() >= 16);
    }
}
