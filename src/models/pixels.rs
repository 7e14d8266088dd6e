/// Bytes per pixel in every buffer crossing the decode boundary (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Borrowed view of one RGBA frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGBA bytes, `width * height * 4` long
    pub rgba: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Wrap raw RGBA bytes, rejecting slices shorter than the dimensions need
    pub fn new(width: u32, height: u32, rgba: &'a [u8]) -> Option<Self> {
        if rgba.len() < byte_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    /// Number of pixels in the frame
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when there is nothing to sample
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }
}

/// Owned RGBA image, used for still images and replayed camera frames
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl PixelBuffer {
    /// Take ownership of RGBA bytes. Returns `None` if the length does not match.
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        if rgba.len() != byte_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    /// A buffer filled with a single opaque grey level
    pub fn filled(width: u32, height: u32, level: u8) -> Self {
        let mut rgba = vec![level; byte_len(width, height)];
        for alpha in rgba.iter_mut().skip(3).step_by(CHANNELS) {
            *alpha = u8::MAX;
        }
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Image width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.rgba
    }

    /// Borrow as a frame for submission to a decoder
    pub fn as_frame(&self) -> Frame<'_> {
        Frame {
            width: self.width,
            height: self.height,
            rgba: &self.rgba,
        }
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_filled_is_opaque() {
        let buf = PixelBuffer::filled(3, 1, 40);
        assert_eq!(buf.as_bytes(), &[40, 40, 40, 255, 40, 40, 40, 255, 40, 40, 40, 255]);
    }

    #[test]
    fn test_frame_rejects_short_slice() {
        let data = [0u8; 7];
        assert!(Frame::new(1, 2, &data).is_none());
        assert!(Frame::new(1, 1, &data).is_some());
    }
}
