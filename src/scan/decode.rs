use crate::models::{Frame, PixelBuffer};
use crate::utils::grayscale::rgba_to_grayscale_into;
use tracing::{debug, trace};

/// Answer from the decode capability. There is no partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A symbol was read
    Decoded(String),
    /// The frame holds no readable symbol
    NoCode,
}

impl DecodeOutcome {
    /// The decoded text, if any
    pub fn into_text(self) -> Option<String> {
        match self {
            DecodeOutcome::Decoded(text) => Some(text),
            DecodeOutcome::NoCode => None,
        }
    }
}

/// Turns a pixel buffer into a string
pub trait Decoder {
    /// Decode one frame
    fn decode(&mut self, frame: Frame<'_>) -> DecodeOutcome;
}

impl<F> Decoder for F
where
    F: for<'a> FnMut(Frame<'a>) -> Option<String>,
{
    fn decode(&mut self, frame: Frame<'_>) -> DecodeOutcome {
        match self(frame) {
            Some(text) => DecodeOutcome::Decoded(text),
            None => DecodeOutcome::NoCode,
        }
    }
}

/// Submit a still image once, outside any scan loop
pub fn decode_once<D: Decoder + ?Sized>(image: &PixelBuffer, decoder: &mut D) -> DecodeOutcome {
    let outcome = decoder.decode(image.as_frame());
    debug!(
        width = image.width(),
        height = image.height(),
        found = matches!(outcome, DecodeOutcome::Decoded(_)),
        "still image decoded"
    );
    outcome
}

/// Decoder backed by the `rqrr` grid detector
#[derive(Debug, Default)]
pub struct RqrrDecoder {
    gray: Vec<u8>,
}

impl RqrrDecoder {
    /// Decoder with an empty grayscale buffer
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for RqrrDecoder {
    fn decode(&mut self, frame: Frame<'_>) -> DecodeOutcome {
        if frame.is_empty() {
            return DecodeOutcome::NoCode;
        }
        let (width, height) = (frame.width as usize, frame.height as usize);
        rgba_to_grayscale_into(frame.rgba, width, height, &mut self.gray);
        if self.gray.len() < width * height {
            return DecodeOutcome::NoCode;
        }

        let gray = &self.gray;
        let mut prepared =
            rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| gray[y * width + x]);
        let grids = prepared.detect_grids();
        trace!(grids = grids.len(), "candidate grids");

        for grid in grids {
            match grid.decode() {
                Ok((_, content)) => return DecodeOutcome::Decoded(content),
                Err(err) => trace!(error = ?err, "grid decode failed"),
            }
        }
        DecodeOutcome::NoCode
    }
}
