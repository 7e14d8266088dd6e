/// Payload descriptions and their canonical strings
pub mod payload;
/// RGBA frames and owned pixel buffers
pub mod pixels;
/// Classified scan results
pub mod result;

pub use payload::{CanonicalPayload, PayloadSpec};
pub use pixels::{Frame, PixelBuffer};
pub use result::{Action, Classification, DecodedResult};
