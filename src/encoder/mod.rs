//! Payload encoding
//!
//! Turns a [`PayloadSpec`] into the canonical string that ends up inside the
//! symbol. Encoding is total: every input produces a payload, and the same
//! input always produces the same payload.

/// UPI payment request construction
pub mod upi;

use crate::models::{CanonicalPayload, PayloadSpec};
use crate::tour;

/// Encode a payload description into its canonical string
pub fn encode(spec: &PayloadSpec) -> CanonicalPayload {
    let value = match spec {
        PayloadSpec::Url(value)
        | PayloadSpec::Text(value)
        | PayloadSpec::ImageUrl(value)
        | PayloadSpec::PdfUrl(value) => value.clone(),
        PayloadSpec::TourGuide {
            origin_base,
            details,
        } => tour::tour_link(origin_base, details),
        PayloadSpec::UpiPayment { payee_id, amount } => {
            upi::payment_uri(payee_id, amount.as_deref())
        }
    };
    CanonicalPayload::new(value)
}
