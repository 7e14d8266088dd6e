//! Scan result classification

use crate::models::{Action, Classification};
use url::Url;

/// Scheme that marks a payment request
pub const PAYMENT_SCHEME: &str = "upi";

/// An absolute URI that parsed successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUri(Url);

impl ParsedUri {
    /// Lower-cased scheme
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Host or authority, if the URI has one
    pub fn host(&self) -> Option<&str> {
        self.0.host_str()
    }

    /// Access the full parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

/// Parse `raw` as an absolute URI. Relative references and free text give `None`.
pub fn try_parse_uri(raw: &str) -> Option<ParsedUri> {
    Url::parse(raw).ok().map(ParsedUri)
}

/// Classify a decoded string. Never fails.
pub fn classify(raw: &str) -> Classification {
    match try_parse_uri(raw) {
        Some(uri) if uri.scheme() == PAYMENT_SCHEME => Classification::Payment(raw.to_string()),
        Some(_) => Classification::Link(raw.to_string()),
        None => Classification::PlainText,
    }
}

/// Action to offer for a classification
pub fn recommended_action(classification: &Classification) -> Action {
    classification.action()
}
