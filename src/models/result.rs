use chrono::{DateTime, Utc};
use serde::Serialize;

/// Category assigned to a decoded string
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Classification {
    /// Absolute URI with a non-payment scheme
    Link(String),
    /// `upi:` payment URI
    Payment(String),
    /// Anything that does not parse as an absolute URI
    PlainText,
}

impl Classification {
    /// What the UI should offer for this result
    pub fn action(&self) -> Action {
        match self {
            Classification::Link(_) => Action::OpenLink,
            Classification::Payment(_) => Action::OpenPaymentHandler,
            Classification::PlainText => Action::DisplayText,
        }
    }
}

/// Recommended follow-up for a scan result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Open the link in a browser
    OpenLink,
    /// Hand the URI to a payment app
    OpenPaymentHandler,
    /// Show the text as-is
    DisplayText,
}

impl Action {
    /// Stable identifier, e.g. `open-link`
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::OpenLink => "open-link",
            Action::OpenPaymentHandler => "open-payment-handler",
            Action::DisplayText => "display-text",
        }
    }

    /// Button label shown next to the result
    pub fn label(&self) -> &'static str {
        match self {
            Action::OpenLink => "Open Link",
            Action::OpenPaymentHandler => "Pay via UPI",
            Action::DisplayText => "Copy Text",
        }
    }
}

/// A successful read, frozen at the moment it was produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedResult {
    raw_text: String,
    classification: Classification,
    decoded_at: DateTime<Utc>,
}

impl DecodedResult {
    /// Classify `raw_text` and stamp it with `decoded_at`
    pub fn new(raw_text: String, decoded_at: DateTime<Utc>) -> Self {
        let classification = crate::classifier::classify(&raw_text);
        Self {
            raw_text,
            classification,
            decoded_at,
        }
    }

    /// Decoded string exactly as the decoder returned it
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Derived category
    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// When the symbol was read
    pub fn decoded_at(&self) -> DateTime<Utc> {
        self.decoded_at
    }

    /// Shortcut for `classification().action()`
    pub fn action(&self) -> Action {
        self.classification.action()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_follows_classification() {
        assert_eq!(Classification::Link("https://a.b".into()).action(), Action::OpenLink);
        assert_eq!(
            Classification::Payment("upi://pay".into()).action(),
            Action::OpenPaymentHandler
        );
        assert_eq!(Classification::PlainText.action(), Action::DisplayText);
        assert_eq!(Action::OpenPaymentHandler.as_str(), "open-payment-handler");
    }

    #[test]
    fn test_decoded_result_serializes_classification() {
        let at = DateTime::from_timestamp(0, 0).unwrap_or_default();
        let result = DecodedResult::new("upi://pay?pa=a".to_string(), at);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["classification"]["kind"], "payment");
        assert_eq!(json["raw_text"], "upi://pay?pa=a");
    }
}
