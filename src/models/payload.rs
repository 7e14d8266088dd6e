use std::fmt;

/// Typed description of what a generated QR symbol should carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSpec {
    /// Website link, encoded verbatim
    Url(String),
    /// Free text, encoded verbatim
    Text(String),
    /// Link to an image, encoded verbatim
    ImageUrl(String),
    /// Link to a PDF document, encoded verbatim
    PdfUrl(String),
    /// Link to the tour page carrying descriptive text
    TourGuide {
        /// Scheme + host the tour page is served from, without trailing slash
        origin_base: String,
        /// Free text shown (and expanded) on the tour page
        details: String,
    },
    /// UPI payment request
    UpiPayment {
        /// Virtual payment address, e.g. `name@bank`
        payee_id: String,
        /// Amount as typed; passed through unvalidated
        amount: Option<String>,
    },
}

impl PayloadSpec {
    /// Short name of the variant, as used by the CLI
    pub fn kind(&self) -> &'static str {
        match self {
            PayloadSpec::Url(_) => "url",
            PayloadSpec::Text(_) => "text",
            PayloadSpec::ImageUrl(_) => "image",
            PayloadSpec::PdfUrl(_) => "pdf",
            PayloadSpec::TourGuide { .. } => "tour",
            PayloadSpec::UpiPayment { .. } => "upi",
        }
    }

    /// Encode into the canonical payload string
    pub fn encode(&self) -> CanonicalPayload {
        crate::encoder::encode(self)
    }
}

/// The exact string handed to the rasterizer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct CanonicalPayload(String);

impl CanonicalPayload {
    pub(crate) fn new(value: String) -> Self {
        Self(value)
    }

    /// Borrow the payload text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the payload text
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CanonicalPayload {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
