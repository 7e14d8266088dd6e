//! Tour guide handoff
//!
//! A tour payload is a link to the tour page with the descriptive text in a
//! single `details` query parameter. The page decodes it and hands it to an
//! external text generator, first for a welcome message and then for answers
//! to visitor questions.

use crate::error::{Error, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use thiserror::Error as ThisError;
use tracing::{debug, warn};
use url::Url;

/// Path of the tour page relative to the origin
pub const TOUR_PATH: &str = "/tour";
/// Query parameter carrying the percent-encoded details
pub const DETAILS_PARAM: &str = "details";
/// First message shown when a tour link carries no details
pub const NO_DETAILS_GREETING: &str =
    "Welcome! I don't have any tour details. How can I help you today?";

/// URI-component escape set: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build the tour link for `details` under `origin_base`
pub fn tour_link(origin_base: &str, details: &str) -> String {
    format!(
        "{origin_base}{TOUR_PATH}?{DETAILS_PARAM}={}",
        utf8_percent_encode(details, URI_COMPONENT)
    )
}

/// Extract the decoded `details` text from a tour link
pub fn details_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == DETAILS_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Failure reported by the text generation service
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{0}")]
pub struct GeneratorError(pub String);

/// External free-text generation service
pub trait TextGenerator {
    /// Produce a short tour guide message for `context`
    fn tour_message(&mut self, context: &str) -> std::result::Result<String, GeneratorError>;

    /// Answer `question` using `details` as the only source
    fn answer(&mut self, details: &str, question: &str)
    -> std::result::Result<String, GeneratorError>;
}

/// Generate tour details for `topic`.
///
/// `current` is whatever the user has in the details box right now. It is
/// returned inside [`Error::GenerationFailure`] so a failed call never
/// clears the user's text.
pub fn generate_details<G: TextGenerator + ?Sized>(
    generator: &mut G,
    topic: &str,
    current: &str,
) -> Result<String> {
    if topic.trim().is_empty() {
        return Err(Error::EmptyPrompt);
    }
    generator.tour_message(topic).map_err(|err| {
        warn!(error = %err, "tour details generation failed");
        Error::GenerationFailure {
            message: err.0,
            fallback: current.to_string(),
        }
    })
}

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    /// The visitor
    User,
    /// The generated guide
    Guide,
}

/// One line of the tour conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Monotonic id within the chat
    pub id: u64,
    /// Author
    pub sender: Sender,
    /// Message text
    pub text: String,
}

/// Conversation state of the tour page
#[derive(Debug, Clone, Default)]
pub struct TourChat {
    details: Option<String>,
    messages: Vec<Message>,
    next_id: u64,
}

impl TourChat {
    /// Chat for the given (already decoded) details
    pub fn new(details: Option<String>) -> Self {
        Self {
            details: details.filter(|d| !d.is_empty()),
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// Chat for a scanned tour link
    pub fn from_link(link: &str) -> Self {
        Self::new(details_from_link(link))
    }

    /// Details the chat is grounded on
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// All messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Post the opening message.
    ///
    /// With details, the generator writes it; without, a fixed greeting is used.
    pub fn welcome<G: TextGenerator + ?Sized>(&mut self, generator: &mut G) -> Result<&Message> {
        let text = match &self.details {
            Some(details) => generator.tour_message(details).map_err(|err| {
                warn!(error = %err, "welcome message generation failed");
                Error::GenerationFailure {
                    message: err.0,
                    fallback: details.clone(),
                }
            })?,
            None => NO_DETAILS_GREETING.to_string(),
        };
        Ok(self.push(Sender::Guide, text))
    }

    /// Ask a question. On failure the question is withdrawn from the
    /// conversation and handed back in the error.
    pub fn ask<G: TextGenerator + ?Sized>(
        &mut self,
        generator: &mut G,
        question: &str,
    ) -> Result<&Message> {
        if question.trim().is_empty() {
            return Err(Error::EmptyPrompt);
        }
        let asked = self.push(Sender::User, question.to_string()).id;
        let details = self.details.as_deref().unwrap_or_default();

        match generator.answer(details, question) {
            Ok(answer) => {
                debug!(question_id = asked, "tour question answered");
                Ok(self.push(Sender::Guide, answer))
            }
            Err(err) => {
                warn!(error = %err, "tour question failed");
                self.messages.retain(|m| m.id != asked);
                Err(Error::GenerationFailure {
                    message: err.0,
                    fallback: question.to_string(),
                })
            }
        }
    }

    fn push(&mut self, sender: Sender, text: String) -> &Message {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message { id, sender, text });
        &self.messages[self.messages.len() - 1]
    }
}
