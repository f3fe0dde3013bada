use crate::fetchers::Document;
use crate::parsers::html;

/// The (title, first paragraph) pair compared between cycles.
///
/// Equality is exact on both fields. Whitespace and encoding differences
/// count as a change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSignal {
    /// Text of the first `<title>` under `<head>`
    pub title: String,

    /// Text of the first `<p>` in the document
    pub paragraph: String,
}

impl PageSignal {
    pub fn new(title: impl Into<String>, paragraph: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            paragraph: paragraph.into(),
        }
    }

    /// Extracts the signal from a fetched document. Missing elements yield empty fields.
    pub fn extract(document: &Document) -> Self {
        html::extract_signal(document.html())
    }

    /// True for the zero signal, the state before anything has been observed
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.paragraph.is_empty()
    }

    /// Formats the outbound notification: bold title on line one, paragraph on line two.
    pub fn to_message(&self) -> String {
        format!("**{}**\n{}", self.title, self.paragraph)
    }
}
