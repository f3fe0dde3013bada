use crate::signal::PageSignal;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("head > title").expect("valid title selector"));

static PARAGRAPH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p").expect("valid paragraph selector"));

/// Parses an HTML document and extracts its title and first paragraph
pub fn extract_signal(html: &str) -> PageSignal {
    let doc = Html::parse_document(html);

    let title = title_text(&doc);
    let paragraph = first_paragraph_text(&doc);

    ::log::trace!(
        "HTML parser extracted title ({} bytes) and paragraph ({} bytes)",
        title.len(),
        paragraph.len()
    );

    PageSignal { title, paragraph }
}

/// Text of the first `<title>` directly under `<head>`, or empty if there is none
pub fn title_text(doc: &Html) -> String {
    first_text(doc, &TITLE_SELECTOR)
}

/// Text of the first `<p>` anywhere in the document, or empty if there is none
pub fn first_paragraph_text(doc: &Html) -> String {
    first_text(doc, &PARAGRAPH_SELECTOR)
}

// Concatenates every descendant text node without trimming.
fn first_text(doc: &Html, selector: &Selector) -> String {
    doc.select(selector)
        .next()
        .map(|element: ElementRef<'_>| element.text().collect::<String>())
        .unwrap_or_default()
}
