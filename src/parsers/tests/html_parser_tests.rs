use crate::parsers::html;
use scraper::Html;

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_title_text() {
        // Plain title
        let doc = Html::parse_document(
            "<html><head><title>Launch</title></head><body></body></html>",
        );
        assert_eq!(html::title_text(&doc), "Launch");

        // Only the first title counts
        let doc = Html::parse_document(
            "<html><head><title>First</title><title>Second</title></head></html>",
        );
        assert_eq!(html::title_text(&doc), "First");

        // Whitespace inside the title is kept as-is
        let doc = Html::parse_document("<html><head><title>  Launch \n</title></head></html>");
        assert_eq!(html::title_text(&doc), "  Launch \n");

        // No title at all
        let doc = Html::parse_document("<html><head></head><body><p>x</p></body></html>");
        assert_eq!(html::title_text(&doc), "");
    }

    #[test]
    fn test_title_without_explicit_head() {
        // The parser places a leading <title> into the implied <head>
        let doc = Html::parse_document("<title>Implied</title><p>Body</p>");
        assert_eq!(html::title_text(&doc), "Implied");
    }

    #[test]
    fn test_first_paragraph_text() {
        let doc = Html::parse_document(
            "<html><body><div><p>One</p></div><p>Two</p></body></html>",
        );
        assert_eq!(html::first_paragraph_text(&doc), "One");

        // Nested markup contributes its text
        let doc = Html::parse_document("<body><p>We shipped <b>v1</b>.</p></body>");
        assert_eq!(html::first_paragraph_text(&doc), "We shipped v1.");

        // No paragraph at all
        let doc = Html::parse_document("<body><div>Not a paragraph</div></body>");
        assert_eq!(html::first_paragraph_text(&doc), "");
    }

    #[test]
    fn test_empty_paragraph_is_still_first() {
        let doc = Html::parse_document("<body><p></p><p>Later</p></body>");
        assert_eq!(html::first_paragraph_text(&doc), "");
    }
}
