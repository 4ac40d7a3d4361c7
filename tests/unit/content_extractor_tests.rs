/*!
 * Tests for HTML readable-text extraction
 */

use pagevoice::content_extractor::{
    normalize_whitespace, ContentExtractor, TRUNCATION_MARKER, UNTITLED_PLACEHOLDER,
};

use crate::common::{ARTICLE_HTML, EMPTY_HTML};

#[test]
fn test_extract_withArticlePage_shouldSkipNavigationAndFooter() {
    let extractor = ContentExtractor::default();
    let content = extractor.extract(ARTICLE_HTML);

    assert_eq!(content.title, "Rust in Production");
    assert!(content.body.contains("everyday infrastructure"));
    assert!(content.body.contains("easier refactoring"));
    assert!(!content.body.contains("Home"));
    assert!(!content.body.contains("About"));
    assert!(!content.body.contains("Copyright"));
    assert!(!content.truncated);
}

#[test]
fn test_extract_withArticleElement_shouldPreferItOverBodyText() {
    let html = r#"<html><body>
        <div>Sidebar chatter outside the article.</div>
        <article><p>The actual story.</p></article>
    </body></html>"#;

    let content = ContentExtractor::default().extract(html);
    assert_eq!(content.body, "The actual story.");
}

#[test]
fn test_extract_withRoleMain_shouldUseItWhenNoArticleExists() {
    let html = r#"<html><body>
        <div>Chrome text.</div>
        <div role="main"><p>Main region text.</p></div>
    </body></html>"#;

    let content = ContentExtractor::default().extract(html);
    assert_eq!(content.body, "Main region text.");
}

#[test]
fn test_extract_withContentClass_shouldMatchClassToken() {
    let html = r#"<html><body>
        <div class="sidebar">Ignore me.</div>
        <div class="post-content extra"><p>Class-selected text.</p></div>
    </body></html>"#;

    let content = ContentExtractor::default().extract(html);
    assert_eq!(content.body, "Class-selected text.");
}

#[test]
fn test_extract_withNoCandidate_shouldFallBackToBody() {
    let html = "<html><body><p>Plain body text.</p></body></html>";

    let content = ContentExtractor::default().extract(html);
    assert_eq!(content.body, "Plain body text.");
}

#[test]
fn test_extract_withEmptyCandidate_shouldWidenToBody() {
    // The article exists but is all noise, so extraction widens to the body
    let html = r#"<html><body>
        <article><nav>Only navigation in here.</nav></article>
        <p>Text outside the article.</p>
    </body></html>"#;

    let content = ContentExtractor::default().extract(html);
    assert!(content.body.contains("Text outside the article."));
}

#[test]
fn test_extract_withAriaHiddenSubtree_shouldSkipIt() {
    let html = r#"<html><body><article>
        <p>Visible paragraph.</p>
        <div aria-hidden="true">Screen-reader hidden decoration.</div>
    </article></body></html>"#;

    let content = ContentExtractor::default().extract(html);
    assert!(content.body.contains("Visible paragraph."));
    assert!(!content.body.contains("hidden decoration"));
}

#[test]
fn test_extract_withNoprintClass_shouldSkipIt() {
    let html = r#"<html><body><article>
        <p>Keep this.</p>
        <div class="noprint">Do not read this.</div>
    </article></body></html>"#;

    let content = ContentExtractor::default().extract(html);
    assert!(content.body.contains("Keep this."));
    assert!(!content.body.contains("Do not read this."));
}

#[test]
fn test_extract_withNoReadableText_shouldReturnEmptyContent() {
    let content = ContentExtractor::default().extract(EMPTY_HTML);
    assert!(content.is_empty());
}

#[test]
fn test_extract_withMissingTitle_shouldUsePlaceholder() {
    let html = "<html><body><p>Body without a title.</p></body></html>";

    let content = ContentExtractor::default().extract(html);
    assert_eq!(content.title, UNTITLED_PLACEHOLDER);
}

#[test]
fn test_extract_withLongBody_shouldTruncateWithMarker() {
    let paragraph = "word ".repeat(200);
    let html = format!("<html><body><article><p>{}</p></article></body></html>", paragraph);

    let content = ContentExtractor::new(100).extract(&html);
    assert!(content.truncated);
    assert!(content.body.ends_with(TRUNCATION_MARKER));
    // The marker sits after the bounded text
    let kept = content.body.trim_end_matches(TRUNCATION_MARKER);
    assert_eq!(kept.chars().count(), 100);
}

#[test]
fn test_extract_withBodyAtBound_shouldNotTruncate() {
    let html = "<html><body><p>short</p></body></html>";

    let content = ContentExtractor::new(5).extract(html);
    assert_eq!(content.body, "short");
    assert!(!content.truncated);
}

#[test]
fn test_extract_withParagraphs_shouldSeparateWithBlankLines() {
    let html = "<html><body><article><p>First.</p><p>Second.</p></article></body></html>";

    let content = ContentExtractor::default().extract(html);
    assert_eq!(content.body, "First.\n\nSecond.");
}

#[test]
fn test_extract_withInlineMarkup_shouldJoinWithoutExtraBreaks() {
    let html = "<html><body><p>Rust is <em>fast</em> and <strong>safe</strong>.</p></body></html>";

    let content = ContentExtractor::default().extract(html);
    assert_eq!(content.body, "Rust is fast and safe.");
}

#[test]
fn test_normalizeWhitespace_shouldCollapseRunsAndTrim() {
    let input = "  a   b\t\tc\n\n\n\n\nd  ";
    assert_eq!(normalize_whitespace(input), "a b c\n\nd");
}

#[test]
fn test_normalizeWhitespace_shouldBeIdempotent() {
    let once = normalize_whitespace("x    y\n\n\n\nz");
    assert_eq!(normalize_whitespace(&once), once);
}

#[test]
fn test_preview_withLongBody_shouldBoundAndMark() {
    let content = ContentExtractor::default()
        .extract("<html><body><p>abcdefghij</p></body></html>");
    assert_eq!(content.preview(4), "abcd...");
    assert_eq!(content.preview(100), "abcdefghij");
}
