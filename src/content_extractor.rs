/*!
 * Readable-text extraction from HTML pages.
 *
 * This module turns a raw HTML document into a cleaned plain-text body plus a
 * title. The candidate content root is located by a fixed selector priority
 * list, noise subtrees (navigation, chrome, scripts, hidden elements) are
 * filtered out, the remaining tree is flattened into rendered-style text,
 * and the result is whitespace-normalized and bounded to a maximum length.
 *
 * Extraction is total: the worst case is an empty body, which callers must
 * treat as a "no extractable content" condition.
 */

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::Lazy;
use regex::Regex;

/// Marker appended to a truncated body
pub const TRUNCATION_MARKER: &str = "... (content truncated)";

/// Title used when the document has no usable <title>
pub const UNTITLED_PLACEHOLDER: &str = "(untitled page)";

/// Default bound on extracted body length, in characters
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 15_000;

/// Runs of 3+ newlines collapse to a paragraph break
static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\r\n|\r|\n){3,}").unwrap()
});

/// Runs of 2+ spaces/tabs collapse to a single space
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]{2,}").unwrap()
});

/// How a main-content candidate is identified
enum ContentSelector {
    /// Element with the given tag name
    Tag(&'static str),
    /// Element with the given ARIA role
    Role(&'static str),
    /// Element carrying the given class token
    Class(&'static str),
}

/// Priority-ordered selectors for the main content root. The first element
/// matched by the first matching selector wins; the document body is the
/// fallback when none match.
const MAIN_CONTENT_SELECTORS: &[ContentSelector] = &[
    ContentSelector::Tag("article"),
    ContentSelector::Tag("main"),
    ContentSelector::Role("main"),
    ContentSelector::Class("post-content"),
    ContentSelector::Class("entry-content"),
    ContentSelector::Class("article-body"),
];

/// Tags whose subtrees never contribute readable text
const NOISE_TAGS: &[&str] = &[
    "script", "style", "nav", "header", "footer", "aside", "form", "button",
    "input", "select", "textarea", "noscript", "iframe", "template",
];

/// ARIA roles marking page chrome rather than content
const NOISE_ROLES: &[&str] = &[
    "navigation", "banner", "contentinfo", "complementary", "form", "search",
];

/// Class token marking elements excluded from printing
const NOISE_CLASS: &str = "noprint";

/// Tags that break the text flow like rendered block elements do
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "details", "dialog", "dd", "div",
    "dl", "dt", "fieldset", "figcaption", "figure", "h1", "h2", "h3", "h4",
    "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "summary",
    "table", "tr", "ul",
];

/// Tags that additionally separate paragraphs with a blank line
const PARAGRAPH_TAGS: &[&str] = &[
    "article", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6", "ol", "p",
    "pre", "section", "table", "ul",
];

/// Plain-text content extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Document title, or a fixed placeholder when absent
    pub title: String,
    /// Whitespace-normalized body text, at most `max_content_chars` long
    pub body: String,
    /// Whether the body was cut at the length bound
    pub truncated: bool,
}

impl ExtractedContent {
    /// Whether the extraction produced any usable text
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Bounded preview of the body for logging and display
    pub fn preview(&self, max_chars: usize) -> String {
        if self.body.chars().count() <= max_chars {
            self.body.clone()
        } else {
            let head: String = self.body.chars().take(max_chars).collect();
            format!("{}...", head)
        }
    }
}

/// Extractor turning HTML documents into bounded plain text
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    /// Maximum body length in characters
    max_chars: usize,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONTENT_CHARS)
    }
}

impl ContentExtractor {
    /// Create an extractor with the given body length bound
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Extract the title and readable body text from an HTML document.
    ///
    /// Never fails: an unparseable or empty document yields an empty body.
    pub fn extract(&self, html: &str) -> ExtractedContent {
        let parse_options = ParseOpts {
            tree_builder: TreeBuilderOpts {
                drop_doctype: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let dom = parse_document(RcDom::default(), parse_options).one(html);

        let title = extract_title(&dom.document)
            .filter(|t| !t.trim().is_empty())
            .map(|t| normalize_whitespace(&t))
            .unwrap_or_else(|| UNTITLED_PLACEHOLDER.to_string());

        let body_handle = find_first(&dom.document, &|node| is_element_named(node, "body"));

        let candidate = MAIN_CONTENT_SELECTORS
            .iter()
            .find_map(|selector| find_first(&dom.document, &|node| matches_selector(node, selector)))
            .or_else(|| body_handle.clone());

        let mut text = match &candidate {
            Some(root) => collect_rendered_text(root),
            None => String::new(),
        };

        // Widen to the whole body when the candidate had nothing readable
        if text.trim().is_empty() {
            if let (Some(root), Some(body)) = (&candidate, &body_handle) {
                if !std::rc::Rc::ptr_eq(root, body) {
                    text = collect_rendered_text(body);
                }
            }
        }

        let mut body = normalize_whitespace(&text);
        let mut truncated = false;
        if body.chars().count() > self.max_chars {
            body = body.chars().take(self.max_chars).collect();
            body.push_str(TRUNCATION_MARKER);
            truncated = true;
        }

        ExtractedContent { title, body, truncated }
    }
}

/// Collapse 3+ newlines to a paragraph break, 2+ spaces/tabs to one space,
/// and trim. Idempotent on already-normalized text.
pub fn normalize_whitespace(text: &str) -> String {
    let text = NEWLINE_RUN.replace_all(text, "\n\n");
    let text = SPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

fn is_element_named(node: &Handle, tag: &str) -> bool {
    element_name(node) == Some(tag)
}

fn attribute_value(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

fn has_class_token(node: &Handle, token: &str) -> bool {
    attribute_value(node, "class")
        .map(|classes| classes.split_whitespace().any(|c| c.eq_ignore_ascii_case(token)))
        .unwrap_or(false)
}

fn matches_selector(node: &Handle, selector: &ContentSelector) -> bool {
    match selector {
        ContentSelector::Tag(tag) => is_element_named(node, tag),
        ContentSelector::Role(role) => attribute_value(node, "role")
            .map(|r| r.eq_ignore_ascii_case(role))
            .unwrap_or(false),
        ContentSelector::Class(class) => has_class_token(node, class),
    }
}

/// Whether an element's whole subtree is page chrome rather than content
fn is_noise(node: &Handle) -> bool {
    let Some(name) = element_name(node) else {
        return false;
    };

    if NOISE_TAGS.contains(&name) {
        return true;
    }
    if let Some(role) = attribute_value(node, "role") {
        if NOISE_ROLES.iter().any(|r| role.eq_ignore_ascii_case(r)) {
            return true;
        }
    }
    if let Some(hidden) = attribute_value(node, "aria-hidden") {
        if hidden.eq_ignore_ascii_case("true") {
            return true;
        }
    }
    has_class_token(node, NOISE_CLASS)
}

/// Depth-first search for the first node satisfying the predicate, in
/// document order
fn find_first(node: &Handle, predicate: &dyn Fn(&Handle) -> bool) -> Option<Handle> {
    if predicate(node) {
        return Some(node.clone());
    }
    for child in node.children.borrow().iter() {
        if let Some(found) = find_first(child, predicate) {
            return Some(found);
        }
    }
    None
}

fn extract_title(document: &Handle) -> Option<String> {
    let title_node = find_first(document, &|node| is_element_named(node, "title"))?;
    let mut title = String::new();
    for child in title_node.children.borrow().iter() {
        if let NodeData::Text { contents } = &child.data {
            title.push_str(&contents.borrow());
        }
    }
    Some(title)
}

/// Flatten a subtree into text the way it would read when rendered: inline
/// text joins with single spaces, block elements break lines, and noise
/// subtrees are skipped entirely. Skipping (rather than removing nodes)
/// leaves the parsed document untouched.
fn collect_rendered_text(root: &Handle) -> String {
    let mut out = String::new();
    append_rendered_text(root, &mut out);
    out
}

fn append_rendered_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => {
            append_inline_text(&contents.borrow(), out);
        }
        NodeData::Element { name, .. } => {
            if is_noise(node) {
                return;
            }
            let tag = name.local.as_ref();
            if tag == "br" {
                out.push('\n');
                return;
            }

            let is_block = BLOCK_TAGS.contains(&tag);
            let is_paragraph = PARAGRAPH_TAGS.contains(&tag);
            if is_block {
                break_line(out, is_paragraph);
            }
            for child in node.children.borrow().iter() {
                append_rendered_text(child, out);
            }
            if is_block {
                break_line(out, is_paragraph);
            }
        }
        _ => {
            for child in node.children.borrow().iter() {
                append_rendered_text(child, out);
            }
        }
    }
}

/// Append a text node using HTML whitespace rules: any run of source
/// whitespace renders as a single space
fn append_inline_text(raw: &str, out: &mut String) {
    let has_leading_space = raw.starts_with(char::is_whitespace);
    let mut first = true;
    for word in raw.split_whitespace() {
        if first {
            if has_leading_space && needs_separator(out) {
                out.push(' ');
            }
            first = false;
        } else {
            out.push(' ');
        }
        out.push_str(word);
    }
    if !first && raw.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

fn needs_separator(out: &str) -> bool {
    out.chars().next_back().is_some_and(|c| !c.is_whitespace())
}

/// Terminate the current line; paragraph-level blocks get a blank line
fn break_line(out: &mut String, paragraph: bool) {
    while out.ends_with(' ') || out.ends_with('\t') {
        out.pop();
    }
    if out.is_empty() {
        return;
    }
    let wanted = if paragraph { 2 } else { 1 };
    let current = out.chars().rev().take_while(|c| *c == '\n').count();
    for _ in current..wanted {
        out.push('\n');
    }
}
