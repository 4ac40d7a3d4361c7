/*!
 * Response cleaning for model output.
 *
 * LLM responses are not contractually payload-only: they often open with an
 * announcement sentence or a bare label, fence the payload with separator
 * lines, or append an explanatory note. These passes strip that scaffolding
 * so display and speech always receive the payload alone.
 *
 * The passes run in a fixed order. Label removal must run after preamble
 * removal, because a preamble sentence may itself end in a colon and would
 * otherwise leave a label-shaped remnant behind.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading sentences announcing a summary, in English and Japanese
static SUMMARY_PREAMBLES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^\s*here\s+(?:is|are)\s+(?:the\s+|a\s+|your\s+)?summar(?:y|ies)[^\n:：]*[:：]\s*").unwrap(),
        Regex::new(r"^\s*(?:以下|こちら)[がは、]?\s*要約です[。:：]?\s*").unwrap(),
    ]
});

/// Leading sentences announcing a translation, in English and Japanese
static TRANSLATION_PREAMBLES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^\s*here\s+(?:is|are)\s+(?:the\s+|a\s+|your\s+)?translations?[^\n:：]*[:：]\s*").unwrap(),
        Regex::new(r"^\s*(?:以下|こちら)[がは、]?\s*翻訳です[。:：]?\s*").unwrap(),
    ]
});

/// Bare summary label at the start of the text
static SUMMARY_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:summary|要約)\s*[:：]\s*").unwrap()
});

/// Bare translation label at the start of the text
static TRANSLATION_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:translation|翻訳|訳文?)\s*[:：]\s*").unwrap()
});

/// Horizontal-rule separator lines (three or more dashes)
static SEPARATOR_LINES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*-{3,}\s*$\n?").unwrap()
});

/// Trailing "Note:" explanatory block, from the marker to the end of text
static NOTE_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?is)\n\s*note\s*[:：].*$").unwrap(),
        Regex::new(r"(?s)\n\s*(?:注意?|注記)\s*[:：].*$").unwrap(),
    ]
});

/// Leading meta-sentences of the "I have summarized this..." kind
static SUMMARY_META_SENTENCES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^\s*i(?:'ve| have)\s+summarized\s+[^\n]*?[.!。]\s*").unwrap(),
        Regex::new(r"^\s*この(?:テキスト|文章|記事|内容)を要約(?:いた)?しました[。]?\s*").unwrap(),
    ]
});

/// Leading meta-sentences of the "I have translated this..." kind
static TRANSLATION_META_SENTENCES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)^\s*i(?:'ve| have)\s+translated\s+[^\n]*?[.!。]\s*").unwrap(),
        Regex::new(r"^\s*この(?:テキスト|文章|記事|内容)を翻訳(?:いた)?しました[。]?\s*").unwrap(),
    ]
});

/// Runs of 3+ newlines collapse to a paragraph break
static NEWLINE_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\r\n|\r|\n){3,}").unwrap()
});

/// Strip scaffolding from a raw summarization response. Pure and total.
pub fn clean_summary(raw: &str) -> String {
    clean(raw, &SUMMARY_PREAMBLES, &SUMMARY_LABEL, &SUMMARY_META_SENTENCES)
}

/// Strip scaffolding from a raw translation response. Pure and total.
pub fn clean_translation(raw: &str) -> String {
    clean(raw, &TRANSLATION_PREAMBLES, &TRANSLATION_LABEL, &TRANSLATION_META_SENTENCES)
}

fn clean(raw: &str, preambles: &[Regex], label: &Regex, meta_sentences: &[Regex]) -> String {
    let mut text = raw.to_string();

    for pattern in preambles {
        text = pattern.replacen(&text, 1, "").into_owned();
    }
    text = label.replacen(&text, 1, "").into_owned();
    text = SEPARATOR_LINES.replace_all(&text, "").into_owned();
    for pattern in NOTE_BLOCKS.iter() {
        text = pattern.replacen(&text, 1, "").into_owned();
    }
    for pattern in meta_sentences {
        text = pattern.replacen(&text, 1, "").into_owned();
    }
    text = NEWLINE_RUN.replace_all(&text, "\n\n").into_owned();

    text.trim().to_string()
}
