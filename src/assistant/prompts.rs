/*!
 * Prompt templates for summarization and translation.
 */

/// Build the summarization prompt for a page body.
///
/// Asks for a compact bullet list followed by one short context paragraph,
/// with no headers, so downstream display and speech get a predictable shape.
pub fn summary_prompt(text: &str) -> String {
    format!(
        "Summarize the following text as concisely as possible, using this format:\n\
         \n\
         - [point 1, at most one short sentence]\n\
         - [point 2, at most one short sentence]\n\
         - [point 3, at most one short sentence]\n\
         - [point 4, if needed]\n\
         - [point 5, if needed]\n\
         \n\
         [One short closing paragraph with background, context, and how the points relate.]\n\
         \n\
         Constraints:\n\
         - Keep each point brief and avoid redundant wording\n\
         - At most 5 points\n\
         - The whole summary must be under a third of the original length\n\
         - If the text is already short, return it as is\n\
         - Do not add section headers or any text outside the format above\n\
         \n\
         ---\n\
         {}\n\
         ---",
        text
    )
}

/// Build the translation prompt for a text and target language.
pub fn translation_prompt(text: &str, target_language_name: &str) -> String {
    format!(
        "Translate the following text into {} accurately. If the text has a \
         structured form (bullet points, numbered lists), keep that structure. \
         Prioritize conveying the meaning and context faithfully. Output only \
         the translation.\n\
         \n\
         ---\n\
         {}\n\
         ---",
        target_language_name, text
    )
}
