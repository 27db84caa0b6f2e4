//! Grounded prompt composition and source previews.

/// How many documents to retrieve per grounded answer.
pub const TOP_K: usize = 3;

/// Maximum length of a source preview, in characters.
pub const SOURCE_PREVIEW_CHARS: usize = 200;

const TRUNCATION_MARKER: &str = "...";

/// Compose the bounded-context prompt from retrieved document texts and the
/// user's question. Context entries are separated by blank lines.
pub fn compose_prompt(contexts: &[String], question: &str) -> String {
    let context = contexts.join("\n\n");
    format!(
        "Use the following pieces of context to answer the question at the end. \n\
         If you don't know the answer based on the context, just say that you don't know, \
         don't try to make up an answer.\n\n\
         Context: {}\n\n\
         Question: {}\n\n\
         Provide a helpful and accurate answer:",
        context, question
    )
}

/// Truncate a source text for the response payload. The marker is only
/// appended when the original actually exceeds the preview length.
pub fn source_preview(content: &str) -> String {
    let mut preview: String = content.chars().take(SOURCE_PREVIEW_CHARS).collect();
    if content.chars().count() > SOURCE_PREVIEW_CHARS {
        preview.push_str(TRUNCATION_MARKER);
    }
    preview
}
