//! Retrieval gate.
//!
//! Decides whether retrieved documents are relevant enough to use as
//! context. An empty result means "answer from the model's own
//! knowledge" — it is a valid state, never an error.

use sagealpha_core::document::RetrievedDocument;

/// Hard cap on the rendered context, in characters.
pub const CONTEXT_MAX_CHARS: usize = 6000;

/// Render the context block from documents that clear the threshold.
///
/// The score comparison is inclusive (`score >= threshold`). Kept
/// documents stay in their original ranked order.
pub fn select_context(documents: &[RetrievedDocument], threshold: f32) -> String {
    select_context_with_cap(documents, threshold, CONTEXT_MAX_CHARS)
}

pub fn select_context_with_cap(
    documents: &[RetrievedDocument],
    threshold: f32,
    max_chars: usize,
) -> String {
    let blocks: Vec<String> = documents
        .iter()
        .filter(|d| d.score >= threshold)
        .filter(|d| !d.text.is_empty())
        .map(|d| format!("Source: {}\n{}", d.source_or_id(), d.text))
        .collect();

    truncate_chars(blocks.join("\n\n"), max_chars)
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            text.truncate(byte_idx);
            text
        }
        None => text,
    }
}
