//! Session memory builder.
//!
//! Renders a compact textual memory from previous Q&A sections to prime
//! the generation provider. When a topic is set, only sections that
//! mention it are considered, so "cupid limited" memory never bleeds
//! into "tata motors" questions. Falls back to the last N sections when
//! nothing matches.

use sagealpha_core::message::Section;

/// Build the session memory string.
///
/// Output never exceeds `max_chars` characters, never reorders
/// sections, and never mutates the input.
pub fn build_memory(
    sections: &[Section],
    current_topic: &str,
    limit: usize,
    max_chars: usize,
) -> String {
    if sections.is_empty() {
        return String::new();
    }

    let topic = current_topic.trim().to_lowercase();

    let matched: Vec<&Section> = if topic.is_empty() {
        Vec::new()
    } else {
        sections
            .iter()
            .filter(|s| {
                s.query.to_lowercase().contains(&topic) || s.answer.to_lowercase().contains(&topic)
            })
            .collect()
    };

    // No topic match → last N overall.
    let kept: Vec<&Section> = if matched.is_empty() {
        sections.iter().skip(sections.len().saturating_sub(limit)).collect()
    } else {
        matched
            .iter()
            .skip(matched.len().saturating_sub(limit))
            .copied()
            .collect()
    };

    let rendered = kept
        .iter()
        .map(|s| format!("[{}] Q: {}\nA: {}", s.timestamp, s.query, s.answer))
        .collect::<Vec<_>>()
        .join("\n\n");

    truncate_chars(rendered, max_chars)
}

/// Hard cut at `max_chars` characters, respecting char boundaries.
fn truncate_chars(mut text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            text.truncate(byte_idx);
            text
        }
        None => text,
    }
}
