//! Topic tracking.
//!
//! Decides, per incoming user message, whether the conversation's
//! subject changes. Short phrases ("cupid limited", "tata motors") name
//! a new topic; question-style follow-ups ("who is the owner", "give
//! the ceo name") keep the previous one. Pure function of its inputs.

/// Question/reference words that mark a message as a follow-up about
/// the existing topic rather than a new subject.
const QUESTION_STARTS: &[&str] = &[
    "who", "what", "which", "when", "where", "why", "how", "give", "tell", "show", "explain",
    "owner", "ceo", "chairman", "md", "director",
];

/// A short phrase of at most this many tokens is assumed to name a new
/// subject (e.g. a company name).
const MAX_TOPIC_TOKENS: usize = 4;

/// Compute the conversation topic after seeing `user_message`.
///
/// Returns the previous topic unchanged when the message is empty,
/// starts with a question word, or is a longer free-form sentence.
pub fn update_topic(user_message: &str, previous_topic: &str) -> String {
    let text = user_message.trim().to_lowercase();
    if text.is_empty() {
        return previous_topic.to_string();
    }

    let tokens = tokenize(&text);
    if tokens.is_empty() {
        return previous_topic.to_string();
    }

    if QUESTION_STARTS.contains(&tokens[0].as_str()) {
        return previous_topic.to_string();
    }

    if tokens.len() <= MAX_TOPIC_TOKENS {
        return text;
    }

    // Ambiguous long sentence: the search and the model still see the
    // full question, so the topic stays put.
    previous_topic.to_string()
}

/// Lowercase alphanumeric runs; everything else is a separator.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_is_a_noop() {
        assert_eq!(update_topic("", "cupid limited"), "cupid limited");
        assert_eq!(update_topic("   ", "cupid limited"), "cupid limited");
        assert_eq!(update_topic("", ""), "");
    }

    #[test]
    fn punctuation_only_message_is_a_noop() {
        assert_eq!(update_topic("???", "tata motors"), "tata motors");
    }

    #[test]
    fn short_phrase_becomes_new_topic() {
        assert_eq!(update_topic("Cupid Limited", ""), "cupid limited");
        assert_eq!(update_topic("Tata Motors", "cupid limited"), "tata motors");
    }

    #[test]
    fn question_words_keep_previous_topic() {
        assert_eq!(
            update_topic("who is the owner", "cupid limited"),
            "cupid limited"
        );
        assert_eq!(
            update_topic("give the ceo name", "tata motors"),
            "tata motors"
        );
        assert_eq!(update_topic("explain the results", "cupid limited"), "cupid limited");
    }

    #[test]
    fn reference_words_keep_previous_topic() {
        // "owner"/"ceo"/... as the first word also signal a follow-up.
        assert_eq!(update_topic("ceo name please", "cupid limited"), "cupid limited");
        assert_eq!(update_topic("owner details", "cupid limited"), "cupid limited");
    }

    #[test]
    fn long_sentence_keeps_previous_topic() {
        assert_eq!(
            update_topic(
                "the quarterly report numbers look odd compared to last year",
                "cupid limited"
            ),
            "cupid limited"
        );
    }

    #[test]
    fn four_tokens_is_still_a_topic() {
        assert_eq!(
            update_topic("Oil and Natural Gas", ""),
            "oil and natural gas"
        );
    }

    #[test]
    fn topic_keeps_original_punctuation_but_lowercased() {
        // The whole lowercase message text becomes the topic, not the
        // joined tokens.
        assert_eq!(update_topic("L&T Finance", ""), "l&t finance");
    }
}
