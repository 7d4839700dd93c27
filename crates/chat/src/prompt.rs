//! Prompt assembly.
//!
//! Combines the persona instructions, session memory, retrieval
//! context, and the user message into a fixed-order message sequence.
//! The memory message is the only conditional step; the `Context:`
//! message is always emitted, empty context included — an empty block
//! tells the model to answer from its own knowledge.

use sagealpha_core::message::Message;

/// The fixed persona and behavior instructions.
pub const SYSTEM_PROMPT: &str = "You are SageAlpha, a financial assistant powered by SageAlpha.ai.\n\
Use this logic:\n\
1. If the Context contains useful information, use it to answer.\n\
2. If the Context is empty or not relevant, answer using your own knowledge.\n\
3. Be precise and financially accurate.\n\
4. Respond in clear plain text only. Do not use markdown formatting, asterisks (*),\n   \
hash symbols (#), bullet lists, or code blocks.\n";

/// Label prefixed to the session memory system message.
const MEMORY_LABEL: &str = "Session memory (previous Q&A sections):";

/// Build the ordered message sequence for one generation call.
pub fn build_messages(
    user_message: &str,
    context_text: &str,
    memory_text: Option<&str>,
) -> Vec<Message> {
    let mut messages = vec![Message::system(SYSTEM_PROMPT)];

    if let Some(memory) = memory_text.filter(|m| !m.is_empty()) {
        messages.push(Message::system(format!("{MEMORY_LABEL}\n{memory}")));
    }

    messages.push(Message::system(format!("Context:\n{context_text}")));
    messages.push(Message::user(user_message));

    messages
}
