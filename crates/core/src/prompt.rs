//! Prompt Templates
//!
//! Fixed text used when talking to the generator and the chat endpoint.
//! The four-section lesson structure is a contract with downstream
//! consumers, not just phrasing.

/// Persona instruction sent as the system message on every generation.
pub const SYSTEM_PROMPT: &str = "\
You are an expert AI and Machine Learning tutor named 'Synapse'. \
Your goal is to explain complex topics in the simplest way possible for a chat message. \
You must follow the requested structure and formatting rules STRICTLY.";

/// Message sent once the curriculum has no pending lessons left.
pub const CURRICULUM_COMPLETE_NOTICE: &str =
    "🎉 You've completed the entire curriculum! Congratulations! 🎉";

/// Builds the user prompt for a lesson on `topic`.
///
/// Requests exactly four labeled sections: analogy, explanation, code
/// example, key takeaway. The formatting rules keep the output inside
/// the subset of Markdown the chat endpoint renders reliably.
pub fn lesson_prompt(topic: &str) -> String {
    format!(
        r#"Today's topic is: "{topic}"

**STRUCTURE:**
1. **Simple Analogy:** Start with a simple, real-world analogy.
2. **Clear Explanation:** Give a concise, easy-to-read explanation.
3. **Code Example:** Provide a short, well-commented code snippet if applicable.
4. **Key Takeaway:** Summarize the most important point in one sentence.

**FORMATTING RULES:**
- Use ONLY these Markdown styles: *bold text* for bolding and _italic text_ for italics.
- Use backticks for code, like `print("Hello")`.
- DO NOT use Markdown headings (#), lists (- or *), or horizontal lines (---)."#
    )
}
