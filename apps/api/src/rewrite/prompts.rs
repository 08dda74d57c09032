// Prompt template for the rewrite flow.
// The section labels here must stay in sync with reply_parser::Section.

use crate::rewrite::tone::Tone;

/// Rewrite instruction template. Replace `{tone_name}` and `{tone_description}`,
/// then append the user text after the trailing `User input:` line.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"You are an English Technical Writer AI.

Tasks:
1. Detect mixed-language sentences (for example Indonesian mixed with English).
2. Translate every non-English part into natural English.
3. Fix all grammar issues and make the sentence clear and natural.

Tone: {tone_name}
Tone description: {tone_description}
Apply this tone consistently across ALL of the variations below.

Return exactly this structure, with the labels in this order and exactly one
variation after each label:

Corrected:
<corrected, natural, clear sentence>

Professional:
<more formal / business version>

Casual:
<slightly relaxed, conversational version>

Gen-Z:
<playful Gen-Z slang version>

User input:
"#;

/// Builds the rewrite prompt for an already-resolved tone.
///
/// The user text is appended last and never passes through placeholder
/// substitution, so it lands in the prompt byte-for-byte.
pub fn build_prompt(text: &str, tone: Tone) -> String {
    let mut prompt = REWRITE_PROMPT_TEMPLATE
        .replace("{tone_name}", tone.name())
        .replace("{tone_description}", tone.description());
    prompt.push_str(text);
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_user_text_verbatim() {
        let text = "jadi saya tidak perlu melakukan apapun if not using region US-EAST-1 ?";
        let prompt = build_prompt(text, Tone::Normal);
        assert!(prompt.contains(text));
    }

    #[test]
    fn test_prompt_keeps_prefix_like_and_placeholder_text() {
        let text = "Corrected: {tone_name}\nGen-Z: lol";
        let prompt = build_prompt(text, Tone::Warm);
        assert!(prompt.contains(text), "user text must not be rewritten");
        assert!(prompt.trim_end().ends_with("Gen-Z: lol"));
    }

    #[test]
    fn test_unknown_tone_uses_normal_description() {
        let prompt = build_prompt("hello", Tone::resolve("Grumpy"));
        assert!(prompt.contains("Tone: Normal"));
        assert!(prompt.contains(Tone::Normal.description()));
    }

    #[test]
    fn test_resolved_tone_is_interpolated() {
        let prompt = build_prompt("hello", Tone::resolve("sarcasm"));
        assert!(prompt.contains("Tone: Sarcasm"));
        assert!(prompt.contains(Tone::Sarcasm.description()));
        assert!(!prompt.contains("{tone_name}"));
        assert!(!prompt.contains("{tone_description}"));
    }

    #[test]
    fn test_sections_are_listed_in_canonical_order() {
        let prompt = build_prompt("x", Tone::Normal);
        let pos = |label: &str| prompt.find(label).unwrap();
        assert!(pos("Corrected:") < pos("Professional:"));
        assert!(pos("Professional:") < pos("Casual:"));
        assert!(pos("Casual:") < pos("Gen-Z:"));
        assert!(pos("Gen-Z:") < pos("User input:"));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(
            build_prompt("same", Tone::Confident),
            build_prompt("same", Tone::Confident)
        );
    }
}
