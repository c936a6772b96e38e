// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt assembly.
//!
//! Pure functions over a [`Persona`]: no I/O, no randomness, same
//! input always renders the same prompt. Ordering is deliberate —
//! persona framing first (stable identity), then conversational
//! continuity, then factual grounding, then the live question with
//! the answer cue last.

use corvid_config::Persona;

/// Sentence substituted for the knowledge block when retrieval finds
/// nothing relevant.
pub const NO_CONTEXT_FALLBACK: &str = "I couldn't find any relevant information on that topic.";

fn push_section(sections: &mut Vec<String>, label: &str, value: &str) {
    if !value.is_empty() {
        sections.push(format!("{label}: {value}"));
    }
}

/// Renders every populated persona field into a labeled section.
///
/// Empty fields are omitted entirely, never rendered as blank
/// sections. Only personality traits flagged true are listed.
pub fn build_system_prompt(persona: &Persona) -> String {
    let mut sections = Vec::new();
    let name = persona.display_name();

    if persona.description.is_empty() {
        sections.push(format!("You are {name}."));
    } else {
        sections.push(format!("You are {name}. {}", persona.description));
    }
    push_section(&mut sections, "History", &persona.history);
    push_section(&mut sections, "Background", &persona.background);
    push_section(&mut sections, "Life Story", &persona.life_story);
    if !persona.anecdotes.is_empty() {
        sections.push(format!(
            "Personal Anecdotes: {}",
            persona.anecdotes.join(" ")
        ));
    }
    let traits: Vec<&str> = persona
        .personality_traits
        .iter()
        .filter(|(_, enabled)| **enabled)
        .map(|(name, _)| name.as_str())
        .collect();
    if !traits.is_empty() {
        sections.push(format!("Personality Traits: {}", traits.join(", ")));
    }
    if !persona.likes.is_empty() {
        sections.push(format!("Likes: {}", persona.likes.join(", ")));
    }
    if !persona.dislikes.is_empty() {
        sections.push(format!("Dislikes: {}", persona.dislikes.join(", ")));
    }
    if !persona.prohibited_topics.is_empty() {
        sections.push(format!(
            "Topics to Avoid: {}",
            persona.prohibited_topics.join(", ")
        ));
    }
    push_section(
        &mut sections,
        "Communication Style",
        &persona.communication_style,
    );
    push_section(&mut sections, "Tone", &persona.tone);
    let mut format_hints = Vec::new();
    if persona.response_format.use_emojis {
        format_hints.push("use emojis");
    }
    if persona.response_format.include_hashtags {
        format_hints.push("include hashtags");
    }
    if persona.response_format.include_mentions {
        format_hints.push("include mentions");
    }
    if !format_hints.is_empty() {
        sections.push(format!("Response Format: {}", format_hints.join(", ")));
    }
    push_section(
        &mut sections,
        "Additional Instructions",
        &persona.additional_instructions,
    );

    sections.join("\n")
}

/// Assembles the user turn: memory block, knowledge block, the
/// literal query, then the answer cue. Empty blocks are omitted.
pub fn build_user_prompt(
    query: &str,
    persona: &Persona,
    memory_text: &str,
    knowledge_text: &str,
) -> String {
    let mut parts = Vec::new();
    if !memory_text.is_empty() {
        parts.push(format!("Recent conversation:\n{memory_text}"));
    }
    if !knowledge_text.is_empty() {
        parts.push(format!("Relevant information:\n{knowledge_text}"));
    }
    parts.push(format!("User: {query}"));
    parts.push(format!("{}'s answer:", persona.display_name()));
    parts.join("\n\n")
}

/// The full prompt as a single string: persona framing first, query
/// and answer cue last.
pub fn build_prompt(
    query: &str,
    persona: &Persona,
    memory_text: &str,
    knowledge_text: &str,
) -> String {
    format!(
        "{}\n\n{}",
        build_system_prompt(persona),
        build_user_prompt(query, persona, memory_text, knowledge_text)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_persona() -> Persona {
        let mut persona = Persona {
            name: "Alexandra".to_string(),
            description: "A retired astronomer.".to_string(),
            history: "Spent thirty years at an observatory.".to_string(),
            tone: "warm".to_string(),
            communication_style: "plainspoken".to_string(),
            likes: vec!["astronomy".to_string(), "tea".to_string()],
            dislikes: vec!["light pollution".to_string()],
            prohibited_topics: vec!["politics".to_string()],
            ..Persona::default()
        };
        persona.personality_traits.insert("curious".to_string(), true);
        persona.personality_traits.insert("sarcastic".to_string(), false);
        persona.response_format.use_emojis = true;
        persona
    }

    #[test]
    fn system_prompt_renders_populated_sections() {
        let prompt = build_system_prompt(&full_persona());
        assert!(prompt.starts_with("You are Alexandra. A retired astronomer."));
        assert!(prompt.contains("History: Spent thirty years at an observatory."));
        assert!(prompt.contains("Likes: astronomy, tea"));
        assert!(prompt.contains("Topics to Avoid: politics"));
        assert!(prompt.contains("Tone: warm"));
        assert!(prompt.contains("Response Format: use emojis"));
    }

    #[test]
    fn system_prompt_omits_empty_sections() {
        let prompt = build_system_prompt(&Persona::default());
        assert_eq!(prompt, "You are Corvid.");
    }

    #[test]
    fn disabled_traits_are_not_rendered() {
        let prompt = build_system_prompt(&full_persona());
        assert!(prompt.contains("Personality Traits: curious"));
        assert!(!prompt.contains("sarcastic"));
    }

    #[test]
    fn prompt_ends_with_query_then_answer_cue() {
        let persona = full_persona();
        let prompt = build_prompt("What is a pulsar?", &persona, "User: hi\nAlexandra: hello", "A pulsar is a neutron star.");
        let user_pos = prompt.rfind("User: What is a pulsar?").unwrap();
        let cue_pos = prompt.rfind("Alexandra's answer:").unwrap();
        assert!(user_pos < cue_pos);
        assert!(prompt.ends_with("Alexandra's answer:"));
        let memory_pos = prompt.find("Recent conversation:").unwrap();
        let knowledge_pos = prompt.find("Relevant information:").unwrap();
        assert!(memory_pos < knowledge_pos && knowledge_pos < user_pos);
    }

    #[test]
    fn empty_blocks_are_omitted_from_user_prompt() {
        let prompt = build_user_prompt("hi", &Persona::default(), "", "");
        assert_eq!(prompt, "User: hi\n\nCorvid's answer:");
    }
}
