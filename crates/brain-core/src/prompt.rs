//! Prompt assembly and prompt fingerprinting.

use sha2::{Digest, Sha256};

use crate::message::{ChatMessage, ChatRole};

/// Persona instruction for the "Auri" companion.
pub const DEFAULT_PERSONA_PROMPT: &str = r#"Eres "Auri", una acompañante emocional empática y cálida. Tu propósito es ser un espacio seguro para que la persona hable de sus sentimientos, emociones, preocupaciones y pasiones.

Reglas:
1. Mantén el foco en el bienestar emocional de la persona (sentimientos, estrés, hobbies).
2. No eres un buscador ni un chatbot genérico. Si te hacen una pregunta factual o ajena a sus sentimientos, redirige la conversación con amabilidad hacia cómo se siente.
3. Si la consulta sí trata de bienestar, apóyate en la información de contexto que recibes para dar una respuesta informada.
4. Sé breve, cálida y comprensiva. Usa emojis con moderación.
5. Si detectas angustia severa, sugiere buscar ayuda profesional (por ejemplo, la Línea 113)."#;

/// Sentence injected when the retriever found nothing relevant.
pub const NO_CONTEXT_SENTENCE: &str =
    "No se encontró contexto relevante. Enfócate en la emoción del usuario.";

/// Text sent in place of an empty user utterance.
pub const EMPTY_TEXT_PLACEHOLDER: &str = "(mensaje corto o poco claro)";

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Build the per-request context block for the model.
///
/// The block carries the user's display name and the retrieved knowledge
/// snippet, and instructs the model not to quote the mechanism back.
pub fn build_user_context(display_name: &str, snippet: Option<&str>) -> String {
    let name = match display_name.trim() {
        "" => "Usuario",
        name => name,
    };
    let context = snippet
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_CONTEXT_SENTENCE);

    format!(
        "Información para Auri (NO la menciones textualmente en la respuesta):\n\n\
         - Nombre del usuario: {name}\n\
         - Contexto relevante: {context}\n\n\
         Usa esta información para que la respuesta sea más empática, \
         pero NUNCA digas \"según el contexto\", \"en tu historial\" ni nada técnico."
    )
}

/// Assemble the full message list for a model call.
///
/// Layout: `[system: persona, system: user_context, *history, user: new_text]`.
/// A blank `new_user_text` is replaced by [`EMPTY_TEXT_PLACEHOLDER`], a blank
/// persona by [`DEFAULT_PERSONA_PROMPT`], and blank or system-role history
/// entries are skipped, so no message in the result has empty content and the
/// new utterance is the only trailing user message. History is not truncated.
pub fn assemble_prompt(
    persona: &str,
    user_context: &str,
    history: Vec<ChatMessage>,
    new_user_text: &str,
) -> Vec<ChatMessage> {
    let persona = if persona.trim().is_empty() {
        DEFAULT_PERSONA_PROMPT
    } else {
        persona
    };
    let user_text = if new_user_text.trim().is_empty() {
        EMPTY_TEXT_PLACEHOLDER
    } else {
        new_user_text
    };

    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(ChatMessage::system(persona));
    if !user_context.trim().is_empty() {
        messages.push(ChatMessage::system(user_context));
    }
    messages.extend(
        history
            .into_iter()
            .filter(|m| m.role != ChatRole::System && !m.content.trim().is_empty()),
    );
    messages.push(ChatMessage::user(user_text));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_prompt_stable() {
        let first = hash_prompt("test prompt");
        let second = hash_prompt("test prompt");
        let different = hash_prompt("another prompt");

        assert_eq!(first, second);
        assert_ne!(first, different);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_assemble_layout() {
        let history = vec![ChatMessage::user("hola"), ChatMessage::assistant("¡Hola!")];
        let messages = assemble_prompt("persona", "contexto", history, "me siento triste");

        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0], ChatMessage::system("persona"));
        assert_eq!(messages[1], ChatMessage::system("contexto"));
        assert_eq!(messages[2], ChatMessage::user("hola"));
        assert_eq!(messages[3], ChatMessage::assistant("¡Hola!"));
        assert_eq!(messages[4], ChatMessage::user("me siento triste"));
    }

    #[test]
    fn test_assemble_placeholder_for_blank_text() {
        let messages = assemble_prompt("persona", "contexto", Vec::new(), "   ");
        let last = messages.last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert_eq!(last.content, EMPTY_TEXT_PLACEHOLDER);
    }

    #[test]
    fn test_assemble_single_trailing_user_message() {
        for len in [0usize, 1, 7, 50] {
            let history: Vec<ChatMessage> = (0..len)
                .map(|i| {
                    if i % 2 == 0 {
                        ChatMessage::user(format!("u{i}"))
                    } else {
                        ChatMessage::assistant(format!("a{i}"))
                    }
                })
                .collect();
            let messages = assemble_prompt("p", "c", history, "nuevo");

            assert_eq!(messages.last().unwrap(), &ChatMessage::user("nuevo"));
            assert_eq!(messages.len(), len + 3);
            assert!(messages.iter().all(|m| !m.content.trim().is_empty()));
        }
    }

    #[test]
    fn test_assemble_never_emits_empty_message() {
        let history = vec![ChatMessage::assistant(""), ChatMessage::user("  ")];
        let messages = assemble_prompt("", "", history, "");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, DEFAULT_PERSONA_PROMPT);
        assert!(messages.iter().all(|m| !m.content.trim().is_empty()));
    }

    #[test]
    fn test_user_context_with_snippet() {
        let context = build_user_context("Ana", Some("Respirar hondo ayuda con el estrés."));
        assert!(context.contains("Nombre del usuario: Ana"));
        assert!(context.contains("Respirar hondo ayuda con el estrés."));
        assert!(context.contains("NO la menciones textualmente"));
    }

    #[test]
    fn test_user_context_without_snippet() {
        let context = build_user_context("  ", None);
        assert!(context.contains("Nombre del usuario: Usuario"));
        assert!(context.contains(NO_CONTEXT_SENTENCE));

        let blank = build_user_context("Luis", Some("   "));
        assert!(blank.contains(NO_CONTEXT_SENTENCE));
    }
}
