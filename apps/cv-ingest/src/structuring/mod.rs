pub mod prompts;
pub mod recovery;

use tracing::{debug, instrument};

use crate::llm_client::{ChatMessage, ChatRequest, CompletionClient, LlmError};
use prompts::{build_structuring_prompt, STRUCTURING_SYSTEM};

pub use recovery::{recover_record, PartialRecord, Provenance, RecoveredRecord, RecoveryError};

pub const MAX_STRUCTURING_CHARS: usize = 6000;
pub const TRUNCATION_MARKER: &str = "\n\n[... CV text truncated for processing ...]";

/// Caps `text` at `max_chars` characters, appending a visible marker when cut.
/// Returns the text and whether it was truncated.
pub fn truncate_for_structuring(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        None => (text.to_string(), false),
        Some((byte_idx, _)) => {
            let mut truncated = text[..byte_idx].to_string();
            truncated.push_str(TRUNCATION_MARKER);
            (truncated, true)
        }
    }
}

/// One deterministic completion turning CV text into raw model output.
/// The output still has to go through [`recover_record`].
#[instrument(skip(llm, text), fields(chars = text.chars().count()))]
pub async fn structure_text(
    llm: &dyn CompletionClient,
    text: &str,
    model: &str,
    max_tokens: u32,
) -> Result<String, LlmError> {
    let request = ChatRequest::new(model)
        .message(ChatMessage::system(STRUCTURING_SYSTEM))
        .message(ChatMessage::user(build_structuring_prompt(text)))
        .max_tokens(max_tokens)
        .temperature(0.0);

    let raw = llm.complete(&request).await?;
    debug!(response_chars = raw.len(), "Structuring response received");
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::mock::ScriptedClient;

    #[test]
    fn test_short_text_untouched() {
        let (text, truncated) = truncate_for_structuring("Jane Doe", MAX_STRUCTURING_CHARS);
        assert_eq!(text, "Jane Doe");
        assert!(!truncated);
    }

    #[test]
    fn test_exact_limit_untouched() {
        let input = "a".repeat(MAX_STRUCTURING_CHARS);
        let (text, truncated) = truncate_for_structuring(&input, MAX_STRUCTURING_CHARS);
        assert_eq!(text, input);
        assert!(!truncated);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let input = "é".repeat(10);
        let (text, truncated) = truncate_for_structuring(&input, 4);
        assert!(truncated);
        assert_eq!(text, format!("éééé{TRUNCATION_MARKER}"));
    }

    #[test]
    fn test_long_text_is_capped_with_marker() {
        let input = "x".repeat(MAX_STRUCTURING_CHARS + 500);
        let (text, truncated) = truncate_for_structuring(&input, MAX_STRUCTURING_CHARS);
        assert!(truncated);
        assert!(text.ends_with(TRUNCATION_MARKER));
        assert_eq!(
            text.chars().count(),
            MAX_STRUCTURING_CHARS + TRUNCATION_MARKER.chars().count()
        );
    }

    #[tokio::test]
    async fn test_structuring_request_shape() {
        let client = ScriptedClient::new().with_response(r#"{"firstName":"Jane"}"#);
        let raw = structure_text(&client, "Jane Doe\nEngineer", "gpt-4o-mini", 4000)
            .await
            .unwrap();
        assert_eq!(raw, r#"{"firstName":"Jane"}"#);

        let requests = client.requests();
        let request = &requests[0];
        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.max_tokens, 4000);
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        let user = request.messages[1].text().unwrap();
        assert!(user.contains("Jane Doe\nEngineer"));
        assert!(user.contains("\"workExperience\""));
        assert!(!user.contains("{cv_text}"));
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let client = ScriptedClient::new().with_api_error(429, "rate limited");
        let result = structure_text(&client, "text", "m", 4000).await;
        assert!(matches!(result, Err(LlmError::Api { status: 429, .. })));
    }
}
