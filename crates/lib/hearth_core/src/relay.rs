//! Chat relay: persona prompt in, sanitized English reply out.
//!
//! The assistant must answer in English only. When the model slips into
//! Chinese anyway, its reply is dropped and a canned reply is chosen from the
//! user's message instead.

use thiserror::Error;
use tracing::{debug, warn};

use crate::chat::{ChatReply, ChatRequest, ConversationTurn};
use crate::gemini::{ModelClient, UpstreamError};
use crate::preferences::Preferences;
use crate::prompt::render_persona_prompt;

pub const ARRIVAL_REPLY: &str = "Got it! I'll turn on the air conditioner to your usual 26°C and open the living room lights for you. Everything will be ready when you arrive!";
pub const ROUTINE_REPLY: &str = "Sure! I'm turning on the air conditioner at 26°C, the living room lights, and the entry hallway lights - your typical setup!";
pub const BEDTIME_REPLY: &str = "Okay! I'm turning off all the lights, closing the curtains, and setting the AC to 28°C for a comfortable night. Sleep well!";
pub const GENERIC_REPLY: &str =
    "Done! I've controlled your smart home devices according to your preferences.";

/// Keyword groups checked in order; the first group with a hit wins.
const CANNED_REPLIES: [(&[&str], &str); 3] = [
    (&["home", "arriving", "back"], ARRIVAL_REPLY),
    (&["usual", "common", "normal"], ROUTINE_REPLY),
    (&["sleep", "bed"], BEDTIME_REPLY),
];

/// Chat relay errors.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Invalid chat request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Turns sent to the model.
///
/// Non-empty history is forwarded as-is and `message` is not appended to it;
/// callers that send history include the new message as its last turn.
pub fn build_contents(request: &ChatRequest) -> Result<Vec<ConversationTurn>, RelayError> {
    if !request.conversation_history.is_empty() {
        return Ok(request.conversation_history.clone());
    }
    if request.message.trim().is_empty() {
        return Err(RelayError::InvalidRequest(
            "message is required when conversationHistory is empty".into(),
        ));
    }
    Ok(vec![ConversationTurn::user(request.message.clone())])
}

/// True if `text` contains a CJK unified ideograph (U+4E00..=U+9FA5).
pub fn contains_disallowed_script(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fa5}').contains(&c))
}

/// Canned reply for `message`, by case-insensitive keyword match.
pub fn canned_reply(message: &str) -> &'static str {
    let lower = message.to_lowercase();
    CANNED_REPLIES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(GENERIC_REPLY, |(_, reply)| *reply)
}

/// Pass `raw` through unless it contains disallowed script.
pub fn sanitize(raw: String, message: &str) -> String {
    if contains_disallowed_script(&raw) {
        warn!("model reply contained non-English script, using canned reply");
        canned_reply(message).to_string()
    } else {
        raw
    }
}

/// Relay one chat request to the model and sanitize the reply.
pub async fn relay(
    client: &dyn ModelClient,
    prefs: &Preferences,
    request: &ChatRequest,
) -> Result<ChatReply, RelayError> {
    let contents = build_contents(request)?;
    let system_instruction = render_persona_prompt(prefs);

    debug!(
        message_len = request.message.len(),
        turns = contents.len(),
        "relaying chat message"
    );

    let raw = client.generate(&system_instruction, &contents).await?;
    Ok(ChatReply {
        reply: sanitize(raw, &request.message),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    /// Model stub that records its inputs and answers with a fixed result.
    struct StubModel {
        reply: Result<String, String>,
        seen: Mutex<Vec<(String, Vec<ConversationTurn>)>>,
    }

    impl StubModel {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                reply: Err(message.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelClient for StubModel {
        async fn generate(
            &self,
            system_instruction: &str,
            contents: &[ConversationTurn],
        ) -> Result<String, UpstreamError> {
            self.seen
                .lock()
                .unwrap()
                .push((system_instruction.to_string(), contents.to_vec()));
            self.reply.clone().map_err(|message| UpstreamError::Status {
                status: 500,
                message,
            })
        }
    }

    #[test]
    fn detects_cjk_ideographs_only() {
        assert!(contains_disallowed_script("好的"));
        assert!(contains_disallowed_script("OK 我来开灯"));
        assert!(contains_disallowed_script("\u{4e00}"));
        assert!(contains_disallowed_script("\u{9fa5}"));
        assert!(!contains_disallowed_script("\u{9fa6}"));
        assert!(!contains_disallowed_script("Set to 26°C, café, こんにちは"));
        assert!(!contains_disallowed_script(""));
    }

    #[test]
    fn canned_reply_keyword_order() {
        assert_eq!(canned_reply("I'll be HOME soon"), ARRIVAL_REPLY);
        assert_eq!(canned_reply("arriving in 5"), ARRIVAL_REPLY);
        assert_eq!(canned_reply("I'm back"), ARRIVAL_REPLY);
        assert_eq!(canned_reply("the usual please"), ROUTINE_REPLY);
        assert_eq!(canned_reply("Normal setup"), ROUTINE_REPLY);
        assert_eq!(canned_reply("time for bed"), BEDTIME_REPLY);
        assert_eq!(canned_reply("Sleep mode"), BEDTIME_REPLY);
        assert_eq!(canned_reply("open the window"), GENERIC_REPLY);
        assert_eq!(canned_reply(""), GENERIC_REPLY);
        // Arrival wins over bedtime.
        assert_eq!(canned_reply("back home, going to bed"), ARRIVAL_REPLY);
        // Routine wins over bedtime.
        assert_eq!(canned_reply("usual bedtime"), ROUTINE_REPLY);
    }

    #[test]
    fn clean_reply_is_unchanged() {
        let raw = "Done! AC set to 26°C.".to_string();
        assert_eq!(sanitize(raw.clone(), "home"), raw);
    }

    #[test]
    fn history_is_forwarded_without_message() {
        let history = vec![
            ConversationTurn::user("turn on the light"),
            ConversationTurn::model("Done!"),
            ConversationTurn::user("now the fan"),
        ];
        let request = ChatRequest {
            message: "something else".into(),
            conversation_history: history.clone(),
        };
        assert_eq!(build_contents(&request).unwrap(), history);
    }

    #[test]
    fn blank_message_without_history_is_invalid() {
        let err = build_contents(&ChatRequest::new("   ")).unwrap_err();
        assert!(matches!(err, RelayError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn arrival_message_with_chinese_reply_gets_arrival_canned() {
        let model = StubModel::replying("好的，我会打开空调。");
        let reply = relay(&model, &Preferences::default(), &ChatRequest::new("I'll be home soon"))
            .await
            .unwrap();
        assert_eq!(reply.reply, ARRIVAL_REPLY);
    }

    #[tokio::test]
    async fn english_reply_passes_through() {
        let model = StubModel::replying("Sure, lights on.");
        let reply = relay(&model, &Preferences::default(), &ChatRequest::new("lights"))
            .await
            .unwrap();
        assert_eq!(reply.reply, "Sure, lights on.");
    }

    #[tokio::test]
    async fn sends_persona_prompt_and_single_user_turn() {
        let model = StubModel::replying("ok");
        let prefs = Preferences::default();
        relay(&model, &prefs, &ChatRequest::new("hello")).await.unwrap();

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, render_persona_prompt(&prefs));
        assert_eq!(seen[0].1, vec![ConversationTurn::user("hello")]);
    }

    #[tokio::test]
    async fn upstream_failure_is_propagated() {
        let model = StubModel::failing("quota exceeded");
        let err = relay(&model, &Preferences::default(), &ChatRequest::new("hi"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RelayError::Upstream(UpstreamError::Status { ref message, .. }) if message == "quota exceeded"
        ));
    }

    #[tokio::test]
    async fn invalid_request_never_reaches_model() {
        let model = StubModel::replying("ok");
        let err = relay(&model, &Preferences::default(), &ChatRequest::new(""))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidRequest(_)));
        assert!(model.seen.lock().unwrap().is_empty());
    }
}
