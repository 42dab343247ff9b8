//! # AI Augmentation
//!
//! Optional path that turns headlines or a conversation into a structured
//! result through an external completion service.
//!
//! | Mode | Input | Result |
//! |------|-------|--------|
//! | sentiment | one headline, optional exchange snapshot | [`SentimentAnalysis`] |
//! | patterns | up to `headline_limit` headlines | [`PatternScan`] |
//! | chat | trailing `history_limit` turns, [`MarketContext`] | [`ChatTurn`] |
//!
//! Every mode always yields a renderable result. Missing credentials, transport
//! failures, timeouts, and responses that fail schema validation are logged and
//! replaced by the mode's fixed demo payload. Nothing is cached.

mod analysis;
mod completion;
mod prompt;

use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tracing::warn;

pub use analysis::{AiAnalysis, ChatTurn, Pattern, PatternScan, SentimentAnalysis};
pub use completion::{
    ChatMessage, ChatRole, CompletionClient, CompletionError, CompletionRequest,
    GroqCompletionClient, UnconfiguredCompletionClient, DEFAULT_COMPLETION_BASE_URL,
    DEFAULT_COMPLETION_MODEL,
};
pub use prompt::{CryptoContext, ExchangeContext, MarketContext, MoverContext};

use crate::ExchangeSnapshot;

/// Per-mode sampling settings.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ModeSettings {
    temperature: f64,
    max_tokens: u32,
    json_object: bool,
}

const SENTIMENT: ModeSettings = ModeSettings {
    temperature: 0.1,
    max_tokens: 300,
    json_object: true,
};
const PATTERNS: ModeSettings = ModeSettings {
    temperature: 0.25,
    max_tokens: 600,
    json_object: true,
};
const CHAT: ModeSettings = ModeSettings {
    temperature: 0.3,
    max_tokens: 800,
    json_object: false,
};

#[derive(Clone)]
pub struct AiProxy {
    client: Arc<dyn CompletionClient>,
    model: String,
    history_limit: usize,
    headline_limit: usize,
    timeout: Duration,
}

impl AiProxy {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            model: String::from(DEFAULT_COMPLETION_MODEL),
            history_limit: 10,
            headline_limit: 10,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn unconfigured() -> Self {
        Self::new(Arc::new(UnconfiguredCompletionClient))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_limits(mut self, history_limit: usize, headline_limit: usize) -> Self {
        self.history_limit = history_limit;
        self.headline_limit = headline_limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    pub async fn sentiment(
        &self,
        headline: &str,
        context: Option<&ExchangeSnapshot>,
    ) -> SentimentAnalysis {
        let messages = vec![ChatMessage::user(prompt::sentiment_prompt(headline, context))];
        let result = self
            .complete(SENTIMENT, messages)
            .await
            .and_then(|content| SentimentAnalysis::parse(&content));

        result.unwrap_or_else(|error| {
            log_substitution("sentiment", &error);
            SentimentAnalysis::demo()
        })
    }

    pub async fn scan_patterns(&self, headlines: &[String]) -> PatternScan {
        let capped = &headlines[..headlines.len().min(self.headline_limit)];
        let messages = vec![ChatMessage::user(prompt::pattern_prompt(capped))];
        let result = self.complete(PATTERNS, messages).await;
        let scanned_at = OffsetDateTime::now_utc();

        result
            .and_then(|content| PatternScan::parse(&content, scanned_at))
            .unwrap_or_else(|error| {
                log_substitution("patterns", &error);
                PatternScan::demo(scanned_at)
            })
    }

    /// Answer the last user turn of `history` with live market context.
    ///
    /// Only `user` and `assistant` turns are forwarded, and only the most
    /// recent `history_limit` of them.
    pub async fn chat(&self, history: &[ChatMessage], context: &MarketContext) -> ChatTurn {
        let mut messages = vec![ChatMessage::system(prompt::chat_system_prompt(context))];
        messages.extend(self.trailing_turns(history));

        let result = self
            .complete(CHAT, messages)
            .await
            .and_then(|content| ChatTurn::parse(&content));

        match result {
            Ok(turn) => turn,
            Err(CompletionError::ConfigurationMissing) => {
                log_substitution("chat", &CompletionError::ConfigurationMissing);
                ChatTurn::unconfigured()
            }
            Err(error) => {
                log_substitution("chat", &error);
                ChatTurn::apology()
            }
        }
    }

    fn trailing_turns(&self, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let turns: Vec<ChatMessage> = history
            .iter()
            .filter(|message| matches!(message.role, ChatRole::User | ChatRole::Assistant))
            .cloned()
            .collect();
        let start = turns.len().saturating_sub(self.history_limit);
        turns[start..].to_vec()
    }

    async fn complete(
        &self,
        settings: ModeSettings,
        messages: Vec<ChatMessage>,
    ) -> Result<String, CompletionError> {
        if !self.client.is_configured() {
            return Err(CompletionError::ConfigurationMissing);
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            json_object: settings.json_object,
        };

        match tokio::time::timeout(self.timeout, self.client.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(CompletionError::Transport(format!(
                "completion exceeded {}ms",
                self.timeout.as_millis()
            ))),
        }
    }
}

fn log_substitution(mode: &'static str, error: &CompletionError) {
    warn!(mode, code = error.code(), reason = %error, "serving demo AI payload");
}
