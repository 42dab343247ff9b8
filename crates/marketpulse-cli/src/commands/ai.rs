use marketpulse_core::{AiAnalysis, ChatMessage, MarketEngine};
use serde_json::Value;
use tracing::debug;

use crate::cli::{ChatArgs, PatternsArgs, SentimentArgs};
use crate::error::CliError;

pub async fn sentiment(args: &SentimentArgs, engine: &MarketEngine) -> Result<Value, CliError> {
    let headline = non_blank(&args.headline, "headline")?;
    let analysis = engine
        .sentiment(headline, args.exchange.as_deref())
        .await?;
    to_value(AiAnalysis::from(analysis))
}

pub async fn patterns(args: &PatternsArgs, engine: &MarketEngine) -> Result<Value, CliError> {
    let headlines: Vec<String> = args
        .headlines
        .iter()
        .map(|headline| headline.trim())
        .filter(|headline| !headline.is_empty())
        .map(str::to_owned)
        .collect();
    if headlines.is_empty() {
        return Err(CliError::Command(String::from("at least one headline is required")));
    }

    let scan = engine.scan_patterns(&headlines).await;
    to_value(AiAnalysis::from(scan))
}

pub async fn chat(args: &ChatArgs, engine: &MarketEngine) -> Result<Value, CliError> {
    let history = conversation(&args.messages)?;
    let turn = engine.chat(&history).await;
    to_value(AiAnalysis::from(turn))
}

fn to_value(analysis: AiAnalysis) -> Result<Value, CliError> {
    debug!(mode = analysis.mode(), "rendering AI analysis");
    Ok(serde_json::to_value(analysis)?)
}

/// Alternate user and assistant turns, starting with the user.
fn conversation(messages: &[String]) -> Result<Vec<ChatMessage>, CliError> {
    messages
        .iter()
        .enumerate()
        .map(|(index, content)| {
            let content = non_blank(content, "message")?;
            Ok(if index % 2 == 0 {
                ChatMessage::user(content)
            } else {
                ChatMessage::assistant(content)
            })
        })
        .collect()
}

fn non_blank<'a>(value: &'a str, field: &str) -> Result<&'a str, CliError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::Command(format!("{field} cannot be blank")));
    }
    Ok(trimmed)
}
