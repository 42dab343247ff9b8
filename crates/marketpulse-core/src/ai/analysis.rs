//! Structured AI results and their schema validation.
//!
//! Completion output is parsed as a JSON object, then each required field is
//! extracted with its type checked. Unknown fields are dropped, so a
//! serialized result carries exactly the declared field set.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use super::completion::{ChatRole, CompletionError};
use crate::SentimentPolarity;

/// Single-headline sentiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub sentiment_polarity: SentimentPolarity,
    pub heat_score: u8,
    pub boom_probability: String,
    pub economic_risk_level: String,
    pub one_line_summary: String,
}

impl SentimentAnalysis {
    pub fn demo() -> Self {
        Self {
            sentiment_polarity: SentimentPolarity::Neutral,
            heat_score: 50,
            boom_probability: String::from("stable market"),
            economic_risk_level: String::from("Moderate Risk"),
            one_line_summary: String::from("AI unavailable: configure GROQ_API_KEY"),
        }
    }

    pub fn parse(content: &str) -> Result<Self, CompletionError> {
        let object = parse_object(content)?;
        Ok(Self {
            sentiment_polarity: required_polarity(&object, "sentiment_polarity")?,
            heat_score: required_score(&object, "heat_score")?,
            boom_probability: required_text(&object, "boom_probability")?,
            economic_risk_level: required_text(&object, "economic_risk_level")?,
            one_line_summary: required_text(&object, "one_line_summary")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    #[serde(rename = "type")]
    pub kind: String,
    pub asset: String,
    pub confidence: u8,
    pub reasoning: String,
}

/// Multi-headline pattern scan, stamped when produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternScan {
    pub patterns: Vec<Pattern>,
    pub macro_summary: String,
    pub risk_level: String,
    pub scanned_at: String,
}

impl PatternScan {
    pub fn demo(scanned_at: OffsetDateTime) -> Self {
        let patterns = DEMO_PATTERNS
            .iter()
            .map(|&(kind, asset, confidence, reasoning)| Pattern {
                kind: kind.to_owned(),
                asset: asset.to_owned(),
                confidence,
                reasoning: reasoning.to_owned(),
            })
            .collect();

        Self {
            patterns,
            macro_summary: String::from(
                "Markets are in a cautious risk-on mode with geopolitical headwinds and strong tech earnings creating crosscurrents.",
            ),
            risk_level: String::from("Moderate"),
            scanned_at: format_timestamp(scanned_at),
        }
    }

    pub fn parse(content: &str, scanned_at: OffsetDateTime) -> Result<Self, CompletionError> {
        let object = parse_object(content)?;
        let entries = object
            .get("patterns")
            .and_then(Value::as_array)
            .ok_or_else(|| CompletionError::schema("patterns"))?;

        let mut patterns = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let item = entry
                .as_object()
                .ok_or_else(|| CompletionError::schema(format!("patterns[{index}]")))?;
            let field = |name: &str| format!("patterns[{index}].{name}");

            patterns.push(Pattern {
                kind: required_text(item, "type").map_err(|_| CompletionError::schema(field("type")))?,
                asset: required_text(item, "asset").map_err(|_| CompletionError::schema(field("asset")))?,
                confidence: required_score(item, "confidence")
                    .map_err(|_| CompletionError::schema(field("confidence")))?,
                reasoning: required_text(item, "reasoning")
                    .map_err(|_| CompletionError::schema(field("reasoning")))?,
            });
        }

        Ok(Self {
            patterns,
            macro_summary: required_text(&object, "macro_summary")?,
            risk_level: required_text(&object, "risk_level")?,
            scanned_at: format_timestamp(scanned_at),
        })
    }
}

const DEMO_PATTERNS: &[(&str, &str, u8, &str)] = &[
    (
        "Bullish Signal",
        "AI/Tech Sector",
        78,
        "AI infrastructure spending accelerating across big tech.",
    ),
    (
        "Watch Zone",
        "Oil / WTI",
        61,
        "Middle East tensions creating supply uncertainty.",
    ),
    (
        "Bearish Warning",
        "Rate Sensitive",
        67,
        "Fed hold posture compressing growth & real-estate multiples.",
    ),
    (
        "Breakout Alert",
        "Bitcoin",
        72,
        "BTC ETF inflows at multi-week high; watch $95k resistance.",
    ),
    (
        "Accumulation Zone",
        "India Equities",
        64,
        "FII flows returning to Nifty after 3-month correction.",
    ),
];

/// Assistant reply in a chat conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn unconfigured() -> Self {
        Self::assistant("AI chat unavailable: configure GROQ_API_KEY")
    }

    pub fn apology() -> Self {
        Self::assistant("I encountered an error processing your request. Please try again.")
    }

    pub fn parse(content: &str) -> Result<Self, CompletionError> {
        if content.trim().is_empty() {
            return Err(CompletionError::schema("content"));
        }
        Ok(Self::assistant(content))
    }
}

/// One of the three AI result shapes.
///
/// Serializes untagged: consumers receive the bare shape of the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AiAnalysis {
    Sentiment(SentimentAnalysis),
    PatternScan(PatternScan),
    Chat(ChatTurn),
}

impl AiAnalysis {
    pub const fn mode(&self) -> &'static str {
        match self {
            Self::Sentiment(_) => "sentiment",
            Self::PatternScan(_) => "patterns",
            Self::Chat(_) => "chat",
        }
    }
}

impl From<SentimentAnalysis> for AiAnalysis {
    fn from(value: SentimentAnalysis) -> Self {
        Self::Sentiment(value)
    }
}

impl From<PatternScan> for AiAnalysis {
    fn from(value: PatternScan) -> Self {
        Self::PatternScan(value)
    }
}

impl From<ChatTurn> for AiAnalysis {
    fn from(value: ChatTurn) -> Self {
        Self::Chat(value)
    }
}

pub(crate) fn format_timestamp(at: OffsetDateTime) -> String {
    at.format(&Rfc3339)
        .unwrap_or_else(|_| at.unix_timestamp().to_string())
}

fn parse_object(content: &str) -> Result<Map<String, Value>, CompletionError> {
    match serde_json::from_str::<Value>(content.trim()) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(CompletionError::ResponseParse(String::from(
            "expected a JSON object",
        ))),
        Err(error) => Err(CompletionError::ResponseParse(error.to_string())),
    }
}

fn required_text(object: &Map<String, Value>, field: &str) -> Result<String, CompletionError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| CompletionError::schema(field))
}

/// Integer in `[0, 100]`. Integral floats such as `72.0` are accepted.
fn required_score(object: &Map<String, Value>, field: &str) -> Result<u8, CompletionError> {
    let value = object
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| CompletionError::schema(field))?;

    if !value.is_finite() || value.fract() != 0.0 || !(0.0..=100.0).contains(&value) {
        return Err(CompletionError::schema(field));
    }
    Ok(value as u8)
}

fn required_polarity(
    object: &Map<String, Value>,
    field: &str,
) -> Result<SentimentPolarity, CompletionError> {
    let raw = required_text(object, field)?;
    let normalized = raw.to_ascii_lowercase().replace([' ', '-'], "_");
    SentimentPolarity::ALL
        .into_iter()
        .find(|polarity| polarity.as_str() == normalized)
        .ok_or_else(|| CompletionError::schema(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_names(value: &Value) -> Vec<String> {
        let mut names: Vec<String> = value
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    #[test]
    fn sentiment_parse_keeps_declared_fields_only() {
        let parsed = SentimentAnalysis::parse(
            r#"{"sentiment_polarity":"Mild Positive","heat_score":72,"boom_probability":"likely",
                "economic_risk_level":"Low Risk","one_line_summary":"Tech leads.","extra":"ignored"}"#,
        )
        .expect("valid sentiment");

        assert_eq!(parsed.sentiment_polarity, SentimentPolarity::MildPositive);
        assert_eq!(parsed.heat_score, 72);

        let value = serde_json::to_value(&parsed).expect("serialize");
        assert_eq!(
            field_names(&value),
            vec![
                "boom_probability",
                "economic_risk_level",
                "heat_score",
                "one_line_summary",
                "sentiment_polarity"
            ]
        );
    }

    #[test]
    fn out_of_range_score_is_schema_violation() {
        let error = SentimentAnalysis::parse(
            r#"{"sentiment_polarity":"neutral","heat_score":150,"boom_probability":"x",
                "economic_risk_level":"y","one_line_summary":"z"}"#,
        )
        .expect_err("must fail");
        assert_eq!(error, CompletionError::schema("heat_score"));

        let error = SentimentAnalysis::parse(
            r#"{"sentiment_polarity":"neutral","heat_score":50.5,"boom_probability":"x",
                "economic_risk_level":"y","one_line_summary":"z"}"#,
        )
        .expect_err("must fail");
        assert_eq!(error, CompletionError::schema("heat_score"));
    }

    #[test]
    fn non_json_content_is_parse_failure() {
        let error = SentimentAnalysis::parse("Sure! Here is the analysis").expect_err("must fail");
        assert!(matches!(error, CompletionError::ResponseParse(_)));

        let error = SentimentAnalysis::parse("[1,2,3]").expect_err("must fail");
        assert!(matches!(error, CompletionError::ResponseParse(_)));
    }

    #[test]
    fn pattern_scan_reports_nested_field() {
        let at = OffsetDateTime::UNIX_EPOCH;
        let error = PatternScan::parse(
            r#"{"patterns":[{"type":"Bullish","asset":"Gold","confidence":"high","reasoning":"r"}],
                "macro_summary":"m","risk_level":"Low"}"#,
            at,
        )
        .expect_err("must fail");
        assert_eq!(error, CompletionError::schema("patterns[0].confidence"));
    }

    #[test]
    fn pattern_scan_is_stamped_by_caller_clock() {
        let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).expect("timestamp");
        let scan = PatternScan::parse(
            r#"{"patterns":[],"macro_summary":"Quiet tape.","risk_level":"Low",
                "scanned_at":"1999-01-01T00:00:00Z"}"#,
            at,
        )
        .expect("valid scan");

        assert_eq!(scan.scanned_at, "2023-11-14T22:13:20Z");
        assert!(scan.patterns.is_empty());
    }

    #[test]
    fn demo_payloads_match_declared_shapes() {
        let sentiment = serde_json::to_value(AiAnalysis::from(SentimentAnalysis::demo()))
            .expect("serialize");
        assert_eq!(sentiment["sentiment_polarity"], "neutral");
        assert_eq!(sentiment["heat_score"], 50);

        let scan = PatternScan::demo(OffsetDateTime::UNIX_EPOCH);
        assert_eq!(scan.patterns.len(), 5);
        assert!(scan.patterns.iter().all(|p| p.confidence <= 100));
        let value = serde_json::to_value(&scan).expect("serialize");
        assert_eq!(
            field_names(&value),
            vec!["macro_summary", "patterns", "risk_level", "scanned_at"]
        );
        assert_eq!(
            field_names(&value["patterns"][0]),
            vec!["asset", "confidence", "reasoning", "type"]
        );

        let chat = serde_json::to_value(ChatTurn::unconfigured()).expect("serialize");
        assert_eq!(chat["role"], "assistant");
        assert_eq!(field_names(&chat), vec!["content", "role"]);
    }

    #[test]
    fn analysis_reports_its_mode() {
        assert_eq!(AiAnalysis::from(SentimentAnalysis::demo()).mode(), "sentiment");
        assert_eq!(
            AiAnalysis::from(PatternScan::demo(OffsetDateTime::UNIX_EPOCH)).mode(),
            "patterns"
        );
        assert_eq!(AiAnalysis::from(ChatTurn::apology()).mode(), "chat");
    }

    #[test]
    fn demo_summaries_use_plain_punctuation() {
        assert_eq!(
            SentimentAnalysis::demo().one_line_summary,
            "AI unavailable: configure GROQ_API_KEY"
        );
        assert!(!ChatTurn::unconfigured().content.contains('\u{2014}'));
    }

    #[test]
    fn blank_chat_reply_is_schema_violation() {
        assert_eq!(
            ChatTurn::parse("   "),
            Err(CompletionError::schema("content"))
        );
    }
}
