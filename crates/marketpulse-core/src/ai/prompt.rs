use serde::Serialize;

use crate::{CryptoAsset, ExchangeSnapshot, MarketMover};

/// Live market state embedded in the chat system prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MarketContext {
    pub exchanges: Vec<ExchangeContext>,
    pub movers: Vec<MoverContext>,
    pub crypto: Vec<CryptoContext>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeContext {
    pub id: String,
    pub country: String,
    pub index: String,
    pub index_value: String,
    pub percentage_change: f64,
    pub is_open: bool,
}

impl From<&ExchangeSnapshot> for ExchangeContext {
    fn from(snapshot: &ExchangeSnapshot) -> Self {
        Self {
            id: snapshot.id.clone(),
            country: snapshot.country.clone(),
            index: snapshot.index_name.clone(),
            index_value: snapshot.index_value.clone(),
            percentage_change: snapshot.percentage_change,
            is_open: snapshot.is_open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoverContext {
    pub ticker: String,
    pub sector: String,
    pub price: f64,
    pub change_pct: f64,
}

impl From<&MarketMover> for MoverContext {
    fn from(mover: &MarketMover) -> Self {
        Self {
            ticker: mover.ticker.clone(),
            sector: mover.sector.clone(),
            price: mover.price,
            change_pct: mover.change_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoContext {
    pub symbol: String,
    pub name: String,
    pub pair: String,
}

impl From<&CryptoAsset> for CryptoContext {
    fn from(asset: &CryptoAsset) -> Self {
        Self {
            symbol: asset.symbol.clone(),
            name: asset.name.clone(),
            pair: asset.pair.to_string(),
        }
    }
}

pub(crate) fn sentiment_prompt(headline: &str, context: Option<&ExchangeSnapshot>) -> String {
    let context = context
        .and_then(|snapshot| serde_json::to_string(snapshot).ok())
        .unwrap_or_else(|| String::from("{}"));

    format!(
        "Analyze: \"{headline}\". Context: {context}. Return JSON only: \
         {{sentiment_polarity (one of positive, mild_positive, neutral, mild_negative, negative), \
         heat_score (integer 0-100), boom_probability, economic_risk_level, one_line_summary}}"
    )
}

pub(crate) fn pattern_prompt(headlines: &[String]) -> String {
    let numbered = headlines
        .iter()
        .enumerate()
        .map(|(index, headline)| format!("{}. {headline}", index + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a market analyst. Analyze these headlines and return JSON with patterns array \
         (each: type, asset, confidence integer 0-100, reasoning), macro_summary, \
         risk_level (Low/Moderate/High/Critical).\n\nHeadlines:\n{numbered}"
    )
}

pub(crate) fn chat_system_prompt(context: &MarketContext) -> String {
    format!(
        "You are MarketPulse AI, an economic analyst embedded in a global market monitoring platform.\n\n\
         CURRENT LIVE DATA (use this in your analysis):\n\n\
         EXCHANGES:\n{}\n\n\
         TOP MARKET MOVERS:\n{}\n\n\
         TRACKED CRYPTO:\n{}\n\n\
         RULES:\n\
         - Always reference the live data above when relevant.\n\
         - Be concise but insightful. Use bullet points for clarity.\n\
         - If asked about a specific country or exchange, use the data provided.\n\
         - Provide actionable insights, not just descriptions.\n\
         - Keep responses under 300 words unless the user asks for detailed analysis.",
        pretty(&context.exchanges),
        pretty(&context.movers),
        pretty(&context.crypto),
    )
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| String::from("[]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_prompt_numbers_headlines() {
        let prompt = pattern_prompt(&[String::from("Fed holds"), String::from("Oil spikes")]);
        assert!(prompt.contains("1. Fed holds\n2. Oil spikes"));
        assert!(prompt.contains("Low/Moderate/High/Critical"));
    }

    #[test]
    fn sentiment_prompt_without_context_embeds_empty_object() {
        let prompt = sentiment_prompt("Markets rally", None);
        assert!(prompt.starts_with("Analyze: \"Markets rally\". Context: {}."));
    }

    #[test]
    fn chat_prompt_embeds_each_section() {
        let context = MarketContext {
            exchanges: Vec::new(),
            movers: vec![MoverContext {
                ticker: String::from("NVDA"),
                sector: String::from("Semiconductors"),
                price: 120.5,
                change_pct: 3.2,
            }],
            crypto: Vec::new(),
        };
        let prompt = chat_system_prompt(&context);
        assert!(prompt.contains("TOP MARKET MOVERS:\n["));
        assert!(prompt.contains("\"ticker\": \"NVDA\""));
        assert!(prompt.contains("TRACKED CRYPTO:\n[]"));
    }
}
