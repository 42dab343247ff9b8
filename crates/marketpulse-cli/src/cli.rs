//! CLI argument definitions for MarketPulse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `exchanges` | Snapshot every exchange in the catalog |
//! | `exchange` | Snapshot one exchange by id |
//! | `crypto` | Tracked crypto pairs from one batched ticker call |
//! | `movers` | Simulated equity movers board |
//! | `activity` | Country activity heatmap scores |
//! | `events` | Geolocated hot-events feed |
//! | `sentiment` | AI sentiment for one headline |
//! | `patterns` | AI pattern scan over headlines |
//! | `chat` | AI market chat |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--mock` | `false` | Offline transport; everything degrades to synthetic |
//! | `--catalog` | builtin | Exchange catalog JSON file |
//! | `--ttl-secs` | `120` | Cache freshness window |
//! | `--timeout-ms` | per upstream | Upstream call deadline |
//!
//! # Examples
//!
//! ```bash
//! marketpulse exchanges --pretty
//! marketpulse exchange NYSE
//! marketpulse sentiment --headline "Fed holds rates" --exchange NYSE
//! marketpulse chat --message "How is Asia trading?"
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Market data aggregation with live, stale, and synthetic fallback.
#[derive(Debug, Parser)]
#[command(
    name = "marketpulse",
    author,
    version,
    about = "Market data aggregation CLI",
    long_about = "MarketPulse aggregates index quotes, crypto tickers, and AI market \
commentary from unreliable upstreams. Every command returns a renderable result:\n\
\n\
  • live when the upstream answers\n\
  • stale when it fails and a cached value exists\n\
  • synthetic when neither is available\n\
\n\
Set GROQ_API_KEY to enable the AI commands; without it they serve demo payloads."
)]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Refuse all network calls; results degrade to synthetic and AI to demo payloads.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Exchange catalog JSON file replacing the builtin list.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Freshness window for cached quotes and tickers, in seconds.
    #[arg(long, global = true)]
    pub ttl_secs: Option<u64>,

    /// Upstream quote and ticker deadline in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Snapshot every exchange in the catalog, in catalog order.
    ///
    /// # Examples
    ///
    ///   marketpulse exchanges
    ///   marketpulse exchanges --mock --pretty
    Exchanges,

    /// Snapshot one exchange by id (case-insensitive).
    ///
    /// # Examples
    ///
    ///   marketpulse exchange NYSE
    ///   marketpulse exchange tse --pretty
    Exchange(ExchangeArgs),

    /// Tracked crypto pairs, tiered per pair.
    Crypto,

    /// Simulated equity movers, largest absolute move first.
    Movers,

    /// Activity score (0-100) per ISO country code for the globe heatmap.
    Activity,

    /// Fixed list of geolocated market headlines.
    Events,

    /// Classify one headline with the completion service.
    ///
    /// # Examples
    ///
    ///   marketpulse sentiment --headline "Chip exports surge"
    ///   marketpulse sentiment --headline "Yen slides" --exchange TSE
    Sentiment(SentimentArgs),

    /// Scan headlines for market patterns.
    ///
    /// # Examples
    ///
    ///   marketpulse patterns --headline "Oil spikes" --headline "Banks rally"
    Patterns(PatternsArgs),

    /// Ask the market assistant, grounded on live aggregated state.
    ///
    /// Repeated --message values form the conversation, alternating
    /// user and assistant and starting with the user.
    ///
    /// # Examples
    ///
    ///   marketpulse chat --message "Which markets are open?"
    Chat(ChatArgs),
}

/// Arguments for the `exchange` command.
#[derive(Debug, Args)]
pub struct ExchangeArgs {
    /// Exchange id (e.g., NYSE, LSE, TSE).
    pub id: String,
}

/// Arguments for the `sentiment` command.
#[derive(Debug, Args)]
pub struct SentimentArgs {
    /// Headline to classify.
    #[arg(long)]
    pub headline: String,

    /// Exchange id whose current snapshot grounds the prompt.
    #[arg(long)]
    pub exchange: Option<String>,
}

/// Arguments for the `patterns` command.
#[derive(Debug, Args)]
pub struct PatternsArgs {
    /// Headlines to scan; only the first ten are sent.
    #[arg(long = "headline", required = true, num_args = 1..)]
    pub headlines: Vec<String>,
}

/// Arguments for the `chat` command.
#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Conversation turns, alternating user and assistant.
    #[arg(long = "message", required = true, num_args = 1..)]
    pub messages: Vec<String>,
}
