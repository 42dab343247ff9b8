mod activity;
mod ai;
mod crypto;
mod exchanges;
mod movers;

use std::time::Duration;

use marketpulse_core::{EngineBuilder, EngineConfig, ExchangeCatalog, MarketEngine};
use serde_json::Value;
use tracing::debug;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<Value, CliError> {
    let engine = build_engine(cli)?;

    match &cli.command {
        Command::Exchanges => exchanges::run_all(&engine).await,
        Command::Exchange(args) => exchanges::run_one(args, &engine).await,
        Command::Crypto => crypto::run(&engine).await,
        Command::Movers => movers::run(&engine),
        Command::Activity => activity::run_countries(&engine),
        Command::Events => activity::run_events(&engine),
        Command::Sentiment(args) => ai::sentiment(args, &engine).await,
        Command::Patterns(args) => ai::patterns(args, &engine).await,
        Command::Chat(args) => ai::chat(args, &engine).await,
    }
}

fn build_engine(cli: &Cli) -> Result<MarketEngine, CliError> {
    let mut config = EngineConfig::default();
    if let Some(ttl) = cli.ttl_secs {
        config.cache_ttl = Duration::from_secs(ttl);
    }
    if let Some(timeout) = cli.timeout_ms {
        config.quote_timeout = Duration::from_millis(timeout);
        config.ticker_timeout = Duration::from_millis(timeout);
    }

    debug!(
        mock = cli.mock,
        catalog = ?cli.catalog,
        ttl_secs = config.cache_ttl.as_secs(),
        "building engine"
    );
    let mut builder = EngineBuilder::new().with_config(config);
    builder = if cli.mock {
        builder.with_mock_mode()
    } else {
        builder.with_env_credentials()
    };
    if let Some(path) = &cli.catalog {
        builder = builder.with_catalog(ExchangeCatalog::from_json_file(path)?);
    }

    Ok(builder.build())
}
