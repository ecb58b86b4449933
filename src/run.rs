use std::path::PathBuf;

use alloy_primitives::U256;
use tracing::{debug, info, instrument};

use crate::aggregate::{ingest_rows, total_reward_amount};
use crate::error::Result;
use crate::io::csv_read::read_rows;
use crate::io::json_write::stage_json;
use crate::model::{DisplayTable, OnchainTable};
use crate::sources::SourceTable;
use crate::validate::{format_token_amount, validate_price};

/// Everything a single aggregation run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub sources: SourceTable,
    pub token_price_usd: f64,
    pub onchain_output: PathBuf,
    pub display_output: PathBuf,
}

/// Totals reported once both artifacts are written.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub token_price_usd: f64,
    /// Exact sum of every on-chain entry, in the smallest unit.
    pub total_reward_amount: U256,
    pub address_count: usize,
    pub row_count: usize,
}

impl RunSummary {
    /// Total rendered in whole tokens.
    pub fn total_tokens(&self) -> String {
        format_token_amount(self.total_reward_amount)
    }

    /// Approximate USD value of the total. Informational only.
    pub fn total_usd(&self) -> f64 {
        self.total_tokens().parse::<f64>().unwrap_or(f64::NAN) * self.token_price_usd
    }
}

/// Reads all eight exports, aggregates them, and writes both artifacts.
///
/// Nothing is written unless every row of every export is valid.
#[instrument(
    level = "info",
    skip_all,
    fields(
        onchain_output = %config.onchain_output.display(),
        display_output = %config.display_output.display(),
        token_price_usd = config.token_price_usd
    )
)]
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    validate_price(config.token_price_usd)?;

    let mut onchain = OnchainTable::new();
    let mut display = DisplayTable::new();
    let row_count = aggregate_sources(
        &config.sources,
        config.token_price_usd,
        &mut onchain,
        &mut display,
    )?;

    let total_reward_amount = total_reward_amount(&onchain)?;
    info!(
        address_count = onchain.len(),
        row_count,
        %total_reward_amount,
        "aggregation complete"
    );

    // Both artifacts are staged before either becomes visible.
    let staged_onchain = stage_json(&config.onchain_output, &onchain)?;
    let staged_display = stage_json(&config.display_output, &display)?;
    staged_onchain.commit()?;
    staged_display.commit()?;
    debug!("artifacts written");

    Ok(RunSummary {
        token_price_usd: config.token_price_usd,
        total_reward_amount,
        address_count: onchain.len(),
        row_count,
    })
}

/// Feeds every export of `sources` into the two tables, partition 1 first.
/// Returns the number of rows ingested.
pub fn aggregate_sources(
    sources: &SourceTable,
    token_price_usd: f64,
    onchain: &mut OnchainTable,
    display: &mut DisplayTable,
) -> Result<usize> {
    let mut row_count = 0;
    for (partition, category, path) in sources.iter() {
        let rows = read_rows(path)?;
        info!(
            %partition,
            %category,
            path = %path.display(),
            rows = rows.len(),
            "read reward export"
        );
        row_count += ingest_rows(
            &rows,
            partition,
            category,
            token_price_usd,
            onchain,
            display,
        )?;
    }
    Ok(row_count)
}
