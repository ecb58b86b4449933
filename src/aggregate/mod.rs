use alloy_primitives::U256;
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::model::{
    Category, DisplayEntry, DisplayTable, OnchainEntry, OnchainTable, Partition, RecipientAddress,
    RewardRow, Tier,
};
use crate::validate::{convert_prize_to_token_amount, parse_tier, validate_address};

/// Builds the display entry for an address seen for the first time, with all
/// eight category slots empty.
pub fn new_display_entry() -> DisplayEntry {
    DisplayEntry::default()
}

/// Records one validated reward row into both tables.
///
/// The on-chain entry accumulates the token amount and flags the partition as
/// eligible. The display entry stores the tier in the `[partition][category]`
/// slot, which may only be filled once per address.
pub fn record(
    onchain: &mut OnchainTable,
    display: &mut DisplayTable,
    address: RecipientAddress,
    partition: Partition,
    category: Category,
    tier: Tier,
    token_amount: U256,
) -> Result<()> {
    let entry = onchain.entry(address).or_insert_with(OnchainEntry::default);
    entry.cumulative_reward_amount = entry
        .cumulative_reward_amount
        .checked_add(token_amount)
        .ok_or(ToolError::AmountOverflow)?;
    entry.mark_eligible(partition);

    let slot = display
        .entry(address)
        .or_insert_with(new_display_entry)
        .tiers_mut(partition)
        .slot_mut(category);
    if slot.is_some() {
        return Err(ToolError::DuplicateRecord {
            address: address.to_checksum(),
            partition,
            category,
        });
    }
    *slot = Some(tier);

    Ok(())
}

/// Validates and records every row of one category export.
///
/// Returns the number of rows ingested. The first invalid row aborts with its
/// error; rows before it stay recorded, so callers must discard both tables
/// on failure.
pub fn ingest_rows(
    rows: &[RewardRow],
    partition: Partition,
    category: Category,
    token_price_usd: f64,
    onchain: &mut OnchainTable,
    display: &mut DisplayTable,
) -> Result<usize> {
    for row in rows {
        let address = validate_address(&row.user)?;
        let token_amount = convert_prize_to_token_amount(&row.prize, token_price_usd)?;
        let tier = parse_tier(&row.tvl_tier)?;
        debug!(%address, %partition, %category, ?tier, %token_amount, "recording reward row");
        record(
            onchain,
            display,
            address,
            partition,
            category,
            tier,
            token_amount,
        )?;
    }
    Ok(rows.len())
}

/// Exact sum of every address's cumulative reward amount.
pub fn total_reward_amount(onchain: &OnchainTable) -> Result<U256> {
    onchain.values().try_fold(U256::ZERO, |total, entry| {
        total
            .checked_add(entry.cumulative_reward_amount)
            .ok_or(ToolError::AmountOverflow)
    })
}
