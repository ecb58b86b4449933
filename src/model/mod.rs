use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ToolError;
use crate::validate::validate_address;

/// One of the two award rounds a reward export belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Part1,
    Part2,
}

impl Partition {
    /// Processing order. Partition 1 is always settled before partition 2.
    pub const ALL: [Partition; 2] = [Partition::Part1, Partition::Part2];

    /// Short tag used in export file names and error messages.
    pub fn file_tag(self) -> &'static str {
        match self {
            Partition::Part1 => "p1",
            Partition::Part2 => "p2",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_tag())
    }
}

/// Pool the reward export was computed for. Used as a key only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Btcb,
    Busd,
    Eth,
    Usdt,
}

impl Category {
    pub const ALL: [Category; 4] = [Category::Btcb, Category::Busd, Category::Eth, Category::Usdt];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Btcb => "btcb",
            Category::Busd => "busd",
            Category::Eth => "eth",
            Category::Usdt => "usdt",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reward level reached by an address in one category export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    T1,
    T2,
    T3,
    T4,
}

/// A validated EVM account address.
///
/// The value is rendered with its EIP-55 checksum everywhere it is printed or
/// serialized, so the same account spelled in different cases maps to a
/// single key. Artifact keys are therefore normalised, unlike earlier
/// outputs keyed by the raw `user` cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecipientAddress(Address);

impl RecipientAddress {
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    pub fn as_address(&self) -> &Address {
        &self.0
    }

    pub fn to_checksum(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl fmt::Display for RecipientAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for RecipientAddress {
    type Err = ToolError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        validate_address(raw)
    }
}

impl Serialize for RecipientAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for RecipientAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Raw row of a reward export. Only the contractual columns are read; any
/// other column in the file is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RewardRow {
    pub user: String,
    pub tvl_tier: String,
    pub prize: String,
}

/// On-chain facing entry: what the distributor contract owes an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnchainEntry {
    /// Sum of all converted prizes, in the token's smallest unit.
    #[serde(with = "decimal_amount")]
    pub cumulative_reward_amount: U256,
    pub eligible_partition1: bool,
    pub eligible_partition2: bool,
}

impl OnchainEntry {
    pub fn mark_eligible(&mut self, partition: Partition) {
        match partition {
            Partition::Part1 => self.eligible_partition1 = true,
            Partition::Part2 => self.eligible_partition2 = true,
        }
    }

    pub fn is_eligible(&self, partition: Partition) -> bool {
        match partition {
            Partition::Part1 => self.eligible_partition1,
            Partition::Part2 => self.eligible_partition2,
        }
    }
}

/// Tier reached per category within one partition. `None` serializes as
/// `null` for categories the address did not appear in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTiers {
    pub btcb: Option<Tier>,
    pub busd: Option<Tier>,
    pub eth: Option<Tier>,
    pub usdt: Option<Tier>,
}

impl CategoryTiers {
    pub fn get(&self, category: Category) -> Option<Tier> {
        match category {
            Category::Btcb => self.btcb,
            Category::Busd => self.busd,
            Category::Eth => self.eth,
            Category::Usdt => self.usdt,
        }
    }

    pub fn slot_mut(&mut self, category: Category) -> &mut Option<Tier> {
        match category {
            Category::Btcb => &mut self.btcb,
            Category::Busd => &mut self.busd,
            Category::Eth => &mut self.eth,
            Category::Usdt => &mut self.usdt,
        }
    }
}

/// Display facing entry: which tier the address reached in each of the eight
/// category exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub part1: CategoryTiers,
    pub part2: CategoryTiers,
}

impl DisplayEntry {
    pub fn tiers(&self, partition: Partition) -> &CategoryTiers {
        match partition {
            Partition::Part1 => &self.part1,
            Partition::Part2 => &self.part2,
        }
    }

    pub fn tiers_mut(&mut self, partition: Partition) -> &mut CategoryTiers {
        match partition {
            Partition::Part1 => &mut self.part1,
            Partition::Part2 => &mut self.part2,
        }
    }
}

/// Address → on-chain entry. Serialized as the first output artifact.
pub type OnchainTable = BTreeMap<RecipientAddress, OnchainEntry>;

/// Address → display entry. Serialized as the second output artifact.
pub type DisplayTable = BTreeMap<RecipientAddress, DisplayEntry>;

/// Serde adapter writing `U256` as a base-10 string so no JSON consumer
/// truncates it to a double.
pub mod decimal_amount {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        U256::from_str_radix(&raw, 10).map_err(serde::de::Error::custom)
    }
}
